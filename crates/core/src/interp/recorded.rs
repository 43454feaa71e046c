//! In-memory page recordings.
//!
//! A `RecordedPage` holds the replayable event stream of a page together
//! with positioned glyph runs, and implements both collaborator traits. The
//! CLI produces recordings from PDFs; tests build them by hand.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::BBox;
use crate::table::clustering::cluster_objects;

use super::event::{GraphicsEvent, GraphicsEventSource, TextRegionExtractor};

/// Vertical distance within which glyph runs belong to the same text line.
pub const DEFAULT_LINE_TOLERANCE: f64 = 2.0;

/// A positioned run of text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub text: String,
    pub bbox: BBox,
}

impl Glyph {
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }

    fn h_mid(&self) -> f64 {
        (self.bbox.x0 + self.bbox.x1) / 2.0
    }

    fn v_mid(&self) -> f64 {
        (self.bbox.top + self.bbox.bottom) / 2.0
    }
}

/// A replayable page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedPage {
    /// 1-indexed page number in the source document.
    pub page_number: usize,
    pub width: f64,
    pub height: f64,
    pub events: Vec<GraphicsEvent>,
    pub glyphs: Vec<Glyph>,
}

impl RecordedPage {
    pub fn new(page_number: usize, width: f64, height: f64) -> Self {
        Self {
            page_number,
            width,
            height,
            ..Self::default()
        }
    }

    pub fn push_event(&mut self, event: GraphicsEvent) {
        self.events.push(event);
    }

    pub fn push_glyph(&mut self, glyph: Glyph) {
        self.glyphs.push(glyph);
    }
}

impl GraphicsEventSource for RecordedPage {
    fn graphics_events(&self) -> Result<Vec<GraphicsEvent>> {
        Ok(self.events.clone())
    }
}

impl TextRegionExtractor for RecordedPage {
    fn text_in_region(&self, region: BBox) -> Result<String> {
        let inside: Vec<&Glyph> = self
            .glyphs
            .iter()
            .filter(|g| g.h_mid() >= region.x0 && g.h_mid() < region.x1)
            .filter(|g| g.v_mid() >= region.top && g.v_mid() < region.bottom)
            .collect();
        if inside.is_empty() {
            return Ok(String::new());
        }

        let lines = cluster_objects(&inside, |g| g.v_mid(), DEFAULT_LINE_TOLERANCE);
        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        for mut line in lines {
            line.sort_by(|a, b| crate::utils::cmp_f64(a.bbox.x0, b.bbox.x0));
            let text: Vec<&str> = line.iter().map(|g| g.text.as_str()).collect();
            out.push(text.join(" "));
        }
        Ok(out.join("\n"))
    }
}

/// Load recorded pages from a JSON file.
pub fn load_pages(path: &Path) -> Result<Vec<RecordedPage>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Write recorded pages as JSON.
pub fn save_pages(path: &Path, pages: &[RecordedPage]) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, pages)?;
    Ok(())
}
