//! roster2table - Extract ruled roster tables from PDF pages
//!
//! Reads PDF files (or JSON page recordings written with `--dump-pages`),
//! detects the table grid drawn on every selected page and prints the
//! reconstructed tables as text or JSON.

mod pdf;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use serde::Serialize;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use rostergrid_core::debug::{DebugLayer, LayerRecorder};
use rostergrid_core::interp::{RecordedPage, load_pages, save_pages};
use rostergrid_core::table::HeaderNudge;
use rostergrid_core::{DetectionParams, Table, TableExtractor};

/// Output format for extracted tables.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputType {
    /// Tab-separated rows, one block per page (default)
    #[default]
    Text,
    /// JSON array with one entry per page
    Json,
}

/// Extract ruled roster tables from PDF pages.
#[derive(Parser, Debug)]
#[command(name = "roster2table")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// PDF files or JSON page recordings
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// A space- or comma-separated list of page numbers to process (1-indexed)
    #[arg(long = "page-numbers")]
    page_numbers: Option<String>,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Type of output to generate
    #[arg(short = 't', long = "output-type", value_enum, default_value = "text")]
    output_type: OutputType,

    // === Detection options ===
    /// JSON file with detection parameters; flags below override it
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Maximum gap between two segments for them to count as crossing
    #[arg(long = "intersection-tolerance")]
    intersection_tolerance: Option<f64>,

    /// Maximum distance between intersections that are merged
    #[arg(long = "dedup-tolerance")]
    dedup_tolerance: Option<f64>,

    /// Maximum distance between coordinates snapped to one grid line
    #[arg(long = "alignment-tolerance")]
    alignment_tolerance: Option<f64>,

    /// Slack when looking for an intersection's row and column neighbours
    #[arg(long = "area-tolerance")]
    area_tolerance: Option<f64>,

    /// Shift header cell lookups left, as the roster exporter requires
    #[arg(long = "roster-header-nudge", action = ArgAction::SetTrue)]
    roster_header_nudge: bool,

    // === Diagnostics ===
    /// Write the replayed pages as JSON to this file
    #[arg(long = "dump-pages")]
    dump_pages: Option<PathBuf>,

    /// Write the detection debug layers as JSON to this file
    #[arg(long = "debug-layers")]
    debug_layers: Option<PathBuf>,
}

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// Build detection parameters from the settings file and flags.
fn build_params(args: &Args) -> Result<DetectionParams> {
    let mut params = match &args.settings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read settings {}", path.display()))?;
            DetectionParams::from_json(&json)
                .with_context(|| format!("invalid settings in {}", path.display()))?
        }
        None => DetectionParams::default(),
    };

    let overrides = [
        (&mut params.intersection_tolerance, args.intersection_tolerance),
        (&mut params.dedup_tolerance, args.dedup_tolerance),
        (&mut params.alignment_tolerance, args.alignment_tolerance),
        (&mut params.area_tolerance, args.area_tolerance),
    ];
    for (slot, value) in overrides {
        if let Some(v) = value {
            if !(v.is_finite() && v >= 0.0) {
                bail!("tolerances must be non-negative, got {v}");
            }
            *slot = v;
        }
    }
    if args.roster_header_nudge {
        params.header_nudge = Some(HeaderNudge::roster_export());
    }
    Ok(params)
}

fn is_recording(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Load the selected pages of one input file.
fn load_input(path: &Path, page_numbers: Option<&[usize]>) -> Result<Vec<RecordedPage>> {
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }
    if is_recording(path) {
        let pages = load_pages(path)
            .with_context(|| format!("failed to load recording {}", path.display()))?;
        Ok(pages
            .into_iter()
            .filter(|p| page_numbers.is_none_or(|nums| nums.contains(&p.page_number)))
            .collect())
    } else {
        pdf::load_pdf(path, page_numbers)
    }
}

#[derive(Serialize)]
struct PageReport<'a> {
    file: &'a Path,
    page: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<&'a Table>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct PageLayers<'a> {
    file: &'a Path,
    page: usize,
    layers: Vec<DebugLayer>,
}

struct PageOutcome {
    file: PathBuf,
    page: usize,
    result: rostergrid_core::Result<Table>,
    layers: Vec<DebugLayer>,
}

fn extract_file(
    extractor: &TableExtractor,
    file: &Path,
    pages: &[RecordedPage],
    record_layers: bool,
) -> Vec<PageOutcome> {
    if record_layers {
        pages
            .iter()
            .map(|page| {
                let mut recorder = LayerRecorder::default();
                let result = extractor.extract_table_with_sink(page, &mut recorder);
                PageOutcome {
                    file: file.to_path_buf(),
                    page: page.page_number,
                    result,
                    layers: recorder.layers,
                }
            })
            .collect()
    } else {
        extractor
            .extract_tables(pages)
            .into_iter()
            .zip(pages)
            .map(|(result, page)| PageOutcome {
                file: file.to_path_buf(),
                page: page.page_number,
                result,
                layers: Vec::new(),
            })
            .collect()
    }
}

fn write_text<W: Write>(out: &mut W, outcomes: &[PageOutcome]) -> Result<()> {
    for outcome in outcomes {
        writeln!(out, "# {} page {}", outcome.file.display(), outcome.page)?;
        match &outcome.result {
            Ok(table) => {
                for row in table.texts() {
                    writeln!(out, "{}", row.join("\t"))?;
                }
            }
            Err(e) => writeln!(out, "! {e}")?,
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_json<W: Write>(out: &mut W, outcomes: &[PageOutcome]) -> Result<()> {
    let reports: Vec<PageReport<'_>> = outcomes
        .iter()
        .map(|o| PageReport {
            file: &o.file,
            page: o.page,
            table: o.result.as_ref().ok(),
            error: o.result.as_ref().err().map(ToString::to_string),
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &reports)?;
    writeln!(out)?;
    Ok(())
}

fn write_layers(path: &Path, outcomes: &[PageOutcome]) -> Result<()> {
    let layers: Vec<PageLayers<'_>> = outcomes
        .iter()
        .map(|o| PageLayers {
            file: &o.file,
            page: o.page,
            layers: o.layers.clone(),
        })
        .collect();
    let file = File::create(path)
        .with_context(|| format!("failed to create debug layers {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &layers)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let params = build_params(&args)?;
    let page_numbers = args
        .page_numbers
        .as_deref()
        .map(pdf::parse_page_numbers)
        .transpose()?;
    let extractor = TableExtractor::new(params);

    let mut outcomes = Vec::new();
    let mut dumped = Vec::new();
    for path in &args.files {
        let pages = load_input(path, page_numbers.as_deref())
            .with_context(|| format!("error processing {}", path.display()))?;
        info!(file = %path.display(), pages = pages.len(), "loaded pages");
        outcomes.extend(extract_file(
            &extractor,
            path,
            &pages,
            args.debug_layers.is_some(),
        ));
        if args.dump_pages.is_some() {
            dumped.extend(pages);
        }
    }

    if let Some(path) = &args.dump_pages {
        save_pages(path, &dumped)
            .with_context(|| format!("failed to write page dump {}", path.display()))?;
    }
    if let Some(path) = &args.debug_layers {
        write_layers(path, &outcomes)?;
    }

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };
    match args.output_type {
        OutputType::Text => write_text(&mut output, &outcomes)?,
        OutputType::Json => write_json(&mut output, &outcomes)?,
    }
    output.flush()?;

    let mut failed = 0;
    for outcome in &outcomes {
        if let Err(e) = &outcome.result {
            warn!(file = %outcome.file.display(), page = outcome.page, error = %e, "page failed");
            failed += 1;
        }
    }
    if failed > 0 {
        bail!("{failed} of {} pages produced no table", outcomes.len());
    }
    Ok(())
}
