//! Debug visualisation sink.
//!
//! The pipeline reports what it found at each stage as named layers of draw
//! calls. Extraction behaves identically whatever sink is attached.

use serde::{Deserialize, Serialize};

use crate::table::{BBox, Point};

/// RGB colour of a draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const RED: Color = Color(220, 40, 40);
    pub const GREEN: Color = Color(40, 170, 60);
    pub const BLUE: Color = Color(40, 80, 220);
    pub const ORANGE: Color = Color(240, 150, 20);
}

pub trait DebugSink {
    /// Start a new named layer; later draw calls belong to it.
    fn begin_layer(&mut self, _name: &str) {}

    fn line(&mut self, _from: Point, _to: Point, _color: Color) {}

    fn ellipse(&mut self, _center: Point, _rx: f64, _ry: f64, _color: Color) {}

    fn rect(&mut self, _bbox: BBox, _color: Color) {}
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl DebugSink for NoopSink {}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum DrawCall {
    Line { from: Point, to: Point, color: Color },
    Ellipse { center: Point, rx: f64, ry: f64, color: Color },
    Rect { bbox: BBox, color: Color },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugLayer {
    pub name: String,
    pub calls: Vec<DrawCall>,
}

/// Records layers for later rendering or inspection.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LayerRecorder {
    pub layers: Vec<DebugLayer>,
}

impl LayerRecorder {
    pub fn layer(&self, name: &str) -> Option<&DebugLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    fn push(&mut self, call: DrawCall) {
        if self.layers.is_empty() {
            self.layers.push(DebugLayer::default());
        }
        if let Some(layer) = self.layers.last_mut() {
            layer.calls.push(call);
        }
    }
}

impl DebugSink for LayerRecorder {
    fn begin_layer(&mut self, name: &str) {
        self.layers.push(DebugLayer {
            name: name.to_string(),
            calls: Vec::new(),
        });
    }

    fn line(&mut self, from: Point, to: Point, color: Color) {
        self.push(DrawCall::Line { from, to, color });
    }

    fn ellipse(&mut self, center: Point, rx: f64, ry: f64, color: Color) {
        self.push(DrawCall::Ellipse {
            center,
            rx,
            ry,
            color,
        });
    }

    fn rect(&mut self, bbox: BBox, color: Color) {
        self.push(DrawCall::Rect { bbox, color });
    }
}
