//! Decoded document tree - what the markup decoder hands to the compiler

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub width: f64,
    pub height: f64,
    /// Raw text of every embedded `<style>` element, in document order.
    pub stylesheets: Vec<String>,
    /// Path-effect id to corner radius.
    pub path_effects: BTreeMap<String, f64>,
    pub layers: Vec<Layer>,
}

impl Document {
    /// Corner radius of the path effect referenced by `reference`.
    /// A leading `#` on the reference is ignored.
    pub fn corner_radius(&self, reference: &str) -> Option<f64> {
        self.path_effects
            .get(reference.trim().trim_start_matches('#'))
            .copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    pub shapes: Vec<Shape>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
    Text(Text),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub style: String,
    pub class: String,
    pub path_effect: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub style: String,
    pub class: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub style: String,
    pub class: String,
    pub description: String,
    pub spans: Vec<Span>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Span {
    pub x: f64,
    pub y: f64,
    pub style: String,
    pub text: String,
    pub description: String,
    pub spans: Vec<Span>,
}
