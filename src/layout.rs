//! Layout - the compiled output document
//!
//! Maps are `BTreeMap`s so serialized output is always in key order.

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::style::Style;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Font {
    pub font: String,
    pub size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3},{:.3})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Box,
    Circle,
    Text,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Box => "box",
            ComponentType::Circle => "circle",
            ComponentType::Text => "text",
        }
    }
}

/// One renderable element of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub kind: ComponentType,
    pub layer: usize,
    pub visible: bool,
    pub pos1: Vec2,
    pub pos2: Option<Vec2>,
    pub corner_radius: Option<f64>,
    pub radius: Option<f64>,
    pub style: Option<String>,
    pub font: Option<String>,
    pub text: Option<String>,
    /// Property name to raw binding expression.
    pub bindings: BTreeMap<String, String>,
}

impl Component {
    pub fn new(kind: ComponentType, layer: usize, pos1: Vec2) -> Self {
        Self {
            kind,
            layer,
            visible: true,
            pos1,
            pos2: None,
            corner_radius: None,
            radius: None,
            style: None,
            font: None,
            text: None,
            bindings: BTreeMap::new(),
        }
    }
}

/// Serialized shape of a component, after binding overrides.
#[derive(Serialize)]
struct OutputComponent<'a> {
    #[serde(rename = "type")]
    kind: ComponentType,
    layer: usize,
    visible: bool,
    pos1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pos2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    font: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = OutputComponent {
            kind: self.kind,
            layer: self.layer,
            visible: self.visible,
            pos1: self.pos1.to_string(),
            pos2: self.pos2.map(|p| p.to_string()),
            corner_radius: self.corner_radius,
            radius: self.radius,
            style: self.style.as_deref(),
            font: self.font.as_deref(),
            text: self.text.as_deref(),
        };

        for (property, binding) in &self.bindings {
            match property.as_str() {
                "pos1" => out.pos1 = binding.clone(),
                "pos2" => out.pos2 = Some(binding.clone()),
                "style" => out.style = Some(binding.as_str()),
                "text" => out.text = Some(binding.as_str()),
                _ => {}
            }
        }

        out.serialize(serializer)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fonts: BTreeMap<String, Font>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<String, Style>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub pages: BTreeMap<String, Page>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Style references that do not resolve in the style table.
    pub fn dangling_styles(&self) -> Vec<(&str, &str)> {
        self.pages
            .iter()
            .flat_map(|(name, page)| page.components.iter().map(move |c| (name.as_str(), c)))
            .filter_map(|(name, c)| c.style.as_deref().map(|s| (name, s)))
            .filter(|(_, style)| !self.styles.contains_key(*style))
            .collect()
    }
}
