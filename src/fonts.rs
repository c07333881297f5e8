//! Font Catalog & Resolver
//!
//! The renderer only ships a handful of fonts. Every font request in a
//! document is resolved against that fixed catalog; requests the catalog
//! cannot satisfy fall back to the default font at the default size.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::layout::Font;

pub const DEFAULT_FAMILY: &str = "RobotoMono";
pub const DEFAULT_SIZE: i64 = 10;

static FONT_SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"font-size:(\d*\.?\d*)px").expect("font-size pattern is valid"));
static FONT_FAMILY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"font-family:(.+?)(?:;|$)").expect("font-family pattern is valid"));
static FONT_WEIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"font-weight:(.+?)(?:;|$)").expect("font-weight pattern is valid"));
static FONT_SPEC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-inkscape-font-specification:'(.+?)'").expect("font spec pattern is valid")
});

/// Which weights a catalog family supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontVariant {
    pub regular: bool,
    pub bold: bool,
    pub light: bool,
}

/// The fixed set of families the renderer can draw.
#[derive(Debug, Clone)]
pub struct FontCatalog {
    families: BTreeMap<&'static str, FontVariant>,
}

impl FontCatalog {
    pub fn new() -> Self {
        let variant = |regular, bold, light| FontVariant { regular, bold, light };

        let families = BTreeMap::from([
            ("FiraMono", variant(true, true, false)),
            ("Montserrat", variant(true, true, true)),
            ("Play", variant(true, true, false)),
            ("RefrigeratorDeluxe", variant(true, false, true)),
            ("RobotoCondensed", variant(true, false, false)),
            ("RobotoMono", variant(true, true, false)),
        ]);

        Self { families }
    }

    pub fn get(&self, family: &str) -> Option<&FontVariant> {
        self.families.get(family)
    }

    /// Families in sorted order.
    pub fn list(&self) -> impl Iterator<Item = (&'static str, &FontVariant)> + '_ {
        self.families.iter().map(|(name, variant)| (*name, variant))
    }
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// A font request extracted from a CSS declaration string.
#[derive(Debug, Clone, PartialEq)]
pub struct FontRequest {
    pub family: Option<String>,
    pub size: Option<f64>,
    pub bold: bool,
    pub light: bool,
}

impl FontRequest {
    pub fn from_style(style: &str) -> Self {
        let family = capture(style, &FONT_FAMILY)
            .map(|f| f.trim_matches(|c| c == '\'' || c == '"').to_string());
        let weight = capture(style, &FONT_WEIGHT);
        let spec = capture(style, &FONT_SPEC);

        // An unparsable size still counts as a size request.
        let size = FONT_SIZE
            .captures(style)
            .map(|c| c[1].parse::<f64>().unwrap_or(DEFAULT_SIZE as f64));

        let mut bold = false;
        let mut light = false;

        if let Some(spec) = &spec {
            bold = spec.ends_with("Bold");
            light = spec.ends_with("Light");
        }

        if let Some(weight) = &weight {
            if !bold {
                bold = weight == "bold";
            }
            if !light {
                light = weight == "light";
            }
        }

        Self { family, size, bold, light }
    }
}

fn capture(style: &str, exp: &Regex) -> Option<String> {
    exp.captures(style).map(|c| c[1].trim().to_string())
}

/// Result of resolving a font request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFont {
    pub key: String,
    pub substituted: bool,
}

/// Resolves font requests and remembers which resolved fonts are used.
#[derive(Debug, Clone, Default)]
pub struct FontResolver {
    catalog: FontCatalog,
    current: BTreeMap<String, Font>,
    used: BTreeMap<String, Font>,
}

impl FontResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the font declared in a CSS style string.
    pub fn resolve(&mut self, style: &str) -> ResolvedFont {
        let request = FontRequest::from_style(style);

        match (request.size, request.family) {
            (Some(size), Some(family)) => self.resolve_family(&family, request.bold, request.light, size),
            (Some(_), None) => self.resolve_family("", request.bold, request.light, DEFAULT_SIZE as f64),
            (None, _) => self.resolve_family(DEFAULT_FAMILY, false, false, DEFAULT_SIZE as f64),
        }
    }

    fn resolve_family(&mut self, family: &str, bold: bool, light: bool, size: f64) -> ResolvedFont {
        let name = match self.catalog.get(family) {
            Some(v) if !bold && !light && v.regular => Some(family.to_string()),
            Some(v) if bold && v.bold => Some(format!("{}-Bold", family)),
            Some(v) if light && v.light => Some(format!("{}-Light", family)),
            _ => None,
        };

        let substituted = name.is_none();
        let (name, size) = match name {
            Some(name) => (name, size),
            None => {
                log::warn!(
                    "No matching attributes for font '{}': bold: {}, light: {}, using default {} with size {}",
                    family, bold, light, DEFAULT_FAMILY, DEFAULT_SIZE
                );
                (DEFAULT_FAMILY.to_string(), DEFAULT_SIZE as f64)
            }
        };

        let size = size.round() as i64;
        let key = format!("{}-{}", name, size);

        if !self.current.contains_key(&key) {
            log::debug!("Created font: {}", key);
            self.current.insert(key.clone(), Font { font: name, size });
        }

        ResolvedFont { key, substituted }
    }

    /// Mark a resolved font as referenced by the output.
    pub fn mark_used(&mut self, key: &str) {
        if let Some(font) = self.current.get(key) {
            self.used.insert(key.to_string(), font.clone());
        }
    }

    pub fn used_fonts(&self) -> &BTreeMap<String, Font> {
        &self.used
    }
}
