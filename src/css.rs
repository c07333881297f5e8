//! CSS handling - inline declarations and embedded class rules

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::error::ConvertError;
use crate::style::{round_to, Color, ColorAndDistance, Stroke, Style, DEFAULT_ALIGN};

static FILL: Lazy<Regex> = Lazy::new(|| hex_color_pattern("fill"));
static FILL_OPACITY: Lazy<Regex> = Lazy::new(|| number_pattern("fill-opacity"));
static STROKE: Lazy<Regex> = Lazy::new(|| hex_color_pattern("stroke"));
static STROKE_OPACITY: Lazy<Regex> = Lazy::new(|| number_pattern("stroke-opacity"));
static STROKE_WIDTH: Lazy<Regex> = Lazy::new(|| number_pattern("stroke-width"));

static CLASS_RULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\.([a-zA-Z0-9_-]+)\s*\{(.*?)\}").expect("class rule pattern is valid")
});

fn hex_color_pattern(key: &str) -> Regex {
    Regex::new(&format!(
        r"{}:#([0-9a-fA-F]{{2}})([0-9a-fA-F]{{2}})([0-9a-fA-F]{{2}})",
        key
    ))
    .expect("color pattern is valid")
}

fn number_pattern(key: &str) -> Regex {
    Regex::new(&format!(r"{}:(\d*\.?\d*)", key)).expect("number pattern is valid")
}

/// Parse the first capture of `exp` in `style` as a float, if the key is present.
fn find_number(style: &str, exp: &Regex, field: &str) -> Result<Option<f64>, ConvertError> {
    match exp.captures(style) {
        Some(caps) => {
            let raw = &caps[1];
            raw.parse::<f64>()
                .map(Some)
                .map_err(|_| ConvertError::numeric(field, raw))
        }
        None => Ok(None),
    }
}

fn find_color(
    style: &str,
    color_exp: &Regex,
    opacity_exp: &Regex,
    opacity_field: &str,
) -> Result<Option<Color>, ConvertError> {
    let Some(caps) = color_exp.captures(style) else {
        return Ok(None);
    };

    let byte = |i: usize| -> Result<u8, ConvertError> {
        u8::from_str_radix(&caps[i], 16).map_err(|_| ConvertError::numeric("color", &caps[0]))
    };
    let (r, g, b) = (byte(1)?, byte(2)?, byte(3)?);

    let alpha = find_number(style, opacity_exp, opacity_field)?.unwrap_or(1.0);
    Ok(Some(Color::from_bytes(r, g, b, alpha)))
}

/// Fill color from `fill:#RRGGBB` and `fill-opacity`.
pub fn fill_from_style(style: &str) -> Result<Option<Color>, ConvertError> {
    find_color(style, &FILL, &FILL_OPACITY, "fill-opacity")
}

/// Stroke from `stroke:#RRGGBB`, `stroke-opacity` and `stroke-width`.
///
/// `stroke:none` (or no stroke key at all) yields no stroke.
pub fn stroke_from_style(style: &str) -> Result<Option<Stroke>, ConvertError> {
    let Some(color) = find_color(style, &STROKE, &STROKE_OPACITY, "stroke-opacity")? else {
        return Ok(None);
    };

    let distance = find_number(style, &STROKE_WIDTH, "stroke-width")?.unwrap_or(0.0);
    Ok(Some(ColorAndDistance {
        color,
        distance: round_to(distance, 3),
    }))
}

/// Build a style from a raw inline declaration string.
pub fn parse_inline_style(style: &str) -> Result<Style, ConvertError> {
    Ok(Style {
        align: Some(DEFAULT_ALIGN.to_string()),
        fill: fill_from_style(style)?,
        stroke: stroke_from_style(style)?,
        rotation: None,
        shadow: None,
    })
}

/// Page-namespaced name of a class style.
pub fn page_style_name(page: &str, name: &str) -> String {
    format!("{}-{}", page, name)
}

/// Parse every `.className { ... }` rule in `stylesheet`.
///
/// Returned keys are already namespaced with the page name. A later rule for
/// the same class replaces an earlier one.
pub fn extract_class_styles(
    page: &str,
    stylesheet: &str,
) -> Result<BTreeMap<String, Style>, ConvertError> {
    let mut styles = BTreeMap::new();

    for caps in CLASS_RULE.captures_iter(stylesheet) {
        let name = page_style_name(page, &caps[1]);
        let style = parse_inline_style(&caps[2]).map_err(|e| e.in_context(page, &name))?;
        log::debug!("Created common style: {}", name);
        styles.insert(name, style);
    }

    Ok(styles)
}
