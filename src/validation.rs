//! Document validation - structural checks run before translation
//!
//! Every rule failure is fatal; the first one found is reported.

use crate::config::CanvasSize;
use crate::document::{Document, Shape, Span, Text};
use crate::error::ConvertError;

/// A check a decoded document must pass before it is translated.
pub trait DocumentRule {
    fn name(&self) -> &'static str;
    fn check(&self, page: &str, doc: &Document) -> Result<(), ConvertError>;
}

/// The document must have exactly the configured canvas size.
pub struct CanvasRule {
    pub canvas: CanvasSize,
}

impl DocumentRule for CanvasRule {
    fn name(&self) -> &'static str { "canvas" }

    fn check(&self, page: &str, doc: &Document) -> Result<(), ConvertError> {
        if doc.width != self.canvas.width || doc.height != self.canvas.height {
            return Err(ConvertError::CanvasMismatch {
                page: page.to_string(),
                width: doc.width,
                height: doc.height,
                expected_width: self.canvas.width,
                expected_height: self.canvas.height,
            });
        }
        Ok(())
    }
}

/// Every text must hold exactly one span, and spans may not nest.
pub struct TextSpanRule;

impl DocumentRule for TextSpanRule {
    fn name(&self) -> &'static str { "text_spans" }

    fn check(&self, page: &str, doc: &Document) -> Result<(), ConvertError> {
        for (layer_index, layer) in doc.layers.iter().enumerate() {
            for (index, shape) in layer.shapes.iter().enumerate() {
                if let Shape::Text(text) = shape {
                    single_span(page, layer_index + 1, index, text)?;
                }
            }
        }
        Ok(())
    }
}

/// The sole span of a text element, located by its 1-based layer and its
/// 0-based position within that layer.
pub fn single_span<'a>(page: &str, layer: usize, shape: usize, text: &'a Text) -> Result<&'a Span, ConvertError> {
    if text.spans.iter().any(|span| !span.spans.is_empty()) {
        return Err(ConvertError::NestedSpan {
            page: page.to_string(),
            layer,
            shape,
        });
    }

    match text.spans.as_slice() {
        [span] => Ok(span),
        spans => Err(ConvertError::SpanCount {
            page: page.to_string(),
            layer,
            shape,
            count: spans.len(),
        }),
    }
}

pub struct Validator {
    rules: Vec<Box<dyn DocumentRule>>,
}

impl Validator {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            rules: vec![
                Box::new(CanvasRule { canvas }),
                Box::new(TextSpanRule),
            ],
        }
    }

    pub fn validate(&self, page: &str, doc: &Document) -> Result<(), ConvertError> {
        for rule in &self.rules {
            log::debug!("Checking rule '{}' on page {}", rule.name(), page);
            rule.check(page, doc)?;
        }
        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(CanvasSize::default())
    }
}
