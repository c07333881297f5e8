//! Conversion errors. Every variant aborts the whole conversion.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Page '{page}': dimensions must be {expected_width}x{expected_height}, image is {width}x{height}")]
    CanvasMismatch {
        page: String,
        width: f64,
        height: f64,
        expected_width: f64,
        expected_height: f64,
    },

    #[error("Page '{page}', layer {layer}, shape {shape}: only a single span may exist in a text, found {count}")]
    SpanCount {
        page: String,
        layer: usize,
        shape: usize,
        count: usize,
    },

    #[error("Page '{page}', layer {layer}, shape {shape}: nested text spans not supported")]
    NestedSpan { page: String, layer: usize, shape: usize },

    #[error("Page '{page}': unknown referenced style: {style}")]
    UnknownStyle { page: String, style: String },

    #[error("Page '{page}': cannot parse '{value}' as a number for {field} in {context}")]
    NumericParse {
        page: String,
        /// Style name or element the value belongs to.
        context: String,
        field: String,
        value: String,
    },

    #[error("Cannot turn string into color: {0}")]
    InvalidColor(String),

    #[error("Markup error in '{page}': {message}")]
    Markup { page: String, message: String },

    #[error("Two inputs map to page '{0}'")]
    DuplicatePage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConvertError {
    pub(crate) fn markup(page: &str, message: impl Into<String>) -> Self {
        Self::Markup {
            page: page.to_string(),
            message: message.into(),
        }
    }

    /// A numeric parse failure not yet tied to a page. Callers that know the
    /// page attach it with [`ConvertError::in_context`].
    pub(crate) fn numeric(field: &str, value: &str) -> Self {
        Self::NumericParse {
            page: String::new(),
            context: String::new(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Attach the page and style name to a numeric parse failure. Other
    /// variants already carry their context and pass through unchanged.
    pub(crate) fn in_context(self, page: &str, context: &str) -> Self {
        match self {
            Self::NumericParse { field, value, .. } => Self::NumericParse {
                page: page.to_string(),
                context: context.to_string(),
                field,
                value,
            },
            other => other,
        }
    }
}
