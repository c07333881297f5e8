//! svg2layout - Layout Compiler
//!
//! Turns a set of Inkscape SVG pages into a single layout document:
//! 1. Every document is one page
//! 2. Every rect, circle and text is one component
//! 3. Inline and class styles are merged, then deduplicated globally
//! 4. Fonts are resolved against a fixed catalog
//! 5. Output is deterministic

pub mod error;
pub mod config;
pub mod style;
pub mod css;
pub mod fonts;
pub mod bindings;
pub mod document;
pub mod svg;
pub mod validation;
pub mod layout;
pub mod translate;
pub mod dedup;
pub mod hashing;
pub mod pipeline;

pub use error::ConvertError;
pub use config::{ConverterConfig, CanvasSize};
pub use style::{Color, ColorAndDistance, Style, DEFAULT_ALIGN};
pub use fonts::{FontCatalog, FontResolver, FontVariant};
pub use document::{Document, Layer, Shape, Rect, Circle, Text, Span};
pub use layout::{Component, ComponentType, Font, Layout, Page, Vec2};
pub use translate::Accumulator;
pub use hashing::{canonical_json, layout_digest};
pub use pipeline::{ConversionPipeline, ConversionSummary};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
