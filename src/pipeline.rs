//! Conversion Pipeline - Single Entry Point
//!
//! Documents are validated and translated one at a time in page-name order,
//! then styles are deduplicated across all pages. Nothing is written unless
//! every stage succeeds.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ConverterConfig;
use crate::dedup::deduplicate;
use crate::document::Document;
use crate::error::ConvertError;
use crate::hashing::{canonical_json, layout_digest};
use crate::layout::Layout;
use crate::svg::parse_document;
use crate::translate::{translate_page, Accumulator};
use crate::validation::Validator;

#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub output: PathBuf,
    pub pages: Vec<String>,
    pub styles: usize,
    pub fonts: usize,
    pub digest: String,
}

pub struct ConversionPipeline {
    validator: Validator,
}

impl ConversionPipeline {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            validator: Validator::new(config.canvas),
        }
    }

    /// Compile decoded documents, keyed by page name, into a layout.
    pub fn compile(&self, documents: &BTreeMap<String, Document>) -> Result<Layout, ConvertError> {
        let mut acc = Accumulator::new();

        for (page, doc) in documents {
            log::info!("Converting page {}", page);
            self.validator.validate(page, doc)?;
            translate_page(&mut acc, page, doc)?;
        }

        let common = acc.common_styles().clone();
        let mut layout = acc.into_layout();
        let removed = deduplicate(&mut layout, &common);
        log::info!("Removed {} duplicate styles, {} remain", removed, layout.styles.len());

        Ok(layout)
    }

    /// Decode SVG files; each page is named after its file stem.
    pub fn load_documents(&self, inputs: &[PathBuf]) -> Result<BTreeMap<String, Document>, ConvertError> {
        let mut documents = BTreeMap::new();

        for path in inputs {
            let page = page_name(path)?;
            log::info!("Loading SVG image: {}", path.display());
            let text = fs::read_to_string(path)?;
            let doc = parse_document(&page, &text)?;
            if documents.insert(page.clone(), doc).is_some() {
                return Err(ConvertError::DuplicatePage(page));
            }
        }

        Ok(documents)
    }

    /// Convert SVG files into a layout file at `output`.
    pub fn convert_files(&self, inputs: &[PathBuf], output: &Path) -> Result<ConversionSummary, ConvertError> {
        let documents = self.load_documents(inputs)?;
        let layout = self.compile(&documents)?;

        let json = canonical_json(&layout)?;
        let digest = layout_digest(&layout)?;
        fs::write(output, &json)?;
        log::info!("Wrote output to {}", output.display());

        Ok(ConversionSummary {
            output: output.to_path_buf(),
            pages: layout.pages.keys().cloned().collect(),
            styles: layout.styles.len(),
            fonts: layout.fonts.len(),
            digest,
        })
    }
}

impl Default for ConversionPipeline {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

fn page_name(path: &Path) -> Result<String, ConvertError> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| ConvertError::Config(format!("no page name in path {}", path.display())))
}
