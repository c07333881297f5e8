//! Page Translator - one document into one page of components
//!
//! Tables shared by all pages (styles, fonts, class-style names) live in an
//! `Accumulator` that is threaded through every page in turn. Per-page state
//! (class styles, the style counter) lives in a `PageContext` that is dropped
//! once the page is done.

use std::collections::{BTreeMap, BTreeSet};

use crate::bindings::parse_bindings;
use crate::css::{extract_class_styles, page_style_name, parse_inline_style};
use crate::document::{Circle, Document, Rect, Shape, Text};
use crate::error::ConvertError;
use crate::fonts::FontResolver;
use crate::layout::{Component, ComponentType, Layout, Page, Vec2};
use crate::style::Style;
use crate::validation::single_span;

/// Output tables accumulated across pages.
#[derive(Debug, Default)]
pub struct Accumulator {
    pub layout: Layout,
    pub fonts: FontResolver,
    common_styles: BTreeSet<String>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn common_styles(&self) -> &BTreeSet<String> {
        &self.common_styles
    }

    fn register_common(&mut self, name: String, style: Style) {
        self.common_styles.insert(name.clone());
        self.layout.styles.insert(name, style);
    }

    /// The finished layout, carrying only the fonts components reference.
    pub fn into_layout(self) -> Layout {
        let mut layout = self.layout;
        layout.fonts = self.fonts.used_fonts().clone();
        layout
    }
}

struct PageContext<'a> {
    page: &'a str,
    doc: &'a Document,
    class_styles: BTreeMap<String, Style>,
    counter: usize,
}

impl PageContext<'_> {
    /// Merge the inline style with every referenced class and register the
    /// result under a fresh name.
    fn component_style(
        &mut self,
        acc: &mut Accumulator,
        kind: ComponentType,
        inline: &str,
        classes: &str,
    ) -> Result<String, ConvertError> {
        let name = format!("{}-{}-{}", self.page, kind.as_str(), self.counter);
        let mut local = parse_inline_style(inline).map_err(|e| e.in_context(self.page, &name))?;

        for class in classes.split_whitespace() {
            let class_name = page_style_name(self.page, class);
            let common = self
                .class_styles
                .get(&class_name)
                .ok_or_else(|| ConvertError::UnknownStyle {
                    page: self.page.to_string(),
                    style: class_name.clone(),
                })?;
            local.merge_from(common);
        }

        self.counter += 1;
        log::debug!("Created component style: {}", name);
        acc.layout.styles.insert(name.clone(), local);
        Ok(name)
    }

    fn rect(&mut self, acc: &mut Accumulator, layer: usize, rect: &Rect) -> Result<Component, ConvertError> {
        let mut comp = Component::new(ComponentType::Box, layer, Vec2::new(rect.x, rect.y));
        comp.pos2 = Some(Vec2::new(rect.x + rect.width, rect.y + rect.height));
        comp.corner_radius = self.doc.corner_radius(&rect.path_effect);
        comp.style = Some(self.component_style(acc, comp.kind, &rect.style, &rect.class)?);
        comp.bindings = parse_bindings(&rect.description);
        Ok(comp)
    }

    fn circle(&mut self, acc: &mut Accumulator, layer: usize, circle: &Circle) -> Result<Component, ConvertError> {
        let mut comp = Component::new(ComponentType::Circle, layer, Vec2::new(circle.cx, circle.cy));
        comp.radius = Some(circle.r);
        comp.style = Some(self.component_style(acc, comp.kind, &circle.style, &circle.class)?);
        comp.bindings = parse_bindings(&circle.description);
        Ok(comp)
    }

    fn text(
        &mut self,
        acc: &mut Accumulator,
        layer: usize,
        index: usize,
        text: &Text,
    ) -> Result<Component, ConvertError> {
        let span = single_span(self.page, layer, index, text)?;

        let mut comp = Component::new(ComponentType::Text, layer, Vec2::new(span.x, span.y));
        comp.text = Some(span.text.clone());

        // The span may pick its own font, but only an exact catalog match
        // overrides the element's font.
        let default = acc.fonts.resolve(&text.style);
        let selected = acc.fonts.resolve(&span.style);
        let font = if selected.key != default.key && !selected.substituted {
            selected.key
        } else {
            default.key
        };
        acc.fonts.mark_used(&font);
        comp.font = Some(font);

        comp.style = Some(self.component_style(acc, comp.kind, &text.style, &text.class)?);
        // Bindings live on the text element, not the span.
        comp.bindings = parse_bindings(&text.description);
        Ok(comp)
    }
}

/// Translate one document into the page `page` of the accumulated layout.
pub fn translate_page(acc: &mut Accumulator, page: &str, doc: &Document) -> Result<(), ConvertError> {
    let mut class_styles = BTreeMap::new();
    for stylesheet in &doc.stylesheets {
        class_styles.extend(extract_class_styles(page, stylesheet)?);
    }

    for (name, style) in &class_styles {
        acc.register_common(name.clone(), style.clone());
    }

    let mut ctx = PageContext {
        page,
        doc,
        class_styles,
        counter: 0,
    };
    let mut out = Page::default();

    for (index, layer) in doc.layers.iter().enumerate() {
        let layer_id = index + 1;
        for (shape_index, shape) in layer.shapes.iter().enumerate() {
            let comp = match shape {
                Shape::Rect(rect) => ctx.rect(acc, layer_id, rect)?,
                Shape::Circle(circle) => ctx.circle(acc, layer_id, circle)?,
                Shape::Text(text) => ctx.text(acc, layer_id, shape_index, text)?,
            };
            out.components.push(comp);
        }
    }

    log::info!("Translated page {} with {} components", page, out.components.len());
    acc.layout.pages.insert(page.to_string(), out);
    Ok(())
}
