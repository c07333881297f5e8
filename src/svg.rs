//! SVG decoding - Inkscape markup into a `Document`
//!
//! Only the subset the compiler understands is decoded. Each top-level `<g>`
//! is a layer whose direct children must be `rect`, `circle` or `text`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;

use crate::document::{Circle, Document, Layer, Rect, Shape, Span, Text};
use crate::error::ConvertError;

type Attributes = BTreeMap<String, String>;

/// Children of a shape element that the compiler cares about.
#[derive(Default)]
struct ShapeChildren {
    description: String,
    spans: Vec<Span>,
}

/// Decode a document. `page` is only used for error context.
pub fn parse_document(page: &str, text: &str) -> Result<Document, ConvertError> {
    let mut reader = Reader::from_str(text);
    let mut doc = Document::default();

    loop {
        match next_event(&mut reader, page)? {
            Event::Start(ref e) if e.local_name().as_ref() == b"svg" => {
                read_dimensions(page, e, &mut doc)?;
                parse_svg_children(&mut reader, page, &mut doc)?;
                return Ok(doc);
            }
            Event::Empty(ref e) if e.local_name().as_ref() == b"svg" => {
                read_dimensions(page, e, &mut doc)?;
                return Ok(doc);
            }
            Event::Start(ref e) => {
                return Err(ConvertError::markup(
                    page,
                    format!("expected <svg> root, found <{}>", local_name(e)),
                ));
            }
            Event::Eof => return Err(ConvertError::markup(page, "no <svg> element found")),
            _ => {}
        }
    }
}

fn next_event<'a>(reader: &mut Reader<&'a [u8]>, page: &str) -> Result<Event<'a>, ConvertError> {
    reader.read_event().map_err(|e| {
        ConvertError::markup(
            page,
            format!("XML parse error at position {}: {}", reader.buffer_position(), e),
        )
    })
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn skip(reader: &mut Reader<&[u8]>, page: &str, e: &BytesStart) -> Result<(), ConvertError> {
    reader
        .read_to_end(e.name())
        .map(|_| ())
        .map_err(|err| ConvertError::markup(page, format!("unterminated <{}>: {}", local_name(e), err)))
}

fn attributes(page: &str, e: &BytesStart) -> Result<Attributes, ConvertError> {
    let mut attrs = Attributes::new();

    for attr in e.attributes() {
        let attr = attr.map_err(|err| ConvertError::markup(page, format!("attribute error: {}", err)))?;
        let value = attr
            .unescape_value()
            .map_err(|err| ConvertError::markup(page, format!("attribute error: {}", err)))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        attrs.insert(key, value.into_owned());
    }

    Ok(attrs)
}

/// Numeric attribute of `element`; absent means zero. A `px` unit suffix is
/// accepted.
fn number(page: &str, element: &str, attrs: &Attributes, key: &str) -> Result<f64, ConvertError> {
    match attrs.get(key) {
        Some(raw) => {
            let value = raw.trim();
            value
                .strip_suffix("px")
                .unwrap_or(value)
                .parse::<f64>()
                .map_err(|_| {
                    ConvertError::numeric(key, raw).in_context(page, &format!("<{}>", element))
                })
        }
        None => Ok(0.0),
    }
}

fn text_attr(attrs: &Attributes, key: &str) -> String {
    attrs.get(key).cloned().unwrap_or_default()
}

fn read_dimensions(page: &str, e: &BytesStart, doc: &mut Document) -> Result<(), ConvertError> {
    let attrs = attributes(page, e)?;
    doc.width = number(page, "svg", &attrs, "width")?;
    doc.height = number(page, "svg", &attrs, "height")?;
    Ok(())
}

fn parse_svg_children(
    reader: &mut Reader<&[u8]>,
    page: &str,
    doc: &mut Document,
) -> Result<(), ConvertError> {
    loop {
        match next_event(reader, page)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"defs" => parse_defs(reader, page, doc)?,
                b"g" => doc.layers.push(parse_layer(reader, page)?),
                _ => skip(reader, page, e)?,
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"g" => {
                doc.layers.push(Layer::default());
            }
            Event::End(ref e) if e.local_name().as_ref() == b"svg" => return Ok(()),
            Event::Eof => return Err(ConvertError::markup(page, "unexpected EOF in <svg>")),
            _ => {}
        }
    }
}

fn parse_defs(reader: &mut Reader<&[u8]>, page: &str, doc: &mut Document) -> Result<(), ConvertError> {
    loop {
        match next_event(reader, page)? {
            Event::Start(ref e) if e.local_name().as_ref() == b"style" => {
                doc.stylesheets.push(read_text(reader, page)?);
            }
            Event::Start(ref e) if e.local_name().as_ref() == b"path-effect" => {
                add_path_effect(page, e, doc)?;
                skip(reader, page, e)?;
            }
            Event::Empty(ref e) if e.local_name().as_ref() == b"path-effect" => {
                add_path_effect(page, e, doc)?;
            }
            Event::Start(ref e) => skip(reader, page, e)?,
            Event::End(ref e) if e.local_name().as_ref() == b"defs" => return Ok(()),
            Event::Eof => return Err(ConvertError::markup(page, "unexpected EOF in <defs>")),
            _ => {}
        }
    }
}

fn add_path_effect(page: &str, e: &BytesStart, doc: &mut Document) -> Result<(), ConvertError> {
    let attrs = attributes(page, e)?;
    if let Some(id) = attrs.get("id") {
        let radius = number(page, "path-effect", &attrs, "radius")?;
        doc.path_effects.insert(id.clone(), radius);
    }
    Ok(())
}

/// Concatenated text and CDATA content up to the end of the current element.
fn read_text(reader: &mut Reader<&[u8]>, page: &str) -> Result<String, ConvertError> {
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        match next_event(reader, page)? {
            Event::Text(t) => {
                let content = t
                    .unescape()
                    .map_err(|err| ConvertError::markup(page, format!("text error: {}", err)))?;
                text.push_str(&content);
            }
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => return Ok(text),
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(ConvertError::markup(page, "unexpected EOF in text content")),
            _ => {}
        }
    }
}

fn parse_layer(reader: &mut Reader<&[u8]>, page: &str) -> Result<Layer, ConvertError> {
    let mut layer = Layer::default();

    loop {
        let (e, has_children) = match next_event(reader, page)? {
            Event::Start(e) => (e, true),
            Event::Empty(e) => (e, false),
            Event::End(ref e) if e.local_name().as_ref() == b"g" => return Ok(layer),
            Event::Eof => return Err(ConvertError::markup(page, "unexpected EOF in layer")),
            _ => continue,
        };

        let name = local_name(&e);
        if matches!(name.as_str(), "title" | "desc") {
            if has_children {
                skip(reader, page, &e)?;
            }
            continue;
        }

        let attrs = attributes(page, &e)?;
        let children = if has_children {
            read_shape_children(reader, page)?
        } else {
            ShapeChildren::default()
        };

        let shape = match name.as_str() {
            "rect" => Shape::Rect(Rect {
                x: number(page, &name, &attrs, "x")?,
                y: number(page, &name, &attrs, "y")?,
                width: number(page, &name, &attrs, "width")?,
                height: number(page, &name, &attrs, "height")?,
                style: text_attr(&attrs, "style"),
                class: text_attr(&attrs, "class"),
                path_effect: text_attr(&attrs, "path-effect"),
                description: children.description,
            }),
            "circle" => Shape::Circle(Circle {
                cx: number(page, &name, &attrs, "cx")?,
                cy: number(page, &name, &attrs, "cy")?,
                r: number(page, &name, &attrs, "r")?,
                style: text_attr(&attrs, "style"),
                class: text_attr(&attrs, "class"),
                description: children.description,
            }),
            "text" => Shape::Text(Text {
                x: number(page, &name, &attrs, "x")?,
                y: number(page, &name, &attrs, "y")?,
                style: text_attr(&attrs, "style"),
                class: text_attr(&attrs, "class"),
                description: children.description,
                spans: children.spans,
            }),
            other => {
                return Err(ConvertError::markup(page, format!("unsupported element: <{}>", other)));
            }
        };

        layer.shapes.push(shape);
    }
}

/// Read `desc` and `tspan` children up to the end of the current shape.
fn read_shape_children(reader: &mut Reader<&[u8]>, page: &str) -> Result<ShapeChildren, ConvertError> {
    let mut children = ShapeChildren::default();

    loop {
        match next_event(reader, page)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"desc" => children.description = read_text(reader, page)?,
                b"tspan" => children.spans.push(parse_span(reader, page, e)?),
                _ => skip(reader, page, e)?,
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"tspan" => {
                children.spans.push(span_from_attributes(page, e)?);
            }
            Event::End(_) => return Ok(children),
            Event::Eof => return Err(ConvertError::markup(page, "unexpected EOF in shape")),
            _ => {}
        }
    }
}

fn span_from_attributes(page: &str, e: &BytesStart) -> Result<Span, ConvertError> {
    let attrs = attributes(page, e)?;
    Ok(Span {
        x: number(page, "tspan", &attrs, "x")?,
        y: number(page, "tspan", &attrs, "y")?,
        style: text_attr(&attrs, "style"),
        ..Default::default()
    })
}

fn parse_span(reader: &mut Reader<&[u8]>, page: &str, start: &BytesStart) -> Result<Span, ConvertError> {
    let mut span = span_from_attributes(page, start)?;

    loop {
        match next_event(reader, page)? {
            Event::Text(t) => {
                let content = t
                    .unescape()
                    .map_err(|err| ConvertError::markup(page, format!("text error: {}", err)))?;
                span.text.push_str(&content);
            }
            Event::CData(c) => span.text.push_str(&String::from_utf8_lossy(&c.into_inner())),
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"tspan" => span.spans.push(parse_span(reader, page, e)?),
                b"desc" => span.description = read_text(reader, page)?,
                _ => skip(reader, page, e)?,
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"tspan" => {
                span.spans.push(span_from_attributes(page, e)?);
            }
            Event::End(_) => return Ok(span),
            Event::Eof => return Err(ConvertError::markup(page, "unexpected EOF in <tspan>")),
            _ => {}
        }
    }
}
