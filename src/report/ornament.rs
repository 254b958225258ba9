//! Heading ornament.
//!
//! Every element carrying the configured class gets extra layout style and a
//! trailing `<span>` holding the ornament glyph. Operates on finished,
//! well-formed markup and knows nothing about the chart data.

use super::{xml_error, ReportError};
use crate::config::OrnamentConfig;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;
use tracing::debug;

/// Style appended to each decorated element.
pub const HOST_STYLE: &str = "position:relative;padding-bottom:0.85rem;";

/// Inline style of the ornament `<span>`.
pub fn ornament_style(config: &OrnamentConfig) -> String {
    format!(
        "display:block;position:absolute;bottom:0;left:0;color:{};font-size:{};",
        config.color, config.font_size
    )
}

/// Append `extra` to an existing inline style.
pub fn append_style(existing: &str, extra: &str) -> String {
    let existing = existing.trim();
    if existing.is_empty() {
        extra.to_string()
    } else if existing.ends_with(';') {
        format!("{existing}{extra}")
    } else {
        format!("{existing};{extra}")
    }
}

fn attribute_value(element: &BytesStart, key: &[u8]) -> Result<Option<String>, ReportError> {
    for attr in element.attributes() {
        let attr = attr.map_err(xml_error)?;
        if attr.key.as_ref() == key {
            let raw = std::str::from_utf8(&attr.value).map_err(xml_error)?;
            return Ok(Some(unescape(raw).map_err(xml_error)?.into_owned()));
        }
    }
    Ok(None)
}

/// True when the `class` attribute lists `class_name` as one of its tokens.
pub fn has_class(element: &BytesStart, class_name: &str) -> Result<bool, ReportError> {
    Ok(attribute_value(element, b"class")?
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name)))
}

fn element_name(element: &BytesStart) -> Result<String, ReportError> {
    std::str::from_utf8(element.name().as_ref())
        .map(str::to_string)
        .map_err(xml_error)
}

/// Copy of `element` with [`HOST_STYLE`] appended to its style.
fn restyle(element: &BytesStart) -> Result<BytesStart<'static>, ReportError> {
    let mut styled = BytesStart::new(element_name(element)?);
    let mut existing = String::new();

    for attr in element.attributes() {
        let attr = attr.map_err(xml_error)?;
        if attr.key.as_ref() == b"style" {
            let raw = std::str::from_utf8(&attr.value).map_err(xml_error)?;
            existing = unescape(raw).map_err(xml_error)?.into_owned();
        } else {
            styled.push_attribute(attr);
        }
    }

    let style = append_style(&existing, HOST_STYLE);
    styled.push_attribute(("style", style.as_str()));
    Ok(styled)
}

fn write_ornament<W: std::io::Write>(
    writer: &mut Writer<W>,
    config: &OrnamentConfig,
) -> Result<(), ReportError> {
    let style = ornament_style(config);
    let mut span = BytesStart::new("span");
    span.push_attribute(("style", style.as_str()));

    writer
        .write_event(Event::Start(span))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(&config.glyph)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("span")))
        .map_err(xml_error)?;
    Ok(())
}

/// Decorate every element with the configured class.
///
/// Markup without matching elements comes back unchanged. Malformed markup
/// (unclosed or mismatched tags) is an error.
pub fn decorate_headings(markup: &str, config: &OrnamentConfig) -> Result<String, ReportError> {
    let mut reader = Reader::from_str(markup);
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    // One entry per open element: whether it is decorated.
    let mut open: Vec<bool> = Vec::new();
    let mut decorated = 0usize;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                let hit = has_class(&e, &config.class_name)?;
                open.push(hit);
                let event = if hit {
                    Event::Start(restyle(&e)?)
                } else {
                    Event::Start(e)
                };
                writer.write_event(event).map_err(xml_error)?;
            }
            Event::Empty(e) => {
                if has_class(&e, &config.class_name)? {
                    let name = element_name(&e)?;
                    writer
                        .write_event(Event::Start(restyle(&e)?))
                        .map_err(xml_error)?;
                    write_ornament(&mut writer, config)?;
                    writer
                        .write_event(Event::End(BytesEnd::new(name)))
                        .map_err(xml_error)?;
                    decorated += 1;
                } else {
                    writer.write_event(Event::Empty(e)).map_err(xml_error)?;
                }
            }
            Event::End(e) => {
                if open.pop().unwrap_or(false) {
                    write_ornament(&mut writer, config)?;
                    decorated += 1;
                }
                writer.write_event(Event::End(e)).map_err(xml_error)?;
            }
            Event::Eof => break,
            other => writer.write_event(other).map_err(xml_error)?,
        }
    }

    debug!(decorated, class = %config.class_name, "decorated headings");
    String::from_utf8(writer.into_inner().into_inner()).map_err(xml_error)
}
