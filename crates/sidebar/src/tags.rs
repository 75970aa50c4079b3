//! Start-tag reading and rewriting on raw page text.

use crate::error::SidebarError;
use crate::html::decode_references;
use crate::model::Span;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};

/// Byte span of the start tag (or empty-element tag) beginning at `start`.
pub fn start_tag_span(source: &str, start: usize) -> Result<Span, SidebarError> {
    let tail = source.get(start..).ok_or(SidebarError::MalformedTag(start))?;
    let mut reader = Reader::from_str(tail);
    let event = reader.read_event()?;
    let end = start + reader.buffer_position() as usize;
    match event {
        Event::Start(_) | Event::Empty(_) => Ok(Span::new(start, end)),
        _ => Err(SidebarError::MalformedTag(start)),
    }
}

/// Re-emits a start tag with its `id` attribute set to `id`.
///
/// Other attributes keep their order and are re-escaped with double quotes;
/// an existing `id` is dropped and the new one is written last. HTML forms
/// are accepted: unquoted values, bare boolean attributes and named
/// character references.
pub fn with_id(tag: &str, id: &str) -> Result<String, SidebarError> {
    let mut reader = Reader::from_str(tag);
    let (original, empty) = match reader.read_event()? {
        Event::Start(e) => (e, false),
        Event::Empty(e) => (e, true),
        _ => return Err(SidebarError::MalformedTag(0)),
    };

    let name = std::str::from_utf8(original.name().as_ref())?.to_string();
    let mut rewritten = BytesStart::new(name);
    let mut attributes = original.html_attributes();
    attributes.with_checks(false);
    for attr in attributes {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        if !key.eq_ignore_ascii_case("id") {
            let value = std::str::from_utf8(&attr.value)?;
            rewritten.push_attribute((key, decode_references(value).as_ref()));
        }
    }
    rewritten.push_attribute(("id", id));

    let mut writer = Writer::new(Vec::new());
    if empty {
        writer.write_event(Event::Empty(rewritten))?;
    } else {
        writer.write_event(Event::Start(rewritten))?;
    }
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Qualified element name of a start tag such as `<ul class="x"/>`.
pub fn tag_name(tag: &str) -> &str {
    let body = tag.trim_start_matches('<');
    let end = body
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(body.len());
    &body[..end]
}
