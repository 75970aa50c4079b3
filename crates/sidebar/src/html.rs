//! Lenient reading of rendered HTML pages.
//!
//! Pages are tokenized with quick-xml in its most forgiving configuration
//! and rebuilt as well-formed XML that roxmltree can parse. The usual HTML
//! liberties are handled: void elements, unquoted and boolean attributes,
//! named character references, end tags the parser may infer, and raw
//! `script`/`style` content.
//!
//! Every tag written to the XML copy records the byte offset of the token it
//! came from, so positions found in the parsed tree map back onto the
//! original page. Edits are always applied to the original text.

use crate::error::{Location, SidebarError};
use quick_xml::Reader;
use quick_xml::escape::{escape, resolve_html5_entity};
use quick_xml::events::{BytesStart, Event};
use roxmltree::Document;
use std::borrow::Cow;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is not markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];
/// Like raw text, but character references are still decoded.
const ESCAPABLE_RAW_TEXT_ELEMENTS: &[&str] = &["textarea", "title"];

const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "menu",
    "nav", "ol", "p", "pre", "section", "table", "ul",
];

const PHRASING_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "dfn", "em", "i", "kbd", "mark", "q",
    "s", "samp", "small", "span", "strong", "sub", "sup", "time", "tt", "u", "var",
];

/// Synthetic root wrapping the whole page, so stray text and fragments
/// outside `<html>` still form a single XML document.
const WRAPPER: &str = "page";

/// Longest reference name looked up, `&CounterClockwiseContourIntegral;`.
const MAX_REFERENCE_LEN: usize = 32;

#[derive(Debug, Clone, Copy)]
struct Mark {
    xml: usize,
    source: usize,
}

/// A page read leniently, holding both the original text and a well-formed
/// XML rendition of it.
#[derive(Debug, Clone)]
pub struct HtmlPage<'s> {
    source: &'s str,
    xml: String,
    marks: Vec<Mark>,
}

impl<'s> HtmlPage<'s> {
    pub fn parse(source: &'s str) -> Result<Self, SidebarError> {
        let mut builder = XmlBuilder::new(source.len());
        let mut base = 0;
        let mut reader = html_reader(source);

        loop {
            let start = base + reader.buffer_position() as usize;
            let event = reader.read_event().map_err(|e| SidebarError::PageRead {
                location: Location::at(source, base + reader.error_position() as usize),
                source: e,
            })?;
            let end = base + reader.buffer_position() as usize;
            let raw = source.get(start..end).unwrap_or_default();

            match event {
                Event::Start(tag) => {
                    let Some(name) = element_name(tag.name().as_ref()) else {
                        builder.text(raw, start);
                        continue;
                    };
                    builder.start(&name, &tag, start, false);

                    let raw_text = RAW_TEXT_ELEMENTS.contains(&name.as_str());
                    if raw_text || ESCAPABLE_RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                        let close = find_end_tag(source, end, &name).unwrap_or(source.len());
                        let content = source.get(end..close).unwrap_or_default();
                        if raw_text {
                            builder.raw_text(content, end);
                        } else {
                            builder.text(content, end);
                        }
                        base = close;
                        reader = html_reader(source.get(close..).unwrap_or_default());
                    }
                }
                Event::Empty(tag) => match element_name(tag.name().as_ref()) {
                    Some(name) => builder.start(&name, &tag, start, true),
                    None => builder.text(raw, start),
                },
                Event::End(tag) => {
                    if let Some(name) = element_name(tag.name().as_ref()) {
                        builder.end(&name, start);
                    }
                }
                Event::Text(_) | Event::GeneralRef(_) => builder.text(raw, start),
                Event::CData(data) => builder.raw_text(&String::from_utf8_lossy(&data), start),
                Event::Eof => break,
                // Comments, the doctype, declarations and processing instructions.
                _ => {}
            }
        }

        let (xml, marks) = builder.finish(source.len());
        Ok(HtmlPage { source, xml, marks })
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    /// The well-formed rendition of the page.
    pub fn xml(&self) -> &str {
        &self.xml
    }

    pub fn document(&self) -> Result<Document<'_>, SidebarError> {
        Ok(Document::parse(&self.xml)?)
    }

    /// Maps a tag position in `xml()` back to the page text.
    ///
    /// Exact for the start of any tag. A tag the page left implicit maps to
    /// the token that ended its element.
    pub fn source_offset(&self, xml_offset: usize) -> usize {
        let after = self.marks.partition_point(|m| m.xml <= xml_offset);
        match after.checked_sub(1).map(|i| self.marks[i]) {
            Some(mark) => (mark.source + (xml_offset - mark.xml)).min(self.source.len()),
            None => 0,
        }
    }
}

fn html_reader(input: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(input);
    let config = reader.config_mut();
    config.allow_dangling_amp = true;
    config.allow_unmatched_ends = true;
    config.check_end_names = false;
    reader
}

/// Lower-cased local name, or `None` when the token is not a usable element.
fn element_name(raw: &[u8]) -> Option<String> {
    let name = std::str::from_utf8(raw).ok()?;
    let local = name.rsplit(':').next()?.to_ascii_lowercase();
    is_xml_name(&local).then_some(local)
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Offset of the `</name` that ends raw text started at `from`.
fn find_end_tag(source: &str, from: usize, name: &str) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut at = from;
    while let Some(found) = source.get(at..)?.find("</") {
        let pos = at + found;
        let tail = &bytes[pos + 2..];
        if tail.len() >= name.len()
            && tail[..name.len()].eq_ignore_ascii_case(name.as_bytes())
            && tail
                .get(name.len())
                .is_none_or(|c| *c == b'>' || *c == b'/' || c.is_ascii_whitespace())
        {
            return Some(pos);
        }
        at = pos + 2;
    }
    None
}

/// Decodes character references, leaving anything unrecognised as written.
pub fn decode_references(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(at) = rest.find('&') {
        out.push_str(&rest[..at]);
        let tail = &rest[at + 1..];
        let resolved = tail
            .find(';')
            .filter(|end| *end <= MAX_REFERENCE_LEN)
            .and_then(|end| resolve_reference(&tail[..end]).map(|text| (end, text)));
        match resolved {
            Some((end, text)) => {
                out.push_str(&text);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn resolve_reference(name: &str) -> Option<Cow<'static, str>> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code).map(|c| Cow::Owned(c.to_string()));
    }
    resolve_html5_entity(name).map(Cow::Borrowed)
}

/// Index of the open element a new `tag` implicitly ends, if any.
fn implied_close(open: &[String], tag: &str) -> Option<usize> {
    let targets: &[&str] = match tag {
        "li" => &["li"],
        "dt" | "dd" => &["dt", "dd"],
        "tr" => &["tr"],
        "td" | "th" => &["td", "th"],
        "thead" | "tbody" | "tfoot" => &["thead", "tbody", "tfoot"],
        "option" => &["option"],
        t if CLOSES_PARAGRAPH.contains(&t) => &["p"],
        _ => return None,
    };
    for (i, name) in open.iter().enumerate().rev() {
        if targets.contains(&name.as_str()) {
            return Some(i);
        }
        if ends_scope(tag, name) {
            return None;
        }
    }
    None
}

/// Whether an open `element` stops the search for what `tag` closes.
fn ends_scope(tag: &str, element: &str) -> bool {
    match tag {
        "li" => matches!(element, "ul" | "ol" | "menu"),
        "dt" | "dd" => element == "dl",
        "tr" => matches!(element, "table" | "thead" | "tbody" | "tfoot"),
        "td" | "th" => matches!(element, "tr" | "table"),
        "thead" | "tbody" | "tfoot" => element == "table",
        "option" => matches!(element, "select" | "datalist"),
        _ => !PHRASING_ELEMENTS.contains(&element),
    }
}

struct XmlBuilder {
    xml: String,
    marks: Vec<Mark>,
    open: Vec<String>,
}

impl XmlBuilder {
    fn new(capacity: usize) -> Self {
        let mut xml = String::with_capacity(capacity + capacity / 8);
        xml.push('<');
        xml.push_str(WRAPPER);
        xml.push('>');
        Self {
            xml,
            marks: Vec::new(),
            open: Vec::new(),
        }
    }

    fn mark(&mut self, source: usize) {
        self.marks.push(Mark {
            xml: self.xml.len(),
            source,
        });
    }

    fn start(&mut self, name: &str, tag: &BytesStart<'_>, at: usize, self_closing: bool) {
        if let Some(i) = implied_close(&self.open, name) {
            self.close_from(i, at);
        }
        self.mark(at);
        self.xml.push('<');
        self.xml.push_str(name);

        let mut seen: Vec<String> = Vec::new();
        let mut attributes = tag.html_attributes();
        attributes.with_checks(false);
        for attr in attributes {
            let Ok(attr) = attr else { break };
            let Ok(key) = std::str::from_utf8(attr.key.as_ref()) else {
                continue;
            };
            let key = key.to_ascii_lowercase();
            if !is_xml_name(&key) || seen.contains(&key) {
                continue;
            }
            let value = String::from_utf8_lossy(&attr.value);
            self.xml.push(' ');
            self.xml.push_str(&key);
            self.xml.push_str("=\"");
            self.push_escaped(&decode_references(&value));
            self.xml.push('"');
            seen.push(key);
        }

        if self_closing || VOID_ELEMENTS.contains(&name) {
            self.xml.push_str("/>");
        } else {
            self.xml.push('>');
            self.open.push(name.to_string());
        }
    }

    fn end(&mut self, name: &str, at: usize) {
        if let Some(i) = self.open.iter().rposition(|open| open == name) {
            self.close_from(i, at);
        }
    }

    fn close_from(&mut self, index: usize, at: usize) {
        while self.open.len() > index {
            let Some(name) = self.open.pop() else { break };
            self.mark(at);
            self.xml.push_str("</");
            self.xml.push_str(&name);
            self.xml.push('>');
        }
    }

    fn text(&mut self, raw: &str, at: usize) {
        self.mark(at);
        self.push_escaped(&decode_references(raw));
    }

    fn raw_text(&mut self, raw: &str, at: usize) {
        self.mark(at);
        self.push_escaped(raw);
    }

    fn push_escaped(&mut self, text: &str) {
        for c in escape(text).chars() {
            self.xml.push(if is_xml_char(c) { c } else { ' ' });
        }
    }

    fn finish(mut self, source_len: usize) -> (String, Vec<Mark>) {
        self.close_from(0, source_len);
        self.xml.push_str("</");
        self.xml.push_str(WRAPPER);
        self.xml.push('>');
        (self.xml, self.marks)
    }
}
