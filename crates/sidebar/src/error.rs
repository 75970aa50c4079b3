use serde::Serialize;
use sidenav_selector::SelectorError;
use thiserror::Error;

/// A 1-based position in the page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: u32,
    pub col: u32,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

impl Location {
    /// Line and column of a byte offset in `source`, counting characters.
    pub fn at(source: &str, offset: usize) -> Self {
        let mut end = offset.min(source.len());
        while !source.is_char_boundary(end) {
            end -= 1;
        }
        let before = &source[..end];
        let line = before.matches('\n').count() + 1;
        let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        Location {
            line: line as u32,
            col: col as u32,
        }
    }
}

#[derive(Error, Debug)]
pub enum SidebarError {
    #[error("Page reading error at {location}: {source}")]
    PageRead {
        location: Location,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Page parsing error: {0}")]
    PageParse(#[from] roxmltree::Error),

    #[error("Invalid {field} selector: {source}")]
    Selector {
        field: &'static str,
        #[source]
        source: SelectorError,
    },

    #[error("Quick-XML error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    #[error("Markup write error: {0}")]
    Write(#[from] std::io::Error),

    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("UTF-8 string error: {0}")]
    Utf8Str(#[from] std::str::Utf8Error),

    #[error("No element matches the sidebar container selector '{0}'")]
    MissingContainer(String),

    #[error("{kind} block at {location} has no element matching '{selector}'")]
    MissingName {
        kind: &'static str,
        selector: String,
        location: Location,
    },

    #[error("Malformed element tag at byte {0}")]
    MalformedTag(usize),

    #[error("Edits overlap at byte {0}; is one element matched by both block selectors?")]
    OverlappingEdits(usize),
}

impl From<quick_xml::events::attributes::AttrError> for SidebarError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        SidebarError::QuickXml(quick_xml::Error::InvalidAttr(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_counts_lines_and_characters() {
        let source = "<a>\n  <b>é<c/>";
        assert_eq!(Location::at(source, 0), Location { line: 1, col: 1 });
        assert_eq!(Location::at(source, 6), Location { line: 2, col: 3 });
        let c = source.find("<c").unwrap();
        assert_eq!(Location::at(source, c), Location { line: 2, col: 7 });
    }
}
