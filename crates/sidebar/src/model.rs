//! The transient entities computed from one page.
//!
//! A `SidebarPlan` is a complete description of the changes to make: which
//! start tags receive an `id`, where the navigation markup goes, and which
//! entries it contains. It holds no references into the parsed tree, so it
//! can be inspected, serialized, or applied later to the same page text.

use crate::error::Location;
use serde::Serialize;

/// A half-open byte range in the page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodEntry {
    /// Text content of the method's signature name.
    pub name: String,
    /// What the link shows: the name plus the method suffix.
    pub label: String,
    pub anchor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassEntry {
    pub name: String,
    pub anchor: String,
    pub methods: Vec<MethodEntry>,
}

/// An `id` written onto a block's start tag, replacing any existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorAssignment {
    pub start_tag: Span,
    pub anchor: String,
}

/// Where the generated items go inside the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Insertion {
    /// Right before the container's end tag, after its existing children.
    BeforeEndTag { offset: usize },
    /// The container is an empty-element tag (`<ul/>`) and is rewritten
    /// as a start tag, the items, and an end tag.
    ExpandEmpty { span: Span },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Class,
    Method,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Class => "class",
            BlockKind::Method => "method",
        }
    }
}

/// A block left out because its signature name could not be found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedBlock {
    pub kind: BlockKind,
    pub location: Location,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SidebarPlan {
    /// `None` when the page has no container or already has a sidebar.
    pub insertion: Option<Insertion>,
    pub assignments: Vec<AnchorAssignment>,
    pub classes: Vec<ClassEntry>,
    pub skipped: Vec<SkippedBlock>,
    /// The container already holds generated class links.
    pub already_present: bool,
    /// Traversal stopped early under the truncate policy.
    pub truncated: bool,
}

impl SidebarPlan {
    /// True when applying the plan would leave the page text untouched.
    pub fn is_noop(&self) -> bool {
        self.assignments.is_empty() && (self.insertion.is_none() || self.classes.is_empty())
    }

    pub fn method_count(&self) -> usize {
        self.classes.iter().map(|c| c.methods.len()).sum()
    }
}
