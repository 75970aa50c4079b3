//! Abstract syntax for the supported selector subset.
//!
//! A selector is a chain of compound selectors joined by combinators, e.g.
//! `.md-sidebar--secondary .md-nav__list` or `:scope > dt > code.sig-name`.

use std::fmt;

/// The relation between a compound and the compound to its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: any ancestor.
    Descendant,
    /// `>`: the parent element.
    Child,
}

/// A sequence of simple selectors that must all hold for one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    /// `:scope`, which only matches the element the query was run from.
    pub scope: bool,
    /// Local tag name; `None` for `*` or when omitted.
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

/// One compound plus how it relates to the previous step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// `None` for the first step of a selector.
    pub combinator: Option<Combinator>,
    pub compound: Compound,
}

/// A parsed selector. Always holds at least one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub(crate) steps: Vec<Step>,
}

impl Selector {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// True when the selector is anchored at the query scope (`:scope > ...`).
    pub fn is_scoped(&self) -> bool {
        self.steps.first().is_some_and(|s| s.compound.scope)
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scope {
            f.write_str(":scope")?;
        }
        match &self.tag {
            Some(tag) => f.write_str(tag)?,
            None if !self.scope && self.id.is_none() && self.classes.is_empty() => f.write_str("*")?,
            None => {}
        }
        if let Some(id) = &self.id {
            write!(f, "#{}", id)?;
        }
        for class in &self.classes {
            write!(f, ".{}", class)?;
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            match step.combinator {
                None => {}
                Some(Combinator::Descendant) => f.write_str(" ")?,
                Some(Combinator::Child) => f.write_str(" > ")?,
            }
            write!(f, "{}", step.compound)?;
        }
        Ok(())
    }
}
