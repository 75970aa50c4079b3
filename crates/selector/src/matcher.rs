//! Selector evaluation over a `roxmltree` document.
//!
//! Matching runs right to left: the last compound is tested against the
//! candidate, then combinators walk up through parents and ancestors.
//! Like `Element.querySelectorAll`, ancestors outside the query scope may
//! satisfy the left-hand compounds; only the results are restricted to the
//! scope's descendants.

use crate::ast::{Combinator, Compound, Selector, Step};
use roxmltree::Node;

impl Compound {
    /// Tests this compound against a single element.
    pub fn matches<'a, 'input>(&self, node: Node<'a, 'input>, scope: Node<'a, 'input>) -> bool {
        if !node.is_element() {
            return false;
        }
        if self.scope && node != scope {
            return false;
        }
        if let Some(tag) = &self.tag
            && !node.tag_name().name().eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && node.attribute("id") != Some(id.as_str())
        {
            return false;
        }
        if self.classes.is_empty() {
            return true;
        }
        let class_attr = node.attribute("class").unwrap_or("");
        self.classes
            .iter()
            .all(|class| class_attr.split_ascii_whitespace().any(|c| c == class))
    }
}

fn matches_steps<'a, 'input>(
    steps: &[Step],
    node: Node<'a, 'input>,
    scope: Node<'a, 'input>,
) -> bool {
    let Some((last, prefix)) = steps.split_last() else {
        return false;
    };
    if !last.compound.matches(node, scope) {
        return false;
    }
    match last.combinator {
        None => true,
        Some(Combinator::Child) => node
            .parent_element()
            .is_some_and(|parent| matches_steps(prefix, parent, scope)),
        Some(Combinator::Descendant) => node
            .ancestors()
            .skip(1)
            .filter(|n| n.is_element())
            .any(|ancestor| matches_steps(prefix, ancestor, scope)),
    }
}

impl Selector {
    /// Tests whether `node` matches, with `scope` bound to `:scope`.
    pub fn matches<'a, 'input>(&self, node: Node<'a, 'input>, scope: Node<'a, 'input>) -> bool {
        matches_steps(&self.steps, node, scope)
    }

    /// All matching descendants of `scope` (excluding `scope` itself), in
    /// document order.
    pub fn select_all<'a, 'input>(&self, scope: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
        scope
            .descendants()
            .skip(1)
            .filter(|node| self.matches(*node, scope))
            .collect()
    }

    /// The first matching descendant of `scope` in document order.
    pub fn select_first<'a, 'input>(&self, scope: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
        scope
            .descendants()
            .skip(1)
            .find(|node| self.matches(*node, scope))
    }
}

/// Concatenated text of all descendant text nodes, like DOM `textContent`.
pub fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
