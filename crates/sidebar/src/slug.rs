//! Anchor identifiers derived from display names.

use crate::config::CollisionPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlugStyle {
    /// Replace only the first non-word character with `-`.
    #[default]
    FirstNonWord,
    /// Full slug via the `slug` crate: lowercase, separators collapsed.
    Slugify,
}

impl SlugStyle {
    pub fn anchor_for(self, text: &str) -> String {
        match self {
            SlugStyle::FirstNonWord => first_non_word_slug(text),
            SlugStyle::Slugify => {
                let slug = slug::slugify(text);
                if slug.is_empty() {
                    first_non_word_slug(text)
                } else {
                    slug
                }
            }
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replaces the first character outside `[A-Za-z0-9_]` with a hyphen.
///
/// Later special characters are left alone: `"Foo Bar!"` becomes
/// `"Foo-Bar!"`.
pub fn first_non_word_slug(text: &str) -> String {
    match text.char_indices().find(|(_, c)| !is_word_char(*c)) {
        Some((at, c)) => {
            let mut out = String::with_capacity(text.len());
            out.push_str(&text[..at]);
            out.push('-');
            out.push_str(&text[at + c.len_utf8()..]);
            out
        }
        None => text.to_string(),
    }
}

/// Tracks the anchors generated for one page.
#[derive(Debug, Default)]
pub struct AnchorRegistry {
    policy: CollisionPolicy,
    seen: HashMap<String, usize>,
}

impl AnchorRegistry {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            seen: HashMap::new(),
        }
    }

    /// Returns the anchor to write for `base`, applying the collision policy.
    pub fn claim(&mut self, base: String) -> String {
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            return base;
        }

        match self.policy {
            CollisionPolicy::Keep => {
                log::warn!("Anchor '{}' is generated {} times on this page", base, count);
                base
            }
            CollisionPolicy::Suffix => {
                let mut n = *count;
                loop {
                    let candidate = format!("{}-{}", base, n);
                    if !self.seen.contains_key(&candidate) {
                        self.seen.insert(candidate.clone(), 1);
                        log::debug!("Anchor '{}' already taken, using '{}'", base, candidate);
                        return candidate;
                    }
                    n += 1;
                }
            }
        }
    }
}
