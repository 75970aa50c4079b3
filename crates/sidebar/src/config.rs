//! Configuration for the sidebar builder.
//!
//! Every field has a default that matches a Sphinx autodoc page rendered
//! with a Material-style theme, so an empty configuration file is valid.

use crate::error::SidebarError;
use crate::slug::SlugStyle;
use serde::{Deserialize, Serialize};
use sidenav_selector::{Selector, parse_selector};

/// What to do when the container or a block's name element is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingPolicy {
    /// Skip the malformed block and continue; a missing container is a no-op.
    #[default]
    Skip,
    /// Stop at the first fault, keeping everything processed before it.
    Truncate,
    /// Reject the page with an error and leave it unchanged.
    Abort,
}

/// How identical anchors within one page are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Write duplicates as they are; a warning is logged.
    Keep,
    /// Append `-2`, `-3`, ... to later duplicates.
    #[default]
    Suffix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorConfig {
    /// The list the generated items are appended to. First match wins.
    pub container: String,
    pub class_block: String,
    pub method_block: String,
    /// Evaluated with the class or method block as `:scope`.
    pub signature_name: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            container: ".md-sidebar--secondary .md-nav__list".to_string(),
            class_block: "dl.py.class".to_string(),
            method_block: "dl.py.method".to_string(),
            signature_name: ":scope > dt > code.sig-name.descname".to_string(),
        }
    }
}

/// Class names and decorations of the generated markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkupConfig {
    pub item_class: String,
    pub link_class: String,
    /// Added to class links only. Also marks a page as already processed.
    pub class_link_class: String,
    pub nav_class: String,
    pub list_class: String,
    pub method_suffix: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            item_class: "md-nav__item".to_string(),
            link_class: "md-nav__link".to_string(),
            class_link_class: "module-class".to_string(),
            nav_class: "md-nav".to_string(),
            list_class: "md-nav__list".to_string(),
            method_suffix: "()".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnchorConfig {
    pub style: SlugStyle,
    pub on_collision: CollisionPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SidebarConfig {
    pub selectors: SelectorConfig,
    pub markup: MarkupConfig,
    pub anchors: AnchorConfig,
    pub on_missing: MissingPolicy,
}

impl SidebarConfig {
    pub fn with_missing_policy(mut self, policy: MissingPolicy) -> Self {
        self.on_missing = policy;
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.anchors.on_collision = policy;
        self
    }

    /// Parses every selector once so pages can be processed without
    /// re-parsing.
    pub fn compile(&self) -> Result<CompiledSelectors, SidebarError> {
        let parse = |field: &'static str, input: &str| {
            parse_selector(input).map_err(|source| SidebarError::Selector { field, source })
        };
        Ok(CompiledSelectors {
            container: parse("container", &self.selectors.container)?,
            class_block: parse("class_block", &self.selectors.class_block)?,
            method_block: parse("method_block", &self.selectors.method_block)?,
            signature_name: parse("signature_name", &self.selectors.signature_name)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub container: Selector,
    pub class_block: Selector,
    pub method_block: Selector,
    pub signature_name: Selector,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_compiles() {
        let compiled = SidebarConfig::default().compile().unwrap();
        assert!(compiled.signature_name.is_scoped());
        assert_eq!(compiled.class_block.to_string(), "dl.py.class");
    }

    #[test]
    fn test_invalid_selector_names_the_field() {
        let mut config = SidebarConfig::default();
        config.selectors.method_block = "dl[py]".to_string();
        let err = config.compile().unwrap_err();
        assert!(matches!(err, SidebarError::Selector { field: "method_block", .. }));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SidebarConfig = serde_json::from_str(
            r#"{ "on_missing": "truncate", "anchors": { "on_collision": "keep" } }"#,
        )
        .unwrap();
        assert_eq!(config.on_missing, MissingPolicy::Truncate);
        assert_eq!(config.anchors.on_collision, CollisionPolicy::Keep);
        assert_eq!(config.anchors.style, SlugStyle::FirstNonWord);
        assert_eq!(config.selectors, SelectorConfig::default());
        assert_eq!(config.markup.method_suffix, "()");
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<SidebarConfig, _> = serde_json::from_str(r#"{ "colour": "red" }"#);
        assert!(result.is_err());
    }
}
