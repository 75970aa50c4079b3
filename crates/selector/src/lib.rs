//! A small CSS selector engine for XHTML pages parsed with `roxmltree`.
//!
//! Only what documentation themes need to locate their navigation and API
//! blocks is supported: type, class, id and universal selectors, a leading
//! `:scope`, and the descendant and child combinators.

pub mod ast;
pub mod error;
pub mod matcher;
pub mod parser;

pub use ast::{Combinator, Compound, Selector, Step};
pub use error::SelectorError;
pub use matcher::text_content;
pub use parser::parse_selector;
