//! Secondary navigation sidebar for rendered API reference pages.
//!
//! Given a page produced by Sphinx autodoc and a Material-style theme, the
//! builder lists every documented class, with its methods nested below,
//! inside the page's secondary sidebar. Each entry links to an anchor that
//! is written onto the corresponding class or method block.
//!
//! Work is split in two steps: [`plan_sidebar`] reads the parsed page and
//! describes the changes as a [`SidebarPlan`]; [`apply_plan`] splices them
//! into the page text. [`SidebarBuilder`] runs both. Pages are read
//! leniently by [`HtmlPage`], so ordinary HTML5 output works as well as
//! XHTML, and everything outside the edits is kept byte for byte.
//!
//! ## Example
//!
//! ```ignore
//! use sidenav_sidebar::{SidebarBuilder, SidebarConfig};
//!
//! let builder = SidebarBuilder::new(SidebarConfig::default())?;
//! let outcome = builder.build(&page)?;
//! std::fs::write(path, outcome.html)?;
//! ```

pub mod apply;
pub mod builder;
pub mod config;
pub mod error;
pub mod html;
pub mod markup;
pub mod model;
pub mod plan;
pub mod slug;
pub mod tags;

pub use apply::apply_plan;
pub use builder::{SidebarBuilder, SidebarOutcome, build_sidebar, parse_page};
pub use config::{CollisionPolicy, MarkupConfig, MissingPolicy, SelectorConfig, SidebarConfig};
pub use error::{Location, SidebarError};
pub use html::HtmlPage;
pub use model::{ClassEntry, Insertion, MethodEntry, SidebarPlan, SkippedBlock};
pub use plan::plan_sidebar;
pub use slug::{SlugStyle, first_non_word_slug};
