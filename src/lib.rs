//! Post-processes rendered API reference pages, adding a secondary sidebar
//! that lists every documented class and its methods.
//!
//! The sidebar itself is built by `sidenav-sidebar`; this crate finds the
//! pages, loads the configuration, and writes the results.

pub mod cli;
pub mod discover;
pub mod error;
pub mod runner;
pub mod settings;

pub use discover::{PageFile, discover_pages};
pub use error::SidenavError;
pub use runner::{OutputMode, PageReport, PageStatus, RunSummary, Runner};
pub use settings::{CONFIG_ENV, load_config, read_config_file};
pub use sidenav_sidebar::{
    CollisionPolicy, MissingPolicy, SidebarBuilder, SidebarConfig, SidebarError, SidebarPlan,
};
