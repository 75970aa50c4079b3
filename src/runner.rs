//! Running the sidebar builder over a batch of pages.

use crate::discover::PageFile;
use crate::error::SidenavError;
use serde::Serialize;
use sidenav_sidebar::{SidebarBuilder, SidebarPlan};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Where processed pages go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Overwrite each changed page.
    InPlace,
    /// Mirror every page, changed or not, under this directory.
    Directory(PathBuf),
    /// Compute plans only; nothing is written.
    DryRun,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageStatus {
    Updated,
    Unchanged,
    AlreadyPresent,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub page: PathBuf,
    pub status: PageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<SidebarPlan>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub updated: usize,
    pub unchanged: usize,
    pub already_present: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_reports(reports: &[PageReport]) -> Self {
        let mut summary = RunSummary::default();
        for report in reports {
            match report.status {
                PageStatus::Updated => summary.updated += 1,
                PageStatus::Unchanged => summary.unchanged += 1,
                PageStatus::AlreadyPresent => summary.already_present += 1,
                PageStatus::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

fn status_of(plan: &SidebarPlan) -> PageStatus {
    if plan.already_present {
        PageStatus::AlreadyPresent
    } else if plan.is_noop() {
        PageStatus::Unchanged
    } else {
        PageStatus::Updated
    }
}

/// Applies a `SidebarBuilder` to a batch of pages.
pub struct Runner {
    builder: SidebarBuilder,
    output: OutputMode,
}

impl Runner {
    pub fn new(builder: SidebarBuilder, output: OutputMode) -> Self {
        Self { builder, output }
    }

    /// Processes one page. Errors are returned, not logged.
    pub fn process_page(&self, page: &PageFile) -> Result<PageReport, SidenavError> {
        let source = fs::read_to_string(&page.path).map_err(|e| SidenavError::io(&page.path, e))?;

        if self.output == OutputMode::DryRun {
            let plan = self.builder.plan(&source)?;
            return Ok(PageReport {
                page: page.path.clone(),
                status: status_of(&plan),
                plan: Some(plan),
            });
        }

        let outcome = self.builder.build(&source)?;
        let status = status_of(&outcome.plan);
        match &self.output {
            OutputMode::Directory(root) => {
                write_page(&root.join(&page.relative), &outcome.html)?;
            }
            OutputMode::InPlace if status == PageStatus::Updated => {
                write_page(&page.path, &outcome.html)?;
            }
            _ => {}
        }

        let plan = &outcome.plan;
        match status {
            PageStatus::Updated => log::info!(
                "{}: {} classes, {} methods{}",
                page.path.display(),
                plan.classes.len(),
                plan.method_count(),
                if plan.skipped.is_empty() {
                    String::new()
                } else {
                    format!(", {} blocks skipped", plan.skipped.len())
                }
            ),
            PageStatus::AlreadyPresent => {
                log::info!("{}: sidebar already present", page.path.display())
            }
            _ => log::debug!("{}: nothing to add", page.path.display()),
        }

        Ok(PageReport {
            page: page.path.clone(),
            status,
            plan: None,
        })
    }

    fn report_for(&self, page: &PageFile) -> PageReport {
        self.process_page(page).unwrap_or_else(|e| {
            log::error!("{}: {}", page.path.display(), e);
            PageReport {
                page: page.path.clone(),
                status: PageStatus::Failed(e.to_string()),
                plan: None,
            }
        })
    }

    /// Processes every page; a failing page does not stop the others.
    /// Reports are returned in input order.
    ///
    /// Fails before touching any page if two pages would be written to the
    /// same output file.
    pub fn run(&self, pages: &[PageFile]) -> Result<Vec<PageReport>, SidenavError> {
        self.check_destinations(pages)?;

        #[cfg(feature = "parallel")]
        let reports = {
            use rayon::prelude::*;
            pages.par_iter().map(|page| self.report_for(page)).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let reports = pages.iter().map(|page| self.report_for(page)).collect();

        Ok(reports)
    }

    fn check_destinations(&self, pages: &[PageFile]) -> Result<(), SidenavError> {
        let OutputMode::Directory(root) = &self.output else {
            return Ok(());
        };
        let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
        for page in pages {
            let output = root.join(&page.relative);
            if let Some(first) = claimed.insert(output.clone(), &page.path) {
                return Err(SidenavError::OutputCollision {
                    output,
                    first: first.to_path_buf(),
                    second: page.path.clone(),
                });
            }
        }
        Ok(())
    }
}

fn write_page(path: &Path, html: &str) -> Result<(), SidenavError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| SidenavError::io(parent, e))?;
    }
    fs::write(path, html).map_err(|e| SidenavError::io(path, e))
}
