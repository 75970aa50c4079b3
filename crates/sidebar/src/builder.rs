use crate::apply::apply_plan;
use crate::config::{CompiledSelectors, SidebarConfig};
use crate::error::SidebarError;
use crate::html::HtmlPage;
use crate::model::SidebarPlan;
use crate::plan::plan_sidebar;

/// The rewritten page together with the plan that produced it.
#[derive(Debug, Clone)]
pub struct SidebarOutcome {
    pub html: String,
    pub plan: SidebarPlan,
}

impl SidebarOutcome {
    pub fn changed(&self) -> bool {
        !self.plan.is_noop()
    }
}

/// Builds the class/method sidebar for rendered pages.
///
/// Selectors are parsed once in `new`; the builder can then be shared
/// across threads and used for any number of pages.
#[derive(Debug, Clone)]
pub struct SidebarBuilder {
    config: SidebarConfig,
    selectors: CompiledSelectors,
}

impl SidebarBuilder {
    pub fn new(config: SidebarConfig) -> Result<Self, SidebarError> {
        let selectors = config.compile()?;
        Ok(Self { config, selectors })
    }

    pub fn config(&self) -> &SidebarConfig {
        &self.config
    }

    /// Computes the plan for a page without changing it.
    pub fn plan(&self, source: &str) -> Result<SidebarPlan, SidebarError> {
        let page = parse_page(source)?;
        let doc = page.document()?;
        plan_sidebar(&doc, &page, &self.config, &self.selectors)
    }

    /// Plans and applies the sidebar, returning the rewritten page.
    pub fn build(&self, source: &str) -> Result<SidebarOutcome, SidebarError> {
        let plan = self.plan(source)?;
        let html = if plan.is_noop() {
            source.to_string()
        } else {
            apply_plan(source, &plan, &self.config.markup)?
        };
        Ok(SidebarOutcome { html, plan })
    }
}

/// Reads a page, HTML or XHTML, into a form the planner can query.
pub fn parse_page(source: &str) -> Result<HtmlPage<'_>, SidebarError> {
    HtmlPage::parse(source)
}

/// Builds the sidebar for one page with the given configuration.
pub fn build_sidebar(source: &str, config: &SidebarConfig) -> Result<SidebarOutcome, SidebarError> {
    SidebarBuilder::new(config.clone())?.build(source)
}
