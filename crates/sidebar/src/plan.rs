//! Traversal of a parsed page into a `SidebarPlan`.
//!
//! Planning only reads the tree. Faults (a missing container or signature
//! name) are resolved here, in one place, according to `MissingPolicy`.
//! Every span in the plan refers to the original page text, not to the
//! XML rendition the tree was parsed from.

use crate::config::{CompiledSelectors, MissingPolicy, SidebarConfig};
use crate::error::{Location, SidebarError};
use crate::html::HtmlPage;
use crate::model::{
    AnchorAssignment, BlockKind, ClassEntry, Insertion, MethodEntry, SidebarPlan, SkippedBlock,
};
use crate::slug::AnchorRegistry;
use crate::tags::start_tag_span;
use roxmltree::{Document, Node};
use sidenav_selector::text_content;

enum Flow {
    Skip,
    Stop,
}

struct Planner<'p, 'a, 'input> {
    doc: &'a Document<'input>,
    page: &'p HtmlPage<'p>,
    source: &'p str,
    config: &'p SidebarConfig,
    selectors: &'p CompiledSelectors,
    anchors: AnchorRegistry,
    plan: SidebarPlan,
}

/// Computes the sidebar for `doc`, which must be `page.document()`.
pub fn plan_sidebar(
    doc: &Document<'_>,
    page: &HtmlPage<'_>,
    config: &SidebarConfig,
    selectors: &CompiledSelectors,
) -> Result<SidebarPlan, SidebarError> {
    let planner = Planner {
        doc,
        page,
        source: page.source(),
        config,
        selectors,
        anchors: AnchorRegistry::new(config.anchors.on_collision),
        plan: SidebarPlan::default(),
    };
    planner.run()
}

impl<'p, 'a, 'input> Planner<'p, 'a, 'input> {
    fn run(mut self) -> Result<SidebarPlan, SidebarError> {
        let root = self.doc.root();
        let container = self.selectors.container.select_first(root);

        // Without a container, truncation still writes the ids of the first
        // class and its methods, then stops where the first item would be
        // appended.
        let mut class_limit = usize::MAX;
        match container {
            None => match self.config.on_missing {
                MissingPolicy::Abort => {
                    return Err(SidebarError::MissingContainer(
                        self.config.selectors.container.clone(),
                    ));
                }
                MissingPolicy::Skip => {
                    log::warn!(
                        "No sidebar container matches '{}'; leaving page unchanged",
                        self.config.selectors.container
                    );
                    return Ok(self.plan);
                }
                MissingPolicy::Truncate => {
                    log::warn!(
                        "No sidebar container matches '{}'; stopping after the first class",
                        self.config.selectors.container
                    );
                    self.plan.truncated = true;
                    class_limit = 1;
                }
            },
            Some(container) if self.has_generated_links(container) => {
                log::info!("Sidebar container already holds generated entries; skipping");
                self.plan.already_present = true;
                return Ok(self.plan);
            }
            Some(_) => {}
        }

        for class_node in self
            .selectors
            .class_block
            .select_all(root)
            .into_iter()
            .take(class_limit)
        {
            let Some(name) = self.signature_name(class_node) else {
                match self.fault(BlockKind::Class, class_node)? {
                    Flow::Skip => continue,
                    Flow::Stop => break,
                }
            };
            let anchor = self.assign(class_node, &name)?;
            let mut entry = ClassEntry {
                name,
                anchor,
                methods: Vec::new(),
            };

            let mut stopped = false;
            for method_node in self.methods_of(class_node) {
                let Some(name) = self.signature_name(method_node) else {
                    match self.fault(BlockKind::Method, method_node)? {
                        Flow::Skip => continue,
                        Flow::Stop => {
                            stopped = true;
                            break;
                        }
                    }
                };
                let anchor = self.assign(method_node, &name)?;
                let label = format!("{}{}", name, self.config.markup.method_suffix);
                entry.methods.push(MethodEntry {
                    name,
                    label,
                    anchor,
                });
            }
            // A class whose traversal faulted keeps its ids but is not listed.
            if stopped {
                break;
            }
            if container.is_some() {
                self.plan.classes.push(entry);
            }
        }

        self.plan.insertion = match container {
            Some(container) => Some(self.insertion_for(container)?),
            None => None,
        };
        log::debug!(
            "Planned {} classes, {} methods, {} skipped blocks",
            self.plan.classes.len(),
            self.plan.method_count(),
            self.plan.skipped.len()
        );
        Ok(self.plan)
    }

    fn signature_name(&self, block: Node<'a, 'input>) -> Option<String> {
        self.selectors
            .signature_name
            .select_first(block)
            .map(text_content)
    }

    /// Method blocks whose nearest enclosing class block is `class_node`.
    fn methods_of(&self, class_node: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
        let root = self.doc.root();
        self.selectors
            .method_block
            .select_all(class_node)
            .into_iter()
            .filter(|method| {
                method
                    .ancestors()
                    .skip(1)
                    .find(|a| self.selectors.class_block.matches(*a, root))
                    == Some(class_node)
            })
            .collect()
    }

    fn assign(&mut self, block: Node<'a, 'input>, name: &str) -> Result<String, SidebarError> {
        let base = self.config.anchors.style.anchor_for(name);
        let anchor = self.anchors.claim(base);
        let start = self.page.source_offset(block.range().start);
        let start_tag = start_tag_span(self.source, start)?;
        self.plan.assignments.push(AnchorAssignment {
            start_tag,
            anchor: anchor.clone(),
        });
        Ok(anchor)
    }

    fn fault(&mut self, kind: BlockKind, block: Node<'a, 'input>) -> Result<Flow, SidebarError> {
        let location = self.location_of(block);
        match self.config.on_missing {
            MissingPolicy::Skip => {
                log::warn!(
                    "Skipping {} block at {}: no element matches '{}'",
                    kind.as_str(),
                    location,
                    self.config.selectors.signature_name
                );
                self.plan.skipped.push(SkippedBlock { kind, location });
                Ok(Flow::Skip)
            }
            MissingPolicy::Truncate => {
                log::warn!(
                    "Stopping at {} block at {}: no element matches '{}'",
                    kind.as_str(),
                    location,
                    self.config.selectors.signature_name
                );
                self.plan.skipped.push(SkippedBlock { kind, location });
                self.plan.truncated = true;
                Ok(Flow::Stop)
            }
            MissingPolicy::Abort => Err(SidebarError::MissingName {
                kind: kind.as_str(),
                selector: self.config.selectors.signature_name.clone(),
                location,
            }),
        }
    }

    fn location_of(&self, node: Node<'a, 'input>) -> Location {
        Location::at(self.source, self.page.source_offset(node.range().start))
    }

    fn has_generated_links(&self, container: Node<'a, 'input>) -> bool {
        let marker = self.config.markup.class_link_class.as_str();
        container.descendants().any(|n| {
            n.is_element()
                && n.tag_name().name() == "a"
                && n
                    .attribute("class")
                    .is_some_and(|c| c.split_ascii_whitespace().any(|c| c == marker))
        })
    }

    fn insertion_for(&self, container: Node<'a, 'input>) -> Result<Insertion, SidebarError> {
        let range = container.range();
        let start = self.page.source_offset(range.start);

        if !container.has_children() {
            let tag = start_tag_span(self.source, start)?;
            if self.source[tag.start..tag.end].ends_with("/>") {
                return Ok(Insertion::ExpandEmpty { span: tag });
            }
        }

        let xml = self
            .page
            .xml()
            .get(range.clone())
            .ok_or(SidebarError::MalformedTag(start))?;
        let end_tag = xml.rfind("</").ok_or(SidebarError::MalformedTag(start))?;
        Ok(Insertion::BeforeEndTag {
            offset: self.page.source_offset(range.start + end_tag),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollisionPolicy;

    fn plan_with(source: &str, config: &SidebarConfig) -> Result<SidebarPlan, SidebarError> {
        let page = HtmlPage::parse(source).unwrap();
        let doc = page.document().unwrap();
        let selectors = config.compile().unwrap();
        plan_sidebar(&doc, &page, config, &selectors)
    }

    fn class_block(name: &str, methods: &[&str]) -> String {
        let methods: String = methods
            .iter()
            .map(|m| {
                format!(
                    r#"<dl class="py method"><dt><code class="sig-name descname">{}</code></dt><dd/></dl>"#,
                    m
                )
            })
            .collect();
        format!(
            r#"<dl class="py class"><dt><code class="sig-name descname">{}</code></dt><dd>{}</dd></dl>"#,
            name, methods
        )
    }

    fn page(body: &str) -> String {
        format!(
            r#"<html><body><div class="md-sidebar md-sidebar--secondary"><nav class="md-nav"><ul class="md-nav__list"></ul></nav></div>{}</body></html>"#,
            body
        )
    }

    #[test]
    fn test_plan_mirrors_page_order() {
        let source = page(&format!(
            "{}{}",
            class_block("Widget", &["render", "update"]),
            class_block("Gadget", &[])
        ));
        let plan = plan_with(&source, &SidebarConfig::default()).unwrap();

        let names: Vec<_> = plan.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Widget", "Gadget"]);
        let labels: Vec<_> = plan.classes[0].methods.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["render()", "update()"]);
        assert!(plan.classes[1].methods.is_empty());
        assert_eq!(plan.assignments.len(), 4);
    }

    #[test]
    fn test_assignment_spans_point_at_block_start_tags() {
        let source = page(&class_block("Widget", &["render"]));
        let plan = plan_with(&source, &SidebarConfig::default()).unwrap();
        for assignment in &plan.assignments {
            let tag = &source[assignment.start_tag.start..assignment.start_tag.end];
            assert!(tag.starts_with("<dl class=\"py "), "unexpected tag {}", tag);
        }
    }

    #[test]
    fn test_nested_class_methods_belong_to_nearest_class() {
        let inner = class_block("Inner", &["inner_method"]);
        let source = page(&format!(
            r#"<dl class="py class"><dt><code class="sig-name descname">Outer</code></dt><dd>{}{}</dd></dl>"#,
            inner,
            r#"<dl class="py method"><dt><code class="sig-name descname">outer_method</code></dt></dl>"#
        ));
        let plan = plan_with(&source, &SidebarConfig::default()).unwrap();

        assert_eq!(plan.classes.len(), 2);
        assert_eq!(plan.classes[0].name, "Outer");
        let outer: Vec<_> = plan.classes[0].methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(outer, vec!["outer_method"]);
        let inner: Vec<_> = plan.classes[1].methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(inner, vec!["inner_method"]);
    }

    #[test]
    fn test_missing_container_is_noop_when_skipping() {
        let source = format!("<html><body>{}</body></html>", class_block("Widget", &[]));
        let plan = plan_with(&source, &SidebarConfig::default()).unwrap();
        assert!(plan.insertion.is_none());
        assert!(plan.assignments.is_empty());
        assert!(plan.is_noop());
    }

    #[test]
    fn test_missing_container_truncates_after_first_class() {
        let source = format!(
            "<html><body>{}{}</body></html>",
            class_block("Widget", &["render"]),
            class_block("Gadget", &["spin"])
        );
        let config = SidebarConfig::default().with_missing_policy(MissingPolicy::Truncate);
        let plan = plan_with(&source, &config).unwrap();

        assert!(plan.truncated);
        assert!(plan.insertion.is_none());
        assert!(plan.classes.is_empty());
        let anchors: Vec<_> = plan.assignments.iter().map(|a| a.anchor.as_str()).collect();
        assert_eq!(anchors, vec!["Widget", "render"]);
        assert!(!plan.is_noop());
    }

    #[test]
    fn test_html_page_spans_refer_to_source() {
        let source = format!(
            r#"<html><head><meta charset=utf-8></head><body><div class="md-sidebar--secondary"><ul class="md-nav__list"><li>Top</ul></div>{}</body></html>"#,
            class_block("Widget", &["render"])
        );
        let plan = plan_with(&source, &SidebarConfig::default()).unwrap();

        for assignment in &plan.assignments {
            let tag = &source[assignment.start_tag.start..assignment.start_tag.end];
            assert!(tag.starts_with("<dl class=\"py "), "unexpected tag {}", tag);
        }
        match plan.insertion {
            Some(Insertion::BeforeEndTag { offset }) => {
                assert!(source[offset..].starts_with("</ul></div>"));
            }
            other => panic!("unexpected insertion {:?}", other),
        }
    }

    #[test]
    fn test_missing_container_aborts() {
        let source = format!("<html><body>{}</body></html>", class_block("Widget", &[]));
        let config = SidebarConfig::default().with_missing_policy(MissingPolicy::Abort);
        let err = plan_with(&source, &config).unwrap_err();
        assert!(matches!(err, SidebarError::MissingContainer(_)));
    }

    #[test]
    fn test_collisions_are_suffixed_by_default() {
        let source = page(&class_block("Room", &["get", "get"]));
        let plan = plan_with(&source, &SidebarConfig::default()).unwrap();
        let anchors: Vec<_> = plan.classes[0].methods.iter().map(|m| m.anchor.as_str()).collect();
        assert_eq!(anchors, vec!["get", "get-2"]);
    }

    #[test]
    fn test_collisions_kept_when_configured() {
        let source = page(&class_block("Room", &["get", "get"]));
        let config = SidebarConfig::default().with_collision_policy(CollisionPolicy::Keep);
        let plan = plan_with(&source, &config).unwrap();
        let anchors: Vec<_> = plan.classes[0].methods.iter().map(|m| m.anchor.as_str()).collect();
        assert_eq!(anchors, vec!["get", "get"]);
    }

    #[test]
    fn test_insertion_before_end_tag() {
        let source = page("");
        let plan = plan_with(&source, &SidebarConfig::default()).unwrap();
        match plan.insertion {
            Some(Insertion::BeforeEndTag { offset }) => {
                assert!(source[offset..].starts_with("</ul></nav>"));
            }
            other => panic!("unexpected insertion {:?}", other),
        }
    }

    #[test]
    fn test_insertion_expands_empty_container() {
        let source = r#"<div class="md-sidebar--secondary"><ul class="md-nav__list"/></div>"#;
        let plan = plan_with(source, &SidebarConfig::default()).unwrap();
        match plan.insertion {
            Some(Insertion::ExpandEmpty { span }) => {
                assert_eq!(&source[span.start..span.end], r#"<ul class="md-nav__list"/>"#);
            }
            other => panic!("unexpected insertion {:?}", other),
        }
    }
}
