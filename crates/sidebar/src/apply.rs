//! Applies a `SidebarPlan` to the page text it was computed from.
//!
//! The plan is turned into a list of disjoint edits (start-tag rewrites and
//! one insertion) which are spliced into a copy of the source in a single
//! pass. Bytes outside the edits are copied unchanged.

use crate::config::MarkupConfig;
use crate::error::SidebarError;
use crate::markup::render_items;
use crate::model::{Insertion, SidebarPlan, Span};
use crate::tags::{tag_name, with_id};

struct Edit {
    span: Span,
    replacement: String,
}

fn collect_edits(
    source: &str,
    plan: &SidebarPlan,
    markup: &MarkupConfig,
) -> Result<Vec<Edit>, SidebarError> {
    let mut edits = Vec::with_capacity(plan.assignments.len() + 1);

    for assignment in &plan.assignments {
        let span = assignment.start_tag;
        let tag = source
            .get(span.start..span.end)
            .ok_or(SidebarError::MalformedTag(span.start))?;
        edits.push(Edit {
            span,
            replacement: with_id(tag, &assignment.anchor)?,
        });
    }

    if let Some(insertion) = &plan.insertion
        && !plan.classes.is_empty()
    {
        let items = render_items(&plan.classes, markup)?;
        match insertion {
            Insertion::BeforeEndTag { offset } => edits.push(Edit {
                span: Span::at(*offset),
                replacement: items,
            }),
            Insertion::ExpandEmpty { span } => {
                let tag = source
                    .get(span.start..span.end)
                    .ok_or(SidebarError::MalformedTag(span.start))?;
                let open = tag
                    .strip_suffix("/>")
                    .ok_or(SidebarError::MalformedTag(span.start))?
                    .trim_end();
                edits.push(Edit {
                    span: *span,
                    replacement: format!("{}>{}</{}>", open, items, tag_name(tag)),
                });
            }
        }
    }

    edits.sort_by_key(|e| (e.span.start, e.span.end));
    Ok(edits)
}

/// Returns `source` with the plan's ids written and its items inserted.
pub fn apply_plan(
    source: &str,
    plan: &SidebarPlan,
    markup: &MarkupConfig,
) -> Result<String, SidebarError> {
    let edits = collect_edits(source, plan, markup)?;
    let extra: usize = edits.iter().map(|e| e.replacement.len()).sum();
    let mut out = String::with_capacity(source.len() + extra);

    let mut cursor = 0;
    for edit in &edits {
        if edit.span.start < cursor {
            return Err(SidebarError::OverlappingEdits(edit.span.start));
        }
        let keep = source
            .get(cursor..edit.span.start)
            .ok_or(SidebarError::MalformedTag(edit.span.start))?;
        out.push_str(keep);
        out.push_str(&edit.replacement);
        cursor = edit.span.end;
    }
    out.push_str(source.get(cursor..).unwrap_or_default());
    Ok(out)
}
