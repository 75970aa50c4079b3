//! Finding the pages to process.

use crate::error::SidenavError;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const PAGE_EXTENSIONS: &[&str] = &["html", "xhtml", "htm"];

/// A page on disk and its path relative to the input it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    pub path: PathBuf,
    /// Used to mirror the layout into an output directory.
    pub relative: PathBuf,
}

pub fn is_page(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| PAGE_EXTENSIONS.iter().any(|p| e.eq_ignore_ascii_case(p)))
}

/// Expands the inputs into page files. Files are taken as given; directories
/// are walked recursively for page extensions. Results within a directory
/// are sorted so runs are reproducible. A page reached through more than one
/// input is listed once, under the first.
pub fn discover_pages(inputs: &[PathBuf]) -> Result<Vec<PageFile>, SidenavError> {
    let mut pages = Vec::new();
    let mut seen = HashSet::new();
    for input in inputs {
        let metadata = fs::metadata(input).map_err(|e| SidenavError::io(input, e))?;
        if metadata.is_dir() {
            let mut found = Vec::new();
            walk(input, &mut found)?;
            found.sort();
            for path in found {
                let relative = path.strip_prefix(input).unwrap_or(&path).to_path_buf();
                push_unique(&mut pages, &mut seen, PageFile { path, relative });
            }
        } else {
            let relative = input
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| input.clone());
            let page = PageFile {
                path: input.clone(),
                relative,
            };
            push_unique(&mut pages, &mut seen, page);
        }
    }
    log::debug!("Discovered {} pages", pages.len());
    Ok(pages)
}

fn push_unique(pages: &mut Vec<PageFile>, seen: &mut HashSet<PathBuf>, page: PageFile) {
    let key = fs::canonicalize(&page.path).unwrap_or_else(|_| page.path.clone());
    if seen.insert(key) {
        pages.push(page);
    } else {
        log::debug!("{} is listed more than once", page.path.display());
    }
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) -> Result<(), SidenavError> {
    let entries = fs::read_dir(dir).map_err(|e| SidenavError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SidenavError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| SidenavError::io(&path, e))?;
        if file_type.is_dir() {
            walk(&path, found)?;
        } else if is_page(&path) {
            found.push(path);
        }
    }
    Ok(())
}
