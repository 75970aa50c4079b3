use std::fs;
use std::path::Path;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A minimal rendered page with one documented class.
pub fn api_page(class: &str, methods: &[&str]) -> String {
    let methods: String = methods
        .iter()
        .map(|m| {
            format!(
                r#"<dl class="py method"><dt><code class="sig-name descname">{m}</code></dt><dd/></dl>"#
            )
        })
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
  <body>
    <div class="md-sidebar md-sidebar--secondary"><nav class="md-nav"><ul class="md-nav__list"></ul></nav></div>
    <dl class="py class"><dt><code class="sig-name descname">{class}</code></dt><dd>{methods}</dd></dl>
  </body>
</html>
"#
    )
}

/// A page with no documented classes.
pub fn plain_page() -> String {
    r#"<html><body><div class="md-sidebar md-sidebar--secondary"><ul class="md-nav__list"></ul></div><p>Guide</p></body></html>"#
        .to_string()
}

pub fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}
