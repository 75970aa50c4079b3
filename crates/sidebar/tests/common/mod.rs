use roxmltree::Node;
use sidenav_selector::{parse_selector, text_content};
use sidenav_sidebar::parse_page;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A rendered nav entry: link target, link text, nested entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub href: String,
    pub text: String,
    pub children: Vec<NavEntry>,
}

/// Wraps `body` in an XHTML page with an empty secondary sidebar.
pub fn page(body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
  <head><meta charset="utf-8" /><title>API</title></head>
  <body>
    <div class="md-sidebar md-sidebar--primary">
      <nav class="md-nav"><ul class="md-nav__list"><li class="md-nav__item">Home</li></ul></nav>
    </div>
    <div class="md-sidebar md-sidebar--secondary">
      <nav class="md-nav md-nav--secondary">
        <ul class="md-nav__list">
          <li class="md-nav__item"><a class="md-nav__link" href="#top">Contents</a></li>
        </ul>
      </nav>
    </div>
    <article>
{}
    </article>
  </body>
</html>
"##,
        body
    )
}

pub fn method_block(name: &str) -> String {
    format!(
        r#"<dl class="py method"><dt id="mod.{name}"><code class="sig-name descname"><span class="pre">{name}</span></code><span class="sig-paren">(</span><span class="sig-paren">)</span></dt><dd><p>Does {name}.</p></dd></dl>"#,
        name = name
    )
}

pub fn class_block(name: &str, methods: &[&str]) -> String {
    let methods: String = methods.iter().map(|m| method_block(m)).collect();
    format!(
        r#"<dl class="py class"><dt id="mod.{name}"><em class="property">class </em><code class="sig-name descname">{name}</code></dt><dd><p>The {name} class.</p>{methods}</dd></dl>"#,
        name = name,
        methods = methods
    )
}

/// A class block whose signature lacks the name element.
pub fn nameless_class_block(methods: &[&str]) -> String {
    let methods: String = methods.iter().map(|m| method_block(m)).collect();
    format!(
        r#"<dl class="py class"><dt><em class="property">class </em></dt><dd>{}</dd></dl>"#,
        methods
    )
}

/// Inserts `extra` after the last method of a class block.
pub fn with_extra_methods(class_block: &str, extra: &str) -> String {
    let at = class_block.rfind("</dd></dl>").unwrap();
    format!("{}{}{}", &class_block[..at], extra, &class_block[at..])
}

pub fn nameless_method_block() -> String {
    r#"<dl class="py method"><dt><span class="sig-paren">()</span></dt><dd/></dl>"#.to_string()
}

fn link_of(item: Node<'_, '_>) -> Option<(String, String)> {
    let a = item
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "a")?;
    Some((a.attribute("href")?.to_string(), text_content(a)))
}

/// The generated entries in the secondary sidebar, i.e. items whose link
/// carries `module-class`.
pub fn generated_entries(html: &str) -> Vec<NavEntry> {
    let page = parse_page(html).unwrap();
    let doc = page.document().unwrap();
    let container = parse_selector(".md-sidebar--secondary .md-nav__list")
        .unwrap()
        .select_first(doc.root())
        .unwrap();
    let nested = parse_selector(":scope > nav > ul > li").unwrap();

    container
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "li")
        .filter(|li| {
            li.children().any(|a| {
                a.attribute("class")
                    .is_some_and(|c| c.split_ascii_whitespace().any(|c| c == "module-class"))
            })
        })
        .map(|li| {
            let (href, text) = link_of(li).unwrap();
            let children = nested
                .select_all(li)
                .into_iter()
                .map(|m| {
                    let (href, text) = link_of(m).unwrap();
                    NavEntry {
                        href,
                        text,
                        children: Vec::new(),
                    }
                })
                .collect();
            NavEntry {
                href,
                text,
                children,
            }
        })
        .collect()
}

/// Values of every `id` attribute on `dl` blocks, in document order.
pub fn block_ids(html: &str) -> Vec<String> {
    let page = parse_page(html).unwrap();
    let doc = page.document().unwrap();
    doc.descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "dl")
        .filter_map(|n| n.attribute("id").map(str::to_string))
        .collect()
}

pub fn entry(href: &str, text: &str, children: Vec<NavEntry>) -> NavEntry {
    NavEntry {
        href: href.to_string(),
        text: text.to_string(),
        children,
    }
}
