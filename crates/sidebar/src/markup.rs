//! Rendering of plan entries into navigation markup.
//!
//! Each class becomes
//! `<li class="md-nav__item"><a class="md-nav__link module-class" href="#Widget">Widget</a><nav class="md-nav"><ul class="md-nav__list">...</ul></nav></li>`
//! with one `li`/`a` pair per method inside the nested list.

use crate::config::MarkupConfig;
use crate::error::SidebarError;
use crate::model::ClassEntry;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

struct MarkupWriter<'m> {
    writer: Writer<Vec<u8>>,
    markup: &'m MarkupConfig,
}

impl<'m> MarkupWriter<'m> {
    fn open(&mut self, tag: &str, class: &str) -> Result<(), SidebarError> {
        let mut start = BytesStart::new(tag);
        start.push_attribute(("class", class));
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn close(&mut self, tag: &str) -> Result<(), SidebarError> {
        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    fn link(&mut self, class: &str, anchor: &str, text: &str) -> Result<(), SidebarError> {
        let href = format!("#{}", anchor);
        let mut start = BytesStart::new("a");
        start.push_attribute(("class", class));
        start.push_attribute(("href", href.as_str()));
        self.writer.write_event(Event::Start(start))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.close("a")
    }

    fn class_item(&mut self, class: &ClassEntry) -> Result<(), SidebarError> {
        let markup = self.markup;
        let class_link = format!("{} {}", markup.link_class, markup.class_link_class);

        self.open("li", &markup.item_class)?;
        self.link(class_link.trim(), &class.anchor, &class.name)?;
        self.open("nav", &markup.nav_class)?;
        self.open("ul", &markup.list_class)?;
        for method in &class.methods {
            self.open("li", &markup.item_class)?;
            self.link(&markup.link_class, &method.anchor, &method.label)?;
            self.close("li")?;
        }
        self.close("ul")?;
        self.close("nav")?;
        self.close("li")
    }
}

/// Renders one list item per class, in order, as a markup fragment.
pub fn render_items(classes: &[ClassEntry], markup: &MarkupConfig) -> Result<String, SidebarError> {
    let mut out = MarkupWriter {
        writer: Writer::new(Vec::new()),
        markup,
    };
    for class in classes {
        out.class_item(class)?;
    }
    Ok(String::from_utf8(out.writer.into_inner())?)
}
