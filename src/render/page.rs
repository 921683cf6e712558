//! Markup shared by the section pages.

use crate::model::Section;
use crate::sanitize::sanitize_xml_attribute;

/// Front- or back-matter section body.
///
/// `kind` is `front-matter` or `back-matter`; `subtype` is the taxonomy tag.
pub(crate) fn matter_markup(
    kind: &str,
    subtype: &str,
    slug: &str,
    number: usize,
    heading: &str,
    body: &str,
) -> String {
    format!(
        r#"<div class="{kind} {subtype}" id="{slug}"><div class="{kind}-title-wrap"><h3 class="{kind}-number">{number}</h3><h1 class="{kind}-title">{heading}</h1></div><div class="ugc {kind}-ugc">{body}</div></div>"#
    )
}

pub(crate) fn part_markup(introduction: bool, slug: &str, number: usize, title: &str) -> String {
    format!(
        r#"<div class="{}" id="{slug}"><div class="part-title-wrap"><h3 class="part-number">{number}</h3><h1 class="part-title">{title}</h1></div></div>"#,
        marked_class("part", introduction)
    )
}

pub(crate) fn chapter_markup(
    introduction: bool,
    slug: &str,
    number: usize,
    heading: &str,
    body: &str,
) -> String {
    format!(
        r#"<div class="{}" id="{slug}"><div class="chapter-title-wrap"><h3 class="chapter-number">{number}</h3><h2 class="chapter-title">{heading}</h2></div><div class="ugc chapter-ugc">{body}</div></div>"#,
        marked_class("chapter", introduction)
    )
}

fn marked_class(class: &str, introduction: bool) -> String {
    if introduction {
        format!("{class} introduction")
    } else {
        class.to_string()
    }
}

/// Short title, subtitle and author lines shown above a section body.
pub(crate) fn header_lines(section: &Section) -> String {
    let mut html = String::new();
    let short_title = section.short_title.trim();
    if !short_title.is_empty() {
        html.push_str(&format!(
            r#"<h6 class="short-title">{}</h6>"#,
            sanitize_xml_attribute(short_title)
        ));
    }
    let subtitle = section.subtitle.trim();
    if !subtitle.is_empty() {
        html.push_str(&format!(
            r#"<h2 class="chapter-subtitle">{}</h2>"#,
            sanitize_xml_attribute(subtitle)
        ));
    }
    let author = section.section_author.trim();
    if !author.is_empty() {
        html.push_str(&format!(
            r#"<h2 class="chapter-author">{}</h2>"#,
            sanitize_xml_attribute(author)
        ));
    }
    html
}

/// `<file_id>-<slug>.html`
pub(crate) fn section_file_name(file_id: &str, slug: &str) -> String {
    format!("{file_id}-{slug}.html")
}
