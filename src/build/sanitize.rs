//! HTML sanitization of rendered posts.
//!
//! Uses ammonia's allow-list, widened for the markup the markdown renderer
//! emits on purpose: heading ids, code language classes, footnote anchors,
//! task list checkboxes, GFM alert classes and table cell alignment.

use std::collections::HashSet;

use ammonia::Builder;

/// Build the sanitizer configuration.
fn builder() -> Builder<'static> {
    let mut builder = Builder::default();
    for heading in ["h1", "h2", "h3", "h4", "h5", "h6"] {
        builder.add_tag_attributes(heading, &["id", "class"]);
    }
    for cell in ["th", "td"] {
        builder.add_tag_attributes(cell, &["style"]);
    }
    builder
        .add_tag_attributes("code", &["class"])
        .add_tag_attributes("blockquote", &["class"])
        // footnotes
        .add_tag_attributes("div", &["id", "class"])
        .add_tag_attributes("sup", &["class"])
        // task lists
        .add_tags(&["input"])
        .add_tag_attributes("input", &["checked", "disabled"])
        .add_tag_attribute_values("input", "type", &["checkbox"])
        .filter_style_properties(HashSet::from(["text-align"]))
        .link_rel(Some("noopener noreferrer"));
    builder
}

/// Strip anything capable of running script from an HTML fragment.
pub fn sanitize_html(html: &str) -> String {
    builder().clean(html).to_string()
}
