//! Injection of generated content into the HTML templates.
//!
//! Templates are plain HTML files. Content is injected by rewriting the
//! elements the build knows about:
//! - post template: `<title>` text and the end of `<body>`
//! - main template: the end of the element with `id="posts"`
//!
//! A template without one of these elements is left unchanged there.

use std::cell::Cell;
use std::rc::Rc;

use lol_html::html_content::{ContentType, Element};
use lol_html::{HandlerResult, RewriteStrSettings, element, end, end_tag, rewrite_str};
use pulldown_cmark_escape::{escape_href, escape_html_body_text};

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("failed to rewrite template: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),

    #[error("failed to escape link: {0}")]
    Escape(#[from] std::fmt::Error),
}

/// A link from the index page to one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLink {
    pub title: String,
    pub href: String,
}

/// Tracks one element that receives appended HTML.
///
/// The HTML goes right before the element's end tag. A template may leave
/// that end tag out, in which case the HTML is appended at the end of the
/// document, the last place the element's content can still reach.
struct AppendTarget {
    html: Rc<str>,
    found: Cell<bool>,
    closed: Rc<Cell<bool>>,
}

impl AppendTarget {
    fn new(html: &str) -> Self {
        Self {
            html: Rc::from(html),
            found: Cell::new(false),
            closed: Rc::new(Cell::new(false)),
        }
    }

    /// Called from the element handler of the matched element.
    fn on_element(&self, el: &mut Element) -> HandlerResult {
        if self.found.get() || !el.can_have_content() {
            return Ok(());
        }
        self.found.set(true);

        let html = Rc::clone(&self.html);
        let closed = Rc::clone(&self.closed);
        el.on_end_tag(end_tag!(move |tag| {
            closed.set(true);
            tag.before(&html, ContentType::Html);
            Ok(())
        }))
    }

    /// HTML still to be placed once the document ends, if any.
    fn unclosed_html(&self) -> Option<&str> {
        (self.found.get() && !self.closed.get()).then_some(&*self.html)
    }
}

/// Render one post page from the post template.
///
/// `title` replaces the text of `<title>` (the template's title is kept when
/// it is `None`); `body_html` is appended inside `<body>` as-is.
pub fn render_post_page(
    template: &str,
    title: Option<&str>,
    body_html: &str,
) -> Result<String, RenderError> {
    let found_title = Cell::new(false);
    let body = AppendTarget::new(body_html);

    let html = rewrite_str(
        template,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("title", |el| {
                    found_title.set(true);
                    if let Some(title) = title {
                        el.set_inner_content(title, ContentType::Text);
                    }
                    Ok(())
                }),
                element!("body", |el| body.on_element(el)),
            ],
            document_content_handlers: vec![end!(|doc| {
                if let Some(html) = body.unclosed_html() {
                    tracing::debug!("Post template has no </body>; appending at document end");
                    doc.append(html, ContentType::Html);
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )?;

    if !found_title.get() {
        tracing::warn!("Post template has no <title> element");
    }
    if !body.found.get() {
        tracing::warn!("Post template has no <body> element");
    }

    Ok(html)
}

/// Render the index page from the main template, appending one anchor per
/// link to the element with `id="posts"`, in the given order.
pub fn render_index_page(template: &str, links: &[PostLink]) -> Result<String, RenderError> {
    let posts = AppendTarget::new(&anchors(links)?);

    let html = rewrite_str(
        template,
        RewriteStrSettings {
            element_content_handlers: vec![element!("#posts", |el| posts.on_element(el))],
            document_content_handlers: vec![end!(|doc| {
                if let Some(html) = posts.unclosed_html() {
                    tracing::debug!("Posts element is never closed; appending at document end");
                    doc.append(html, ContentType::Html);
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )?;

    if !posts.found.get() {
        tracing::warn!("Main template has no element with id=\"posts\"");
    }

    Ok(html)
}

/// Build the `<a href="...">title</a>` markup for all links.
fn anchors(links: &[PostLink]) -> Result<String, std::fmt::Error> {
    let mut html = String::new();
    for link in links {
        html.push_str("<a href=\"");
        escape_href(&mut html, &link.href)?;
        html.push_str("\">");
        escape_html_body_text(&mut html, &link.title)?;
        html.push_str("</a>");
    }
    Ok(html)
}
