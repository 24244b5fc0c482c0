//! CommonMark rendering with source-line markers.

use pulldown_cmark::{html, BlockQuoteKind, CowStr, Event, Options, Parser, Tag, TagEnd};

use crate::lines::{line_count, LineIndex};
use crate::wikilinks::{self, WikiLinkOptions};
use crate::{RenderError, RenderResult, Renderer, LINE_ATTR};

/// Options for [`MarkdownRenderer`].
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptions {
    /// Wiki-link expansion; `None` leaves `[[...]]` as text.
    pub wikilinks: Option<WikiLinkOptions>,
}

/// Markdown renderer built on `pulldown-cmark`.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: MarkdownOptions,
}

impl MarkdownRenderer {
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }

    fn parser_options() -> Options {
        let mut opts = Options::empty();
        opts.insert(Options::ENABLE_TABLES);
        opts.insert(Options::ENABLE_STRIKETHROUGH);
        opts.insert(Options::ENABLE_TASKLISTS);
        opts.insert(Options::ENABLE_FOOTNOTES);
        opts
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, source: &str) -> Result<RenderResult, RenderError> {
        let index = LineIndex::new(source);
        let parser = Parser::new_ext(source, Self::parser_options()).into_offset_iter();

        let mut events = annotate(parser, &index);
        if let Some(opts) = &self.options.wikilinks {
            events = wikilinks::expand(events, opts);
        }

        let mut out = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());

        Ok(RenderResult {
            html: out,
            line_count: line_count(source),
        })
    }
}

/// Rewrite block-level start tags so each carries its first source line.
///
/// Simple blocks have their opening tag replaced with raw HTML. Code blocks
/// and tables keep their own events (the HTML writer tracks state for them)
/// and are wrapped in a marked `<div>` instead.
fn annotate<'a>(
    parser: impl Iterator<Item = (Event<'a>, std::ops::Range<usize>)>,
    index: &LineIndex,
) -> Vec<Event<'a>> {
    let mut events = Vec::new();

    for (event, range) in parser {
        let line = index.line_of(range.start);
        match event {
            Event::Start(Tag::Paragraph) => events.push(open_tag("p", "", line)),
            Event::Start(Tag::Heading { level, .. }) => {
                events.push(open_tag(&level.to_string(), "", line))
            }
            Event::Start(Tag::BlockQuote(kind)) => {
                let class = kind.map(alert_class).unwrap_or_default();
                events.push(open_tag("blockquote", class, line))
            }
            Event::Start(Tag::List(Some(1))) => events.push(open_tag("ol", "", line)),
            Event::Start(Tag::List(Some(start))) => {
                events.push(raw(format!(
                    "<ol start=\"{start}\" {LINE_ATTR}=\"{line}\">\n"
                )))
            }
            Event::Start(Tag::List(None)) => events.push(open_tag("ul", "", line)),
            Event::Start(Tag::Item) => events.push(raw(format!("<li {LINE_ATTR}=\"{line}\">"))),
            Event::Rule => events.push(raw(format!("<hr {LINE_ATTR}=\"{line}\" />\n"))),
            Event::Start(Tag::CodeBlock(kind)) => {
                events.push(raw(format!("<div {LINE_ATTR}=\"{line}\">\n")));
                events.push(Event::Start(Tag::CodeBlock(kind)));
            }
            Event::End(TagEnd::CodeBlock) => {
                events.push(Event::End(TagEnd::CodeBlock));
                events.push(raw("</div>\n".to_string()));
            }
            Event::Start(Tag::Table(alignments)) => {
                events.push(raw(format!("<div {LINE_ATTR}=\"{line}\">\n")));
                events.push(Event::Start(Tag::Table(alignments)));
            }
            Event::End(TagEnd::Table) => {
                events.push(Event::End(TagEnd::Table));
                events.push(raw("</div>\n".to_string()));
            }
            other => events.push(other),
        }
    }

    events
}

fn open_tag<'a>(name: &str, class: &str, line: usize) -> Event<'a> {
    let newline = if matches!(name, "ul" | "ol" | "blockquote") {
        "\n"
    } else {
        ""
    };
    if class.is_empty() {
        raw(format!("<{name} {LINE_ATTR}=\"{line}\">{newline}"))
    } else {
        raw(format!(
            "<{name} class=\"{class}\" {LINE_ATTR}=\"{line}\">{newline}"
        ))
    }
}

fn alert_class(kind: BlockQuoteKind) -> &'static str {
    match kind {
        BlockQuoteKind::Note => "markdown-alert-note",
        BlockQuoteKind::Tip => "markdown-alert-tip",
        BlockQuoteKind::Important => "markdown-alert-important",
        BlockQuoteKind::Warning => "markdown-alert-warning",
        BlockQuoteKind::Caution => "markdown-alert-caution",
    }
}

fn raw<'a>(html: String) -> Event<'a> {
    Event::Html(CowStr::from(html))
}
