//! `[[target]]` / `[[target|label]]` links.
//!
//! CommonMark leaves an unmatched `[[...]]` as plain text, usually split over
//! several text events, so adjacent text is merged before scanning.

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};

/// How wiki-link targets become URLs.
#[derive(Debug, Clone, Default)]
pub struct WikiLinkOptions {
    /// Prefix joined as `<base_url>/<target>`.
    pub base_url: String,
    /// Replacement for each whitespace character in the target.
    pub whitespace: Option<String>,
    /// Percent-encode the finished URL.
    pub encode: bool,
}

impl WikiLinkOptions {
    pub fn build_url(&self, target: &str) -> String {
        let target = match &self.whitespace {
            Some(rep) => target
                .chars()
                .map(|c| {
                    if c.is_whitespace() {
                        rep.clone()
                    } else {
                        c.to_string()
                    }
                })
                .collect(),
            None => target.to_string(),
        };
        let url = format!("{}/{}", self.base_url, target);
        if self.encode {
            urlencoding::encode(&url).into_owned()
        } else {
            url
        }
    }
}

/// Replace wiki links in text events with link events.
///
/// Text inside code blocks is left untouched; inline code never reaches here
/// as text.
pub fn expand<'a>(events: Vec<Event<'a>>, opts: &WikiLinkOptions) -> Vec<Event<'a>> {
    let mut out = Vec::with_capacity(events.len());
    let mut pending = String::new();
    let mut in_code_block = false;

    for event in events {
        match event {
            Event::Text(text) if !in_code_block => {
                pending.push_str(&text);
            }
            other => {
                flush(&mut pending, &mut out, opts);
                match &other {
                    Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
                    Event::End(TagEnd::CodeBlock) => in_code_block = false,
                    _ => {}
                }
                out.push(other);
            }
        }
    }
    flush(&mut pending, &mut out, opts);

    out
}

fn flush<'a>(pending: &mut String, out: &mut Vec<Event<'a>>, opts: &WikiLinkOptions) {
    if pending.is_empty() {
        return;
    }
    let text = std::mem::take(pending);
    for segment in split_links(&text) {
        match segment {
            Segment::Text(t) => out.push(Event::Text(CowStr::from(t.to_string()))),
            Segment::Link { target, label } => {
                out.push(Event::Start(Tag::Link {
                    link_type: LinkType::Inline,
                    dest_url: CowStr::from(opts.build_url(target)),
                    title: CowStr::from(""),
                    id: CowStr::from(""),
                }));
                out.push(Event::Text(CowStr::from(label.to_string())));
                out.push(Event::End(TagEnd::Link));
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'s> {
    Text(&'s str),
    Link { target: &'s str, label: &'s str },
}

/// Split `text` into literal runs and wiki links.
///
/// A candidate with more than one `|` or an empty target is not a link; its
/// first `[` is kept as text and scanning resumes right after it.
fn split_links(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while let Some(found) = text[pos..].find("[[") {
        let open = pos + found;
        let inner_start = open + 2;
        let Some(close) = text[inner_start..].find("]]") else {
            break;
        };
        let inner = &text[inner_start..inner_start + close];
        let mut parts = inner.split('|');
        let target = parts.next().unwrap_or_default();
        let label = parts.next();

        if parts.next().is_some() || target.is_empty() {
            pos = open + 1;
            continue;
        }

        if literal_start < open {
            segments.push(Segment::Text(&text[literal_start..open]));
        }
        segments.push(Segment::Link {
            target,
            label: label.unwrap_or(target),
        });
        pos = inner_start + close + 2;
        literal_start = pos;
    }

    if literal_start < text.len() {
        segments.push(Segment::Text(&text[literal_start..]));
    }
    segments
}
