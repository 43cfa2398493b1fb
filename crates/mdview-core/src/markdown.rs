//! Markdown parsing with per-instance rendering hooks.
//!
//! Wraps `pulldown-cmark` behind two fixed entry points: [`parse_block`] for
//! full documents and [`parse_inline`] for span content. Heading, code-block
//! and code-span events are intercepted and replaced with policy-formatted
//! HTML; everything else goes through the stock HTML writer untouched.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};

use crate::policy::RenderPolicy;
use crate::slug::Slugger;

fn parse_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

/// Parse a full markdown document into HTML.
pub fn parse_block(text: &str, policy: &RenderPolicy) -> String {
    let events = rewrite_blocks(Parser::new_ext(text, parse_options()), policy);
    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    out
}

/// Parse span content into HTML, keeping inline constructs only.
///
/// The parser has no inline-only entry point, so block structure is
/// suppressed instead: paragraphs, headings, lists and quotes contribute
/// their text, and fenced code renders through the code-span formatter.
pub fn parse_inline(text: &str, policy: &RenderPolicy) -> String {
    let events = rewrite_inline(Parser::new_ext(text, parse_options()), policy);
    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    out
}

/// Replace heading and code events with policy-formatted HTML.
fn rewrite_blocks<'a>(
    parser: impl Iterator<Item = Event<'a>>,
    policy: &RenderPolicy,
) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    // One slugger per pass: heading ids must be unique within this render
    // but must not remember earlier renders of edited content.
    let mut slugger = Slugger::new();
    let mut heading: Option<(u8, String)> = None;
    let mut code: Option<(String, String)> = None;

    for event in parser {
        if code.is_some() {
            match event {
                Event::Text(chunk) => {
                    if let Some((_, body)) = code.as_mut() {
                        body.push_str(&chunk);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((language, body)) = code.take() {
                        events.push(Event::Html(
                            policy.code_block_html(&language, &body).into(),
                        ));
                    }
                }
                _ => {}
            }
            continue;
        }

        if heading.is_some() {
            match event {
                Event::Text(chunk) => {
                    if let Some((_, text)) = heading.as_mut() {
                        text.push_str(&chunk);
                    }
                }
                Event::Code(chunk) => {
                    if let Some((_, text)) = heading.as_mut() {
                        text.push_str(&chunk);
                    }
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((depth, text)) = heading.take() {
                        events.push(Event::Html(
                            policy.heading_html(depth, &text, &mut slugger).into(),
                        ));
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some((level as u8, String::new()));
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match &kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or("").to_string()
                    }
                    CodeBlockKind::Indented => String::new(),
                };
                code = Some((language, String::new()));
            }
            Event::Code(text) => {
                events.push(Event::Html(policy.code_span_html(&text).into()));
            }
            other => events.push(other),
        }
    }
    events
}

/// Keep inline events, dropping block structure.
fn rewrite_inline<'a>(
    parser: impl Iterator<Item = Event<'a>>,
    policy: &RenderPolicy,
) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut code: Option<String> = None;

    for event in parser {
        if code.is_some() {
            match event {
                Event::Text(chunk) => {
                    if let Some(body) = code.as_mut() {
                        body.push_str(&chunk);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(body) = code.take() {
                        events.push(Event::Html(policy.code_span_html(body.trim_end()).into()));
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(_)) => code = Some(String::new()),
            Event::Code(text) => {
                events.push(Event::Html(policy.code_span_html(&text).into()));
            }
            Event::Start(tag) if is_inline_tag(&tag) => events.push(Event::Start(tag)),
            Event::End(end) if is_inline_tag_end(&end) => events.push(Event::End(end)),
            Event::Start(_) | Event::End(_) | Event::Rule | Event::TaskListMarker(_) => {}
            other => events.push(other),
        }
    }
    events
}

fn is_inline_tag(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
    )
}

fn is_inline_tag_end(end: &TagEnd) -> bool {
    matches!(
        end,
        TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link | TagEnd::Image
    )
}
