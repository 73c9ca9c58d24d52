use crate::checker::category::{Categories, Category, CODE, FRONT_MATTER, HTML, IMAGE, LINK, URL};
use crate::host::StyledSpan;
use pulldown_cmark::{Event, LinkType, Options, Parser, Tag, TagEnd};

/// Classify Markdown: code, raw HTML, autolinks, link and image text, front
/// matter. Ordinary prose is left unclassified.
pub fn classify(text: &str) -> Vec<StyledSpan> {
    let mut spans = Vec::new();
    let mut stack: Vec<Category> = Vec::new();
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS;

    for (event, range) in Parser::new_ext(text, options).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(_)) => stack.push(CODE),
            Event::Start(Tag::HtmlBlock) => stack.push(HTML),
            Event::Start(Tag::MetadataBlock(_)) => stack.push(FRONT_MATTER),
            Event::Start(Tag::Image { .. }) => stack.push(IMAGE),
            Event::Start(Tag::Link { link_type, .. }) => match link_type {
                LinkType::Autolink | LinkType::Email => stack.push(URL),
                _ => stack.push(LINK),
            },
            Event::End(
                TagEnd::CodeBlock
                | TagEnd::HtmlBlock
                | TagEnd::MetadataBlock(_)
                | TagEnd::Image
                | TagEnd::Link,
            ) => {
                stack.pop();
            }
            Event::Text(_) if !stack.is_empty() => {
                spans.push(StyledSpan::new(range, Categories::from_vec(stack.clone())));
            }
            Event::Code(_) => spans.push(with_extra(range, &stack, CODE)),
            Event::Html(_) | Event::InlineHtml(_) => spans.push(with_extra(range, &stack, HTML)),
            _ => {}
        }
    }

    spans.sort_by_key(|span| span.range.start);
    spans
}

fn with_extra(range: std::ops::Range<usize>, stack: &[Category], extra: Category) -> StyledSpan {
    let mut categories = stack.to_vec();
    categories.push(extra);
    StyledSpan::new(range, Categories::from_vec(categories))
}
