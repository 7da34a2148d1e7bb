//! Markdown rendering with syntax highlighting, heading anchors and callouts

use anyhow::Result;
use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::HashMap;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::escape_html;

lazy_static! {
    static ref CALLOUT_OPEN: Regex =
        Regex::new(r#"<Callout(?:\s+type\s*=\s*["']([A-Za-z]+)["'])?\s*>"#).unwrap();
    static ref CALLOUT_CLOSE: Regex = Regex::new(r"</Callout\s*>").unwrap();
    static ref HEADING_STRIP: Regex = Regex::new(r"[^\p{L}\p{M}\p{N}\s_-]").unwrap();
}

/// Anchor id for a heading: lowercased, punctuation dropped, whitespace runs
/// joined with `-`. Letters outside ASCII are kept as written.
fn heading_slug(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = HEADING_STRIP.replace_all(&lowered, "");
    stripped.split_whitespace().collect::<Vec<_>>().join("-")
}

/// A heading that belongs in the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocItem {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Output of rendering one markdown document
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub html: String,
    /// Level-2 and level-3 headings in document order
    pub headings: Vec<TocItem>,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    /// Render markdown to HTML and collect the table of contents
    pub fn render(&self, markdown: &str) -> Result<Rendered> {
        // Front-matter is stripped before we get here, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut headings = Vec::new();
        let mut ids = HeadingIds::default();
        let mut code: Option<CodeBuffer> = None;
        let mut heading: Option<HeadingBuffer> = None;

        for event in parser {
            if let Some(mut block) = code.take() {
                match event {
                    Event::Text(text) => {
                        block.content.push_str(&text);
                        code = Some(block);
                    }
                    Event::End(TagEnd::CodeBlock) => {
                        let highlighted =
                            self.highlight_code(&block.content, block.lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                    _ => code = Some(block),
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code = Some(CodeBuffer {
                        lang,
                        content: String::new(),
                    });
                }
                Event::Start(Tag::Heading { level, id, .. }) => {
                    heading = Some(HeadingBuffer {
                        level,
                        id: id.map(|id| id.to_string()),
                        text: String::new(),
                        inner: Vec::new(),
                    });
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(h) = heading.take() {
                        let (html, item) = h.finish(&mut ids);
                        events.push(Event::Html(CowStr::from(html)));
                        headings.extend(item);
                    }
                }
                Event::Html(raw) => {
                    let html = rewrite_callouts(&raw);
                    events.push(Event::Html(CowStr::from(html)));
                }
                Event::InlineHtml(raw) => {
                    let html = CowStr::from(rewrite_callouts(&raw));
                    match heading.as_mut() {
                        Some(h) => h.inner.push(Event::InlineHtml(html)),
                        None => events.push(Event::InlineHtml(html)),
                    }
                }
                other => match heading.as_mut() {
                    Some(h) => h.push(other),
                    None => events.push(other),
                },
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(Rendered {
            html: html_output,
            headings,
        })
    }

    /// Highlight a code block and wrap it with its language label and copy button
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let label = lang.unwrap_or("");
        let lang = lang.unwrap_or("text");

        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme
            .and_then(|theme| {
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
            })
            .map(|html| {
                if self.line_numbers {
                    self.add_line_numbers(&html, lang)
                } else {
                    html
                }
            })
            .unwrap_or_else(|| {
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    escape_html(lang),
                    escape_html(code)
                )
            });

        let label_html = if label.is_empty() {
            String::new()
        } else {
            format!(r#"<span class="code-lang">{}</span>"#, escape_html(label))
        };

        format!(
            r#"<div class="code-block">{}<button class="copy-button" type="button" aria-label="Copy code">Copy</button>{}</div>"#,
            label_html, highlighted
        )
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();
        let line_count = lines.len();

        let mut gutter = String::new();
        let mut code_lines = String::new();

        for (i, line) in lines.iter().enumerate() {
            gutter.push_str(&format!(r#"<span class="line-number">{}</span>"#, i + 1));
            code_lines.push_str(line);
            if i + 1 < line_count {
                gutter.push('\n');
                code_lines.push('\n');
            }
        }

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
            escape_html(lang),
            gutter,
            code_lines
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

struct CodeBuffer {
    lang: Option<String>,
    content: String,
}

struct HeadingBuffer<'a> {
    level: HeadingLevel,
    id: Option<String>,
    text: String,
    inner: Vec<Event<'a>>,
}

impl<'a> HeadingBuffer<'a> {
    fn push(&mut self, event: Event<'a>) {
        if let Event::Text(text) | Event::Code(text) = &event {
            self.text.push_str(text);
        }
        self.inner.push(event);
    }

    /// Render the heading wrapped in its anchor link
    fn finish(self, ids: &mut HeadingIds) -> (String, Option<TocItem>) {
        let text = self.text.trim().to_string();
        let id = match self.id {
            Some(explicit) => ids.reserve(&explicit),
            None => ids.unique(&heading_slug(&text)),
        };
        let id = escape_html(&id);

        let mut inner = String::new();
        html::push_html(&mut inner, self.inner.into_iter());

        let level = self.level as u8;
        let html = format!(
            r##"<h{level} id="{id}"><a class="anchor" href="#{id}">{inner}</a></h{level}>"##
        );

        let item = matches!(self.level, HeadingLevel::H2 | HeadingLevel::H3)
            .then(|| TocItem { id, text, level });

        (html, item)
    }
}

/// Hands out unique heading ids: `intro`, `intro-1`, `intro-2`, ...
#[derive(Default)]
struct HeadingIds {
    seen: HashMap<String, usize>,
}

impl HeadingIds {
    fn unique(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "section" } else { base };
        loop {
            let count = self.seen.entry(base.to_string()).or_insert(0);
            let candidate = if *count == 0 {
                base.to_string()
            } else {
                format!("{}-{}", base, count)
            };
            *count += 1;
            if candidate == base || !self.seen.contains_key(&candidate) {
                self.seen.entry(candidate.clone()).or_insert(1);
                return candidate;
            }
        }
    }

    fn reserve(&mut self, id: &str) -> String {
        *self.seen.entry(id.to_string()).or_insert(0) += 1;
        id.to_string()
    }
}

/// Turn `<Callout type="...">` blocks into styled boxes
fn rewrite_callouts(html: &str) -> String {
    if !html.contains("Callout") {
        return html.to_string();
    }

    let opened = CALLOUT_OPEN.replace_all(html, |caps: &Captures| {
        let kind = CalloutKind::parse(caps.get(1).map(|m| m.as_str()));
        format!(
            r#"<div class="callout callout-{}"><span class="callout-icon">{}</span><div class="callout-body">"#,
            kind.as_str(),
            kind.icon()
        )
    });
    CALLOUT_CLOSE
        .replace_all(&opened, "</div></div>")
        .into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CalloutKind {
    Info,
    Tip,
    Warning,
    Danger,
}

impl CalloutKind {
    fn parse(kind: Option<&str>) -> Self {
        match kind.map(|k| k.to_ascii_lowercase()).as_deref() {
            Some("tip") => Self::Tip,
            Some("warning") => Self::Warning,
            Some("danger") => Self::Danger,
            _ => Self::Info,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Tip => "tip",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Info => "i",
            Self::Tip => "v",
            Self::Warning => "!",
            Self::Danger => "x",
        }
    }
}
