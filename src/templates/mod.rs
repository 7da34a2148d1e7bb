//! Built-in devlog templates using the Tera template engine
//!
//! Templates, the stylesheet and the browser script are embedded in the
//! binary so a site directory only has to hold content.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::client::{ThemeDefault, ViewportBand, STORAGE_KEY};
use crate::config::SiteConfig;
use crate::content::PostMeta;
use crate::helpers::{datetime_attr, display_date, post_path, strip_html};

/// Stylesheet written to `css/style.css`
pub const STYLE_CSS: &str = include_str!("devlog/assets/style.css");

/// Browser script written to `js/devlog.js`
pub const DEVLOG_JS: &str = include_str!("devlog/assets/devlog.js");

/// Template renderer with the embedded devlog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Rendered markdown is inserted as-is; user text goes through `escape`
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("devlog/layout.html")),
            ("index.html", include_str!("devlog/index.html")),
            ("post.html", include_str!("devlog/post.html")),
            ("about.html", include_str!("devlog/about.html")),
            ("404.html", include_str!("devlog/404.html")),
            (
                "partials/header.html",
                include_str!("devlog/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("devlog/partials/footer.html"),
            ),
            ("partials/toc.html", include_str!("devlog/partials/toc.html")),
            ("macros.html", include_str!("devlog/macros.html")),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);
        tera.register_filter("datetime_attr", datetime_attr_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "…".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Tera filter: format an authored date string with a chrono format
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "%Y-%m-%d".to_string(),
    };
    Ok(tera::Value::String(display_date(&s, &format)))
}

/// Tera filter: `YYYY-MM-DD` for `<time datetime>`, empty when unparsable
fn datetime_attr_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("datetime_attr", "value", String, value);
    Ok(tera::Value::String(datetime_attr(&s)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub github_url: String,
    pub date_format: String,
}

impl From<&SiteConfig> for ConfigData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.base_url().to_string(),
            github_url: config.github_url.clone(),
            date_format: config.date_format.clone(),
        }
    }
}

/// Values handed to `js/devlog.js`
#[derive(Debug, Clone, Serialize)]
pub struct ClientData {
    pub storage_key: String,
    pub default_theme: String,
    pub root_margin: String,
}

impl ClientData {
    pub fn new(default_theme: ThemeDefault, band: &ViewportBand) -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            default_theme: default_theme.as_str().to_string(),
            root_margin: band.root_margin(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub description: String,
    pub tags: Vec<String>,
    pub reading_time: String,
    pub path: String,
}

impl From<&PostMeta> for PostData {
    fn from(meta: &PostMeta) -> Self {
        Self {
            slug: meta.slug.clone(),
            title: meta.title.clone(),
            date: meta.date.clone(),
            description: meta.description.clone(),
            tags: meta.tags.clone(),
            reading_time: meta.reading_time.clone(),
            path: post_path(&meta.slug),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
}

impl From<&PostMeta> for NavPost {
    fn from(meta: &PostMeta) -> Self {
        Self {
            title: meta.title.clone(),
            path: post_path(&meta.slug),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::TocItem;

    fn base_context() -> Context {
        let config = SiteConfig::default();
        let mut context = Context::new();
        context.insert("config", &ConfigData::from(&config));
        context.insert(
            "client",
            &ClientData::new(ThemeDefault::System, &ViewportBand::default()),
        );
        context.insert("current_year", "2024");
        context.insert("current_path", "/");
        context.insert("open_graph", "");
        context.insert("canonical_url", "https://devlog.zip");
        context
    }

    fn meta(slug: &str) -> PostMeta {
        PostMeta {
            slug: slug.to_string(),
            title: format!("Title <{}>", slug),
            date: "2024-01-15".to_string(),
            description: "desc".to_string(),
            tags: vec!["rust".to_string()],
            published: true,
            reading_time: "3 min read".to_string(),
        }
    }

    #[test]
    fn test_filters() {
        let args = HashMap::new();
        let out = strip_html_filter(&tera::Value::from("<p>hi</p>"), &args).unwrap();
        assert_eq!(out, tera::Value::from("hi"));

        let mut args = HashMap::new();
        args.insert("length".to_string(), tera::Value::from(3));
        let out = truncate_chars_filter(&tera::Value::from("안녕하세요"), &args).unwrap();
        assert_eq!(out, tera::Value::from("안녕하…"));

        let mut args = HashMap::new();
        args.insert("format".to_string(), tera::Value::from("%Y년 %-m월 %-d일"));
        let out = date_format_filter(&tera::Value::from("2024-01-15"), &args).unwrap();
        assert_eq!(out, tera::Value::from("2024년 1월 15일"));

        let out = datetime_attr_filter(&tera::Value::from("someday"), &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::from(""));
    }

    #[test]
    fn test_client_data() {
        let data = ClientData::new(ThemeDefault::Dark, &ViewportBand::default());
        assert_eq!(data.storage_key, "theme");
        assert_eq!(data.default_theme, "dark");
        assert_eq!(data.root_margin, "-100px 0px -80% 0px");
    }

    #[test]
    fn test_render_empty_home() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert("posts", &Vec::<PostData>::new());
        let html = renderer.render("index.html", &context).unwrap();

        assert!(html.contains("아직 작성된 포스트가 없습니다."));
        assert!(html.contains("/js/devlog.js"));
        assert!(html.contains(r#"data-toc-margin="-100px 0px -80% 0px""#));
    }

    #[test]
    fn test_render_home_cards() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert("posts", &vec![PostData::from(&meta("hello"))]);
        let html = renderer.render("index.html", &context).unwrap();

        assert!(html.contains(r#"href="/posts/hello""#));
        assert!(html.contains("Title &lt;hello&gt;"));
        assert!(html.contains("2024년 1월 15일"));
        assert!(html.contains("3 min read"));
        assert!(html.contains(r#"class="tag-badge""#));
        assert!(!html.contains("아직 작성된 포스트가 없습니다."));
    }

    #[test]
    fn test_unparsable_date_is_escaped() {
        let renderer = TemplateRenderer::new().unwrap();
        let post = PostMeta {
            date: "<b>soon</b>".to_string(),
            ..meta("hello")
        };

        let mut context = base_context();
        context.insert("posts", &vec![PostData::from(&post)]);
        let home = renderer.render("index.html", &context).unwrap();
        assert!(home.contains("&lt;b&gt;soon"));
        assert!(!home.contains("<b>soon"));

        let mut context = base_context();
        context.insert("post", &PostData::from(&post));
        context.insert("content", "<p>Body</p>");
        context.insert("toc", &Vec::<TocItem>::new());
        let page = renderer.render("post.html", &context).unwrap();
        assert!(!page.contains("<b>soon"));
    }

    #[test]
    fn test_render_post_page() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert("post", &PostData::from(&meta("hello")));
        context.insert("content", "<p>Body</p>");
        context.insert(
            "toc",
            &vec![TocItem {
                id: "intro".to_string(),
                text: "Intro".to_string(),
                level: 2,
            }],
        );
        context.insert("prev_post", &NavPost::from(&meta("older")));
        let html = renderer.render("post.html", &context).unwrap();

        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("On This Page"));
        assert!(html.contains(r##"href="#intro""##));
        assert!(html.contains("Previous"));
        assert!(html.contains(r#"href="/posts/older""#));
        assert!(!html.contains(">Next<"));
    }
}
