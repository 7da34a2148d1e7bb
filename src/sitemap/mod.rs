//! Sitemap generation

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::PostMeta;
use crate::helpers::{date_xml, escape_xml, full_url_for, post_path};

/// Routes that exist regardless of content
const STATIC_ROUTES: &[&str] = &["/", "/about"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Build the sitemap for a published index.
///
/// Static routes come first and carry `now`; posts follow in index order
/// with their parsed date, if any.
pub fn build(config: &SiteConfig, index: &[PostMeta], now: DateTime<Utc>) -> Vec<SitemapEntry> {
    let static_routes = STATIC_ROUTES.iter().map(|route| SitemapEntry {
        url: full_url_for(config, route),
        last_modified: Some(now),
    });

    let posts = index
        .iter()
        .filter(|post| post.published)
        .map(|post| SitemapEntry {
            url: full_url_for(config, &post_path(&post.slug)),
            last_modified: post.timestamp(),
        });

    static_routes.chain(posts).collect()
}

/// Serialize entries as a sitemaps.org `urlset`
pub fn to_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.url)));
        if let Some(modified) = &entry.last_modified {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", date_xml(modified)));
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}
