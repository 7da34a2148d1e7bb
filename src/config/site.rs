//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::client::theme::ThemeDefault;

/// Environment variable that overrides `url`
pub const SITE_URL_ENV: &str = "DEVLOG_SITE_URL";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub github_url: String,

    // Directory
    pub posts_dir: String,
    pub post_extension: String,
    pub public_dir: String,
    pub static_dir: String,
    pub about_file: String,

    // Writing
    pub words_per_minute: u32,
    pub date_format: String,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Client
    #[serde(default)]
    pub toc: TocConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "DevLog.zip".to_string(),
            subtitle: "개발 경험을 압축해서 전달합니다".to_string(),
            description: "개발하면서 배운 것들을 압축해서 기록하고 공유합니다.".to_string(),
            author: String::new(),
            language: "ko".to_string(),

            url: "https://devlog.zip".to_string(),
            github_url: "https://github.com".to_string(),

            posts_dir: "posts".to_string(),
            post_extension: "mdx".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),
            about_file: "about.md".to_string(),

            words_per_minute: crate::content::DEFAULT_WORDS_PER_MINUTE,
            date_format: "%Y년 %-m월 %-d일".to_string(),
            highlight: HighlightConfig::default(),

            toc: TocConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        // An empty _config.yml deserializes to unit, not a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(SITE_URL_ENV) {
            self.apply_site_url(&url);
        }
    }

    fn apply_site_url(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            tracing::debug!("Site url overridden by {}: {}", SITE_URL_ENV, url);
            self.url = url.to_string();
        }
    }

    /// Site url without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Table of contents observation band
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    /// Pixels excluded at the top of the viewport (sticky header)
    pub top_margin: u32,
    /// Percentage excluded at the bottom of the viewport
    pub bottom_percent: u8,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            top_margin: 100,
            bottom_percent: 80,
        }
    }
}

/// Color theme configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub default: ThemeDefault,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "DevLog.zip");
        assert_eq!(config.posts_dir, "posts");
        assert_eq!(config.post_extension, "mdx");
        assert_eq!(config.words_per_minute, 200);
        assert_eq!(config.toc.top_margin, 100);
        assert_eq!(config.theme.default, ThemeDefault::System);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
url: https://blog.example.com/
posts_dir: content
words_per_minute: 250
toc:
  top_margin: 80
theme:
  default: dark
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.base_url(), "https://blog.example.com");
        assert_eq!(config.posts_dir, "content");
        assert_eq!(config.words_per_minute, 250);
        assert_eq!(config.toc.top_margin, 80);
        assert_eq!(config.toc.bottom_percent, 80);
        assert_eq!(config.theme.default, ThemeDefault::Dark);
        // Untouched fields keep their defaults
        assert_eq!(config.post_extension, "mdx");
    }

    #[test]
    fn test_site_url_override() {
        let mut config = SiteConfig::default();
        config.apply_site_url("  ");
        assert_eq!(config.url, "https://devlog.zip");
        config.apply_site_url("http://localhost:4000");
        assert_eq!(config.url, "http://localhost:4000");
    }

    #[test]
    fn test_load_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "\n").unwrap();
        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.title, "DevLog.zip");
    }
}
