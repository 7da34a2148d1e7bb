//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode one path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Site-relative path of a post
///
/// # Examples
/// ```ignore
/// post_path("hello-world") // -> "/posts/hello-world"
/// ```
pub fn post_path(slug: &str) -> String {
    format!("/posts/{}", encode_segment(slug))
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about") // -> "https://devlog.zip/about"
/// full_url_for(&config, "/")      // -> "https://devlog.zip"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.base_url();
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com/".to_string(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_post_path() {
        assert_eq!(post_path("hello-world"), "/posts/hello-world");
        assert_eq!(post_path("a b?c"), "/posts/a%20b%3Fc");
        assert_eq!(post_path("한글"), "/posts/%ED%95%9C%EA%B8%80");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(full_url_for(&config, "/"), "https://example.com");
        assert_eq!(full_url_for(&config, ""), "https://example.com");
        assert_eq!(full_url_for(&config, "/about"), "https://example.com/about");
        assert_eq!(
            full_url_for(&config, &post_path("x")),
            "https://example.com/posts/x"
        );
    }
}
