//! Post models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use super::frontmatter::{self, FrontMatter};
use super::reading_time::ReadingTime;

/// Everything about a post except its body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMeta {
    /// Identifier derived from the file name, used in URLs
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date as authored
    pub date: String,

    /// Short summary shown on cards and in meta tags
    pub description: String,

    /// Tags in authored order
    pub tags: Vec<String>,

    /// Whether the post is published
    pub published: bool,

    /// Reading time text, e.g. "4 min read"
    pub reading_time: String,
}

impl PostMeta {
    /// Build the typed metadata record, applying every default in one place
    pub fn from_front_matter(slug: &str, fm: FrontMatter, reading_time: &ReadingTime) -> Self {
        Self {
            slug: slug.to_string(),
            title: fm.title.unwrap_or_else(|| slug.to_string()),
            date: fm.date.unwrap_or_default(),
            description: fm.description.unwrap_or_else(|| slug.to_string()),
            tags: fm.tags,
            published: fm.published.unwrap_or(true),
            reading_time: reading_time.text.clone(),
        }
    }

    /// Parsed publication date, `None` when missing or unparsable
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        frontmatter::parse_date(&self.date)
    }
}

/// A post with its body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub meta: PostMeta,

    /// Raw body text after the front-matter block
    pub content: String,
}

impl Post {
    /// Whether the post may be shown to readers
    pub fn is_visible(&self) -> bool {
        self.meta.published
    }
}

/// Neighbours of a post in the index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Adjacent {
    /// The next older post
    pub previous: Option<PostMeta>,
    /// The next newer post
    pub next: Option<PostMeta>,
}

/// Find the neighbours of `slug` in an index sorted newest first
pub fn adjacent_in(index: &[PostMeta], slug: &str) -> Adjacent {
    let Some(pos) = index.iter().position(|p| p.slug == slug) else {
        return Adjacent::default();
    };

    Adjacent {
        previous: index.get(pos + 1).cloned(),
        next: pos.checked_sub(1).and_then(|i| index.get(i)).cloned(),
    }
}

/// Sort newest first; undated posts go last, ties by slug ascending
pub fn sort_by_recency(posts: &mut [PostMeta]) {
    posts.sort_by_cached_key(|p| (Reverse(p.timestamp()), p.slug.clone()));
}
