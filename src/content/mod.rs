//! Content module - posts, front-matter, and markdown rendering

mod frontmatter;
pub mod loader;
mod markdown;
mod post;
mod reading_time;

pub use frontmatter::{parse_date, FrontMatter};
pub use loader::{ContentError, ContentStore};
pub use markdown::{MarkdownRenderer, Rendered, TocItem};
pub use post::{adjacent_in, sort_by_recency, Adjacent, Post, PostMeta};
pub use reading_time::{count_words, ReadingTime, DEFAULT_WORDS_PER_MINUTE};
