//! Show one post with its neighbours

use anyhow::Result;
use serde::Serialize;

use crate::content::{Adjacent, PostMeta};
use crate::helpers::{full_url_for, post_path};
use crate::Blog;

#[derive(Debug, Serialize)]
pub struct PostSummary {
    #[serde(flatten)]
    pub meta: PostMeta,
    pub url: String,
    pub adjacent: Adjacent,
}

/// Look up a readable post and its neighbours; `None` when not found
pub fn summarize(blog: &Blog, slug: &str) -> Result<Option<PostSummary>> {
    let store = blog.store();

    let post = match store.load_visible(slug)? {
        Some(post) => post,
        None => return Ok(None),
    };
    let adjacent = store.adjacent(slug)?;
    let url = full_url_for(&blog.config, &post_path(slug));

    Ok(Some(PostSummary {
        meta: post.meta,
        url,
        adjacent,
    }))
}

/// Print a post's metadata and adjacent posts
pub fn run(blog: &Blog, slug: &str, json: bool) -> Result<()> {
    let summary = match summarize(blog, slug)? {
        Some(summary) => summary,
        None => anyhow::bail!("Post not found: {}", slug),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let meta = &summary.meta;
    println!("{}", meta.title);
    println!("  slug:         {}", meta.slug);
    println!("  url:          {}", summary.url);
    println!("  date:         {}", meta.date);
    println!("  description:  {}", meta.description);
    println!("  tags:         {}", meta.tags.join(", "));
    println!("  reading time: {}", meta.reading_time);

    let describe = |post: &Option<PostMeta>| match post {
        Some(post) => format!("{} [{}]", post.title, post.slug),
        None => "-".to_string(),
    };
    println!("  previous:     {}", describe(&summary.adjacent.previous));
    println!("  next:         {}", describe(&summary.adjacent.next));

    Ok(())
}
