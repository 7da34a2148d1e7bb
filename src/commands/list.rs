//! List site content

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;

use crate::content::PostMeta;
use crate::Blog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

/// Count tags across posts: most used first, ties in first-seen order
pub fn tag_counts(posts: &[PostMeta]) -> Vec<TagCount> {
    let mut tags: IndexMap<&str, usize> = IndexMap::new();
    for post in posts {
        for tag in &post.tags {
            *tags.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut counts: Vec<TagCount> = tags
        .into_iter()
        .map(|(name, count)| TagCount {
            name: name.to_string(),
            count,
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// List site content by type
pub fn run(blog: &Blog, content_type: &str, json: bool) -> Result<()> {
    let store = blog.store();

    match content_type {
        "post" | "posts" => print_posts("Posts", &store.build_index()?, json)?,
        "draft" | "drafts" => print_posts("Drafts", &store.drafts()?, json)?,
        "tag" | "tags" => {
            let tags = tag_counts(&store.build_index()?);
            if json {
                println!("{}", serde_json::to_string_pretty(&tags)?);
            } else {
                println!("Tags ({}):", tags.len());
                for tag in tags {
                    println!("  {} ({})", tag.name, tag.count);
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, draft, tag",
                content_type
            );
        }
    }

    Ok(())
}

fn print_posts(heading: &str, posts: &[PostMeta], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(posts)?);
        return Ok(());
    }

    println!("{} ({}):", heading, posts.len());
    for post in posts {
        let date = if post.date.is_empty() {
            "----------"
        } else {
            post.date.as_str()
        };
        println!(
            "  {} - {} [{}] ({})",
            date, post.title, post.slug, post.reading_time
        );
    }
    Ok(())
}
