//! Content loader - reads posts from the content store directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::post::{adjacent_in, sort_by_recency};
use super::{Adjacent, FrontMatter, Post, PostMeta, ReadingTime};
use crate::Blog;

/// Errors the content store reports instead of a value
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("content store not found: {path:?}")]
    StoreMissing { path: PathBuf },

    #[error("content store {path:?} cannot be listed: {source}")]
    StoreUnreadable {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read post {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A directory of post files, read fresh on every call
#[derive(Debug, Clone)]
pub struct ContentStore {
    dir: PathBuf,
    extension: String,
    words_per_minute: u32,
}

impl ContentStore {
    /// Create a store over `dir` holding `*.{extension}` files
    pub fn new<P: AsRef<Path>>(dir: P, extension: &str, words_per_minute: u32) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
            words_per_minute,
        }
    }

    /// Create the store configured for a blog
    pub fn for_blog(blog: &Blog) -> Self {
        Self::new(
            &blog.posts_dir,
            &blog.config.post_extension,
            blog.config.words_per_minute,
        )
    }

    /// Store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All published posts, newest first
    pub fn build_index(&self) -> Result<Vec<PostMeta>, ContentError> {
        let mut posts: Vec<PostMeta> = self
            .scan()?
            .into_iter()
            .map(|post| post.meta)
            .filter(|meta| meta.published)
            .collect();

        sort_by_recency(&mut posts);
        tracing::debug!("Indexed {} published posts in {:?}", posts.len(), self.dir);

        Ok(posts)
    }

    /// Unpublished posts, newest first
    pub fn drafts(&self) -> Result<Vec<PostMeta>, ContentError> {
        let mut drafts: Vec<PostMeta> = self
            .scan()?
            .into_iter()
            .map(|post| post.meta)
            .filter(|meta| !meta.published)
            .collect();

        sort_by_recency(&mut drafts);
        Ok(drafts)
    }

    /// Load one post by slug, published or not.
    ///
    /// A slug with no matching file is `Ok(None)`.
    pub fn load_entry(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        if !is_valid_slug(slug) {
            return Ok(None);
        }

        let path = self.dir.join(format!("{}.{}", slug, self.extension));
        if !path.is_file() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path).map_err(|source| ContentError::Read {
            path: path.clone(),
            source,
        })?;

        Ok(Some(self.parse_post(slug, &raw)))
    }

    /// Load a post readers are allowed to see; unpublished posts are not found
    pub fn load_visible(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        Ok(self.load_entry(slug)?.filter(Post::is_visible))
    }

    /// The published posts just older and just newer than `slug`
    pub fn adjacent(&self, slug: &str) -> Result<Adjacent, ContentError> {
        let index = self.build_index()?;
        Ok(adjacent_in(&index, slug))
    }

    /// Read every post file in the store, unfiltered and unsorted
    fn scan(&self) -> Result<Vec<Post>, ContentError> {
        if !self.dir.is_dir() {
            return Err(ContentError::StoreMissing {
                path: self.dir.clone(),
            });
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(ContentError::StoreUnreadable {
                        path: self.dir.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", self.dir, e);
                    continue;
                }
            };

            let path = entry.path();
            let Some(slug) = self.slug_for(path) else {
                continue;
            };

            match fs::read_to_string(path) {
                Ok(raw) => posts.push(self.parse_post(&slug, &raw)),
                Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
            }
        }

        Ok(posts)
    }

    /// Slug of a post file, `None` for anything that is not a post
    fn slug_for(&self, path: &Path) -> Option<String> {
        if !path.is_file() {
            return None;
        }
        let extension = path.extension().and_then(|e| e.to_str())?;
        if extension != self.extension {
            return None;
        }
        let stem = path.file_stem().and_then(|s| s.to_str())?;
        is_valid_slug(stem).then(|| stem.to_string())
    }

    fn parse_post(&self, slug: &str, raw: &str) -> Post {
        let (fm, body) = FrontMatter::parse(raw);
        let reading_time = ReadingTime::estimate(body, self.words_per_minute);

        Post {
            meta: PostMeta::from_front_matter(slug, fm, &reading_time),
            content: body.to_string(),
        }
    }
}

/// A slug must name a file directly inside the store
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\'])
        && !slug.contains('\0')
}
