//! Generator module - writes the static site using the built-in Tera templates

use anyhow::{Context as _, Result};
use chrono::{DateTime, Datelike, Utc};
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::client::ViewportBand;
use crate::content::{adjacent_in, ContentStore, FrontMatter, MarkdownRenderer, PostMeta};
use crate::helpers::{full_url_for, open_graph, post_path};
use crate::sitemap;
use crate::templates::{
    ClientData, ConfigData, NavPost, PostData, TemplateRenderer, DEVLOG_JS, STYLE_CSS,
};
use crate::Blog;

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    store: ContentStore,
    renderer: TemplateRenderer,
    markdown: MarkdownRenderer,
    config_data: ConfigData,
    client_data: ClientData,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let config = &blog.config;
        let renderer = TemplateRenderer::new()?;
        let markdown =
            MarkdownRenderer::with_options(&config.highlight.theme, config.highlight.line_number);
        let band = ViewportBand::from(&config.toc);

        Ok(Self {
            blog: blog.clone(),
            store: blog.store(),
            renderer,
            markdown,
            config_data: ConfigData::from(config),
            client_data: ClientData::new(config.theme.default, &band),
        })
    }

    /// Generate the entire site, returning the number of post pages written
    pub fn generate(&self) -> Result<usize> {
        let now = Utc::now();

        // The index is read first so a missing store aborts before any output
        let index = self.store.build_index()?;
        tracing::info!("Loaded {} published posts", index.len());

        fs::create_dir_all(&self.blog.public_dir)?;

        // Pages of unpublished or deleted posts must not survive a rebuild
        let posts_out = self.blog.public_dir.join("posts");
        if posts_out.exists() {
            fs::remove_dir_all(&posts_out)
                .with_context(|| format!("Failed to clear {:?}", posts_out))?;
        }

        self.write_assets()?;
        self.copy_static_files()?;

        self.generate_index_page(&index, now)?;
        let written = self.generate_post_pages(&index, now)?;
        self.generate_about_page(now)?;
        self.generate_not_found_page(now)?;
        self.generate_sitemap(&index, now)?;

        Ok(written)
    }

    /// Create a base context with common variables
    fn create_base_context(&self, current_path: &str, now: DateTime<Utc>) -> Context {
        let config = &self.blog.config;
        let url = full_url_for(config, current_path);

        let mut context = Context::new();
        context.insert("config", &self.config_data);
        context.insert("client", &self.client_data);
        context.insert("current_year", &now.year().to_string());
        context.insert("current_path", current_path);
        context.insert("canonical_url", &url);
        context.insert(
            "open_graph",
            &open_graph("website", &config.title, &config.description, &url, &config.title),
        );
        context
    }

    /// Generate the home feed
    fn generate_index_page(&self, index: &[PostMeta], now: DateTime<Utc>) -> Result<()> {
        let posts: Vec<PostData> = index.iter().map(PostData::from).collect();

        let mut context = self.create_base_context("/", now);
        context.insert("posts", &posts);

        let html = self.renderer.render("index.html", &context)?;
        self.write_page(&self.blog.public_dir.join("index.html"), &html)
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, index: &[PostMeta], now: DateTime<Utc>) -> Result<usize> {
        let config = &self.blog.config;
        let mut written = 0;

        for meta in index {
            let post = match self.store.load_visible(&meta.slug)? {
                Some(post) => post,
                None => {
                    // Removed or unpublished between indexing and rendering
                    tracing::warn!("Post {} disappeared during generation", meta.slug);
                    continue;
                }
            };

            let rendered = self
                .markdown
                .render(&post.content)
                .with_context(|| format!("Failed to render post {}", meta.slug))?;
            let adjacent = adjacent_in(index, &meta.slug);

            let path = post_path(&meta.slug);
            let url = full_url_for(config, &path);

            let mut context = self.create_base_context(&path, now);
            context.insert(
                "open_graph",
                &open_graph(
                    "article",
                    &post.meta.title,
                    &post.meta.description,
                    &url,
                    &config.title,
                ),
            );
            context.insert("post", &PostData::from(&post.meta));
            context.insert("content", &rendered.html);
            context.insert("toc", &rendered.headings);

            if let Some(prev) = &adjacent.previous {
                context.insert("prev_post", &NavPost::from(prev));
            }
            if let Some(next) = &adjacent.next {
                context.insert("next_post", &NavPost::from(next));
            }

            let html = self.renderer.render("post.html", &context)?;

            let output_path = self
                .blog
                .public_dir
                .join("posts")
                .join(&meta.slug)
                .join("index.html");
            self.write_page(&output_path, &html)?;
            written += 1;
        }

        Ok(written)
    }

    /// Generate the about page from the about file, if there is one
    fn generate_about_page(&self, now: DateTime<Utc>) -> Result<()> {
        let about_path = &self.blog.about_path;

        let content = if about_path.is_file() {
            let raw = fs::read_to_string(about_path)
                .with_context(|| format!("Failed to read {:?}", about_path))?;
            let (_, body) = FrontMatter::parse(&raw);
            self.markdown.render(body)?.html
        } else {
            tracing::debug!("No about file at {:?}", about_path);
            String::new()
        };

        let mut context = self.create_base_context("/about", now);
        context.insert("content", &content);

        let html = self.renderer.render("about.html", &context)?;
        self.write_page(
            &self.blog.public_dir.join("about").join("index.html"),
            &html,
        )
    }

    fn generate_not_found_page(&self, now: DateTime<Utc>) -> Result<()> {
        let context = self.create_base_context("/404.html", now);
        let html = self.renderer.render("404.html", &context)?;
        self.write_page(&self.blog.public_dir.join("404.html"), &html)
    }

    /// Generate sitemap.xml
    fn generate_sitemap(&self, index: &[PostMeta], now: DateTime<Utc>) -> Result<()> {
        let entries = sitemap::build(&self.blog.config, index, now);
        let output_path = self.blog.public_dir.join("sitemap.xml");
        fs::write(&output_path, sitemap::to_xml(&entries))?;
        tracing::info!("Generated sitemap.xml ({} urls)", entries.len());
        Ok(())
    }

    /// Write the embedded stylesheet and browser script
    fn write_assets(&self) -> Result<()> {
        self.write_page(&self.blog.public_dir.join("css").join("style.css"), STYLE_CSS)?;
        self.write_page(&self.blog.public_dir.join("js").join("devlog.js"), DEVLOG_JS)
    }

    /// Copy the static directory (images, etc.) into the public directory
    fn copy_static_files(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.is_dir() {
            return Ok(());
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.blog.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)
                .with_context(|| format!("Failed to copy {:?} to {:?}", path, dest))?;
            copied += 1;
        }

        tracing::debug!("Copied {} static files", copied);
        Ok(())
    }

    fn write_page(&self, output_path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(output_path, contents)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn site() -> (tempfile::TempDir, Blog) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        let config = SiteConfig {
            url: "https://example.dev".to_string(),
            ..SiteConfig::default()
        };
        let blog = Blog::with_config(dir.path(), config);
        (dir, blog)
    }

    fn write_post(blog: &Blog, slug: &str, front: &str, body: &str) {
        fs::write(
            blog.posts_dir.join(format!("{}.mdx", slug)),
            format!("---\n{}\n---\n{}", front, body),
        )
        .unwrap();
    }

    fn read(blog: &Blog, relative: &str) -> String {
        fs::read_to_string(blog.public_dir.join(relative)).unwrap()
    }

    #[test]
    fn test_generate_site() {
        let (_dir, blog) = site();
        write_post(
            &blog,
            "first",
            "title: First\ndate: 2024-01-01",
            "## Intro\n\nHello.\n",
        );
        write_post(&blog, "second", "title: Second\ndate: 2024-02-01", "Body\n");
        write_post(
            &blog,
            "draft",
            "title: Draft\ndate: 2024-03-01\npublished: false",
            "Secret\n",
        );

        let generator = Generator::new(&blog).unwrap();
        assert_eq!(generator.generate().unwrap(), 2);

        let home = read(&blog, "index.html");
        let second_pos = home.find("/posts/second").unwrap();
        let first_pos = home.find("/posts/first").unwrap();
        assert!(second_pos < first_pos);
        assert!(!home.contains("/posts/draft"));

        let first = read(&blog, "posts/first/index.html");
        assert!(first.contains(r#"<h2 id="intro">"#));
        assert!(first.contains("On This Page"));
        assert!(first.contains(r#"href="/posts/second""#));
        assert!(!first.contains("Previous"));

        assert!(!blog.public_dir.join("posts/draft/index.html").exists());
        assert!(blog.public_dir.join("about/index.html").exists());
        assert!(blog.public_dir.join("404.html").exists());
        assert!(blog.public_dir.join("css/style.css").exists());
        assert!(read(&blog, "js/devlog.js").contains("IntersectionObserver"));

        let sitemap = read(&blog, "sitemap.xml");
        assert!(sitemap.contains("<loc>https://example.dev/posts/second</loc>"));
        assert!(!sitemap.contains("draft"));
    }

    #[test]
    fn test_empty_store() {
        let (_dir, blog) = site();
        let generator = Generator::new(&blog).unwrap();
        assert_eq!(generator.generate().unwrap(), 0);
        assert!(read(&blog, "index.html").contains("아직 작성된 포스트가 없습니다."));
    }

    #[test]
    fn test_missing_store_writes_nothing() {
        let (_dir, blog) = site();
        fs::remove_dir(&blog.posts_dir).unwrap();

        let err = Generator::new(&blog).unwrap().generate().unwrap_err();
        assert!(err.to_string().contains("content store not found"));
        assert!(!blog.public_dir.exists());
    }

    #[test]
    fn test_rebuild_drops_unpublished_and_deleted_posts() {
        let (_dir, blog) = site();
        write_post(&blog, "secret", "title: Secret\ndate: 2024-01-01", "Body\n");
        write_post(&blog, "gone", "title: Gone\ndate: 2024-02-01", "Body\n");

        let generator = Generator::new(&blog).unwrap();
        assert_eq!(generator.generate().unwrap(), 2);
        assert!(blog.public_dir.join("posts/secret/index.html").exists());
        assert!(blog.public_dir.join("posts/gone/index.html").exists());

        write_post(
            &blog,
            "secret",
            "title: Secret\ndate: 2024-01-01\npublished: false",
            "Body\n",
        );
        fs::remove_file(blog.posts_dir.join("gone.mdx")).unwrap();

        assert_eq!(generator.generate().unwrap(), 0);
        assert!(!blog.public_dir.join("posts/secret/index.html").exists());
        assert!(!blog.public_dir.join("posts/gone/index.html").exists());
        assert!(!read(&blog, "sitemap.xml").contains("secret"));
    }

    #[test]
    fn test_about_and_static_files() {
        let (_dir, blog) = site();
        fs::write(&blog.about_path, "---\ntitle: About\n---\nHi, I **write** here.\n").unwrap();
        fs::create_dir_all(blog.static_dir.join("images")).unwrap();
        fs::write(blog.static_dir.join("images/logo.txt"), "logo").unwrap();

        Generator::new(&blog).unwrap().generate().unwrap();

        let about = read(&blog, "about/index.html");
        assert!(about.contains("<strong>write</strong>"));
        assert!(!about.contains("title: About"));
        assert_eq!(read(&blog, "images/logo.txt"), "logo");
    }
}
