//! Generate static files

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};

use crate::generator::Generator;
use crate::Blog;

/// Generate the static site
pub fn run(blog: &Blog) -> Result<()> {
    let start = Instant::now();

    let generator = Generator::new(blog)?;
    let written = generator.generate()?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} posts in {:.2}s",
        written,
        duration.as_secs_f64()
    );

    Ok(())
}

/// Paths whose changes require a rebuild, with how to watch them
pub fn watched_paths(blog: &Blog) -> Vec<(PathBuf, RecursiveMode)> {
    let candidates = [
        (blog.posts_dir.clone(), RecursiveMode::NonRecursive),
        (blog.static_dir.clone(), RecursiveMode::Recursive),
        (blog.about_path.clone(), RecursiveMode::NonRecursive),
        (blog.config_path(), RecursiveMode::NonRecursive),
    ];

    // notify refuses to watch paths that do not exist
    candidates
        .into_iter()
        .filter(|(path, _)| path.exists())
        .collect()
}

/// Whether a changed path should trigger a rebuild
pub fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

/// Quiet period before a burst of changes is delivered as one batch
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// Watch the site sources and call `on_change` once per settled batch of changes
pub fn watch_changes<F>(blog: &Blog, on_change: F) -> Result<()>
where
    F: FnMut(&[PathBuf]),
{
    let (tx, rx) = channel();

    let mut debouncer = new_debouncer(DEBOUNCE, tx)?;
    for (path, mode) in watched_paths(blog) {
        debouncer.watcher().watch(&path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    // The debouncer must stay alive while the channel is drained
    dispatch_changes(&rx, on_change);
    drop(debouncer);

    Ok(())
}

/// Drain debounced batches until the sender goes away
fn dispatch_changes<F>(rx: &Receiver<DebounceEventResult>, mut on_change: F)
where
    F: FnMut(&[PathBuf]),
{
    for result in rx.iter() {
        match result {
            Ok(events) => {
                let changed: Vec<PathBuf> = events
                    .into_iter()
                    .map(|e| e.path)
                    .filter(|p| is_relevant(p))
                    .collect();
                if !changed.is_empty() {
                    on_change(&changed);
                }
            }
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
            }
        }
    }
}

/// Watch for file changes and regenerate
pub fn watch(blog: &Blog) -> Result<()> {
    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    watch_changes(blog, |changed| {
        for path in changed {
            tracing::info!("File changed: {}", path.display());
        }
        if let Err(e) = run(blog) {
            tracing::error!("Generation failed: {:#}", e);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_debouncer_mini::{DebouncedEvent, DebouncedEventKind};
    use std::fs;

    #[test]
    fn test_watched_paths_skip_missing() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert!(watched_paths(&blog).is_empty());

        fs::create_dir_all(&blog.posts_dir).unwrap();
        fs::write(blog.config_path(), "title: Test\n").unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let paths: Vec<_> = watched_paths(&blog).into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec![blog.posts_dir.clone(), blog.config_path()]);
    }

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("/site/posts/hello.mdx")));
        assert!(!is_relevant(Path::new("/site/.git/index")));
        assert!(!is_relevant(Path::new("/site/posts/hello.mdx~")));
        assert!(!is_relevant(Path::new("/site/posts/.hello.mdx.swp")));
    }

    #[test]
    fn test_back_to_back_batches_each_rebuild() {
        let (tx, rx) = channel();
        let batch = |path: &str| -> DebounceEventResult {
            Ok(vec![DebouncedEvent {
                path: PathBuf::from(path),
                kind: DebouncedEventKind::Any,
            }])
        };

        // A second save landing right after the first rebuild is still delivered
        tx.send(batch("/site/posts/hello.mdx")).unwrap();
        tx.send(batch("/site/posts/hello.mdx")).unwrap();
        tx.send(batch("/site/.git/index")).unwrap();
        drop(tx);

        let mut seen = Vec::new();
        dispatch_changes(&rx, |changed| seen.push(changed.to_vec()));

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], vec![PathBuf::from("/site/posts/hello.mdx")]);
    }

    #[test]
    fn test_run_requires_store() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert!(run(&blog).is_err());

        fs::create_dir_all(&blog.posts_dir).unwrap();
        run(&blog).unwrap();
        assert!(blog.public_dir.join("index.html").exists());
    }
}
