//! Content management for markdown-based pages.
//!
//! This module loads markdown files from the `content/pages` directory at
//! startup, parses YAML frontmatter metadata, and renders markdown to HTML.
//! The static pages (about, contact) live here so copy edits don't require
//! touching templates.

use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, engine::YAML};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur when loading content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content IO error: {0}")]
    Io(String),
    #[error("invalid frontmatter in {file}: {reason}")]
    Frontmatter { file: String, reason: String },
}

/// Metadata for static pages.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A rendered page with metadata and HTML content.
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// Content store that holds all loaded pages in memory.
#[derive(Debug, Clone)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
}

impl ContentStore {
    /// Load all content from the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the content directory cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let pages = Self::load_pages(&content_dir.join("pages"))?;

        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    /// Get a page by its slug.
    #[must_use]
    pub fn page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }

    /// Load all pages from the pages directory.
    fn load_pages(dir: &Path) -> Result<HashMap<String, Page>, ContentError> {
        let mut pages = HashMap::new();

        if !dir.exists() {
            tracing::warn!("Pages directory does not exist: {:?}", dir);
            return Ok(pages);
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match Self::load_page(&path) {
                    Ok(page) => {
                        tracing::info!("Loaded page: {}", page.slug);
                        pages.insert(page.slug.clone(), page);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load page {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(pages)
    }

    /// Load and render a single markdown page.
    fn load_page(path: &Path) -> Result<Page, ContentError> {
        let file = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Io(format!("invalid file name: {file}")))?
            .to_string();

        let matter = Matter::<YAML>::new();
        let parsed = matter.parse(&raw);

        let meta: PageMeta = parsed
            .data
            .as_ref()
            .ok_or_else(|| ContentError::Frontmatter {
                file: file.clone(),
                reason: "missing frontmatter".to_string(),
            })?
            .deserialize()
            .map_err(|e| ContentError::Frontmatter {
                file,
                reason: e.to_string(),
            })?;

        let content_html = markdown_to_html(&parsed.content, &Options::default());

        Ok(Page {
            slug,
            meta,
            content_html,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_is_empty_store() {
        let store = ContentStore::load(Path::new("/nonexistent/content")).unwrap();
        assert!(store.page("about").is_none());
    }

    #[test]
    fn test_load_page_from_disk() {
        let dir = std::env::temp_dir().join(format!("octavo-content-{}", std::process::id()));
        let pages = dir.join("pages");
        std::fs::create_dir_all(&pages).unwrap();
        std::fs::write(
            pages.join("about.md"),
            "---\ntitle: About Us\n---\n\n# Hello\n\nWe sell books.\n",
        )
        .unwrap();

        let store = ContentStore::load(&dir).unwrap();
        let page = store.page("about").unwrap();
        assert_eq!(page.meta.title, "About Us");
        assert!(page.content_html.contains("<h1>"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
