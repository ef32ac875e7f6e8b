use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::utils::http::fetch_with_retry;

/// On-disk plumbing around a scrape run: raw HTML pages cached under the
/// cache dir, extracted records written as JSON under the output dir.
pub struct PageStore {
    cache_dir: PathBuf,
    output_dir: PathBuf,
}

impl PageStore {
    pub fn new(cache_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();
        let output_dir = output_dir.into();
        fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache dir {}", cache_dir.display()))?;
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create output dir {}", output_dir.display()))?;
        Ok(Self {
            cache_dir,
            output_dir,
        })
    }

    fn cache_file(&self, category: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.html", category))
    }

    /// Drop a category's cached page so the next run re-fetches.
    pub fn clear_cached(&self, category: &str) -> Result<()> {
        let cache_file = self.cache_file(category);
        if cache_file.exists() {
            fs::remove_file(&cache_file)
                .with_context(|| format!("Failed to clear cache {}", cache_file.display()))?;
            info!("[{}] Cleared cache: {}", category, cache_file.display());
        }
        Ok(())
    }

    /// HTML for one category: cache hit, else fetch-and-cache for URL
    /// sources; file sources are read directly and never cached.
    pub async fn load_page(&self, client: &Client, category: &str, source: &str) -> Result<String> {
        if source.starts_with("http") {
            let cache_file = self.cache_file(category);
            if cache_file.exists() {
                info!("[{}] Loading from cache: {}", category, cache_file.display());
                return fs::read_to_string(&cache_file)
                    .with_context(|| format!("Failed to read cache {}", cache_file.display()));
            }

            info!("[{}] Fetching from URL: {}", category, source);
            let response = fetch_with_retry(client, source, 3).await?;
            let html = response.text().await?;

            fs::write(&cache_file, &html)
                .with_context(|| format!("Failed to write cache {}", cache_file.display()))?;
            info!("[{}] Cached to: {}", category, cache_file.display());
            Ok(html)
        } else {
            let path = Path::new(source);
            fs::read_to_string(path).with_context(|| format!("HTML file not found: {}", source))
        }
    }

    /// Write records as pretty JSON (2-space indent, non-ASCII kept as-is).
    pub fn save_json<T: Serialize>(&self, filename: &str, records: &[T]) -> Result<PathBuf> {
        let output_file = self.output_dir.join(filename);
        let json = serde_json::to_string_pretty(records)
            .with_context(|| format!("Failed to serialize {}", filename))?;
        fs::write(&output_file, json)
            .with_context(|| format!("Failed to write {}", output_file.display()))?;
        Ok(output_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Geniemon;
    use pretty_assertions::assert_eq;

    fn scratch_store(tag: &str) -> (PageStore, PathBuf) {
        let root = std::env::temp_dir().join(format!("boarhat-store-{}-{}", tag, std::process::id()));
        let store = PageStore::new(root.join("raw"), root.join("processed")).unwrap();
        (store, root)
    }

    #[test]
    fn save_json_is_pretty_and_keeps_non_ascii() {
        let (store, root) = scratch_store("json");
        let records = vec![Geniemon {
            name: "Fenny".to_string(),
            rarity: "5★".to_string(),
            ..serde_json::from_str::<Geniemon>(r#"{"name": "Fenny"}"#).unwrap()
        }];

        let path = store.save_json("geniemon.json", &records).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        // 2-space indentation, glyphs unescaped
        assert!(written.contains("  {\n    \"name\": \"Fenny\""));
        assert!(written.contains("5★"));
        assert!(!written.contains("\\u"));

        let back: Vec<Geniemon> = serde_json::from_str(&written).unwrap();
        assert_eq!(back, records);

        fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn file_sources_are_read_directly() {
        let (store, root) = scratch_store("file");
        let page = root.join("page.html");
        fs::write(&page, "<html><body>hi</body></html>").unwrap();

        let client = Client::new();
        let html = store
            .load_page(&client, "characters", page.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(html, "<html><body>hi</body></html>");
        // File sources never populate the cache
        assert!(!store.cache_file("characters").exists());

        fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn missing_file_source_is_fatal() {
        let (store, root) = scratch_store("missing");
        let client = Client::new();
        let err = store
            .load_page(&client, "characters", "no/such/file.html")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("HTML file not found"));
        fs::remove_dir_all(root).ok();
    }
}
