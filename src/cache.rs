//! Output cache for incremental builds.
//!
//! Rendering a page is cheap; rewriting it is not free for whatever sits
//! downstream. Deploy tools that sync `dist/` by modification time, dev
//! servers that reload on change, and CI caches all see a rewritten file as a
//! new file. This module lets the generate stage skip writing pages whose
//! HTML has not changed since the last build.
//!
//! # Design
//!
//! Every page is always rendered. The cache only decides whether the result
//! goes to disk.
//!
//! ## Cache keys
//!
//! Entries map an output path (relative to the output directory, `/`
//! separated) to the SHA-256 of the HTML last written there. A page is
//! fresh when:
//! 1. An entry for its output path exists with the same hash
//! 2. The previously-written file still exists on disk
//!
//! Pages whose route disappeared since the last build are pruned from the
//! cache and their files removed.
//!
//! ## Storage
//!
//! The cache is a JSON file at `<output_dir>/.docsite-cache.json`. It lives
//! in the output directory so it travels with it when cached in CI.
//!
//! ## Bypassing the cache
//!
//! Pass `--no-cache` to `generate` or `build` to start from an empty cache.
//! Every page is written.

use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the cache file within the output directory.
const CACHE_FILENAME: &str = ".docsite-cache.json";

/// Version of the cache format. Bump this to invalidate all existing caches
/// when the format or hashing changes.
const CACHE_VERSION: u32 = 1;

/// On-disk cache mapping output paths to the hash of their content.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct BuildCache {
    pub version: u32,
    pub entries: BTreeMap<String, String>,
}

impl BuildCache {
    /// Create an empty cache (used for `--no-cache` or first build).
    pub fn empty() -> Self {
        Self {
            version: CACHE_VERSION,
            entries: BTreeMap::new(),
        }
    }

    /// Load from the output directory. Returns an empty cache if the file
    /// doesn't exist or can't be parsed (version mismatch, corruption).
    pub fn load(output_dir: &Path) -> Self {
        let content = match std::fs::read_to_string(cache_path(output_dir)) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        let cache: Self = match serde_json::from_str(&content) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        if cache.version != CACHE_VERSION {
            return Self::empty();
        }
        cache
    }

    /// Save to the output directory.
    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(cache_path(output_dir), json)
    }

    /// True when `output_path` was last written with `content_hash` and the
    /// file is still on disk.
    pub fn is_fresh(&self, output_path: &str, content_hash: &str, output_dir: &Path) -> bool {
        self.entries
            .get(output_path)
            .is_some_and(|stored| stored == content_hash)
            && output_dir.join(output_path).exists()
    }

    /// Record the hash of the content written to `output_path`.
    pub fn insert(&mut self, output_path: String, content_hash: String) {
        self.entries.insert(output_path, content_hash);
    }

    /// Drop entries for output paths not in `live`. Returns the dropped
    /// paths, sorted.
    pub fn prune(&mut self, live: &HashSet<String>) -> Vec<String> {
        let stale: Vec<String> = self
            .entries
            .keys()
            .filter(|path| !live.contains(*path))
            .cloned()
            .collect();
        for path in &stale {
            self.entries.remove(path);
        }
        stale
    }
}

/// SHA-256 hash of rendered content, returned as a hex string.
pub fn hash_content(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}", digest)
}

/// Summary of cache performance for a build run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub written: u32,
    pub unchanged: u32,
}

impl CacheStats {
    pub fn write(&mut self) {
        self.written += 1;
    }

    pub fn skip(&mut self) {
        self.unchanged += 1;
    }

    pub fn total(&self) -> u32 {
        self.written + self.unchanged
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} written, {} unchanged", self.written, self.unchanged)
    }
}

/// Resolve the cache file path for an output directory.
pub fn cache_path(output_dir: &Path) -> PathBuf {
    output_dir.join(CACHE_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // =========================================================================
    // BuildCache basics
    // =========================================================================

    #[test]
    fn empty_cache_has_no_entries() {
        let c = BuildCache::empty();
        assert_eq!(c.version, CACHE_VERSION);
        assert!(c.entries.is_empty());
    }

    #[test]
    fn fresh_when_hash_matches_and_file_exists() {
        let tmp = TempDir::new().unwrap();
        let mut c = BuildCache::empty();
        c.insert("a/index.html".into(), "h1".into());

        fs::create_dir_all(tmp.path().join("a")).unwrap();
        fs::write(tmp.path().join("a/index.html"), "<html>").unwrap();

        assert!(c.is_fresh("a/index.html", "h1", tmp.path()));
    }

    #[test]
    fn stale_when_hash_differs() {
        let tmp = TempDir::new().unwrap();
        let mut c = BuildCache::empty();
        c.insert("index.html".into(), "h1".into());
        fs::write(tmp.path().join("index.html"), "<html>").unwrap();

        assert!(!c.is_fresh("index.html", "h2", tmp.path()));
    }

    #[test]
    fn stale_when_file_deleted() {
        let tmp = TempDir::new().unwrap();
        let mut c = BuildCache::empty();
        c.insert("index.html".into(), "h1".into());

        assert!(!c.is_fresh("index.html", "h1", tmp.path()));
    }

    #[test]
    fn stale_when_no_entry() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("index.html"), "<html>").unwrap();
        assert!(!BuildCache::empty().is_fresh("index.html", "h1", tmp.path()));
    }

    #[test]
    fn prune_drops_dead_paths() {
        let mut c = BuildCache::empty();
        c.insert("index.html".into(), "h1".into());
        c.insert("old/index.html".into(), "h2".into());
        c.insert("gone/index.html".into(), "h3".into());

        let live: HashSet<String> = ["index.html".to_string()].into_iter().collect();
        let stale = c.prune(&live);

        assert_eq!(stale, vec!["gone/index.html", "old/index.html"]);
        assert_eq!(c.entries.len(), 1);
        assert!(c.entries.contains_key("index.html"));
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let mut c = BuildCache::empty();
        c.insert("index.html".into(), "abc".into());
        c.save(tmp.path()).unwrap();

        let loaded = BuildCache::load(tmp.path());
        assert_eq!(loaded, c);
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(BuildCache::load(tmp.path()), BuildCache::empty());
    }

    #[test]
    fn load_corrupt_json_returns_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(cache_path(tmp.path()), "not json {{{").unwrap();
        assert!(BuildCache::load(tmp.path()).entries.is_empty());
    }

    #[test]
    fn load_wrong_version_returns_empty() {
        let tmp = TempDir::new().unwrap();
        let json = format!(
            r#"{{"version": {}, "entries": {{"index.html": "abc"}}}}"#,
            CACHE_VERSION + 1
        );
        fs::write(cache_path(tmp.path()), json).unwrap();
        assert!(BuildCache::load(tmp.path()).entries.is_empty());
    }

    // =========================================================================
    // Hashing
    // =========================================================================

    #[test]
    fn hash_content_deterministic() {
        assert_eq!(hash_content(b"<html>"), hash_content(b"<html>"));
        assert_eq!(hash_content(b"<html>").len(), 64);
    }

    #[test]
    fn hash_content_changes_with_content() {
        assert_ne!(hash_content(b"<html>a"), hash_content(b"<html>b"));
    }

    // =========================================================================
    // CacheStats
    // =========================================================================

    #[test]
    fn cache_stats_display() {
        let mut s = CacheStats::default();
        s.write();
        s.write();
        s.skip();
        assert_eq!(s.to_string(), "2 written, 1 unchanged");
        assert_eq!(s.total(), 3);
    }

    #[test]
    fn cache_stats_display_empty() {
        assert_eq!(CacheStats::default().to_string(), "0 written, 0 unchanged");
    }
}
