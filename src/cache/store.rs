//! Filesystem-backed feed cache store.

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::domain::channel::ChannelId;
use crate::domain::types::FeedFormat;

use super::keys::CacheKey;

const TEMP_PREFIX: &str = ".channelcast-";
const TEMP_SUFFIX: &str = ".tmp";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to prepare cache directory `{path}`: {source}")]
    Init { path: PathBuf, source: io::Error },
    #[error("failed to read cache file `{path}`: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write cache file `{path}`: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to remove cache file `{path}`: {source}")]
    Remove { path: PathBuf, source: io::Error },
    #[error("feed cache is not configured")]
    Unavailable,
}

/// Maps (channel, format) pairs to files under one directory.
#[derive(Debug)]
pub struct FeedCacheStore {
    root: PathBuf,
}

impl FeedCacheStore {
    /// Open the store rooted at `root`, creating the directory if necessary.
    pub fn new(root: PathBuf) -> Result<Self, CacheError> {
        fs::create_dir_all(&root).map_err(|source| CacheError::Init {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, channel: &ChannelId, format: FeedFormat) -> PathBuf {
        self.root
            .join(CacheKey::new(channel.clone(), format).file_name())
    }

    pub fn has_cache(&self, channel: &ChannelId, format: FeedFormat) -> bool {
        self.path_for(channel, format).is_file()
    }

    /// `Ok(None)` when nothing is cached; `Err` when an entry exists but cannot be read.
    pub fn get_cache(
        &self,
        channel: &ChannelId,
        format: FeedFormat,
    ) -> Result<Option<String>, CacheError> {
        let path = self.path_for(channel, format);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Read { path, source }),
        }
    }

    /// Atomically replace the entry: write a sibling temp file, then rename it over the target.
    pub fn create_cache(
        &self,
        content: &str,
        channel: &ChannelId,
        format: FeedFormat,
    ) -> Result<PathBuf, CacheError> {
        let path = self.path_for(channel, format);
        let write_error = |source: io::Error| CacheError::Write {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.root).map_err(write_error)?;
        let mut file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&self.root)
            .map_err(write_error)?;
        file.write_all(content.as_bytes()).map_err(write_error)?;
        file.flush().map_err(write_error)?;
        file.persist(&path).map_err(|err| write_error(err.error))?;

        debug!(
            target = "cache::store",
            op = "cache::create",
            channel = %channel,
            format = %format,
            path = %path.display(),
            bytes = content.len(),
            "Feed cache entry written"
        );
        Ok(path)
    }

    /// Remove one entry. A missing entry counts as success.
    pub fn drop_cache(&self, channel: &ChannelId, format: FeedFormat) -> Result<(), CacheError> {
        let path = self.path_for(channel, format);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Remove { path, source }),
        }
    }

    /// Remove every format cached for `channel`, returning how many files existed.
    pub fn drop_channel(&self, channel: &ChannelId) -> Result<usize, CacheError> {
        let mut removed = 0;
        for format in FeedFormat::all() {
            if self.has_cache(channel, format) {
                self.drop_cache(channel, format)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Remove every entry the store owns, leaving unrelated files alone.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(CacheError::Read {
                    path: self.root.clone(),
                    source,
                });
            }
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|source| CacheError::Read {
                path: self.root.clone(),
                source,
            })?;
            if let Some(key) = CacheKey::from_file_name(&entry.path()) {
                self.drop_cache(&key.channel, key.format)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn channel(raw: &str) -> ChannelId {
        ChannelId::parse(raw).expect("channel id")
    }

    fn store() -> (TempDir, FeedCacheStore) {
        let dir = TempDir::new().expect("temp dir");
        let store = FeedCacheStore::new(dir.path().join("feeds")).expect("store");
        (dir, store)
    }

    #[test]
    fn create_then_get_round_trips_exact_bytes() {
        let (_dir, store) = store();
        let news = channel("news");
        let content = "<?xml version=\"1.0\"?>\n<rss>ünïcode & more</rss>\n";

        let path = store
            .create_cache(content, &news, FeedFormat::Rss)
            .expect("write cache");

        assert_eq!(path, store.root().join("news.xml"));
        assert!(store.has_cache(&news, FeedFormat::Rss));
        assert_eq!(
            store.get_cache(&news, FeedFormat::Rss).expect("read cache").as_deref(),
            Some(content)
        );
    }

    #[test]
    fn miss_is_distinct_from_error() {
        let (_dir, store) = store();
        let news = channel("news");

        assert!(!store.has_cache(&news, FeedFormat::Atom));
        assert!(matches!(store.get_cache(&news, FeedFormat::Atom), Ok(None)));

        fs::create_dir_all(store.path_for(&news, FeedFormat::Atom)).expect("blocking dir");
        assert!(matches!(
            store.get_cache(&news, FeedFormat::Atom),
            Err(CacheError::Read { .. })
        ));
    }

    #[test]
    fn create_replaces_existing_entry_without_leftovers() {
        let (_dir, store) = store();
        let news = channel("news");

        store
            .create_cache("first", &news, FeedFormat::Atom)
            .expect("first write");
        store
            .create_cache("second", &news, FeedFormat::Atom)
            .expect("second write");

        assert_eq!(
            store.get_cache(&news, FeedFormat::Atom).expect("read").as_deref(),
            Some("second")
        );
        let files: Vec<_> = fs::read_dir(store.root())
            .expect("list")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name())
            .collect();
        assert_eq!(files, vec![std::ffi::OsString::from("news.atom")]);
    }

    #[test]
    fn drop_is_idempotent() {
        let (_dir, store) = store();
        let news = channel("news");

        store
            .create_cache("x", &news, FeedFormat::Rss)
            .expect("write");
        store.drop_cache(&news, FeedFormat::Rss).expect("drop");
        store.drop_cache(&news, FeedFormat::Rss).expect("drop again");
        assert!(!store.has_cache(&news, FeedFormat::Rss));
    }

    #[test]
    fn drop_channel_and_clear_only_touch_owned_entries() {
        let (_dir, store) = store();
        let news = channel("news");
        let sport = channel("sport");

        store.create_cache("a", &news, FeedFormat::Rss).expect("write");
        store.create_cache("b", &news, FeedFormat::Atom).expect("write");
        store.create_cache("c", &sport, FeedFormat::Rss).expect("write");
        fs::write(store.root().join("README.txt"), "keep").expect("foreign file");

        assert_eq!(store.drop_channel(&news).expect("drop channel"), 2);
        assert!(store.has_cache(&sport, FeedFormat::Rss));

        assert_eq!(store.clear().expect("clear"), 1);
        assert!(store.root().join("README.txt").exists());
    }
}
