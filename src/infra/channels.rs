//! File-backed channel repository: one TOML document per channel.
//!
//! ```toml
//! enabled = true
//! published = "2024-01-01 00:00:00"
//! caching = true
//! language = "en"
//!
//! [rss.constructs]
//! title = "News"
//!
//! [[rss.items]]
//! title = "Hello"
//! link = "https://example.com/hello"
//! ```

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::application::repos::{ChannelsRepo, RepoError};
use crate::domain::channel::{ChannelId, ChannelRecord};
use crate::domain::construct::{FeedItem, FieldValue};
use crate::domain::types::FeedFormat;

const CHANNEL_FILE_EXTENSION: &str = "toml";

#[derive(Debug, Clone)]
pub struct FileChannelsRepo {
    directory: PathBuf,
}

impl FileChannelsRepo {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, id: &ChannelId) -> PathBuf {
        self.directory
            .join(format!("{}.{CHANNEL_FILE_EXTENSION}", id.as_str()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ChannelFile {
    enabled: bool,
    published: String,
    caching: bool,
    language: String,
    rss: Option<FormatSection>,
    atom: Option<FormatSection>,
    json: Option<FormatSection>,
}

impl Default for ChannelFile {
    fn default() -> Self {
        Self {
            enabled: true,
            published: String::new(),
            caching: false,
            language: String::new(),
            rss: None,
            atom: None,
            json: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FormatSection {
    constructs: BTreeMap<String, FieldValue>,
    items: Vec<FeedItem>,
}

impl ChannelFile {
    fn into_record(self, format: FeedFormat) -> Option<ChannelRecord> {
        let section = match format {
            FeedFormat::Rss => self.rss,
            FeedFormat::Atom => self.atom,
            FeedFormat::Json => self.json,
        }?;

        Some(ChannelRecord {
            enabled: self.enabled,
            published: self.published,
            caching: self.caching,
            language: self.language,
            constructs: section.constructs,
            items: section.items,
        })
    }
}

#[async_trait]
impl ChannelsRepo for FileChannelsRepo {
    async fn find_channel(
        &self,
        id: &ChannelId,
        format: FeedFormat,
    ) -> Result<Option<ChannelRecord>, RepoError> {
        let path = self.path_for(id);
        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(
                    target = "infra::channels",
                    channel = %id,
                    path = %path.display(),
                    "Channel file not found"
                );
                return Ok(None);
            }
            Err(err) => {
                return Err(RepoError::from_persistence(format!(
                    "failed to read `{}`: {err}",
                    path.display()
                )));
            }
        };

        let file: ChannelFile = toml::from_str(&source)
            .map_err(|err| RepoError::invalid_record(id.as_str(), err.to_string()))?;
        Ok(file.into_record(format))
    }
}
