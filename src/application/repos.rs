//! Repository traits describing the host data adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::channel::{ChannelId, ChannelRecord};
use crate::domain::types::FeedFormat;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("invalid record `{id}`: {message}")]
    InvalidRecord { id: String, message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn invalid_record(id: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::InvalidRecord {
            id: id.into(),
            message: message.to_string(),
        }
    }
}

/// Source of channel records, one per (channel, format).
#[async_trait]
pub trait ChannelsRepo: Send + Sync {
    /// `Ok(None)` when the channel does not exist or has no data for `format`.
    async fn find_channel(
        &self,
        id: &ChannelId,
        format: FeedFormat,
    ) -> Result<Option<ChannelRecord>, RepoError>;
}
