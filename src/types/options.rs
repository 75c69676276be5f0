//! Builder-style options for the cash entry trigger.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::event::normalize_media_type;
use crate::constants::{
    ENV_CONTENT_TYPE, ENV_PENDING_COLLECTION, EVENT_CONTENT_TYPE, PENDING_ENTRIES_COLLECTION,
};
use crate::error::{Result, TriggerError};

fn default_pending_collection() -> String {
    PENDING_ENTRIES_COLLECTION.to_string()
}

fn default_content_type() -> String {
    EVENT_CONTENT_TYPE.to_string()
}

/// Tunable options for a trigger instance. Every field has a default, so a
/// config file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerOptions {
    /// Collection receiving one document per newly detected cash entry.
    #[serde(default = "default_pending_collection")]
    pub pending_collection: String,
    /// Media type events must declare.
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

impl Default for TriggerOptions {
    fn default() -> Self {
        Self {
            pending_collection: default_pending_collection(),
            content_type: default_content_type(),
        }
    }
}

impl TriggerOptions {
    /// Start a fluent builder for `TriggerOptions`.
    #[must_use]
    pub fn builder() -> TriggerOptionsBuilder {
        TriggerOptionsBuilder::default()
    }

    /// Load options from a JSON file, then validate them.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs_err::read_to_string(path.as_ref())?;
        let options: Self = serde_json::from_str(&raw).map_err(|err| TriggerError::Config {
            reason: format!("{}: {err}", path.as_ref().display()),
        })?;
        options.validate()?;
        Ok(options)
    }

    /// Apply `CASHWATCH_*` environment overrides on top of these options.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        if let Some(collection) = lookup(ENV_PENDING_COLLECTION) {
            self.pending_collection = collection;
        }
        if let Some(content_type) = lookup(ENV_CONTENT_TYPE) {
            self.content_type = content_type;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let collection = self.pending_collection.trim();
        if collection.is_empty() || collection.contains('/') {
            return Err(TriggerError::Config {
                reason: format!(
                    "pending_collection must be a non-empty collection id, got {:?}",
                    self.pending_collection
                ),
            });
        }
        if !normalize_media_type(&self.content_type).contains('/') {
            return Err(TriggerError::Config {
                reason: format!(
                    "content_type must be a media type, got {:?}",
                    self.content_type
                ),
            });
        }
        Ok(())
    }

    /// Expected media type in normalized form.
    #[must_use]
    pub fn expected_media_type(&self) -> String {
        normalize_media_type(&self.content_type)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TriggerOptionsBuilder {
    inner: TriggerOptions,
}

impl TriggerOptionsBuilder {
    pub fn pending_collection<S: Into<String>>(mut self, collection: S) -> Self {
        self.inner.pending_collection = collection.into();
        self
    }

    pub fn content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.inner.content_type = content_type.into();
        self
    }

    #[must_use]
    pub fn build(self) -> TriggerOptions {
        self.inner
    }
}
