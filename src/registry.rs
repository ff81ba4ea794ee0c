//! Guest registry loading and lookup
//!
//! The tags file is TOML with a `[guests]` table mapping each badge
//! tag to the audio file announcing that guest:
//!
//! ```toml
//! [guests]
//! "1234ABCD" = "smith_family.mp3"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::events::Tag;

/// Errors that can occur while loading the registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read tags file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tags file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("tags file has no [guests] section")]
    MissingGuests,
}

/// On-disk layout of the tags file
#[derive(Debug, Deserialize)]
struct TagsFile {
    guests: Option<HashMap<String, String>>,
}

/// Immutable mapping from tag to audio filename
#[derive(Debug, Clone, Default)]
pub struct GuestRegistry {
    guests: HashMap<String, String>,
}

impl GuestRegistry {
    /// Load the registry from a tags file
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_owned(),
            source,
        })?;
        let registry = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), guests = registry.len(), "guest registry loaded");
        Ok(registry)
    }

    /// Parse a registry from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, RegistryError> {
        let file: TagsFile = toml::from_str(text)?;
        let guests = file.guests.ok_or(RegistryError::MissingGuests)?;
        Ok(Self { guests })
    }

    /// Audio filename for a tag, if the guest is known
    pub fn lookup(&self, tag: &Tag) -> Option<&str> {
        self.guests.get(tag.as_str()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.guests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guests.is_empty()
    }
}

impl FromIterator<(String, String)> for GuestRegistry {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            guests: iter.into_iter().collect(),
        }
    }
}
