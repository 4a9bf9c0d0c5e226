use crate::error::ConfigurationError;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A location in the storage namespace, of the form `scheme://bucket/key`.
///
/// The key may be empty (`s3://bucket` or `s3://bucket/`), the bucket may not.
/// A key ending in `/` addresses a prefix rather than a single object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageUri {
    scheme: String,
    bucket: String,
    key: String,
}

impl StorageUri {
    pub fn parse(uri: &str) -> Result<Self, ConfigurationError> {
        let invalid = |reason: &str| ConfigurationError::InvalidUri {
            uri: uri.to_string(),
            reason: reason.to_string(),
        };

        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| invalid("expected scheme://bucket/key"))?;

        if scheme.is_empty()
            || !scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        {
            return Err(invalid("invalid scheme"));
        }

        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(invalid("missing bucket"));
        }

        Ok(Self {
            scheme: scheme.to_string(),
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    /// Parses a location a run may overwrite. The whole bucket is never a valid target.
    pub fn parse_output(uri: &str) -> Result<Self, ConfigurationError> {
        let parsed = Self::parse(uri)?;
        if parsed.is_bucket_root() {
            return Err(ConfigurationError::InvalidUri {
                uri: uri.to_string(),
                reason: "output must name a key below the bucket root".to_string(),
            });
        }
        Ok(parsed)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// True if the key addresses a prefix (empty, or ends with `/`).
    pub fn is_prefix(&self) -> bool {
        self.key.is_empty() || self.key.ends_with('/')
    }

    /// True if the key is empty, i.e. the location is the whole bucket.
    pub fn is_bucket_root(&self) -> bool {
        self.key.trim_matches('/').is_empty()
    }

    /// Returns a location in the same bucket with the given key.
    pub fn bucket_uri(&self, key: &str) -> StorageUri {
        Self {
            scheme: self.scheme.clone(),
            bucket: self.bucket.clone(),
            key: key.trim_start_matches('/').to_string(),
        }
    }

    /// Appends a relative key to this location.
    pub fn join(&self, child: &str) -> StorageUri {
        let key = match self.key.as_str() {
            "" => child.to_string(),
            k if k.ends_with('/') => format!("{k}{child}"),
            k => format!("{k}/{child}"),
        };
        self.bucket_uri(&key)
    }
}

impl fmt::Display for StorageUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.bucket, self.key)
    }
}

impl FromStr for StorageUri {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StorageUri {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StorageUri> for String {
    fn from(value: StorageUri) -> Self {
        value.to_string()
    }
}
