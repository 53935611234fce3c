//! Connection configuration via `docbridge.toml`
//!
//! The embedding environment supplies every cluster connection once, at
//! registry initialization. Each `[[connection]]` table becomes one
//! [`ConnectionConfig`]. Configuration lives in memory only; nothing is ever
//! written back.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use docbridge_core::{Error, ErrorCode, Result, StoreFailure};

/// Bucket used when a connection names no default bucket.
pub const DEFAULT_BUCKET: &str = "default";

/// Config file name looked up by embedders.
pub const CONFIG_FILE_NAME: &str = "docbridge.toml";

/// One configured cluster connection and its bucket credentials.
///
/// `Debug` never prints passwords.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Connection identifier, unique within a registry
    pub id: String,
    /// Seed node addresses (`host` or `host:port`)
    pub seeds: Vec<String>,
    /// Bucket used when a caller names none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_bucket: Option<String>,
    /// Password of the default bucket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_bucket_password: Option<String>,
    /// Passwords of other buckets, by bucket name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bucket_passwords: BTreeMap<String, String>,
}

impl ConnectionConfig {
    /// Create a connection with no credentials
    pub fn new<I, S>(id: impl Into<String>, seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConnectionConfig {
            id: id.into(),
            seeds: seeds.into_iter().map(Into::into).collect(),
            default_bucket: None,
            default_bucket_password: None,
            bucket_passwords: BTreeMap::new(),
        }
    }

    /// Set the default bucket and its optional password
    pub fn with_default_bucket(
        mut self,
        bucket: impl Into<String>,
        password: Option<&str>,
    ) -> Self {
        self.default_bucket = Some(bucket.into());
        self.default_bucket_password = password.map(str::to_string);
        self
    }

    /// Add the password of a non-default bucket
    pub fn with_bucket_password(
        mut self,
        bucket: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.bucket_passwords.insert(bucket.into(), password.into());
        self
    }

    /// Name of the bucket used when callers name none
    pub fn default_bucket_name(&self) -> &str {
        self.default_bucket.as_deref().unwrap_or(DEFAULT_BUCKET)
    }

    /// Configured password for `bucket`; the default bucket when `None`.
    ///
    /// `None` means the bucket is opened without authentication.
    pub fn bucket_password(&self, bucket: Option<&str>) -> Option<&str> {
        let bucket = bucket.unwrap_or_else(|| self.default_bucket_name());
        if bucket == self.default_bucket_name() {
            if let Some(password) = self.default_bucket_password.as_deref() {
                return Some(password);
            }
        }
        self.bucket_passwords.get(bucket).map(String::as_str)
    }

    /// Check the entry is usable.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank id, no seeds or a blank seed.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::invalid_argument("Connection id must not be empty"));
        }
        if self.seeds.is_empty() {
            return Err(Error::invalid_argument(format!(
                "Connection '{}' has no seed addresses",
                self.id
            )));
        }
        if self.seeds.iter().any(|s| s.trim().is_empty()) {
            return Err(Error::invalid_argument(format!(
                "Connection '{}' has an empty seed address",
                self.id
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("id", &self.id)
            .field("seeds", &self.seeds)
            .field("default_bucket", &self.default_bucket)
            .field(
                "default_bucket_password",
                &self.default_bucket_password.as_ref().map(|_| "<redacted>"),
            )
            .field(
                "bucket_passwords",
                &self.bucket_passwords.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Registry configuration loaded from `docbridge.toml`.
///
/// # Example
///
/// ```toml
/// [[connection]]
/// id = "c1"
/// seeds = ["db1.example.com:8091", "db2.example.com:8091"]
/// default_bucket = "default"
/// default_bucket_password = "pw"
///
/// [connection.bucket_passwords]
/// beer-sample = "secret"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Configured connections
    #[serde(default, rename = "connection")]
    pub connections: Vec<ConnectionConfig>,
}

impl RegistryConfig {
    /// Returns a commented example config.
    pub fn default_toml() -> &'static str {
        r#"# docbridge connection configuration
#
# One [[connection]] table per cluster. The id is what callers pass to
# every operation; seeds are tried by the store client when the connection
# is first used.
#
# [[connection]]
# id = "local"
# seeds = ["localhost:8091"]
# default_bucket = "default"          # optional, "default" when absent
# default_bucket_password = "secret"  # optional, open bucket when absent
#
# [connection.bucket_passwords]      # optional, other buckets
# beer-sample = "another-secret"
"#
    }

    /// Parse config from TOML text and validate it.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the text does not parse or an entry is invalid.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RegistryConfig = toml::from_str(content).map_err(|e| {
            Error::invalid_argument(format!("Failed to parse connection config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate config from a file path.
    ///
    /// # Errors
    ///
    /// `Unclassified` (with an `io` cause) if the file cannot be read;
    /// otherwise the code [`from_toml_str`](Self::from_toml_str) reports,
    /// with the path prepended to the message.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::with_cause(
                ErrorCode::Unclassified,
                format!("Failed to read config file '{}': {}", path.display(), e),
                StoreFailure::from(e),
            )
        })?;
        Self::from_toml_str(&content).map_err(|e| {
            let message = format!("{}: {}", path.display(), e.message());
            match e.cause() {
                Some(cause) => Error::with_cause(e.code(), message, cause.clone()),
                None => Error::new(e.code(), message),
            }
        })
    }

    /// Check every entry, and that ids are unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for connection in &self.connections {
            connection.validate()?;
            if !seen.insert(connection.id.as_str()) {
                return Err(Error::duplicate_connection(&connection.id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[[connection]]
id = "c1"
seeds = ["host:8091"]
default_bucket = "default"
default_bucket_password = "pw"

[connection.bucket_passwords]
beer-sample = "secret"

[[connection]]
id = "c2"
seeds = ["a:8091", "b:8091"]
"#;

    #[test]
    fn parse_sample_config() {
        let config = RegistryConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.connections.len(), 2);

        let c1 = &config.connections[0];
        assert_eq!(c1.id, "c1");
        assert_eq!(c1.seeds, vec!["host:8091"]);
        assert_eq!(c1.bucket_password(None), Some("pw"));
        assert_eq!(c1.bucket_password(Some("beer-sample")), Some("secret"));
        assert_eq!(c1.bucket_password(Some("other")), None);

        let c2 = &config.connections[1];
        assert_eq!(c2.default_bucket_name(), DEFAULT_BUCKET);
        assert_eq!(c2.bucket_password(None), None);
    }

    #[test]
    fn default_toml_parses_to_empty() {
        let config = RegistryConfig::from_toml_str(RegistryConfig::default_toml()).unwrap();
        assert!(config.connections.is_empty());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let text = r#"
[[connection]]
id = "c1"
seeds = ["a"]

[[connection]]
id = "c1"
seeds = ["b"]
"#;
        let err = RegistryConfig::from_toml_str(text).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateConnection);
    }

    #[test]
    fn from_file_keeps_error_code() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[[connection]]\nid = \"c1\"\nseeds = [\"a\"]\n\n\
             [[connection]]\nid = \"c1\"\nseeds = [\"b\"]\n",
        )
        .unwrap();

        let err = RegistryConfig::from_file(&path).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateConnection);
        assert!(err.message().starts_with(&path.display().to_string()));
        assert!(err.message().contains("c1"));
    }

    #[test]
    fn missing_seeds_rejected() {
        let err = RegistryConfig::from_toml_str("[[connection]]\nid = \"x\"\nseeds = []\n")
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = RegistryConfig::from_toml_str("[[connection]\nid=").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn from_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, SAMPLE).unwrap();

        let config = RegistryConfig::from_file(&path).unwrap();
        assert_eq!(config.connections[1].seeds.len(), 2);
    }

    #[test]
    fn from_missing_file_is_unclassified() {
        let dir = TempDir::new().unwrap();
        let err = RegistryConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unclassified);
        assert!(err.cause().is_some());
    }

    #[test]
    fn debug_redacts_passwords() {
        let config = ConnectionConfig::new("c1", ["h:1"])
            .with_default_bucket("default", Some("hunter2"))
            .with_bucket_password("travel", "s3cret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("travel"));
    }

    #[test]
    fn default_bucket_password_wins_over_map_entry() {
        let config = ConnectionConfig::new("c1", ["h"])
            .with_default_bucket("main", Some("a"))
            .with_bucket_password("main", "b");
        assert_eq!(config.bucket_password(Some("main")), Some("a"));
    }
}
