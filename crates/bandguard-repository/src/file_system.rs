//! File system based configuration store
//!
//! Layout: `<root>/<tenant_id>/<rule_id>.yaml` (also `.yml` and `.json`).
//! Writes always produce `.yaml`.

use async_trait::async_trait;
use bandguard_core::TenantRuleConfig;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::traits::{ConfigBatches, ConfigStore};
use crate::{RepositoryError, RepositoryResult};

const EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// File system based configuration store
pub struct FileSystemConfigStore {
    /// Root path of the store
    root_path: PathBuf,
}

impl FileSystemConfigStore {
    /// Create a new file system store
    ///
    /// # Arguments
    /// * `root_path` - Existing directory holding one sub-directory per tenant
    ///
    /// # Example
    /// ```no_run
    /// use bandguard_repository::FileSystemConfigStore;
    ///
    /// let store = FileSystemConfigStore::new("configs").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(root_path: P) -> RepositoryResult<Self> {
        let path = root_path.as_ref();

        if !path.is_dir() {
            return Err(RepositoryError::InvalidPath {
                path: path.to_path_buf(),
            });
        }

        let abs_path = path
            .absolutize()
            .map_err(|e| RepositoryError::Other(format!("Failed to absolutize path: {}", e)))?
            .to_path_buf();

        Ok(Self {
            root_path: abs_path,
        })
    }

    /// Root directory of the store
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Reject identifiers that would escape the tenant directory
    fn check_segment(&self, segment: &str) -> RepositoryResult<()> {
        let invalid = segment.is_empty()
            || segment == "."
            || segment == ".."
            || segment.contains(['/', '\\', '\0']);
        if invalid {
            return Err(RepositoryError::InvalidPath {
                path: self.root_path.join(segment),
            });
        }
        Ok(())
    }

    fn tenant_dir(&self, tenant_id: &str) -> RepositoryResult<PathBuf> {
        self.check_segment(tenant_id)?;
        Ok(self.root_path.join(tenant_id))
    }

    /// Find the first existing document for a tenant and rule
    async fn find_document(&self, tenant_id: &str, rule_id: &str) -> RepositoryResult<Option<PathBuf>> {
        let dir = self.tenant_dir(tenant_id)?;
        self.check_segment(rule_id)?;

        for extension in EXTENSIONS {
            let path = dir.join(format!("{}.{}", rule_id, extension));
            if fs::try_exists(&path).await? {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    async fn read_document(path: &Path) -> RepositoryResult<TenantRuleConfig> {
        let content = fs::read_to_string(path).await?;
        let config = if path.extension().and_then(|s| s.to_str()) == Some("json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(config)
    }
}

#[async_trait]
impl ConfigStore for FileSystemConfigStore {
    async fn query_tenant_config(
        &self,
        tenant_id: &str,
        rule_id: &str,
    ) -> RepositoryResult<ConfigBatches> {
        let Some(path) = self.find_document(tenant_id, rule_id).await? else {
            return Ok(vec![]);
        };

        let config = Self::read_document(&path).await?;
        if config.tenant_id != tenant_id || config.rule.id != rule_id {
            tracing::warn!(
                path = %path.display(),
                tenant_id,
                rule_id,
                "Configuration document does not match its location, ignoring"
            );
            return Ok(vec![]);
        }

        Ok(vec![vec![config]])
    }

    async fn upsert_tenant_config(&self, config: &TenantRuleConfig) -> RepositoryResult<()> {
        let dir = self.tenant_dir(&config.tenant_id)?;
        self.check_segment(&config.rule.id)?;
        fs::create_dir_all(&dir).await?;

        let content = serde_yaml::to_string(config)?;
        let path = dir.join(format!("{}.yaml", config.rule.id));
        fs::write(&path, content).await?;

        // Remove copies in the other formats
        for extension in &EXTENSIONS[1..] {
            let stale = dir.join(format!("{}.{}", config.rule.id, extension));
            if fs::try_exists(&stale).await? {
                fs::remove_file(&stale).await?;
            }
        }

        tracing::debug!(path = %path.display(), "Stored tenant configuration");
        Ok(())
    }
}
