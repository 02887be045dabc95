use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::model::{Operator, Role};
use crate::storage::DEFAULT_DEBOUNCE;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LedgerConfig {
    pub database: Option<String>,
    /// Name stamped on audit entries when `--operator` is not given
    pub operator: Option<String>,
    pub role: Option<String>,
    pub debounce_ms: Option<u64>,
}

impl LedgerConfig {
    pub fn debounce(&self) -> Duration {
        self.debounce_ms.map(Duration::from_millis).unwrap_or(DEFAULT_DEBOUNCE)
    }

    /// Acting operator from the config, with flag overrides applied
    pub fn operator(&self, name: Option<&str>, role: Option<&str>) -> anyhow::Result<Operator> {
        let name = name.or(self.operator.as_deref()).unwrap_or("Admin");
        let role: Role = match role.or(self.role.as_deref()) {
            Some(role) => role.parse()?,
            None => Role::Admin,
        };
        Ok(Operator::new(name.to_lowercase().replace(' ', "-"), name, role))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("studioledger.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".studioledger").join("ledger.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<LedgerConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: LedgerConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &LedgerConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
