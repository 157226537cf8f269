use crate::error::{PreflightError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_project_name")]
    pub name: String,
}

fn default_project_name() -> String {
    "clinical-trials".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
        }
    }
}

// ---------------------------------------------------------------------------
// McpConfig
// ---------------------------------------------------------------------------

/// Where the MCP entry points live, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    #[serde(default = "default_server_entry")]
    pub server_entry: String,
    #[serde(default = "default_chat_entry")]
    pub chat_entry: String,
}

fn default_server_entry() -> String {
    "src/mcp/clinical_trial_mcp_server_fixed.py".to_string()
}

fn default_chat_entry() -> String {
    "src/mcp/clinical_trial_chat_mcp.py".to_string()
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            server_entry: default_server_entry(),
            chat_entry: default_chat_entry(),
        }
    }
}

// ---------------------------------------------------------------------------
// RuntimeConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Executable that runs the MCP entry points; looked up on PATH.
    #[serde(default = "default_runtime_command")]
    pub command: String,
}

fn default_runtime_command() -> String {
    "python3".to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command: default_runtime_command(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub mcp: McpConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            project: ProjectConfig::default(),
            mcp: McpConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Config {
    /// Defaults, with the project named after the root directory.
    pub fn for_root(root: &Path) -> Self {
        let mut config = Self::default();
        if let Some(name) = root.file_name().and_then(|n| n.to_str()) {
            config.project.name = name.to_string();
        }
        config
    }

    /// Load `.preflight/config.yaml`, falling back to defaults when the file
    /// is absent or empty.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::for_root(root));
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::for_root(root));
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        atomic_write(&path, data.as_bytes())
    }

    /// Write the default config for `root`. Refuses to overwrite.
    pub fn init(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if path.exists() {
            return Err(PreflightError::ConfigExists(path.display().to_string()));
        }
        let config = Self::for_root(root);
        config.save(root)?;
        Ok(config)
    }

    pub fn server_entry_path(&self, root: &Path) -> PathBuf {
        root.join(&self.mcp.server_entry)
    }

    pub fn chat_entry_path(&self, root: &Path) -> PathBuf {
        root.join(&self.mcp.chat_entry)
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.runtime.command.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "runtime.command is empty".to_string(),
            });
        }

        for (key, entry) in [
            ("mcp.server_entry", &self.mcp.server_entry),
            ("mcp.chat_entry", &self.mcp.chat_entry),
        ] {
            if entry.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("{key} is empty; the check will look at the project root"),
                });
            } else if Path::new(entry).is_absolute() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "{key} '{entry}' is absolute; expected a path relative to the project root"
                    ),
                });
            }
        }

        if self.version != 1 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("unknown config version {}", self.version),
            });
        }

        warnings
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults_named_after_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("trial-site");
        std::fs::create_dir_all(&root).unwrap();

        let config = Config::load(&root).unwrap();
        assert_eq!(config.project.name, "trial-site");
        assert_eq!(config.runtime.command, "python3");
        assert_eq!(
            config.server_entry_path(&root),
            root.join("src/mcp/clinical_trial_mcp_server_fixed.py")
        );
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(paths::preflight_dir(dir.path())).unwrap();
        std::fs::write(
            paths::config_path(dir.path()),
            "runtime:\n  command: python3.11\n",
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.runtime.command, "python3.11");
        assert_eq!(config.project.name, "clinical-trials");
        assert_eq!(config.mcp.chat_entry, "src/mcp/clinical_trial_chat_mcp.py");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(paths::preflight_dir(dir.path())).unwrap();
        std::fs::write(paths::config_path(dir.path()), "runtime: [unclosed").unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(PreflightError::Yaml(_))
        ));
    }

    #[test]
    fn init_writes_once() {
        let dir = TempDir::new().unwrap();
        let config = Config::init(dir.path()).unwrap();
        assert!(paths::config_path(dir.path()).exists());

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.project.name, config.project.name);

        assert!(matches!(
            Config::init(dir.path()),
            Err(PreflightError::ConfigExists(_))
        ));
    }

    #[test]
    fn validate_flags_empty_runtime_as_error() {
        let mut config = Config::default();
        config.runtime.command = "  ".to_string();
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);
    }

    #[test]
    fn validate_warns_on_absolute_entries() {
        let mut config = Config::default();
        config.mcp.server_entry = "/opt/mcp/server.py".to_string();
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
        assert!(warnings[0].message.contains("mcp.server_entry"));
    }
}
