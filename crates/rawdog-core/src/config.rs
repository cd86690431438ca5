//! Configuration for naming, model population and output placement.
//!
//! Load order: `.rawdog/config.toml` → environment variables → defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level rawdog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawdogConfig {
    pub naming: NamingConfig,
    pub model: ModelConfig,
    pub output: OutputConfig,
}

/// Package and import names that appear in generated code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Package holding the domain types. Services are qualified against it
    /// and the prefix is stripped again after rendering.
    pub domain_package: String,
    /// Package of the repository implementation under test.
    pub repo_package: String,
    /// Import path of the repository package.
    pub repo_import: String,
    /// Import path of the domain package.
    pub domain_import: String,
    /// Identifier of the shared database handle in generated tests.
    pub shared_db: String,
}

/// Model population policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Report omitted fields and unresolved types as errors instead of warnings.
    pub strict: bool,
    /// Use column names without the `<table>_` prefix in generated statements.
    pub strip_table_prefix: bool,
}

/// Output file naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub queries_suffix: String,
    pub tests_suffix: String,
    pub extension: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            domain_package: "domain".to_string(),
            repo_package: "mysqlrepo".to_string(),
            repo_import: "adapter/mysqlrepo".to_string(),
            domain_import: "domain".to_string(),
            shared_db: "sharedDB".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            queries_suffix: "_generatedQueries".to_string(),
            tests_suffix: "_generated_test".to_string(),
            extension: "go".to_string(),
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

/// Whether `name` can be used as an identifier in generated source.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl RawdogConfig {
    /// Load config from `.rawdog/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".rawdog").join("config.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("failed to parse {}", config_path.display()))?
        } else {
            Self::default()
        };

        env_override("RAWDOG_DOMAIN_PACKAGE", &mut config.naming.domain_package);
        env_override("RAWDOG_REPO_PACKAGE", &mut config.naming.repo_package);
        env_override("RAWDOG_STRICT", &mut config.model.strict);
        env_override(
            "RAWDOG_STRIP_TABLE_PREFIX",
            &mut config.model.strip_table_prefix,
        );

        config.validate()?;
        Ok(config)
    }

    /// Reject package names that cannot appear in generated source.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("naming.domain_package", &self.naming.domain_package),
            ("naming.repo_package", &self.naming.repo_package),
            ("naming.shared_db", &self.naming.shared_db),
        ] {
            if !is_identifier(value) {
                anyhow::bail!("{key} must be an identifier, got {value:?}");
            }
        }
        if self.output.extension.is_empty() {
            anyhow::bail!("output.extension must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RawdogConfig::default();
        assert_eq!(config.naming.domain_package, "domain");
        assert_eq!(config.naming.repo_package, "mysqlrepo");
        assert_eq!(config.naming.repo_import, "adapter/mysqlrepo");
        assert_eq!(config.naming.shared_db, "sharedDB");
        assert!(!config.model.strict);
        assert!(!config.model.strip_table_prefix);
        assert_eq!(config.output.queries_suffix, "_generatedQueries");
        assert_eq!(config.output.tests_suffix, "_generated_test");
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[naming]
domain_package = "core"

[model]
strip_table_prefix = true
"#;
        let config: RawdogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.naming.domain_package, "core");
        assert!(config.model.strip_table_prefix);
        // Defaults for unspecified fields
        assert_eq!(config.naming.repo_package, "mysqlrepo");
        assert!(!config.model.strict);
        assert_eq!(config.output.extension, "go");
    }

    #[test]
    fn test_config_load_nonexistent() {
        let config = RawdogConfig::load(Path::new("/nonexistent/path")).unwrap();
        assert_eq!(config.naming.domain_package, "domain");
    }

    #[test]
    fn test_load_reads_project_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(".rawdog");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("config.toml"),
            r#"
[naming]
repo_package = "pgrepo"
repo_import = "adapter/pgrepo"
"#,
        )
        .unwrap();

        let config = RawdogConfig::load(tmp.path()).unwrap();
        assert_eq!(config.naming.repo_package, "pgrepo");
        assert_eq!(config.naming.repo_import, "adapter/pgrepo");
    }

    #[test]
    fn test_load_rejects_invalid_package() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(".rawdog");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("config.toml"),
            "[naming]\ndomain_package = \"my-domain\"\n",
        )
        .unwrap();

        let err = RawdogConfig::load(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("naming.domain_package"));
    }
}
