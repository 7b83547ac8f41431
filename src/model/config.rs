use anyhow::{Context, Result};
use semver::Version;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub package: PackageConfig,
    pub provisioning: ProvisioningConfig,
    pub documentation: DocumentationConfig,
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageConfig {
    pub name: String,
    pub version: String,
    pub link_below: Version,
    pub bundle_replacement_from: Version,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvisioningConfig {
    pub cli: String,
    pub global_package: String,
    pub framework: String,
    pub deployment: String,
    pub uninstall_cli_on_remove: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentationConfig {
    pub auto_boilerplate: String,
    pub heading: String,
    /// Markdown file appended instead of the bundled section.
    #[serde(default)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    pub package_manager: PackageManagerKind,
    pub pod: String,
    pub react_native: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageManagerKind {
    Yarn,
    Npm,
}

const DEFAULTS: &str = include_str!("../../config/default.toml");

impl AppConfig {
    /// Load configuration with layering: defaults → user config → explicit file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut layers = Vec::new();

        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "codepush-install") {
            let config_path = proj_dirs.config_dir().join("config.toml");
            if config_path.exists() {
                layers.push(config_path);
            }
        }
        if let Some(path) = explicit {
            layers.push(path.to_path_buf());
        }

        let mut merged: toml::Table = toml::from_str(DEFAULTS).context("bundled default config")?;
        for path in &layers {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let layer: toml::Table =
                toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
            merge_tables(&mut merged, layer);
            tracing::debug!("applied config layer {}", path.display());
        }

        let config: AppConfig = toml::Value::Table(merged)
            .try_into()
            .context("invalid configuration")?;
        Ok(config)
    }

    #[cfg(test)]
    pub fn defaults() -> Self {
        toml::from_str(DEFAULTS).expect("bundled default config is valid")
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
