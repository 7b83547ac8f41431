use semver::Version;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{} does not depend on react-native", .0.display())]
    MissingReactNative(PathBuf),
    #[error("unrecognised react-native version {0:?}")]
    Version(String),
}

#[derive(Debug, Deserialize)]
struct PackageJson {
    name: String,
    #[serde(default)]
    dependencies: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct IgniteJson {
    #[serde(default)]
    boilerplate: Option<String>,
}

/// React Native version as declared in `package.json`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NativeVersion(pub Version);

impl NativeVersion {
    /// Parse a dependency spec such as `0.61.5`, `^0.59.0`, `~0.55` or `>=0.60`.
    pub fn parse(raw: &str) -> Result<Self, ProjectError> {
        let trimmed = raw
            .trim()
            .trim_start_matches(['^', '~', '>', '<', '=', 'v', ' ']);
        // drop pre-release/build tails and pad missing components
        let core = trimmed
            .split(['-', '+', ' '])
            .next()
            .unwrap_or_default();
        let mut parts: Vec<&str> = core.split('.').collect();
        if parts.is_empty() || parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(ProjectError::Version(raw.to_string()));
        }
        while parts.len() < 3 {
            parts.push("0");
        }

        Version::parse(&parts.join("."))
            .map(Self)
            .map_err(|_| ProjectError::Version(raw.to_string()))
    }
}

impl fmt::Display for NativeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The React Native app being patched.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub name: String,
    pub react_native: NativeVersion,
    pub boilerplate: Option<String>,
}

impl Project {
    /// Read `package.json` and the optional `ignite/ignite.json` under `root`.
    pub fn load(root: &Path) -> Result<Self, ProjectError> {
        let manifest_path = root.join("package.json");
        let manifest: PackageJson = read_json(&manifest_path)?;

        let raw_version = manifest
            .dependencies
            .get("react-native")
            .ok_or_else(|| ProjectError::MissingReactNative(manifest_path.clone()))?;
        let react_native = NativeVersion::parse(raw_version)?;

        let ignite_path = root.join("ignite").join("ignite.json");
        let ignite: IgniteJson = if ignite_path.exists() {
            read_json(&ignite_path)?
        } else {
            tracing::debug!("no {} found", ignite_path.display());
            IgniteJson::default()
        };

        Ok(Self {
            root: root.to_path_buf(),
            name: manifest.name,
            react_native,
            boilerplate: ignite.boilerplate,
        })
    }

    pub fn ios_dir(&self) -> PathBuf {
        self.root.join("ios")
    }

    pub fn app_delegate(&self) -> PathBuf {
        self.ios_dir().join(&self.name).join("AppDelegate.m")
    }

    pub fn info_plist(&self) -> PathBuf {
        self.ios_dir().join(&self.name).join("Info.plist")
    }

    pub fn main_application(&self) -> PathBuf {
        self.root
            .join("android/app/src/main/java/com")
            .join(self.name.to_lowercase())
            .join("MainApplication.java")
    }

    pub fn strings_xml(&self) -> PathBuf {
        self.root.join("android/app/src/main/res/values/strings.xml")
    }

    pub fn readme(&self) -> PathBuf {
        self.root.join("README.md")
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ProjectError> {
    let raw = fs::read_to_string(path).map_err(|source| ProjectError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ProjectError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_ranges_are_normalised() {
        let cases = [
            ("0.61.5", Version::new(0, 61, 5)),
            ("^0.59.0", Version::new(0, 59, 0)),
            ("~0.55", Version::new(0, 55, 0)),
            (">=0.60", Version::new(0, 60, 0)),
            ("0.72.0-rc.1", Version::new(0, 72, 0)),
        ];
        for (raw, expected) in cases {
            assert_eq!(NativeVersion::parse(raw).unwrap().0, expected, "{raw}");
        }
    }

    #[test]
    fn garbage_version_is_rejected() {
        for raw in ["", "latest", "1..2", "github:facebook/react-native"] {
            assert!(NativeVersion::parse(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn load_reads_manifest_and_boilerplate() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name":"Sample","dependencies":{"react-native":"0.61.0"}}"#,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("ignite")).unwrap();
        fs::write(
            dir.path().join("ignite/ignite.json"),
            r#"{"boilerplate":"osedea-react-native-boilerplate"}"#,
        )
        .unwrap();

        let project = Project::load(dir.path()).unwrap();
        assert_eq!(project.name, "Sample");
        assert_eq!(project.react_native.0, Version::new(0, 61, 0));
        assert_eq!(
            project.boilerplate.as_deref(),
            Some("osedea-react-native-boilerplate")
        );
        assert!(project.main_application().ends_with("com/sample/MainApplication.java"));
        assert!(project.info_plist().ends_with("ios/Sample/Info.plist"));
    }

    #[test]
    fn missing_react_native_dependency_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name":"Sample"}"#).unwrap();

        assert!(matches!(
            Project::load(dir.path()),
            Err(ProjectError::MissingReactNative(_))
        ));
    }
}
