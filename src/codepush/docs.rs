use std::fs;

use anyhow::{Context, Result};

use crate::model::config::DocumentationConfig;
use crate::model::project::Project;

const BUNDLED: &str = include_str!("../../assets/DOCUMENTATION.md");

pub const PROMPT: &str = "Do you want us to add a section to your README?";
pub const CHOICES: [&str; 2] = ["NO", "YES"];

/// Projects from the known boilerplate get the section without asking.
pub fn is_automatic(project: &Project, config: &DocumentationConfig) -> bool {
    project.boilerplate.as_deref() == Some(config.auto_boilerplate.as_str())
}

/// The README already has a line equal to the section heading.
pub fn already_documented(readme: &str, config: &DocumentationConfig) -> bool {
    readme
        .lines()
        .any(|line| line.trim() == config.heading.trim())
}

pub fn section(config: &DocumentationConfig) -> Result<String> {
    match &config.source {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading documentation section {}", path.display())),
        None => Ok(BUNDLED.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::AppConfig;
    use crate::model::project::NativeVersion;
    use std::path::PathBuf;

    fn project(boilerplate: Option<&str>) -> Project {
        Project {
            root: PathBuf::from("/app"),
            name: "Sample".into(),
            react_native: NativeVersion::parse("0.61.0").unwrap(),
            boilerplate: boilerplate.map(str::to_string),
        }
    }

    #[test]
    fn sentinel_boilerplate_is_automatic() {
        let config = AppConfig::defaults().documentation;
        assert!(is_automatic(
            &project(Some("osedea-react-native-boilerplate")),
            &config
        ));
        assert!(!is_automatic(&project(Some("ignite-bowser")), &config));
        assert!(!is_automatic(&project(None), &config));
    }

    #[test]
    fn bundled_section_carries_the_heading() {
        let config = AppConfig::defaults().documentation;
        let text = section(&config).unwrap();
        assert!(already_documented(&text, &config));
        assert!(!already_documented("# Sample\n", &config));
    }

    #[test]
    fn custom_source_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.md");
        fs::write(&path, "## Updates\n").unwrap();

        let mut config = AppConfig::defaults().documentation;
        config.source = Some(path);
        assert_eq!(section(&config).unwrap(), "## Updates\n");
    }
}
