use serde::Deserialize;
use thiserror::Error;

use crate::toolbox::{CommandLine, ProcessRunner, ToolboxError};

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Toolbox(#[from] ToolboxError),
    #[error("unexpected output from `{command}`: {source}")]
    Json {
        command: String,
        source: serde_json::Error,
    },
    #[error("app {app} has no {deployment:?} deployment")]
    MissingDeployment { app: String, deployment: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Ios, Platform::Android];

    /// Platform argument of `code-push app add`.
    pub fn cli_name(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::Android => "Android",
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Ios => "IOS",
            Self::Android => "ANDROID",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CloudApp {
    pub name: String,
    #[serde(default, alias = "os")]
    pub platform: Option<String>,
}

impl CloudApp {
    /// Name contains the platform (case-insensitive), or the service reports it.
    pub fn targets(&self, platform: Platform) -> bool {
        self.name.to_lowercase().contains(platform.cli_name())
            || self
                .platform
                .as_deref()
                .is_some_and(|os| os.eq_ignore_ascii_case(platform.cli_name()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Deployment {
    pub name: String,
    pub key: String,
}

/// What to do about one platform's cloud app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Existing(String),
    Choose(Vec<String>),
    Create(String),
}

pub fn resolve(apps: &[CloudApp], platform: Platform, project_name: &str) -> Resolution {
    let mut names: Vec<String> = apps
        .iter()
        .filter(|app| app.targets(platform))
        .map(|app| app.name.clone())
        .collect();

    match names.len() {
        0 => Resolution::Create(default_app_name(project_name, platform)),
        1 => Resolution::Existing(names.remove(0)),
        _ => Resolution::Choose(names),
    }
}

pub fn default_app_name(project_name: &str, platform: Platform) -> String {
    format!("{}_{}", project_name.to_uppercase(), platform.suffix())
}

pub fn deployment_key<'a>(
    deployments: &'a [Deployment],
    app: &str,
    deployment: &str,
) -> Result<&'a str, ProvisionError> {
    deployments
        .iter()
        .find(|d| d.name == deployment)
        .map(|d| d.key.as_str())
        .ok_or_else(|| ProvisionError::MissingDeployment {
            app: app.to_string(),
            deployment: deployment.to_string(),
        })
}

/// The `code-push` command-line tool.
pub struct CodePushCli<'a> {
    runner: &'a dyn ProcessRunner,
    program: &'a str,
}

impl<'a> CodePushCli<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, program: &'a str) -> Self {
        Self { runner, program }
    }

    fn command(&self) -> CommandLine {
        CommandLine::new(self.program)
    }

    /// Interactive; an existing session makes a failure here harmless.
    pub fn login(&self) -> Result<(), ToolboxError> {
        self.runner.spawn(&self.command().arg("login"))
    }

    pub fn list_apps(&self) -> Result<Vec<CloudApp>, ProvisionError> {
        self.json(self.command().args(["app", "list", "--format", "json"]))
    }

    pub fn add_app(
        &self,
        name: &str,
        platform: Platform,
        framework: &str,
    ) -> Result<(), ProvisionError> {
        let command = self
            .command()
            .args(["app", "add", name, platform.cli_name(), framework]);
        self.runner.run(&command)?;
        Ok(())
    }

    pub fn list_deployments(&self, app: &str) -> Result<Vec<Deployment>, ProvisionError> {
        self.json(self.command().args([
            "deployment",
            "ls",
            app,
            "--displayKeys",
            "--format",
            "json",
        ]))
    }

    fn json<T: for<'de> Deserialize<'de>>(&self, command: CommandLine) -> Result<T, ProvisionError> {
        let stdout = self.runner.run(&command)?;
        serde_json::from_str(&stdout).map_err(|source| ProvisionError::Json {
            command: command.to_string(),
            source,
        })
    }
}
