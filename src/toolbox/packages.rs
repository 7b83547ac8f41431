use std::path::Path;
use std::rc::Rc;

use super::{CommandLine, ProcessRunner, ToolboxError};
use crate::model::config::{PackageManagerKind, ToolsConfig};

/// JavaScript and CocoaPods dependency management for the app.
pub trait PackageManager {
    fn add_module(
        &self,
        root: &Path,
        module: &str,
        version: &str,
        link: bool,
    ) -> Result<(), ToolboxError>;
    fn remove_module(&self, root: &Path, module: &str, unlink: bool) -> Result<(), ToolboxError>;
    fn add_global(&self, package: &str) -> Result<(), ToolboxError>;
    fn remove_global(&self, package: &str) -> Result<(), ToolboxError>;
    fn install_pods(&self, ios_dir: &Path) -> Result<(), ToolboxError>;
}

/// yarn or npm, plus the React Native CLI for linking and `pod` for iOS.
pub struct NodePackages {
    kind: PackageManagerKind,
    pod: String,
    react_native: Vec<String>,
    runner: Rc<dyn ProcessRunner>,
}

impl NodePackages {
    pub fn new(tools: &ToolsConfig, runner: Rc<dyn ProcessRunner>) -> Self {
        Self {
            kind: tools.package_manager,
            pod: tools.pod.clone(),
            react_native: tools.react_native.clone(),
            runner,
        }
    }

    fn react_native(&self) -> CommandLine {
        CommandLine::from_parts(&self.react_native)
            .unwrap_or_else(|| CommandLine::new("react-native"))
    }

    fn manager(&self) -> CommandLine {
        match self.kind {
            PackageManagerKind::Yarn => CommandLine::new("yarn"),
            PackageManagerKind::Npm => CommandLine::new("npm"),
        }
    }
}

impl PackageManager for NodePackages {
    fn add_module(
        &self,
        root: &Path,
        module: &str,
        version: &str,
        link: bool,
    ) -> Result<(), ToolboxError> {
        let spec = format!("{module}@{version}");
        let install = match self.kind {
            PackageManagerKind::Yarn => self.manager().args(["add", spec.as_str()]),
            PackageManagerKind::Npm => self.manager().args(["install", "--save", spec.as_str()]),
        };
        self.runner.spawn(&install.current_dir(root))?;

        if link {
            let link = self.react_native().args(["link", module]).current_dir(root);
            self.runner.spawn(&link)?;
        }
        Ok(())
    }

    fn remove_module(&self, root: &Path, module: &str, unlink: bool) -> Result<(), ToolboxError> {
        if unlink {
            let unlink = self.react_native().args(["unlink", module]).current_dir(root);
            self.runner.spawn(&unlink)?;
        }

        let uninstall = match self.kind {
            PackageManagerKind::Yarn => self.manager().args(["remove", module]),
            PackageManagerKind::Npm => self.manager().args(["uninstall", "--save", module]),
        };
        self.runner.spawn(&uninstall.current_dir(root))
    }

    fn add_global(&self, package: &str) -> Result<(), ToolboxError> {
        let command = match self.kind {
            PackageManagerKind::Yarn => self.manager().args(["global", "add", package]),
            PackageManagerKind::Npm => self.manager().args(["install", "-g", package]),
        };
        self.runner.spawn(&command)
    }

    fn remove_global(&self, package: &str) -> Result<(), ToolboxError> {
        let command = match self.kind {
            PackageManagerKind::Yarn => self.manager().args(["global", "remove", package]),
            PackageManagerKind::Npm => self.manager().args(["uninstall", "-g", package]),
        };
        self.runner.spawn(&command)
    }

    fn install_pods(&self, ios_dir: &Path) -> Result<(), ToolboxError> {
        let command = CommandLine::new(self.pod.clone())
            .arg("install")
            .current_dir(ios_dir);
        self.runner.spawn(&command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::AppConfig;
    use crate::toolbox::testing::RecordingRunner;

    fn packages(kind: PackageManagerKind) -> (NodePackages, Rc<RecordingRunner>) {
        let mut tools = AppConfig::defaults().tools;
        tools.package_manager = kind;
        let runner = Rc::new(RecordingRunner::default());
        let as_dyn: Rc<dyn ProcessRunner> = runner.clone();
        (NodePackages::new(&tools, as_dyn), runner)
    }

    #[test]
    fn yarn_add_with_link() {
        let (packages, runner) = packages(PackageManagerKind::Yarn);
        packages
            .add_module(Path::new("/app"), "react-native-code-push", "~5.7.0", true)
            .unwrap();

        assert_eq!(
            runner.lines(),
            vec![
                "yarn add react-native-code-push@~5.7.0",
                "npx react-native link react-native-code-push",
            ]
        );
        assert!(runner.calls().iter().all(|c| c.cwd.as_deref() == Some(Path::new("/app"))));
    }

    #[test]
    fn npm_remove_unlinks_first() {
        let (packages, runner) = packages(PackageManagerKind::Npm);
        packages
            .remove_module(Path::new("/app"), "react-native-code-push", true)
            .unwrap();

        assert_eq!(
            runner.lines(),
            vec![
                "npx react-native unlink react-native-code-push",
                "npm uninstall --save react-native-code-push",
            ]
        );
    }

    #[test]
    fn globals_and_pods() {
        let (packages, runner) = packages(PackageManagerKind::Yarn);
        packages.add_global("code-push-cli").unwrap();
        packages.install_pods(Path::new("/app/ios")).unwrap();

        assert_eq!(
            runner.lines(),
            vec!["yarn global add code-push-cli", "pod install"]
        );
        assert_eq!(
            runner.calls()[1].cwd.as_deref(),
            Some(Path::new("/app/ios"))
        );
    }
}
