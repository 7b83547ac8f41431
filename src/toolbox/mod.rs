//! Capabilities the installer needs from the outside world.
//!
//! Every side effect goes through one of these seams so the orchestration
//! in [`crate::app`] can run against a fixture project with fake processes
//! and scripted answers.

pub mod patching;
pub mod print;
pub mod packages;
pub mod prompt;
pub mod system;
#[cfg(test)]
pub mod testing;

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::rc::Rc;

use thiserror::Error;

use crate::model::config::AppConfig;
use crate::model::patch::PatchError;

pub use packages::{NodePackages, PackageManager};
pub use patching::{DiskFs, DiskPatcher, FilePatcher, FileSystem};
pub use print::Printer;
pub use prompt::{Prompter, TerminalPrompter};
pub use system::{CommandLine, ProcessRunner, SystemRunner};

#[derive(Debug, Error)]
pub enum ToolboxError {
    #[error("failed to start `{command}`: {source}")]
    Spawn { command: String, source: io::Error },
    #[error("`{command}` exited with {status}: {detail}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        detail: String,
    },
    #[error("{} does not exist", .0.display())]
    MissingFile(PathBuf),
    #[error("cannot access {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("cannot patch {}: {source}", path.display())]
    Patch { path: PathBuf, source: PatchError },
    #[error("prompt cancelled")]
    PromptCancelled,
    #[error("prompt {0:?} has no choices")]
    NoChoices(String),
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

/// The capability set handed to the orchestrator.
pub struct Toolbox {
    pub packages: Box<dyn PackageManager>,
    pub system: Rc<dyn ProcessRunner>,
    pub prompt: Box<dyn Prompter>,
    pub patching: Box<dyn FilePatcher>,
    pub filesystem: Box<dyn FileSystem>,
    pub print: Printer,
}

impl Toolbox {
    /// Real processes, the real terminal and the real disk.
    pub fn system(config: &AppConfig) -> Self {
        let runner: Rc<dyn ProcessRunner> = Rc::new(SystemRunner);
        Self {
            packages: Box::new(NodePackages::new(&config.tools, Rc::clone(&runner))),
            system: runner,
            prompt: Box::new(TerminalPrompter),
            patching: Box::new(DiskPatcher),
            filesystem: Box::new(DiskFs),
            print: Printer::stdout(),
        }
    }
}
