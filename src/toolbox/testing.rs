//! Test doubles for the process and prompt seams.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::io::{self, Write};
use std::rc::Rc;

use super::{
    CommandLine, DiskFs, DiskPatcher, NodePackages, Printer, ProcessRunner, Prompter, Toolbox,
    ToolboxError,
};
use crate::model::config::AppConfig;

/// Records every invocation; `run` answers from canned stdout keyed by the full command line.
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<CommandLine>>,
    responses: RefCell<HashMap<String, String>>,
    failing: RefCell<HashSet<String>>,
}

impl RecordingRunner {
    pub fn respond(&self, command: &str, stdout: &str) {
        self.responses
            .borrow_mut()
            .insert(command.to_string(), stdout.to_string());
    }

    pub fn fail(&self, command: &str) {
        self.failing.borrow_mut().insert(command.to_string());
    }

    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.borrow().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(ToString::to_string).collect()
    }

    fn record(&self, command: &CommandLine) -> Result<String, ToolboxError> {
        self.calls.borrow_mut().push(command.clone());
        let line = command.to_string();
        if self.failing.borrow().contains(&line) {
            return Err(ToolboxError::Spawn {
                command: line,
                source: io::Error::other("scripted failure"),
            });
        }
        Ok(self.responses.borrow().get(&line).cloned().unwrap_or_default())
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, command: &CommandLine) -> Result<String, ToolboxError> {
        self.record(command)
    }

    fn spawn(&self, command: &CommandLine) -> Result<(), ToolboxError> {
        self.record(command).map(drop)
    }
}

/// Answers prompts from a queue and remembers what was asked.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<usize>>,
    asked: Rc<RefCell<Vec<String>>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = usize>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: Rc::default(),
        }
    }

    pub fn asked(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.asked)
    }
}

impl Prompter for ScriptedPrompter {
    fn select(
        &self,
        message: &str,
        choices: &[String],
        default: usize,
    ) -> Result<usize, ToolboxError> {
        self.asked.borrow_mut().push(message.to_string());
        if choices.is_empty() {
            return Err(ToolboxError::NoChoices(message.to_string()));
        }
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(default))
    }
}

/// Console output captured in memory; clones share one buffer.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A toolbox on the real disk with a recording runner and uncolored output into `output`.
pub fn toolbox(
    config: &AppConfig,
    runner: Rc<RecordingRunner>,
    prompter: ScriptedPrompter,
    output: SharedBuffer,
) -> Toolbox {
    let runner: Rc<dyn ProcessRunner> = runner;
    Toolbox {
        packages: Box::new(NodePackages::new(&config.tools, Rc::clone(&runner))),
        system: runner,
        prompt: Box::new(prompter),
        patching: Box::new(DiskPatcher),
        filesystem: Box::new(DiskFs),
        print: Printer::new(Box::new(output), false),
    }
}
