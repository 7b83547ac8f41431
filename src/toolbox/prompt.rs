use std::io::{self, IsTerminal, Write};

use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Stylize;
use crossterm::terminal::{self, ClearType};
use crossterm::{execute, queue};

use super::ToolboxError;

pub trait Prompter {
    /// Ask the user to pick one of `choices`; returns the chosen index.
    fn select(&self, message: &str, choices: &[String], default: usize)
    -> Result<usize, ToolboxError>;
}

/// Arrow-key selector on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn select(
        &self,
        message: &str,
        choices: &[String],
        default: usize,
    ) -> Result<usize, ToolboxError> {
        let last = choices
            .len()
            .checked_sub(1)
            .ok_or_else(|| ToolboxError::NoChoices(message.to_string()))?;
        let mut selected = default.min(last);

        if !io::stdin().is_terminal() {
            tracing::info!("stdin is not a terminal, answering {message:?} with default");
            return Ok(selected);
        }

        let mut stdout = io::stdout();
        writeln!(stdout, "{} {}", "?".green().bold(), message.bold())?;

        terminal::enable_raw_mode()?;
        let picked = pick(&mut stdout, choices, &mut selected);
        terminal::disable_raw_mode()?;

        // collapse the list into a single answer line
        execute!(
            stdout,
            cursor::MoveToPreviousLine(u16::try_from(choices.len()).unwrap_or(u16::MAX)),
            terminal::Clear(ClearType::FromCursorDown)
        )?;

        match picked? {
            Some(index) => {
                writeln!(stdout, "  {}", choices[index].as_str().cyan())?;
                tracing::info!("prompt {message:?} answered {:?}", choices[index]);
                Ok(index)
            }
            None => {
                writeln!(stdout, "  {}", "cancelled".red())?;
                Err(ToolboxError::PromptCancelled)
            }
        }
    }
}

fn pick(
    stdout: &mut io::Stdout,
    choices: &[String],
    selected: &mut usize,
) -> Result<Option<usize>, ToolboxError> {
    let rows = u16::try_from(choices.len()).unwrap_or(u16::MAX);
    loop {
        render(stdout, choices, *selected)?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                *selected = selected.checked_sub(1).unwrap_or(choices.len() - 1);
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                *selected = (*selected + 1) % choices.len();
            }
            KeyCode::Enter => return Ok(Some(*selected)),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(None);
            }
            _ => {}
        }

        queue!(stdout, cursor::MoveToPreviousLine(rows))?;
    }
}

fn render(stdout: &mut io::Stdout, choices: &[String], selected: usize) -> io::Result<()> {
    for (index, choice) in choices.iter().enumerate() {
        queue!(stdout, terminal::Clear(ClearType::CurrentLine))?;
        if index == selected {
            write!(stdout, "{} {}\r\n", "❯".cyan(), choice.as_str().cyan().bold())?;
        } else {
            write!(stdout, "  {choice}\r\n")?;
        }
    }
    stdout.flush()
}
