//! Operator commands read from stdin

use anyhow::{anyhow, Result};
use rover_dashboard::{Action, UiEvent};

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Event(UiEvent),
    Quit,
}

/// Parse one line; empty lines yield `None`
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(anyhow!("too many arguments for {}", name));
    }

    let command = match name {
        "quit" | "exit" => ConsoleCommand::Quit,
        "key" => {
            let key = arg.ok_or_else(|| anyhow!("key needs a key name"))?;
            ConsoleCommand::Event(UiEvent::KeyDown(key.to_string()))
        }
        "fullscreen-changed" => {
            let state = arg.ok_or_else(|| anyhow!("fullscreen-changed needs on or off"))?;
            let fullscreen = match state {
                "on" | "true" => true,
                "off" | "false" => false,
                other => return Err(anyhow!("expected on or off, got {}", other)),
            };
            ConsoleCommand::Event(UiEvent::FullscreenChanged(fullscreen))
        }
        "mode" => ConsoleCommand::Event(UiEvent::Action(Action::parse("select-mode", arg)?)),
        "nav" => ConsoleCommand::Event(UiEvent::Action(Action::parse("navigate", arg)?)),
        other => ConsoleCommand::Event(UiEvent::Action(Action::parse(other, arg)?)),
    };

    Ok(Some(command))
}
