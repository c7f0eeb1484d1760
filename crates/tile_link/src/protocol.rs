//! Line protocol spoken with the remote editing device.
//!
//! Inbound lines are either one of a fixed set of tokens or a comma separated
//! float vector that moves the addressed actor's cursor. Outbound lines are
//! short status messages, one per line.

use std::fmt;

use tile_engine_edit::{ActorId, TileCategory, Tool, MAX_REMOTE_ACTORS};

use crate::{LinkError, Result};

/// Commands forwarded to the controlled character
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CharacterCommand {
    /// Reserved, the capture itself happens in gameplay code
    Capture,
    Release,
    Move { x: f32, y: f32 },
    Action,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Start a session with the active tool
    ActionStart,
    /// End whatever session is running
    ActionEnd,
    /// Select a tool and start a session with it
    Begin(Tool),
    /// End a session, but only if it runs with this tool
    End(Tool),
    SelectTool(Tool),
    SelectTile { category: TileCategory, index: u8 },
    SelectActor(ActorId),
    Undo,
    Redo,
    Clear,
    Character(CharacterCommand),
    /// Cursor movement hint, at least two components
    Vector(Vec<f32>),
}

impl Command {
    pub fn parse(line: &str) -> Result<Command> {
        if let Some(command) = Self::parse_token(line) {
            return Ok(command);
        }
        if let Some((head, arg)) = line.split_once(' ') {
            if let Some(command) = Self::parse_selector(head, arg) {
                return Ok(command);
            }
        }
        Self::parse_vector(line)
    }

    fn parse_token(line: &str) -> Option<Command> {
        use CharacterCommand::*;

        let command = match line {
            "action_start" => Command::ActionStart,
            "action_end" => Command::ActionEnd,
            "fill" => Command::Begin(Tool::Fill),
            "undo" => Command::Undo,
            "redo" => Command::Redo,
            "clear" => Command::Clear,

            "capture" => Command::Character(Capture),
            "leave_ufo" | "leave_slime" | "leave_spike" => Command::Character(Release),
            "left" => Command::Character(Move { x: -0.5, y: 0.0 }),
            "left2" | "slime_left" => Command::Character(Move { x: -1.0, y: 0.0 }),
            "right" => Command::Character(Move { x: 0.0, y: 0.5 }),
            "right2" => Command::Character(Move { x: 0.0, y: 1.0 }),
            "slime_right" => Command::Character(Move { x: 0.0, y: -1.0 }),
            "stop" => Command::Character(Move { x: 0.0, y: 0.0 }),
            "fire" | "shake" | "spike" => Command::Character(Action),

            _ => {
                if let Some(name) = line.strip_suffix("_end") {
                    return Tool::from_name(name).filter(|tool| *tool != Tool::Fill).map(Command::End);
                }
                return Tool::from_name(line).map(Command::Begin);
            }
        };
        Some(command)
    }

    fn parse_selector(head: &str, arg: &str) -> Option<Command> {
        if head == "tool" {
            return Tool::from_name(arg).map(Command::SelectTool);
        }
        let index: u8 = arg.parse().ok()?;
        if head == "actor" {
            if index == 0 || index as usize > MAX_REMOTE_ACTORS {
                return None;
            }
            return Some(Command::SelectActor(ActorId(index)));
        }
        let category = TileCategory::from_prefix(head)?;
        Some(Command::SelectTile { category, index })
    }

    fn parse_vector(line: &str) -> Result<Command> {
        let malformed = || LinkError::MalformedCommand(line.to_string());
        let mut values = Vec::new();
        for part in line.split(',') {
            let value: f32 = part.trim().parse().map_err(|_| malformed())?;
            if !value.is_finite() {
                return Err(malformed());
            }
            values.push(value);
        }
        if values.len() < 2 {
            return Err(malformed());
        }
        Ok(Command::Vector(values))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Editor,
    Runtime,
}

/// Status lines sent back to the device
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusMessage {
    Mode(Mode),
    History { undo: usize, redo: usize },
    NothingToUndo,
    NothingToRedo,
    AreaTools(bool),
    FillAborted,
    RectAborted,
    Refused(Tool),
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Mode(Mode::Editor) => write!(f, "editor"),
            StatusMessage::Mode(Mode::Runtime) => write!(f, "runtime"),
            StatusMessage::History { undo, redo } => write!(f, "history {undo} {redo}"),
            StatusMessage::NothingToUndo => write!(f, "nothing_to_undo"),
            StatusMessage::NothingToRedo => write!(f, "nothing_to_redo"),
            StatusMessage::AreaTools(true) => write!(f, "area_tools on"),
            StatusMessage::AreaTools(false) => write!(f, "area_tools off"),
            StatusMessage::FillAborted => write!(f, "fill_aborted"),
            StatusMessage::RectAborted => write!(f, "rect_aborted"),
            StatusMessage::Refused(tool) => write!(f, "refused {tool}"),
        }
    }
}
