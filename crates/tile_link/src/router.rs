//! Turns queued lines into workspace calls.

use crossbeam_channel::{Receiver, Sender};
use tile_engine_edit::{ActionOutcome, ActorId, EngineError, HistoryOutcome, Result, Workspace};

use crate::{CharacterCommand, Command, Controllable, StatusMessage};

/// Where a command came from. Local commands always address actor 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    Local,
    Remote,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RouterConfig {
    /// World units per unit of a movement vector
    pub cursor_speed: f32,
    /// The device reports x mirrored
    pub invert_cursor_x: bool,
    /// `None` drains the whole queue every tick
    pub max_commands_per_tick: Option<usize>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            cursor_speed: 5.0,
            invert_cursor_x: true,
            max_commands_per_tick: None,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RouterStats {
    pub dispatched: u64,
    pub malformed: u64,
    pub invalid_actor: u64,
    pub ignored: u64,
}

/// Everything a command may touch
pub struct RouteTarget<'a> {
    pub workspace: &'a mut Workspace,
    pub outbound: &'a Sender<String>,
    pub character: &'a mut Option<Box<dyn Controllable>>,
}

pub struct CommandRouter {
    config: RouterConfig,
    remote_actor: ActorId,
    stats: RouterStats,
}

impl CommandRouter {
    pub fn new(config: RouterConfig, remote_actor: ActorId) -> Self {
        Self {
            config,
            remote_actor,
            stats: RouterStats::default(),
        }
    }

    /// Actor that remote commands are addressed to
    pub fn remote_actor(&self) -> ActorId {
        self.remote_actor
    }

    pub fn stats(&self) -> RouterStats {
        self.stats
    }

    /// Handle the lines queued so far, in arrival order. Returns how many were taken.
    pub fn drain(&mut self, inbound: &Receiver<String>, target: &mut RouteTarget<'_>) -> usize {
        let limit = self.config.max_commands_per_tick.unwrap_or(usize::MAX);
        let mut handled = 0;
        for line in inbound.try_iter().take(limit) {
            self.handle_line(&line, Origin::Remote, target);
            handled += 1;
        }
        handled
    }

    pub fn handle_line(&mut self, line: &str, origin: Origin, target: &mut RouteTarget<'_>) {
        match Command::parse(line) {
            Ok(command) => self.dispatch(command, origin, target),
            Err(err) => {
                self.stats.malformed += 1;
                log::debug!("{err}");
            }
        }
    }

    pub fn dispatch(&mut self, command: Command, origin: Origin, target: &mut RouteTarget<'_>) {
        let actor = match origin {
            Origin::Local => ActorId::LOCAL,
            Origin::Remote => self.remote_actor,
        };

        if let Command::SelectActor(id) = command {
            if origin == Origin::Local {
                self.stats.ignored += 1;
                return;
            }
            if !target.workspace.is_registered(id) {
                self.stats.invalid_actor += 1;
                log::warn!("connection readdressed to unregistered actor {id}, keeping actor {actor}");
                return;
            }
            self.remote_actor = id;
            self.stats.dispatched += 1;
            return;
        }

        if !target.workspace.is_registered(actor) {
            self.stats.invalid_actor += 1;
            log::warn!("dropping {command:?}: actor {actor} is not registered");
            return;
        }
        self.stats.dispatched += 1;

        let ws = &mut *target.workspace;
        let reply = match command {
            Command::ActionStart => session_reply(ws.begin_active_session(actor)),
            Command::ActionEnd => session_reply(ws.end_session(actor, None)),
            Command::Begin(tool) => session_reply(ws.begin_session(actor, tool)),
            Command::End(tool) => session_reply(ws.end_session(actor, Some(tool))),
            Command::Clear => session_reply(ws.clear_all(actor)),
            Command::Undo => history_reply(actor, ws.undo(actor)),
            Command::Redo => history_reply(actor, ws.redo(actor)),
            Command::SelectTool(tool) => {
                log_failure(ws.set_active_tool(actor, tool));
                Reply::Nothing
            }
            Command::SelectTile { category, index } => match ws.catalog().find(category, index) {
                Some(kind) => match ws.set_active_tile(actor, kind) {
                    Ok(area_tools) => Reply::Status(StatusMessage::AreaTools(area_tools)),
                    Err(err) => {
                        log::warn!("actor {actor}: {err}");
                        Reply::Nothing
                    }
                },
                None => {
                    self.stats.malformed += 1;
                    log::debug!("no tile '{} {index}' in the catalog", category.prefix());
                    Reply::Nothing
                }
            },
            Command::Character(character) => {
                self.steer(character, &mut *target.character);
                Reply::Nothing
            }
            Command::Vector(values) => {
                if let [x, y, ..] = values.as_slice() {
                    let sign = if self.config.invert_cursor_x { -1.0 } else { 1.0 };
                    let speed = self.config.cursor_speed;
                    log_failure(ws.move_cursor(actor, x * speed * sign, y * speed));
                }
                Reply::Nothing
            }
            Command::SelectActor(_) => Reply::Nothing,
        };

        let status = match reply {
            Reply::Nothing => return,
            Reply::Status(status) => status,
            Reply::History => match target.workspace.history_len(actor) {
                Ok((undo, redo)) => StatusMessage::History { undo, redo },
                Err(_) => return,
            },
        };
        if origin == Origin::Remote && target.outbound.send(status.to_string()).is_err() {
            log::debug!("outbound queue closed, dropped '{status}'");
        }
    }

    fn steer(&mut self, command: CharacterCommand, character: &mut Option<Box<dyn Controllable>>) {
        let Some(controlled) = character.as_mut() else {
            self.stats.ignored += 1;
            return;
        };
        match command {
            CharacterCommand::Capture => self.stats.ignored += 1,
            CharacterCommand::Move { x, y } => controlled.move_by(x, y),
            CharacterCommand::Action => controlled.action(),
            CharacterCommand::Release => {
                controlled.release();
                *character = None;
            }
        }
    }
}

/// What to tell the device after a command
enum Reply {
    Nothing,
    Status(StatusMessage),
    /// Send the actor's current stack sizes
    History,
}

fn session_reply(outcome: Result<ActionOutcome>) -> Reply {
    match outcome {
        Ok(ActionOutcome::Committed { .. }) => Reply::History,
        Ok(ActionOutcome::Refused(tool)) => Reply::Status(StatusMessage::Refused(tool)),
        Ok(_) => Reply::Nothing,
        Err(err @ EngineError::FillLimitExceeded { .. }) => {
            log::warn!("fill aborted: {err}");
            Reply::Status(StatusMessage::FillAborted)
        }
        Err(err @ EngineError::RectangleLimitExceeded { .. }) => {
            log::warn!("rectangle aborted: {err}");
            Reply::Status(StatusMessage::RectAborted)
        }
        Err(err) => {
            log::warn!("{err}");
            Reply::Nothing
        }
    }
}

fn history_reply(actor: ActorId, outcome: Result<HistoryOutcome>) -> Reply {
    match outcome {
        Ok(HistoryOutcome::Applied { conflicts, .. }) => {
            if conflicts > 0 {
                log::debug!("actor {actor}: left {conflicts} cells changed by others alone");
            }
            Reply::History
        }
        Ok(HistoryOutcome::NothingToUndo) => Reply::Status(StatusMessage::NothingToUndo),
        Ok(HistoryOutcome::NothingToRedo) => Reply::Status(StatusMessage::NothingToRedo),
        Err(err) => {
            log::warn!("{err}");
            Reply::Nothing
        }
    }
}

fn log_failure(result: Result<()>) {
    if let Err(err) = result {
        log::warn!("{err}");
    }
}
