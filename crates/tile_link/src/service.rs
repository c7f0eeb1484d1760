//! The long-lived editing service.
//!
//! Built once at startup and torn down once at shutdown. It owns the socket
//! bridge, the workspace with every actor, the router and the optional
//! character the device is steering. All of it is driven from the thread that
//! calls [`EditorService::tick`].

use std::net::SocketAddr;

use tile_engine_edit::{ActorId, EditConfig, TileCatalog, Workspace};

use crate::{
    Command, CommandRouter, Controllable, Mode, Origin, Result, RouteTarget, RouterConfig, RouterStats, StatusMessage,
    Transport, TransportConfig,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ServiceConfig {
    pub transport: TransportConfig,
    pub router: RouterConfig,
    pub edit: EditConfig,
}

pub struct EditorService {
    transport: Transport,
    workspace: Workspace,
    router: CommandRouter,
    character: Option<Box<dyn Controllable>>,
}

impl EditorService {
    /// Build the workspace, register the connection's remote actor and start listening.
    pub fn start(config: ServiceConfig, catalog: TileCatalog) -> Result<Self> {
        let mut workspace = Workspace::new(catalog, config.edit);
        let remote = workspace.register_remote()?;
        let transport = Transport::start(&config.transport)?;
        Ok(Self {
            transport,
            workspace,
            router: CommandRouter::new(config.router, remote),
            character: None,
        })
    }

    /// Handle queued remote lines, then let every drawing actor sample its cursor.
    pub fn tick(&mut self) -> usize {
        let mut target = RouteTarget {
            workspace: &mut self.workspace,
            outbound: self.transport.outbound(),
            character: &mut self.character,
        };
        let handled = self.router.drain(self.transport.inbound(), &mut target);
        self.workspace.tick();
        handled
    }

    /// Route a command from the local UI to actor 0.
    pub fn dispatch_local(&mut self, command: Command) {
        let mut target = RouteTarget {
            workspace: &mut self.workspace,
            outbound: self.transport.outbound(),
            character: &mut self.character,
        };
        self.router.dispatch(command, Origin::Local, &mut target);
    }

    /// Register another remote actor, e.g. for a second editing device.
    pub fn register_remote(&mut self) -> Result<ActorId> {
        Ok(self.workspace.register_remote()?)
    }

    /// Tell the device which screen to show.
    pub fn announce_mode(&self, mode: Mode) {
        self.transport.send(StatusMessage::Mode(mode).to_string());
    }

    /// Hand a character to the device. A previously controlled one is released.
    pub fn set_controlled(&mut self, character: Box<dyn Controllable>) {
        if let Some(mut previous) = self.character.replace(character) {
            previous.release();
        }
    }

    pub fn release_controlled(&mut self) -> bool {
        match self.character.take() {
            Some(mut character) => {
                character.release();
                true
            }
            None => false,
        }
    }

    pub fn is_controlling(&self) -> bool {
        self.character.is_some()
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.transport.local_addr()
    }

    pub fn remote_actor(&self) -> ActorId {
        self.router.remote_actor()
    }

    pub fn router_stats(&self) -> RouterStats {
        self.router.stats()
    }

    /// Nothing more can arrive: the connection is over and its lines are handled.
    pub fn is_idle(&self) -> bool {
        self.transport.is_finished() && self.transport.inbound().is_empty()
    }

    pub fn shutdown(&mut self) {
        self.release_controlled();
        self.transport.shutdown();
    }
}
