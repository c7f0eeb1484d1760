use std::{
    fs,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tile_engine_edit::{EditConfig, TileCatalog, TileType, DEFAULT_FILL_LIMIT, DEFAULT_RECT_LIMIT};
use tile_link::{RouterConfig, ServiceConfig, TransportConfig, DEFAULT_MAX_LINE_LEN, DEFAULT_PORT};

const OPTIONS_FILE: &str = "options.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub bind_address: IpAddr,
    pub port: u16,
    /// Ticks per second of the edit loop
    pub tick_rate: u32,
    pub cursor_speed: f32,
    pub invert_cursor_x: bool,
    pub accept_timeout_secs: Option<u64>,
    pub read_timeout_ms: u64,
    /// Inbound lines longer than this many bytes are dropped
    pub max_line_len: usize,
    pub max_commands_per_tick: Option<usize>,
    pub fill_limit: usize,
    pub rect_limit: usize,
    /// Replaces the built-in palette when set
    pub tiles: Option<Vec<TileType>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            tick_rate: 60,
            cursor_speed: 5.0,
            invert_cursor_x: true,
            accept_timeout_secs: None,
            read_timeout_ms: 250,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            max_commands_per_tick: None,
            fill_limit: DEFAULT_FILL_LIMIT,
            rect_limit: DEFAULT_RECT_LIMIT,
            tiles: None,
        }
    }
}

pub fn get_config_dir() -> Option<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "GitHub", "tile_host")?;
    let dir = proj_dirs.config_dir().to_path_buf();
    if !dir.exists() {
        fs::create_dir_all(&dir).ok()?;
    }
    Some(dir)
}

impl Options {
    pub fn default_path() -> Option<PathBuf> {
        get_config_dir().map(|dir| dir.join(OPTIONS_FILE))
    }

    /// Options from the config dir. Missing or broken files give the defaults.
    pub fn load_options() -> Self {
        let Some(options_file) = Self::default_path() else {
            log::error!("Can't resolve configuration directory");
            return Self::default();
        };
        if !options_file.exists() {
            return Self::default();
        }
        match Self::load(&options_file) {
            Ok(options) => options,
            Err(err) => {
                log::error!("Error reading options file: {err:#}");
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let txt = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&txt).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn store(&self, path: &Path) -> anyhow::Result<()> {
        let text = toml::to_string(self)?;
        fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn catalog(&self) -> TileCatalog {
        match &self.tiles {
            Some(tiles) if !tiles.is_empty() => TileCatalog::new(tiles.clone()),
            Some(_) => {
                log::warn!("empty tile list in options, using the built-in palette");
                TileCatalog::default()
            }
            None => TileCatalog::default(),
        }
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            transport: TransportConfig {
                bind_addr: SocketAddr::new(self.bind_address, self.port),
                accept_timeout: self.accept_timeout_secs.map(Duration::from_secs),
                read_timeout: Some(Duration::from_millis(self.read_timeout_ms.max(1))),
                max_line_len: self.max_line_len.max(1),
                ..TransportConfig::default()
            },
            router: RouterConfig {
                cursor_speed: self.cursor_speed,
                invert_cursor_x: self.invert_cursor_x,
                max_commands_per_tick: self.max_commands_per_tick,
            },
            edit: EditConfig {
                fill_limit: self.fill_limit,
                rect_limit: self.rect_limit,
            },
        }
    }
}
