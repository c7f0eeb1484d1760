//! Tile reference data and placed tile instances.

use serde::{Deserialize, Serialize};

use crate::{EngineError, Result};

/// Index of a [`TileType`] inside a [`TileCatalog`]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileKind(pub u16);

impl std::fmt::Display for TileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Palette group a tile type is listed under
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileCategory {
    Basic,
    #[serde(rename = "bg")]
    Background,
    Tech,
}

impl TileCategory {
    pub const ALL: [TileCategory; 3] = [TileCategory::Basic, TileCategory::Background, TileCategory::Tech];

    /// Prefix used by palette selectors on the wire ("basic 0", "bg 2", ...)
    pub fn prefix(&self) -> &'static str {
        match self {
            TileCategory::Basic => "basic",
            TileCategory::Background => "bg",
            TileCategory::Tech => "tech",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.prefix() == prefix)
    }
}

fn default_size() -> u8 {
    1
}

/// Immutable description of something that can be placed on the grid
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileType {
    pub name: String,
    pub category: TileCategory,
    pub index: u8,
    #[serde(default = "default_size")]
    pub width: u8,
    #[serde(default = "default_size")]
    pub height: u8,
    /// Key the renderer uses to pick a visual
    #[serde(default)]
    pub prefab: String,
}

impl TileType {
    pub fn new(name: impl Into<String>, category: TileCategory, index: u8) -> Self {
        let name = name.into();
        Self {
            prefab: name.clone(),
            name,
            category,
            index,
            width: 1,
            height: 1,
        }
    }

    pub fn with_size(mut self, width: u8, height: u8) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Fill and rectangle tools only work with 1x1 tiles.
    pub fn is_unit_size(&self) -> bool {
        self.width == 1 && self.height == 1
    }
}

/// The set of tile types available to every actor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCatalog {
    types: Vec<TileType>,
}

impl Default for TileCatalog {
    fn default() -> Self {
        let mut types = Vec::new();
        for category in TileCategory::ALL {
            for index in 0..4 {
                types.push(TileType::new(format!("{}_{index}", category.prefix()), category, index));
            }
        }
        // the large machine block keeps area tools honest
        if let Some(big) = types.last_mut() {
            big.width = 2;
            big.height = 2;
        }
        Self { types }
    }
}

impl TileCatalog {
    pub fn new(types: Vec<TileType>) -> Self {
        Self { types }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, kind: TileKind) -> Result<&TileType> {
        self.types.get(kind.0 as usize).ok_or(EngineError::UnknownTileKind { kind })
    }

    /// Look up a palette entry by its wire selector.
    pub fn find(&self, category: TileCategory, index: u8) -> Option<TileKind> {
        self.types
            .iter()
            .position(|t| t.category == category && t.index == index)
            .map(|i| TileKind(i as u16))
    }

    /// First unit-sized entry, used as every actor's starting tile.
    pub fn default_kind(&self) -> TileKind {
        self.types.iter().position(TileType::is_unit_size).map(|i| TileKind(i as u16)).unwrap_or_default()
    }

    /// Unknown kinds report `false`, which greys the tools out.
    pub fn can_use_area_tools(&self, kind: TileKind) -> bool {
        self.get(kind).map(TileType::is_unit_size).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileKind, &TileType)> {
        self.types.iter().enumerate().map(|(i, t)| (TileKind(i as u16), t))
    }
}

/// Identity of one placed tile instance
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u64);

/// A tile sitting on the grid
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
}

impl Tile {
    pub fn new(id: TileId, kind: TileKind) -> Self {
        Self { id, kind }
    }
}
