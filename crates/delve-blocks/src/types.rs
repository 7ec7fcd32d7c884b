use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every material a cell can hold. Solidity and transparency are fixed per type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum BlockType {
    #[default]
    Air = 0,
    Grass = 1,
    Stone = 2,
    Water = 3,
    Snow = 4,
    Wood = 5,
    Leaves = 6,
    Dirt = 7,
    Sand = 8,
    Coal = 9,
    Iron = 10,
    Gold = 11,
    Diamond = 12,
    Lava = 13,
}

impl BlockType {
    pub const ALL: [BlockType; 14] = [
        BlockType::Air,
        BlockType::Grass,
        BlockType::Stone,
        BlockType::Water,
        BlockType::Snow,
        BlockType::Wood,
        BlockType::Leaves,
        BlockType::Dirt,
        BlockType::Sand,
        BlockType::Coal,
        BlockType::Iron,
        BlockType::Gold,
        BlockType::Diamond,
        BlockType::Lava,
    ];

    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn from_id(id: u8) -> Option<BlockType> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockType::Air => "air",
            BlockType::Grass => "grass",
            BlockType::Stone => "stone",
            BlockType::Water => "water",
            BlockType::Snow => "snow",
            BlockType::Wood => "wood",
            BlockType::Leaves => "leaves",
            BlockType::Dirt => "dirt",
            BlockType::Sand => "sand",
            BlockType::Coal => "coal",
            BlockType::Iron => "iron",
            BlockType::Gold => "gold",
            BlockType::Diamond => "diamond",
            BlockType::Lava => "lava",
        }
    }

    /// Collision solidity. Air and both fluids can be moved through.
    #[inline]
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockType::Air | BlockType::Water | BlockType::Lava)
    }

    /// Fluids render see-through and never hide a neighbouring face.
    #[inline]
    pub fn is_transparent(self) -> bool {
        matches!(self, BlockType::Water | BlockType::Lava)
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self == BlockType::Air
    }

    #[inline]
    pub fn is_ore(self) -> bool {
        matches!(
            self,
            BlockType::Coal | BlockType::Iron | BlockType::Gold | BlockType::Diamond
        )
    }

    /// True when a face of a solid neighbour next to this cell is visible.
    #[inline]
    pub fn exposes_neighbors(self) -> bool {
        self.is_air() || self.is_transparent()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBlock(pub String);

impl fmt::Display for UnknownBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown block type: {}", self.0)
    }
}

impl std::error::Error for UnknownBlock {}

impl FromStr for BlockType {
    type Err = UnknownBlock;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        BlockType::ALL
            .iter()
            .copied()
            .find(|b| b.name() == key)
            .ok_or(UnknownBlock(s.to_string()))
    }
}
