use delve_blocks::BlockType;
use delve_world::{BlockGrid, HeightMap};

use crate::EditError;

/// Query and edit surface shared by the terrain variants, in chunk-local coordinates.
pub trait Terrain {
    /// Column height at `(x, z)`, `None` outside the chunk.
    fn height_local(&self, x: i32, z: i32) -> Option<i32>;
    /// Cell contents, `None` outside the chunk or when the variant has no block grid.
    fn block_local(&self, x: i32, y: i32, z: i32) -> Option<BlockType>;
    fn set_block_local(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> Result<(), EditError>;
    /// Cells to draw, in a fixed scan order.
    fn visible_local(&self) -> Vec<(i32, i32, i32, BlockType)>;
}

fn local_height(heights: &HeightMap, x: i32, z: i32) -> Option<i32> {
    if x < 0 || z < 0 {
        return None;
    }
    heights.get(x as usize, z as usize)
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeightFieldTerrain {
    heights: HeightMap,
    columns: Vec<BlockType>,
}

impl HeightFieldTerrain {
    /// `columns` is padded with grass or truncated to one entry per column.
    pub fn new(heights: HeightMap, mut columns: Vec<BlockType>) -> Self {
        let n = heights.size() * heights.size();
        columns.resize(n, BlockType::Grass);
        Self { heights, columns }
    }

    pub fn heights(&self) -> &HeightMap {
        &self.heights
    }
}

/// Material shown on the exposed side of a column below its top cell.
fn side_block(top: BlockType) -> BlockType {
    match top {
        BlockType::Grass => BlockType::Dirt,
        BlockType::Snow => BlockType::Stone,
        other => other,
    }
}

impl Terrain for HeightFieldTerrain {
    fn height_local(&self, x: i32, z: i32) -> Option<i32> {
        local_height(&self.heights, x, z)
    }

    fn block_local(&self, _x: i32, _y: i32, _z: i32) -> Option<BlockType> {
        None
    }

    fn set_block_local(&mut self, _x: i32, _y: i32, _z: i32, _b: BlockType) -> Result<(), EditError> {
        Err(EditError::Unsupported)
    }

    /// The top cell of every column, plus the side cells left uncovered by a lower
    /// neighbouring column inside the chunk.
    fn visible_local(&self) -> Vec<(i32, i32, i32, BlockType)> {
        let size = self.heights.size() as i32;
        let mut out = Vec::with_capacity((size * size) as usize);
        for z in 0..size {
            for x in 0..size {
                let Some(h) = self.height_local(x, z) else {
                    continue;
                };
                if h <= 0 {
                    continue;
                }
                let top = self.columns[(x + size * z) as usize];
                let lowest = [(-1, 0), (1, 0), (0, -1), (0, 1)]
                    .iter()
                    .filter_map(|&(dx, dz)| self.height_local(x + dx, z + dz))
                    .fold(h - 1, i32::min)
                    .max(0);
                for y in lowest..h {
                    let block = if y == h - 1 { top } else { side_block(top) };
                    out.push((x, y, z, block));
                }
            }
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VolumetricTerrain {
    heights: HeightMap,
    blocks: BlockGrid,
}

impl VolumetricTerrain {
    pub fn new(heights: HeightMap, blocks: BlockGrid) -> Self {
        Self { heights, blocks }
    }

    /// Builds the height map from the grid itself: one above each column's topmost solid cell.
    pub fn from_blocks(blocks: BlockGrid) -> Self {
        let size = blocks.size();
        let mut heights = HeightMap::filled(size, 0);
        for z in 0..size {
            for x in 0..size {
                heights.set(x, z, blocks.column_height(x, z));
            }
        }
        Self { heights, blocks }
    }

    pub fn heights(&self) -> &HeightMap {
        &self.heights
    }

    pub fn blocks(&self) -> &BlockGrid {
        &self.blocks
    }
}

impl Terrain for VolumetricTerrain {
    fn height_local(&self, x: i32, z: i32) -> Option<i32> {
        local_height(&self.heights, x, z)
    }

    fn block_local(&self, x: i32, y: i32, z: i32) -> Option<BlockType> {
        self.blocks.get(x, y, z)
    }

    /// Writes the cell and refreshes that column's height so collision sees the edit.
    fn set_block_local(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> Result<(), EditError> {
        if !self.blocks.set(x, y, z, block) {
            return Err(EditError::OutOfBounds);
        }
        let (x, z) = (x as usize, z as usize);
        self.heights.set(x, z, self.blocks.column_height(x, z));
        Ok(())
    }

    fn visible_local(&self) -> Vec<(i32, i32, i32, BlockType)> {
        self.blocks
            .visible_cells()
            .into_iter()
            .map(|(x, y, z, b)| (x as i32, y as i32, z as i32, b))
            .collect()
    }
}
