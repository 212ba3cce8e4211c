//! Leaf node: a structural view over one page's bytes.
//!
//! Layout (offsets from the constants in [`crate::types`]):
//! ```text
//! Offset  Size  Description
//! 0       1     Node type (0x01 = leaf)
//! 1       1     Root flag
//! 2       4     Parent pointer (placeholder while the tree is one leaf)
//! 6       4     Cell count
//! 10      ...   Cells, each [key:4][row:293], packed, ascending by key
//! ```
//!
//! The view owns nothing; every access is recomputed from the layout
//! constants and bounds-checked against the current cell count.

use crate::error::{DbError, Result};
use crate::page::PageBuf;
use crate::row::Row;
use crate::types::{
    CELL_KEY_SIZE, CELL_SIZE, IS_ROOT_OFFSET, LEAF_HEADER_SIZE, LEAF_MAX_CELLS, NODE_TYPE_OFFSET,
    NUM_CELLS_OFFSET, NodeType, ROW_SIZE,
};

/// A mutable leaf-node view over a single page
pub struct LeafNode<'a> {
    data: &'a mut PageBuf,
}

impl<'a> LeafNode<'a> {
    /// Interpret a page as a leaf node
    pub fn new(data: &'a mut PageBuf) -> Self {
        Self { data }
    }

    /// Format the page as an empty leaf
    ///
    /// Sets the node type and zeroes the cell count; the body is left
    /// as-is.
    pub fn initialize(&mut self) {
        self.data[NODE_TYPE_OFFSET] = NodeType::Leaf as u8;
        self.data[IS_ROOT_OFFSET] = 0;
        self.set_num_cells(0);
    }

    /// The node type recorded in the header
    pub fn node_type(&self) -> Result<NodeType> {
        NodeType::from_byte(self.data[NODE_TYPE_OFFSET]).ok_or_else(|| {
            DbError::corruption(format!(
                "invalid node type byte: {:#04x}",
                self.data[NODE_TYPE_OFFSET]
            ))
        })
    }

    /// Whether this node is the tree's root
    pub fn is_root(&self) -> bool {
        self.data[IS_ROOT_OFFSET] != 0
    }

    /// Mark or unmark this node as the root
    pub fn set_is_root(&mut self, is_root: bool) {
        self.data[IS_ROOT_OFFSET] = is_root as u8;
    }

    /// Number of cells currently stored
    pub fn num_cells(&self) -> u32 {
        u32::from_le_bytes([
            self.data[NUM_CELLS_OFFSET],
            self.data[NUM_CELLS_OFFSET + 1],
            self.data[NUM_CELLS_OFFSET + 2],
            self.data[NUM_CELLS_OFFSET + 3],
        ])
    }

    fn set_num_cells(&mut self, num_cells: u32) {
        self.data[NUM_CELLS_OFFSET..NUM_CELLS_OFFSET + 4]
            .copy_from_slice(&num_cells.to_le_bytes());
    }

    fn cell_offset(cell_index: u32) -> usize {
        LEAF_HEADER_SIZE + cell_index as usize * CELL_SIZE
    }

    fn check_bounds(&self, cell_index: u32) -> Result<()> {
        let count = self.num_cells();
        if cell_index >= count {
            return Err(DbError::CellOutOfBounds {
                index: cell_index,
                count,
            });
        }
        Ok(())
    }

    /// The key of cell `cell_index`
    pub fn key(&self, cell_index: u32) -> Result<u32> {
        self.check_bounds(cell_index)?;
        let offset = Self::cell_offset(cell_index);
        Ok(u32::from_le_bytes([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ]))
    }

    /// The serialized row bytes of cell `cell_index`
    pub fn value(&self, cell_index: u32) -> Result<&[u8]> {
        self.check_bounds(cell_index)?;
        let offset = Self::cell_offset(cell_index) + CELL_KEY_SIZE;
        Ok(&self.data[offset..offset + ROW_SIZE])
    }

    /// Deserialize the row stored in cell `cell_index`
    pub fn row(&self, cell_index: u32) -> Result<Row> {
        Ok(Row::deserialize(self.value(cell_index)?))
    }

    /// Binary search for the first cell whose key is >= `key`
    ///
    /// The result is the insertion point for `key`; equality at that
    /// index means the key is already present.
    pub fn find(&self, key: u32) -> Result<u32> {
        let mut low = 0;
        let mut high = self.num_cells();

        while low < high {
            let mid = low + (high - low) / 2;
            let mid_key = self.key(mid)?;
            match key.cmp(&mid_key) {
                std::cmp::Ordering::Less => high = mid,
                std::cmp::Ordering::Greater => low = mid + 1,
                std::cmp::Ordering::Equal => return Ok(mid),
            }
        }

        Ok(low)
    }

    /// Insert a cell at `cell_index`, shifting later cells rightward
    ///
    /// A full leaf yields [`DbError::TableFull`] and leaves the node
    /// untouched (node splitting is not implemented). The cell count
    /// is incremented exactly once, after the body write.
    pub fn insert(&mut self, cell_index: u32, key: u32, row: &Row) -> Result<()> {
        let num_cells = self.num_cells();
        if num_cells as usize >= LEAF_MAX_CELLS {
            return Err(DbError::TableFull);
        }
        if cell_index > num_cells {
            return Err(DbError::CellOutOfBounds {
                index: cell_index,
                count: num_cells,
            });
        }

        if cell_index < num_cells {
            // Shift the tail one cell to the right. copy_within handles
            // the overlap, which is equivalent to moving highest-first.
            let start = Self::cell_offset(cell_index);
            let end = Self::cell_offset(num_cells);
            self.data.copy_within(start..end, start + CELL_SIZE);
        }

        let offset = Self::cell_offset(cell_index);
        self.data[offset..offset + CELL_KEY_SIZE].copy_from_slice(&key.to_le_bytes());
        row.serialize(&mut self.data[offset + CELL_KEY_SIZE..offset + CELL_SIZE]);

        self.set_num_cells(num_cells + 1);
        Ok(())
    }
}
