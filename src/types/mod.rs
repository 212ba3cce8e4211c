//! Common types and on-disk layout constants.
//!
//! Every byte offset used by the pager and leaf node code is derived
//! from the named constants here; nothing else in the crate hardcodes
//! layout arithmetic.

mod page_id;

pub use page_id::PageId;

/// Page size in bytes (4KB), the unit of file I/O and caching
pub const PAGE_SIZE: usize = 4096;

/// Maximum number of pages a table may address
pub const MAX_PAGES: usize = 100;

/// Serialized size of the row id
pub const ID_SIZE: usize = 4;

/// On-disk capacity of the username column (32 usable bytes + NUL)
pub const USERNAME_CAPACITY: usize = 33;

/// On-disk capacity of the email column (255 usable bytes + NUL)
pub const EMAIL_CAPACITY: usize = 256;

/// Longest username accepted by the input layer
pub const USERNAME_MAX_LEN: usize = USERNAME_CAPACITY - 1;

/// Longest email accepted by the input layer
pub const EMAIL_MAX_LEN: usize = EMAIL_CAPACITY - 1;

pub const ID_OFFSET: usize = 0;
pub const USERNAME_OFFSET: usize = ID_OFFSET + ID_SIZE;
pub const EMAIL_OFFSET: usize = USERNAME_OFFSET + USERNAME_CAPACITY;

/// Fixed serialized size of one row
pub const ROW_SIZE: usize = ID_SIZE + USERNAME_CAPACITY + EMAIL_CAPACITY;

// Common node header layout: node type, root flag, parent pointer.
// The parent pointer is a placeholder while the tree is a single leaf.
pub const NODE_TYPE_SIZE: usize = 1;
pub const NODE_TYPE_OFFSET: usize = 0;
pub const IS_ROOT_SIZE: usize = 1;
pub const IS_ROOT_OFFSET: usize = NODE_TYPE_OFFSET + NODE_TYPE_SIZE;
pub const PARENT_POINTER_SIZE: usize = 4;
pub const PARENT_POINTER_OFFSET: usize = IS_ROOT_OFFSET + IS_ROOT_SIZE;
pub const COMMON_HEADER_SIZE: usize = NODE_TYPE_SIZE + IS_ROOT_SIZE + PARENT_POINTER_SIZE;

// Leaf node header layout: common header followed by the cell count.
pub const NUM_CELLS_SIZE: usize = 4;
pub const NUM_CELLS_OFFSET: usize = COMMON_HEADER_SIZE;
pub const LEAF_HEADER_SIZE: usize = COMMON_HEADER_SIZE + NUM_CELLS_SIZE;

// Leaf node body layout: packed cells of key || serialized row.
pub const CELL_KEY_SIZE: usize = 4;
pub const CELL_SIZE: usize = CELL_KEY_SIZE + ROW_SIZE;
pub const LEAF_SPACE_FOR_CELLS: usize = PAGE_SIZE - LEAF_HEADER_SIZE;
pub const LEAF_MAX_CELLS: usize = LEAF_SPACE_FOR_CELLS / CELL_SIZE;

/// B-tree node types
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Interior node (keys + child pointers); reserved for future growth
    Internal = 0x00,
    /// Leaf node (keys + rows)
    Leaf = 0x01,
}

impl NodeType {
    /// Convert from byte value
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(Self::Internal),
            0x01 => Some(Self::Leaf),
            _ => None,
        }
    }

    /// Check if this is a leaf node type
    pub fn is_leaf(self) -> bool {
        matches!(self, Self::Leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_constants() {
        // The on-disk contract the whole crate is built around.
        assert_eq!(ROW_SIZE, 293);
        assert_eq!(COMMON_HEADER_SIZE, 6);
        assert_eq!(LEAF_HEADER_SIZE, 10);
        assert_eq!(CELL_SIZE, 297);
        assert_eq!(LEAF_SPACE_FOR_CELLS, 4086);
        assert_eq!(LEAF_MAX_CELLS, 13);
    }

    #[test]
    fn test_cells_fit_in_page() {
        assert!(LEAF_HEADER_SIZE + LEAF_MAX_CELLS * CELL_SIZE <= PAGE_SIZE);
        assert!(LEAF_HEADER_SIZE + (LEAF_MAX_CELLS + 1) * CELL_SIZE > PAGE_SIZE);
    }

    #[test]
    fn test_node_type_conversions() {
        assert_eq!(NodeType::from_byte(0x01), Some(NodeType::Leaf));
        assert_eq!(NodeType::from_byte(0x00), Some(NodeType::Internal));
        assert_eq!(NodeType::from_byte(0xFF), None);
        assert!(NodeType::Leaf.is_leaf());
        assert!(!NodeType::Internal.is_leaf());
    }
}
