//! B-tree layer.
//!
//! The tree currently consists of a single leaf node (the root); the
//! node format reserves room for internal nodes and parent links, but
//! multi-node growth is future work. This module provides:
//! - The leaf node view over a page's bytes
//! - The cursor used to locate and iterate cells

mod cursor;
mod leaf;

pub use cursor::Cursor;
pub use leaf::LeafNode;
