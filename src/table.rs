//! Table: the engine's entry point.
//!
//! A table owns a pager and designates page 0 as the root leaf. Rows
//! are indexed by their id through the leaf's ordered cells; scans and
//! ordered insertion go through [`Cursor`].

use crate::btree::{Cursor, LeafNode};
use crate::error::{DbError, Result};
use crate::pager::Pager;
use crate::row::Row;
use crate::types::{
    CELL_SIZE, COMMON_HEADER_SIZE, LEAF_HEADER_SIZE, LEAF_MAX_CELLS, LEAF_SPACE_FOR_CELLS,
    NodeType, PageId, ROW_SIZE,
};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// A single-table row store backed by one file
pub struct Table {
    pager: Pager,
    root_page: PageId,
}

impl Table {
    /// Open or create a table at the given path
    ///
    /// A fresh file gets page 0 initialized as an empty root leaf; an
    /// existing file must carry a leaf node on page 0.
    pub fn open(path: &Path) -> Result<Self> {
        let pager = Pager::open(path)?;
        let mut table = Self {
            pager,
            root_page: PageId::ROOT,
        };

        if table.pager.num_pages() == 0 {
            let mut root = table.leaf(PageId::ROOT)?;
            root.initialize();
            root.set_is_root(true);
        } else {
            let root = table.leaf(PageId::ROOT)?;
            if !root.node_type()?.is_leaf() {
                return Err(DbError::corruption("root page is not a leaf node"));
            }
        }

        Ok(table)
    }

    /// The page currently acting as the table's root
    pub fn root_page(&self) -> PageId {
        self.root_page
    }

    /// View a page as a leaf node
    pub(crate) fn leaf(&mut self, page: PageId) -> Result<LeafNode<'_>> {
        Ok(LeafNode::new(self.pager.page(page)?))
    }

    /// Insert a row keyed by its id
    ///
    /// Returns [`DbError::TableFull`] when the root leaf has no room
    /// (splitting is unsupported) and [`DbError::DuplicateKey`] when
    /// the id is already present; in both cases the store is left
    /// unmodified.
    pub fn insert(&mut self, row: &Row) -> Result<()> {
        let key = row.id;
        let root = self.root_page;

        if self.leaf(root)?.num_cells() as usize >= LEAF_MAX_CELLS {
            return Err(DbError::TableFull);
        }

        let mut cursor = Cursor::find(self, key)?;
        if !cursor.end_of_table() && cursor.key()? == key {
            return Err(DbError::DuplicateKey(key));
        }
        let cell = cursor.cell_index();

        self.leaf(root)?.insert(cell, key, row)
    }

    /// Lazily scan all rows in key order
    ///
    /// The iterator is forward-only and one-pass; call again for a
    /// fresh scan.
    pub fn rows(&mut self) -> Result<Rows<'_>> {
        Ok(Rows {
            cursor: Cursor::start(self)?,
            done: false,
        })
    }

    /// Flush all pages and close the underlying file
    pub fn close(self) -> Result<()> {
        self.pager.close()
    }

    /// Snapshot of the tree structure, for diagnostics
    pub fn tree_snapshot(&mut self) -> Result<TreeSnapshot> {
        let root = self.root_page;
        let leaf = self.leaf(root)?;
        let num_cells = leaf.num_cells();
        let mut keys = Vec::with_capacity(num_cells as usize);
        for i in 0..num_cells {
            keys.push(leaf.key(i)?);
        }
        Ok(TreeSnapshot {
            page_id: root.value(),
            node_type: leaf.node_type()?,
            is_root: leaf.is_root(),
            keys,
        })
    }
}

/// An iterator over a table's rows in key order
pub struct Rows<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl Iterator for Rows<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor.end_of_table() {
            return None;
        }
        let row = match self.cursor.row() {
            Ok(row) => row,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        if let Err(e) = self.cursor.advance() {
            self.done = true;
            return Some(Err(e));
        }
        Some(Ok(row))
    }
}

/// The layout constants, exposed for the `.constants` diagnostic
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constants {
    pub row_size: usize,
    pub common_header_size: usize,
    pub leaf_header_size: usize,
    pub cell_size: usize,
    pub space_for_cells: usize,
    pub max_cells: usize,
}

/// The crate's compiled-in layout constants
pub fn constants() -> Constants {
    Constants {
        row_size: ROW_SIZE,
        common_header_size: COMMON_HEADER_SIZE,
        leaf_header_size: LEAF_HEADER_SIZE,
        cell_size: CELL_SIZE,
        space_for_cells: LEAF_SPACE_FOR_CELLS,
        max_cells: LEAF_MAX_CELLS,
    }
}

impl fmt::Display for Constants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Constants: ")?;
        writeln!(f, "Row Size: {}", self.row_size)?;
        writeln!(f, "Common Node Header size: {}", self.common_header_size)?;
        writeln!(f, "Leaf Node Header Size: {}", self.leaf_header_size)?;
        writeln!(f, "Leaf Node Cell Size: {}", self.cell_size)?;
        writeln!(f, "Leaf Node Space For Cells: {}", self.space_for_cells)?;
        write!(f, "Leaf Node Max Cell: {}", self.max_cells)
    }
}

/// Structure of the (single-leaf) tree, for the `.btree` diagnostic
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSnapshot {
    /// Page holding the node
    pub page_id: u32,
    /// The node's recorded type
    #[serde(serialize_with = "serialize_node_type")]
    pub node_type: NodeType,
    /// Whether the node is the root
    pub is_root: bool,
    /// Keys in cell order
    pub keys: Vec<u32>,
}

fn serialize_node_type<S: serde::Serializer>(t: &NodeType, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(if t.is_leaf() { "leaf" } else { "internal" })
}

impl fmt::Display for TreeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tree:")?;
        write!(f, "  Leaf size: {}", self.keys.len())?;
        for (i, key) in self.keys.iter().enumerate() {
            write!(f, "\n    {} : {}", i, key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use tempfile::tempdir;

    fn sample_row(id: u32) -> Row {
        Row::new(id, format!("user{id}"), format!("user{id}@email.com"))
    }

    fn collect_ids(table: &mut Table) -> Vec<u32> {
        table
            .rows()
            .unwrap()
            .map(|r| r.unwrap().id)
            .collect()
    }

    #[test]
    fn test_out_of_order_inserts_scan_sorted() -> Result<()> {
        let dir = tempdir().unwrap();
        let mut table = Table::open(&dir.path().join("test.db"))?;

        for id in [3, 1, 2] {
            table.insert(&sample_row(id))?;
        }

        assert_eq!(collect_ids(&mut table), vec![1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_duplicate_key_rejected() -> Result<()> {
        let dir = tempdir().unwrap();
        let mut table = Table::open(&dir.path().join("test.db"))?;

        table.insert(&sample_row(5))?;
        let err = table.insert(&sample_row(5)).unwrap_err();
        assert!(matches!(err, DbError::DuplicateKey(5)));
        assert!(err.is_recoverable());

        // Exactly one row survives, unchanged.
        let rows: Vec<Row> = table.rows()?.collect::<Result<_>>()?;
        assert_eq!(rows, vec![sample_row(5)]);
        Ok(())
    }

    #[test]
    fn test_table_full_is_recoverable() -> Result<()> {
        let dir = tempdir().unwrap();
        let mut table = Table::open(&dir.path().join("test.db"))?;

        for id in 0..LEAF_MAX_CELLS as u32 {
            table.insert(&sample_row(id))?;
        }

        let err = table.insert(&sample_row(999)).unwrap_err();
        assert!(matches!(err, DbError::TableFull));
        assert!(err.is_recoverable());
        assert_eq!(collect_ids(&mut table).len(), LEAF_MAX_CELLS);
        Ok(())
    }

    #[test]
    fn test_persistence_across_reopen() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let mut table = Table::open(&path)?;
            for id in [4, 2, 9] {
                table.insert(&sample_row(id))?;
            }
            table.close()?;
        }

        let mut table = Table::open(&path)?;
        let rows: Vec<Row> = table.rows()?.collect::<Result<_>>()?;
        assert_eq!(rows, vec![sample_row(2), sample_row(4), sample_row(9)]);
        Ok(())
    }

    #[test]
    fn test_random_insert_order_keeps_keys_ascending() -> Result<()> {
        let dir = tempdir().unwrap();
        let mut table = Table::open(&dir.path().join("test.db"))?;

        let mut ids: Vec<u32> = (0..LEAF_MAX_CELLS as u32).collect();
        ids.shuffle(&mut rand::thread_rng());
        for id in &ids {
            table.insert(&sample_row(*id))?;
        }

        let scanned = collect_ids(&mut table);
        let mut expected = ids.clone();
        expected.sort_unstable();
        assert_eq!(scanned, expected);
        Ok(())
    }

    #[test]
    fn test_scan_is_one_pass() -> Result<()> {
        let dir = tempdir().unwrap();
        let mut table = Table::open(&dir.path().join("test.db"))?;
        table.insert(&sample_row(1))?;

        let mut rows = table.rows()?;
        assert!(rows.next().is_some());
        assert!(rows.next().is_none());
        drop(rows);

        // A fresh iterator re-scans from the start.
        assert_eq!(collect_ids(&mut table), vec![1]);
        Ok(())
    }

    #[test]
    fn test_constants_display() {
        let text = constants().to_string();
        let expected = "Constants: \n\
                        Row Size: 293\n\
                        Common Node Header size: 6\n\
                        Leaf Node Header Size: 10\n\
                        Leaf Node Cell Size: 297\n\
                        Leaf Node Space For Cells: 4086\n\
                        Leaf Node Max Cell: 13";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_tree_snapshot_display() -> Result<()> {
        let dir = tempdir().unwrap();
        let mut table = Table::open(&dir.path().join("test.db"))?;
        for id in [3, 1, 2] {
            table.insert(&sample_row(id))?;
        }

        let snapshot = table.tree_snapshot()?;
        assert!(snapshot.is_root);
        let expected = "Tree:\n  Leaf size: 3\n    0 : 1\n    1 : 2\n    2 : 3";
        assert_eq!(snapshot.to_string(), expected);
        Ok(())
    }

    #[test]
    fn test_constants_serialize() {
        let json = serde_json::to_value(constants()).unwrap();
        assert_eq!(json["rowSize"], 293);
        assert_eq!(json["maxCells"], 13);
    }

    #[test]
    fn test_tree_snapshot_serializes() -> Result<()> {
        let dir = tempdir().unwrap();
        let mut table = Table::open(&dir.path().join("test.db"))?;
        table.insert(&sample_row(1))?;

        let json = serde_json::to_value(table.tree_snapshot()?).unwrap();
        assert_eq!(json["pageId"], 0);
        assert_eq!(json["nodeType"], "leaf");
        assert_eq!(json["keys"][0], 1);
        Ok(())
    }
}
