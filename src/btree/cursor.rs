//! Cursor for locating and iterating table cells.
//!
//! A cursor is a logical (page, cell index) position within a table,
//! plus an end-of-table flag. It holds no storage of its own: every
//! read re-resolves through the table's pager, so a cursor never
//! outlives the table it was built from.

use crate::error::Result;
use crate::row::Row;
use crate::table::Table;
use crate::types::PageId;

/// A position within a table, used for scans and ordered insertion
pub struct Cursor<'a> {
    table: &'a mut Table,
    page: PageId,
    cell: u32,
    end_of_table: bool,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of the table
    ///
    /// `end_of_table` is true immediately if the root leaf is empty.
    pub fn start(table: &'a mut Table) -> Result<Self> {
        let page = table.root_page();
        let num_cells = table.leaf(page)?.num_cells();
        Ok(Self {
            table,
            page,
            cell: 0,
            end_of_table: num_cells == 0,
        })
    }

    /// Create a cursor at the insertion position for `key`
    ///
    /// The position is the first cell whose key is >= `key`; equality
    /// there means the key is already present.
    pub fn find(table: &'a mut Table, key: u32) -> Result<Self> {
        let page = table.root_page();
        let (cell, num_cells) = {
            let leaf = table.leaf(page)?;
            (leaf.find(key)?, leaf.num_cells())
        };
        Ok(Self {
            table,
            page,
            cell,
            end_of_table: cell >= num_cells,
        })
    }

    /// The cell index this cursor points at
    pub fn cell_index(&self) -> u32 {
        self.cell
    }

    /// Whether the cursor has moved past the last cell
    pub fn end_of_table(&self) -> bool {
        self.end_of_table
    }

    /// The key at the current position
    pub fn key(&mut self) -> Result<u32> {
        let cell = self.cell;
        self.table.leaf(self.page)?.key(cell)
    }

    /// Deserialize the row at the current position
    pub fn row(&mut self) -> Result<Row> {
        let cell = self.cell;
        self.table.leaf(self.page)?.row(cell)
    }

    /// Move to the next cell, setting `end_of_table` past the last one
    pub fn advance(&mut self) -> Result<()> {
        self.cell += 1;
        let num_cells = self.table.leaf(self.page)?.num_cells();
        if self.cell >= num_cells {
            self.end_of_table = true;
        }
        Ok(())
    }
}
