//! # LeafDB
//!
//! A single-file, paged row store indexed by a one-node B-tree.
//!
//! ## Architecture
//!
//! The engine is composed of small, layered components:
//!
//! - **Page Layer** (`page`): Fixed 4 KiB page buffers
//! - **Pager** (`pager`): Disk I/O, lazy page loading and write-back
//! - **B-Tree Layer** (`btree`): Leaf node layout and cursor iteration
//! - **Table** (`table`): Row-level insert and ordered scans
//! - **Statements** (`statement`): Text input parsed into executable statements
//!
//! ## Usage
//!
//! ```rust,ignore
//! use leafdb::{Row, Table};
//!
//! let mut table = Table::open(Path::new("my_database.db"))?;
//!
//! // Insert a row keyed by its id
//! table.insert(&Row::new(1, "alice", "alice@example.com"))?;
//!
//! // Scan all rows in key order
//! for row in table.rows()? {
//!     println!("{}", row?);
//! }
//!
//! // Flush and close
//! table.close()?;
//! ```

pub mod btree;
pub mod error;
pub mod page;
pub mod pager;
pub mod row;
pub mod statement;
pub mod table;
pub mod types;

pub use error::{DbError, Result};
pub use types::{PageId, PAGE_SIZE};

// Re-export main public API
pub use pager::Pager;
pub use row::Row;
pub use statement::{MetaCommand, Statement};
pub use table::{constants, Table};
