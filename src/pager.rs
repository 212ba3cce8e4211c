//! Pager: file I/O and the resident page cache.
//!
//! The pager owns the database file handle and an array of page slots.
//! Pages are loaded lazily on first access and stay resident until
//! flushed; there is no eviction, so memory is bounded by
//! [`MAX_PAGES`]. Dirty state is not tracked per page: every resident
//! page is written back in full on flush, and flush happens at close.
//! A crash before flush loses all unflushed pages.

use crate::error::{DbError, Result};
use crate::page::PageBuf;
use crate::types::{PageId, MAX_PAGES, PAGE_SIZE};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Owns the database file and every resident page
#[derive(Debug)]
pub struct Pager {
    /// The database file
    file: File,
    /// File length at open time, always a multiple of the page size
    file_length: u64,
    /// High-water mark of materialized pages (on disk or in cache)
    num_pages: usize,
    /// Resident page slots; a page is loaded into a slot at most once
    pages: Vec<Option<Box<PageBuf>>>,
}

impl Pager {
    /// Open or create the database file
    ///
    /// An existing file whose length is not a whole multiple of the
    /// page size is rejected as corrupt.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let file_length = file.metadata()?.len();
        if file_length % PAGE_SIZE as u64 != 0 {
            return Err(DbError::Misaligned { len: file_length });
        }

        let num_pages = (file_length / PAGE_SIZE as u64) as usize;
        let mut pages = Vec::with_capacity(MAX_PAGES);
        pages.resize_with(MAX_PAGES, || None);

        Ok(Self {
            file,
            file_length,
            num_pages,
            pages,
        })
    }

    /// Number of pages materialized so far (on disk or in cache)
    pub fn num_pages(&self) -> usize {
        self.num_pages
    }

    /// File length observed at open time
    pub fn file_length(&self) -> u64 {
        self.file_length
    }

    /// Fetch a page, loading it from disk on first access
    ///
    /// The returned buffer stays valid and stable until the pager is
    /// flushed or dropped; repeated calls return the same buffer.
    pub fn page(&mut self, page_id: PageId) -> Result<&mut PageBuf> {
        let index = page_id.index();
        if index >= MAX_PAGES {
            return Err(DbError::PageOutOfBounds {
                page: page_id,
                max: MAX_PAGES,
            });
        }

        if self.pages[index].is_none() {
            let mut page = Box::new(PageBuf::new());

            let pages_on_disk = (self.file_length / PAGE_SIZE as u64) as usize;
            if index < pages_on_disk {
                self.file.seek(SeekFrom::Start(page_id.file_offset(PAGE_SIZE)))?;
                read_page_bytes(&mut self.file, page.as_bytes_mut())?;
            }

            self.pages[index] = Some(page);
            self.num_pages = self.num_pages.max(index + 1);
        }

        match &mut self.pages[index] {
            Some(page) => Ok(page),
            None => unreachable!("slot populated above"),
        }
    }

    /// Write every resident page to its aligned offset and release it
    pub fn flush(&mut self) -> Result<()> {
        for index in 0..MAX_PAGES {
            if let Some(page) = self.pages[index].take() {
                let offset = PageId::new(index as u32).file_offset(PAGE_SIZE);
                self.file.seek(SeekFrom::Start(offset))?;
                self.file.write_all(page.as_bytes())?;
                self.file_length = self.file_length.max(offset + PAGE_SIZE as u64);
            }
        }
        Ok(())
    }

    /// Flush all pages and sync the file to disk
    pub fn close(mut self) -> Result<()> {
        self.flush()?;
        self.file.sync_all()?;
        Ok(())
    }
}

impl Drop for Pager {
    fn drop(&mut self) {
        // Best-effort write-back for exit paths that skipped close();
        // after an explicit close() all slots are empty and this is a
        // no-op.
        let _ = self.flush();
    }
}

/// Read up to a full page, zero-filling only past true end-of-file
fn read_page_bytes(file: &mut File, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break, // EOF: rest of the buffer stays zeroed
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
