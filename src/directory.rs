//! Entry tables of directory nodes.
//! Everything here works on a decoded `DirNode`; callers persist it.

use std::borrow::Cow;

use crate::config::*;
use crate::error::{FsError, Result};
use crate::structs::*;

pub fn trim_zero(name: &[u8]) -> &[u8] {
    let end = name.iter().position(|&c| c == 0).unwrap_or(name.len());
    &name[..end]
}

/// Compares a stored, NUL padded name field with a query name.
/// The query is taken as is, so a query containing NUL never matches.
fn name_cmp(field: &[u8], name: &[u8]) -> bool {
    trim_zero(field) == name
}

impl DirEntry {
    pub fn name_bytes(&self) -> &[u8] {
        trim_zero(&self.name)
    }

    pub fn name_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.name_bytes())
    }

    pub fn name_eq(&self, name: &[u8]) -> bool {
        name_cmp(&self.name, name)
    }
}

impl DirNode {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_DIR_ENTRIES
    }

    /// Position of the entry called `name`.
    pub fn lookup(&self, name: &[u8]) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name_eq(name))
    }

    /// Checks that `name` could be added: length, validity, capacity, then uniqueness.
    pub fn check_insert(&self, name: &[u8]) -> Result<()> {
        if name.len() > MAX_NAME_LENGTH {
            return Err(FsError::NameTooLong);
        }
        if name.is_empty() || name.contains(&0) {
            return Err(FsError::InvalidName);
        }
        if self.is_full() {
            return Err(FsError::DirFull);
        }
        if self.lookup(name).is_some() {
            return Err(FsError::AlreadyExists);
        }
        Ok(())
    }

    /// Appends a new entry after all existing ones.
    /// The child block must already be allocated and initialized.
    pub fn add_entry(&mut self, block_id: BlockId, name: &[u8]) -> Result<()> {
        self.check_insert(name)?;
        self.entries.push(DirEntry::new(block_id, name)?);
        Ok(())
    }

    /// Removes the entry at `index`, closing the gap while keeping the order of the rest.
    /// Would not release the child's blocks, caller responsible for that.
    pub fn remove_entry(&mut self, index: usize) -> DirEntry {
        self.entries.remove(index)
    }
}
