//! Raw block store backed by a regular file on the host file system.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::debug;

use crate::config::{BlockId, BLOCK_SIZE, NUM_BLOCKS};
use crate::error::{FsError, Result};
use crate::BlockDevice;

pub struct FileDisk {
    inner: Mutex<File>,
    path: PathBuf,
}

impl FileDisk {
    /// Opens the disk image at `path`, creating it if needed.
    /// A short (or new) image is zero-extended to exactly `NUM_BLOCKS` blocks.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let expected = (NUM_BLOCKS * BLOCK_SIZE) as u64;
        let len = file.seek(SeekFrom::End(0))?;
        if len < expected {
            debug!("extending {} from {} to {} bytes", path.display(), len, expected);
            file.write_all(&vec![0u8; (expected - len) as usize])?;
            file.flush()?;
        }

        Ok(FileDisk {
            inner: Mutex::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, File> {
        // A poisoned lock still guards a valid file handle.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn seek_to(file: &mut File, block_id: BlockId) -> Result<()> {
        if block_id as usize >= NUM_BLOCKS {
            return Err(FsError::InvalidBlockId(block_id));
        }
        file.seek(SeekFrom::Start(block_id as u64 * BLOCK_SIZE as u64))?;
        Ok(())
    }
}

impl BlockDevice for FileDisk {
    fn num_blocks(&self) -> usize {
        NUM_BLOCKS
    }

    fn read_block(&self, block_id: BlockId, buf: &mut [u8; BLOCK_SIZE]) -> Result<()> {
        let mut file = self.lock();
        Self::seek_to(&mut file, block_id)?;
        file.read_exact(buf)?;
        Ok(())
    }

    fn write_block(&self, block_id: BlockId, buf: &[u8; BLOCK_SIZE]) -> Result<()> {
        let mut file = self.lock();
        Self::seek_to(&mut file, block_id)?;
        file.write_all(buf)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let mut file = self.lock();
        file.flush()?;
        file.sync_data()?;
        Ok(())
    }
}
