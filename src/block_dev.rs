use crate::config::{BlockId, BLOCK_SIZE};
use crate::error::FsError;

pub trait BlockDevice: Send + Sync {
    /// Returns the number of blocks in the block device.
    fn num_blocks(&self) -> usize;

    /// Reads a block of data from the block device.
    fn read_block(&self, block_id: BlockId, buf: &mut [u8; BLOCK_SIZE]) -> Result<(), FsError>;

    /// Writes a block of data to the block device.
    fn write_block(&self, block_id: BlockId, buf: &[u8; BLOCK_SIZE]) -> Result<(), FsError>;

    /// Pushes anything the device buffers down to its backing store.
    /// Only called on unmount, every write goes through immediately.
    fn flush(&self) -> Result<(), FsError> {
        Ok(())
    }

    /// Returns the size of each block in bytes.
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }
}
