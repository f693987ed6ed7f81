//! Disk geometry and mount-time options.

pub type BlockId = u16;

pub const BLOCK_SIZE: usize = 64;
pub const NUM_BLOCKS: usize = 8 * BLOCK_SIZE; // One bitmap block covers the whole disk
pub const BITMAP_BLOCK_ID: BlockId = 0;
pub const ROOT_BLOCK_ID: BlockId = 1;

pub const TAG_SIZE: usize = 4; // u32 directory/inode tag at the head of every block
pub const BLOCK_ID_SIZE: usize = core::mem::size_of::<BlockId>();

pub const MAX_NAME_LENGTH: usize = 7;
pub const NAME_FIELD_LEN: usize = MAX_NAME_LENGTH + 1; // NUL padded
pub const DIR_ENTRY_SIZE: usize = BLOCK_ID_SIZE + NAME_FIELD_LEN;
pub const DIR_HEADER_SIZE: usize = TAG_SIZE + 2; // tag + u16 entry count
pub const MAX_DIR_ENTRIES: usize = (BLOCK_SIZE - DIR_HEADER_SIZE) / DIR_ENTRY_SIZE;

pub const INODE_HEADER_SIZE: usize = TAG_SIZE + 4; // tag + u32 file size
pub const MAX_DATA_BLOCKS: usize = (BLOCK_SIZE - INODE_HEADER_SIZE) / BLOCK_ID_SIZE;
pub const MAX_FILE_SIZE: usize = MAX_DATA_BLOCKS * BLOCK_SIZE;

const _: () = assert!(NUM_BLOCKS <= BLOCK_SIZE * 8, "bitmap must fit in block 0");
const _: () = assert!(NUM_BLOCKS <= BlockId::MAX as usize + 1);
const _: () = assert!(MAX_DIR_ENTRIES > 0);
const _: () = assert!(DIR_HEADER_SIZE + MAX_DIR_ENTRIES * DIR_ENTRY_SIZE <= BLOCK_SIZE);
const _: () = assert!(INODE_HEADER_SIZE + MAX_DATA_BLOCKS * BLOCK_ID_SIZE <= BLOCK_SIZE);
const _: () = assert!(MAX_FILE_SIZE <= u32::MAX as usize);

/// Runtime knobs for [`FileSystem::mount`](crate::FileSystem::mount).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MountOptions {
    /// Rewrite the root directory as empty even when the disk already holds one.
    /// Everything previously reachable from the root becomes unreachable.
    pub reset_root: bool,
}

impl MountOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_root(mut self, reset: bool) -> Self {
        self.reset_root = reset;
        self
    }
}
