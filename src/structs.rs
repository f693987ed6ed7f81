//! In-memory forms of the two block variants, and their bit-exact encoding.
//!
//! Every block but the bitmap starts with a little-endian `u32` tag:
//! - `0`: directory node, `u16` entry count then `{ u16 block id, [u8; 8] name }` entries.
//! - `1`: inode, `u32` file size then the `u16` ids of its data blocks.

use crate::config::*;
use crate::error::{FsError, Result};

const TAG_DIRECTORY: u32 = 0;
const TAG_INODE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Regular,
    Directory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry {
    pub block_id: BlockId,
    pub name: [u8; NAME_FIELD_LEN],
}

impl DirEntry {
    pub fn new(block_id: BlockId, name: &[u8]) -> Result<Self> {
        if name.len() > MAX_NAME_LENGTH {
            return Err(FsError::NameTooLong);
        }
        if name.is_empty() || name.contains(&0) {
            return Err(FsError::InvalidName);
        }
        let mut field = [0u8; NAME_FIELD_LEN];
        field[..name.len()].copy_from_slice(name);
        Ok(Self { block_id, name: field })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirNode {
    /// Insertion order, at most `MAX_DIR_ENTRIES`.
    pub entries: Vec<DirEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inode {
    pub size: u32,
    /// Exactly `ceil(size / BLOCK_SIZE)` ids, in file order.
    pub data_blocks: Vec<BlockId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Directory(DirNode),
    Inode(Inode),
}

impl Block {
    pub fn empty_dir() -> Self {
        Block::Directory(DirNode::default())
    }

    pub fn empty_inode() -> Self {
        Block::Inode(Inode::default())
    }

    pub fn ftype(&self) -> FileType {
        match self {
            Block::Directory(_) => FileType::Directory,
            Block::Inode(_) => FileType::Regular,
        }
    }

    /// `block_id` only labels decoding errors.
    pub fn decode(block_id: BlockId, buf: &[u8; BLOCK_SIZE]) -> Result<Self> {
        match read_u32(buf, 0) {
            TAG_DIRECTORY => {
                let count = read_u16(buf, TAG_SIZE) as usize;
                if count > MAX_DIR_ENTRIES {
                    return Err(FsError::Corrupted(block_id));
                }
                let entries = (0..count)
                    .map(|i| {
                        let offset = DIR_HEADER_SIZE + i * DIR_ENTRY_SIZE;
                        let mut name = [0u8; NAME_FIELD_LEN];
                        name.copy_from_slice(
                            &buf[offset + BLOCK_ID_SIZE..offset + DIR_ENTRY_SIZE],
                        );
                        DirEntry {
                            block_id: read_u16(buf, offset),
                            name,
                        }
                    })
                    .collect();
                Ok(Block::Directory(DirNode { entries }))
            }
            TAG_INODE => {
                let size = read_u32(buf, TAG_SIZE);
                if size as usize > MAX_FILE_SIZE {
                    return Err(FsError::Corrupted(block_id));
                }
                let data_blocks = (0..Inode::blocks_for(size as usize))
                    .map(|i| read_u16(buf, INODE_HEADER_SIZE + i * BLOCK_ID_SIZE))
                    .collect();
                Ok(Block::Inode(Inode { size, data_blocks }))
            }
            _ => Err(FsError::Corrupted(block_id)),
        }
    }

    pub fn encode(&self, buf: &mut [u8; BLOCK_SIZE]) {
        match self {
            Block::Directory(dir) => dir.encode(buf),
            Block::Inode(inode) => inode.encode(buf),
        }
    }
}

impl DirNode {
    pub fn encode(&self, buf: &mut [u8; BLOCK_SIZE]) {
        assert!(self.entries.len() <= MAX_DIR_ENTRIES);
        buf.fill(0);
        write_u32(buf, 0, TAG_DIRECTORY);
        write_u16(buf, TAG_SIZE, self.entries.len() as u16);
        for (i, entry) in self.entries.iter().enumerate() {
            let offset = DIR_HEADER_SIZE + i * DIR_ENTRY_SIZE;
            write_u16(buf, offset, entry.block_id);
            buf[offset + BLOCK_ID_SIZE..offset + DIR_ENTRY_SIZE].copy_from_slice(&entry.name);
        }
    }
}

impl Inode {
    /// Number of data blocks a file of `size` bytes occupies.
    pub fn blocks_for(size: usize) -> usize {
        size.div_ceil(BLOCK_SIZE)
    }

    pub fn encode(&self, buf: &mut [u8; BLOCK_SIZE]) {
        assert!(self.data_blocks.len() <= MAX_DATA_BLOCKS);
        buf.fill(0);
        write_u32(buf, 0, TAG_INODE);
        write_u32(buf, TAG_SIZE, self.size);
        for (i, id) in self.data_blocks.iter().enumerate() {
            write_u16(buf, INODE_HEADER_SIZE + i * BLOCK_ID_SIZE, *id);
        }
    }
}

fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

fn write_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
