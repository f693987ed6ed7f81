//! Reading and writing tagged blocks (directory nodes and inodes).

use crate::config::{BlockId, BLOCK_SIZE, NUM_BLOCKS};
use crate::error::{FsError, Result};
use crate::structs::{Block, DirNode, Inode};
use crate::BlockDevice;

fn check_range(block_id: BlockId) -> Result<()> {
    if block_id as usize >= NUM_BLOCKS {
        return Err(FsError::InvalidBlockId(block_id));
    }
    Ok(())
}

pub fn get_block(device: &impl BlockDevice, block_id: BlockId) -> Result<Block> {
    check_range(block_id)?;
    let mut buf = [0u8; BLOCK_SIZE];
    device.read_block(block_id, &mut buf)?;
    Block::decode(block_id, &buf)
}

pub fn write_block(device: &impl BlockDevice, block_id: BlockId, block: &Block) -> Result<()> {
    check_range(block_id)?;
    let mut buf = [0u8; BLOCK_SIZE];
    block.encode(&mut buf);
    device.write_block(block_id, &buf)
}

pub fn get_dir(device: &impl BlockDevice, block_id: BlockId) -> Result<DirNode> {
    match get_block(device, block_id)? {
        Block::Directory(dir) => Ok(dir),
        Block::Inode(_) => Err(FsError::NotADirectory),
    }
}

pub fn get_inode(device: &impl BlockDevice, block_id: BlockId) -> Result<Inode> {
    match get_block(device, block_id)? {
        Block::Inode(inode) => Ok(inode),
        Block::Directory(_) => Err(FsError::IsADirectory),
    }
}

pub fn write_dir(device: &impl BlockDevice, block_id: BlockId, dir: &DirNode) -> Result<()> {
    check_range(block_id)?;
    let mut buf = [0u8; BLOCK_SIZE];
    dir.encode(&mut buf);
    device.write_block(block_id, &buf)
}

pub fn write_inode(device: &impl BlockDevice, block_id: BlockId, inode: &Inode) -> Result<()> {
    check_range(block_id)?;
    let mut buf = [0u8; BLOCK_SIZE];
    inode.encode(&mut buf);
    device.write_block(block_id, &buf)
}
