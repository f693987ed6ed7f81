//! Block allocation bitmap, stored in block 0.
//! Bit `id % 8` of byte `id / 8` is set when block `id` is allocated.

use log::trace;

use crate::config::*;
use crate::error::{FsError, Result};
use crate::BlockDevice;

fn read_bitmap(device: &impl BlockDevice) -> Result<[u8; BLOCK_SIZE]> {
    let mut buf = [0u8; BLOCK_SIZE];
    device.read_block(BITMAP_BLOCK_ID, &mut buf)?;
    Ok(buf)
}

fn bit_is_set(bitmap: &[u8; BLOCK_SIZE], block_id: BlockId) -> bool {
    let id = block_id as usize;
    bitmap[id / 8] & (1 << (id % 8)) != 0
}

/// Index of the first clear bit, lowest block id first.
fn first_clear_bit(bitmap: &[u8; BLOCK_SIZE]) -> Option<BlockId> {
    bitmap
        .iter()
        .enumerate()
        .find(|(_, byte)| **byte != u8::MAX)
        .map(|(i, byte)| i * 8 + byte.trailing_ones() as usize)
        .filter(|&id| id < NUM_BLOCKS)
        .map(|id| id as BlockId)
}

/// Sets a specific bit in the bitmap and persists it.
/// Returns previously set value of the bit.
fn set_bit_at(device: &impl BlockDevice, block_id: BlockId, set_value: bool) -> Result<bool> {
    if block_id as usize >= NUM_BLOCKS {
        return Err(FsError::InvalidBlockId(block_id));
    }

    let mut bitmap = read_bitmap(device)?;
    let pre_value = bit_is_set(&bitmap, block_id);
    let (byte, bit) = (block_id as usize / 8, block_id as usize % 8);
    if set_value {
        bitmap[byte] |= 1 << bit;
    } else {
        bitmap[byte] &= !(1 << bit);
    }
    device.write_block(BITMAP_BLOCK_ID, &bitmap)?;

    Ok(pre_value)
}

/// Allocates the free block with the lowest id.
/// Returns `None` when every block is taken; the caller owns the block from here on.
pub fn alloc_block(device: &impl BlockDevice) -> Result<Option<BlockId>> {
    let mut bitmap = read_bitmap(device)?;
    let Some(block_id) = first_clear_bit(&bitmap) else {
        trace!("[alloc_block] no free block");
        return Ok(None);
    };
    bitmap[block_id as usize / 8] |= 1 << (block_id % 8);
    device.write_block(BITMAP_BLOCK_ID, &bitmap)?;
    trace!("[alloc_block] allocated block {}", block_id);
    Ok(Some(block_id))
}

/// Releases a block. Releasing a free block is a no-op.
/// Returns whether the block was allocated before the call.
pub fn free_block(device: &impl BlockDevice, block_id: BlockId) -> Result<bool> {
    let was_set = set_bit_at(device, block_id, false)?;
    trace!("[free_block] released block {} (was allocated: {})", block_id, was_set);
    Ok(was_set)
}

pub fn is_allocated(device: &impl BlockDevice, block_id: BlockId) -> Result<bool> {
    if block_id as usize >= NUM_BLOCKS {
        return Err(FsError::InvalidBlockId(block_id));
    }
    Ok(bit_is_set(&read_bitmap(device)?, block_id))
}

/// Number of blocks still available to `alloc_block`.
pub fn free_blocks(device: &impl BlockDevice) -> Result<usize> {
    let bitmap = read_bitmap(device)?;
    let used: usize = bitmap.iter().map(|b| b.count_ones() as usize).sum();
    Ok(NUM_BLOCKS - used)
}

/// Marks the bitmap block and the root directory block as allocated.
/// Leaves every other bit alone. Returns whether the bitmap needed repair.
pub fn reserve_system_blocks(device: &impl BlockDevice) -> Result<bool> {
    let mut bitmap = read_bitmap(device)?;
    if bit_is_set(&bitmap, BITMAP_BLOCK_ID) && bit_is_set(&bitmap, ROOT_BLOCK_ID) {
        return Ok(false);
    }
    for id in [BITMAP_BLOCK_ID, ROOT_BLOCK_ID] {
        bitmap[id as usize / 8] |= 1 << (id % 8);
    }
    device.write_block(BITMAP_BLOCK_ID, &bitmap)?;
    Ok(true)
}
