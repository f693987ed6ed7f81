//! Byte-level access to a file's data blocks.

use log::trace;

use crate::bitmap::alloc_block;
use crate::config::{BlockId, BLOCK_SIZE, MAX_FILE_SIZE};
use crate::error::{FsError, Result};
use crate::inode::write_inode;
use crate::structs::Inode;
use crate::BlockDevice;

/// Reads from the start of the file into `buffer`, stopping at the end of the file.
/// Returns the number of bytes read.
pub fn fread(device: &impl BlockDevice, inode: &Inode, buffer: &mut [u8]) -> Result<usize> {
    let count = buffer.len().min(inode.size as usize);
    let mut block_buf = [0u8; BLOCK_SIZE];

    for (chunk, &block_id) in buffer[..count]
        .chunks_mut(BLOCK_SIZE)
        .zip(inode.data_blocks.iter())
    {
        device.read_block(block_id, &mut block_buf)?;
        chunk.copy_from_slice(&block_buf[..chunk.len()]);
    }

    Ok(count)
}

/// Appends `data` to the end of the file whose inode lives in `inode_block`.
///
/// The partially filled last block is topped off first, then fresh blocks are
/// allocated one at a time. The inode is persisted after every chunk, so when
/// the disk fills up midway the chunks written so far stay part of the file.
pub fn fappend(
    device: &impl BlockDevice,
    inode_block: BlockId,
    inode: &mut Inode,
    data: &[u8],
) -> Result<usize> {
    if inode.size as usize + data.len() > MAX_FILE_SIZE {
        return Err(FsError::FileTooLarge);
    }
    if data.is_empty() {
        return Ok(0);
    }

    let mut written = 0;
    let mut block_buf = [0u8; BLOCK_SIZE];

    let tail = inode.size as usize % BLOCK_SIZE;
    if tail != 0 {
        let last = *inode
            .data_blocks
            .last()
            .ok_or(FsError::Corrupted(inode_block))?;
        let n = (BLOCK_SIZE - tail).min(data.len());
        device.read_block(last, &mut block_buf)?;
        block_buf[tail..tail + n].copy_from_slice(&data[..n]);
        device.write_block(last, &block_buf)?;

        written += n;
        inode.size += n as u32;
        write_inode(device, inode_block, inode)?;
        trace!("[fappend] topped off block {} with {} bytes", last, n);
    }

    for chunk in data[written..].chunks(BLOCK_SIZE) {
        let block_id = alloc_block(device)?.ok_or(FsError::DiskFull)?;
        block_buf.fill(0);
        block_buf[..chunk.len()].copy_from_slice(chunk);
        device.write_block(block_id, &block_buf)?;

        inode.data_blocks.push(block_id);
        inode.size += chunk.len() as u32;
        write_inode(device, inode_block, inode)?;
        written += chunk.len();
        trace!("[fappend] wrote {} bytes to new block {}", chunk.len(), block_id);
    }

    Ok(written)
}
