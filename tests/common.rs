//! Common utilities for tests
#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use jumbofs::{BlockDevice, BlockId, Error, FileSystem, MountOptions, Result, BLOCK_SIZE, NUM_BLOCKS};

pub const ORANGE: &str = "\x1b[38;5;214m";
pub const RESET: &str = "\x1b[0m";

/// Provides a macro for logging messages during tests.
/// e.g. log!("placeholder") -> println!("[test] placeholder");
#[macro_export]
macro_rules! log {
    ($msg:expr) => {
        println!("{}[test] {}{}", crate::common::ORANGE, $msg, crate::common::RESET)
    };
    ($msg:expr, $($arg:tt)*) => {
        println!("{}[test] {}{}", crate::common::ORANGE, format!($msg, $($arg)*), crate::common::RESET)
    };
}

pub struct RamDisk {
    inner: Mutex<Vec<u8>>,
    num_blocks: usize,
}

impl RamDisk {
    /// Creates a new zero-filled RamDisk with the specified number of blocks.
    pub fn new(num_blocks: usize) -> Self {
        RamDisk {
            inner: Mutex::new(vec![0u8; num_blocks * BLOCK_SIZE]),
            num_blocks,
        }
    }

    /// Raw copy of a block, bypassing the file system.
    pub fn peek(&self, block_id: BlockId) -> [u8; BLOCK_SIZE] {
        let start = block_id as usize * BLOCK_SIZE;
        let mut buf = [0u8; BLOCK_SIZE];
        buf.copy_from_slice(&self.inner.lock().unwrap()[start..start + BLOCK_SIZE]);
        buf
    }
}

impl BlockDevice for RamDisk {
    fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    fn read_block(&self, block_id: BlockId, buf: &mut [u8; BLOCK_SIZE]) -> Result<()> {
        if block_id as usize >= self.num_blocks {
            return Err(Error::InvalidBlockId(block_id));
        }
        let start = block_id as usize * BLOCK_SIZE;
        let data = self.inner.lock().unwrap();
        buf.copy_from_slice(&data[start..start + BLOCK_SIZE]);
        Ok(())
    }

    fn write_block(&self, block_id: BlockId, buf: &[u8; BLOCK_SIZE]) -> Result<()> {
        if block_id as usize >= self.num_blocks {
            return Err(Error::InvalidBlockId(block_id));
        }
        let start = block_id as usize * BLOCK_SIZE;
        let mut data = self.inner.lock().unwrap();
        data[start..start + BLOCK_SIZE].copy_from_slice(buf);
        Ok(())
    }
}

/// A RamDisk whose writes can be switched to fail, either all of them
/// or only those hitting one chosen block.
pub struct FaultyDisk {
    disk: RamDisk,
    fail_writes: AtomicBool,
    fail_block: Mutex<Option<BlockId>>,
}

impl FaultyDisk {
    pub fn new() -> Self {
        FaultyDisk {
            disk: RamDisk::new(NUM_BLOCKS),
            fail_writes: AtomicBool::new(false),
            fail_block: Mutex::new(None),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes_to(&self, block_id: Option<BlockId>) {
        *self.fail_block.lock().unwrap() = block_id;
    }

    pub fn peek(&self, block_id: BlockId) -> [u8; BLOCK_SIZE] {
        self.disk.peek(block_id)
    }
}

impl BlockDevice for FaultyDisk {
    fn num_blocks(&self) -> usize {
        self.disk.num_blocks()
    }

    fn read_block(&self, block_id: BlockId, buf: &mut [u8; BLOCK_SIZE]) -> Result<()> {
        self.disk.read_block(block_id, buf)
    }

    fn write_block(&self, block_id: BlockId, buf: &[u8; BLOCK_SIZE]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst)
            || *self.fail_block.lock().unwrap() == Some(block_id)
        {
            return Err(io::Error::other("injected write failure").into());
        }
        self.disk.write_block(block_id, buf)
    }
}

/// Mounts a fresh, zeroed RamDisk.
pub fn fresh_fs() -> FileSystem<RamDisk> {
    FileSystem::mount(Arc::new(RamDisk::new(NUM_BLOCKS)), MountOptions::default()).unwrap()
}

/// Allocates blocks behind the file system's back until only `left` remain free.
pub fn fill_disk<D: BlockDevice>(fs: &FileSystem<D>, left: usize) {
    let device = fs.device();
    while fs.free_blocks().unwrap() > left {
        jumbofs::alloc_block(&*device).unwrap().unwrap();
    }
}

/// Deterministic, non-repeating-per-block test payload.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + i / BLOCK_SIZE) as u8).collect()
}
