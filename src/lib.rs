//! Jumbofs is a tiny hierarchical file system living in a single fixed-size disk image.
//! For simplicity, no support for permissions, timestamps, links or caching.
//!
//! Jumbofs's linear layout (64-byte blocks, 512 of them):
//! - Block 0: allocation bitmap
//! - Block 1: root directory
//! - Every other block: free, a directory node, an inode, or file data
//!
//! Jumbofs's layers (from bottom to top):
//! 1. Block Device: Abstraction for low level devices.         `BlockDevice`, `FileDisk`
//! 2. Bitmap: First-fit block allocation.                      `alloc_block`, `free_block`
//! 3. Blocks: Tagged directory nodes and inodes.               `Block`, `get_block`, `write_block`
//! 4. Directory/File: Entry tables and data block access.      `DirNode`, `fread`, `fappend`
//! 5. FileSystem: Session with a current directory.            `FileSystem`
//! 6. Shell: Command interpreter behind the `jfs` binary.      `shell::run_command`

mod config;
mod block_dev;
mod disk;
mod structs;
mod bitmap;
mod inode;
mod directory;
mod file;
mod fs;
mod error;
pub mod shell;

pub use block_dev::BlockDevice;
pub use config::*;
pub use disk::FileDisk;
pub use structs::*;
pub use bitmap::{alloc_block, free_block, free_blocks, is_allocated, reserve_system_blocks};
pub use inode::*;
pub use directory::trim_zero;
pub use file::*;
pub use fs::*;
pub use error::FsError as Error;
pub use error::Result;
