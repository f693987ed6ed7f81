use thiserror::Error;

use crate::config::{BlockId, BLOCK_SIZE, MAX_FILE_SIZE, MAX_NAME_LENGTH, NUM_BLOCKS};

#[derive(Error, Debug)]
pub enum FsError {
    #[error("no such file or directory")]
    NotFound,

    #[error("file already exists")]
    AlreadyExists,

    #[error("not a directory")]
    NotADirectory,

    #[error("is a directory")]
    IsADirectory,

    #[error("directory is not empty")]
    NotEmpty,

    #[error("name exceeds the maximum length of {max} bytes", max = MAX_NAME_LENGTH)]
    NameTooLong,

    /// Empty names, or names containing a NUL byte.
    #[error("invalid name")]
    InvalidName,

    #[error("directory is full (max entries reached)")]
    DirFull,

    #[error("file is full (max file size of {max} bytes reached)", max = MAX_FILE_SIZE)]
    FileTooLarge,

    #[error("disk is full")]
    DiskFull,

    #[error("block {0} is out of range")]
    InvalidBlockId(BlockId),

    /// The block decoded to something the layout does not allow.
    #[error("block {0} is corrupted")]
    Corrupted(BlockId),

    #[error("device has {0} blocks, at least {min} required", min = NUM_BLOCKS)]
    DeviceTooSmall(usize),

    #[error("device block size is {0} bytes, expected {size}", size = BLOCK_SIZE)]
    BlockSizeMismatch(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = core::result::Result<T, FsError>;
