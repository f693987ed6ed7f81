use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};

use crate::bitmap::{alloc_block, free_block, free_blocks, reserve_system_blocks};
use crate::config::*;
use crate::disk::FileDisk;
use crate::file::{fappend, fread};
use crate::inode::{get_block, get_dir, get_inode, write_block, write_dir};
use crate::structs::*;
use crate::{BlockDevice, Error, Result};

/// Names of the current directory's children, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub directories: Vec<String>,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Directory,
    File { size: u32, data_blocks: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub name: String,
    /// Block of the directory node, or of the inode for regular files.
    pub block_id: BlockId,
    pub kind: StatKind,
}

impl Stat {
    pub fn is_dir(&self) -> bool {
        self.kind == StatKind::Directory
    }
}

/// A mounted file system. Holds the device and the current directory.
#[derive(Debug)]
pub struct FileSystem<D: BlockDevice> {
    device: Arc<D>,
    cwd: BlockId,
}

impl FileSystem<FileDisk> {
    /// Opens (or creates) the disk image at `path` and mounts it.
    pub fn open(path: impl AsRef<Path>, options: MountOptions) -> Result<Self> {
        let disk = FileDisk::open(path)?;
        Self::mount(Arc::new(disk), options)
    }
}

impl<D: BlockDevice> FileSystem<D> {
    pub fn mount(device: Arc<D>, options: MountOptions) -> Result<Self> {
        if device.block_size() != BLOCK_SIZE {
            return Err(Error::BlockSizeMismatch(device.block_size()));
        }
        if device.num_blocks() < NUM_BLOCKS {
            return Err(Error::DeviceTooSmall(device.num_blocks()));
        }

        let repaired = reserve_system_blocks(&*device)?;
        if repaired || options.reset_root {
            if !repaired {
                warn!("resetting root directory, previous contents become unreachable");
            }
            write_block(&*device, ROOT_BLOCK_ID, &Block::empty_dir())?;
        } else if get_block(&*device, ROOT_BLOCK_ID)?.ftype() != FileType::Directory {
            return Err(Error::Corrupted(ROOT_BLOCK_ID));
        }
        debug!("mounted (fresh root: {})", repaired || options.reset_root);

        Ok(Self {
            device,
            cwd: ROOT_BLOCK_ID,
        })
    }

    /// Flushes and releases the device.
    pub fn unmount(self) -> Result<()> {
        self.device.flush()?;
        debug!("unmounted");
        Ok(())
    }

    // Following methods operate on the current directory.

    pub fn mkdir(&mut self, name: &str) -> Result<BlockId> {
        let mut cwd_node = self.prepare_insert(name)?;
        let block_id = alloc_block(&*self.device)?.ok_or(Error::DiskFull)?;

        write_block(&*self.device, block_id, &Block::empty_dir())?;
        cwd_node.add_entry(block_id, name.as_bytes())?;
        write_dir(&*self.device, self.cwd, &cwd_node)?;

        debug!("[mkdir] {} -> block {}", name, block_id);
        Ok(block_id)
    }

    /// `None` goes back to the root directory.
    pub fn chdir(&mut self, name: Option<&str>) -> Result<()> {
        let Some(name) = name else {
            self.cwd = ROOT_BLOCK_ID;
            return Ok(());
        };

        let (block_id, block) = self.find(name)?;
        if block.ftype() != FileType::Directory {
            return Err(Error::NotADirectory);
        }
        self.cwd = block_id;
        debug!("[chdir] {} -> block {}", name, block_id);
        Ok(())
    }

    pub fn ls(&self) -> Result<Listing> {
        let cwd_node = get_dir(&*self.device, self.cwd)?;
        let mut listing = Listing::default();
        for entry in &cwd_node.entries {
            let name = entry.name_str().into_owned();
            match get_block(&*self.device, entry.block_id)?.ftype() {
                FileType::Directory => listing.directories.push(name),
                FileType::Regular => listing.files.push(name),
            }
        }
        Ok(listing)
    }

    pub fn rmdir(&mut self, name: &str) -> Result<()> {
        let mut cwd_node = get_dir(&*self.device, self.cwd)?;
        let index = cwd_node.lookup(name.as_bytes()).ok_or(Error::NotFound)?;
        let block_id = cwd_node.entries[index].block_id;

        match get_block(&*self.device, block_id)? {
            Block::Inode(_) => return Err(Error::NotADirectory),
            Block::Directory(dir) if !dir.is_empty() => return Err(Error::NotEmpty),
            Block::Directory(_) => {}
        }

        free_block(&*self.device, block_id)?;
        cwd_node.remove_entry(index);
        write_dir(&*self.device, self.cwd, &cwd_node)?;

        debug!("[rmdir] {} (block {})", name, block_id);
        Ok(())
    }

    pub fn creat(&mut self, name: &str) -> Result<BlockId> {
        let mut cwd_node = self.prepare_insert(name)?;
        let block_id = alloc_block(&*self.device)?.ok_or(Error::DiskFull)?;

        write_block(&*self.device, block_id, &Block::empty_inode())?;
        cwd_node.add_entry(block_id, name.as_bytes())?;
        write_dir(&*self.device, self.cwd, &cwd_node)?;

        debug!("[creat] {} -> block {}", name, block_id);
        Ok(block_id)
    }

    /// Deletes a regular file along with all of its data blocks.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let mut cwd_node = get_dir(&*self.device, self.cwd)?;
        let index = cwd_node.lookup(name.as_bytes()).ok_or(Error::NotFound)?;
        let block_id = cwd_node.entries[index].block_id;
        let inode = get_inode(&*self.device, block_id)?;

        // Release everything before the entry disappears from the directory.
        free_block(&*self.device, block_id)?;
        for &data_block in &inode.data_blocks {
            free_block(&*self.device, data_block)?;
        }
        cwd_node.remove_entry(index);
        write_dir(&*self.device, self.cwd, &cwd_node)?;

        debug!(
            "[remove] {} (inode {}, {} data blocks)",
            name,
            block_id,
            inode.data_blocks.len()
        );
        Ok(())
    }

    pub fn stat(&self, name: &str) -> Result<Stat> {
        let (block_id, block) = self.find(name)?;
        let kind = match block {
            Block::Directory(_) => StatKind::Directory,
            Block::Inode(inode) => StatKind::File {
                size: inode.size,
                data_blocks: Inode::blocks_for(inode.size as usize) as u16,
            },
        };
        Ok(Stat {
            name: name.to_string(),
            block_id,
            kind,
        })
    }

    /// Appends `data` to the end of a regular file. Returns the number of bytes written.
    pub fn append(&mut self, name: &str, data: &[u8]) -> Result<usize> {
        let (block_id, mut inode) = self.find_file(name)?;
        let written = fappend(&*self.device, block_id, &mut inode, data)?;
        debug!("[append] {} bytes to {} (size now {})", written, name, inode.size);
        Ok(written)
    }

    /// Reads up to `max_bytes` from the start of a regular file.
    pub fn read(&self, name: &str, max_bytes: usize) -> Result<Vec<u8>> {
        let (_, inode) = self.find_file(name)?;
        let mut buf = vec![0u8; max_bytes.min(inode.size as usize)];
        let count = fread(&*self.device, &inode, &mut buf)?;
        buf.truncate(count);
        Ok(buf)
    }

    /// Reads from the start of a regular file into `buf`.
    /// Returns the number of bytes copied, never more than the file size.
    pub fn read_into(&self, name: &str, buf: &mut [u8]) -> Result<usize> {
        let (_, inode) = self.find_file(name)?;
        fread(&*self.device, &inode, buf)
    }

    pub fn cwd(&self) -> BlockId {
        self.cwd
    }

    pub fn root_block_id(&self) -> BlockId {
        ROOT_BLOCK_ID
    }

    pub fn free_blocks(&self) -> Result<usize> {
        free_blocks(&*self.device)
    }

    pub fn device(&self) -> Arc<D> {
        Arc::clone(&self.device)
    }

    /// Looks `name` up in the current directory and decodes its block.
    fn find(&self, name: &str) -> Result<(BlockId, Block)> {
        let cwd_node = get_dir(&*self.device, self.cwd)?;
        let index = cwd_node.lookup(name.as_bytes()).ok_or(Error::NotFound)?;
        let block_id = cwd_node.entries[index].block_id;
        Ok((block_id, get_block(&*self.device, block_id)?))
    }

    fn find_file(&self, name: &str) -> Result<(BlockId, Inode)> {
        match self.find(name)? {
            (block_id, Block::Inode(inode)) => Ok((block_id, inode)),
            (_, Block::Directory(_)) => Err(Error::IsADirectory),
        }
    }

    /// Runs every check a new entry must pass, in order: name, disk space,
    /// directory capacity, uniqueness. Returns the current directory node.
    fn prepare_insert(&self, name: &str) -> Result<DirNode> {
        let name = name.as_bytes();
        if name.len() > MAX_NAME_LENGTH {
            return Err(Error::NameTooLong);
        }
        if name.is_empty() || name.contains(&0) {
            return Err(Error::InvalidName);
        }
        if free_blocks(&*self.device)? == 0 {
            return Err(Error::DiskFull);
        }
        let cwd_node = get_dir(&*self.device, self.cwd)?;
        cwd_node.check_insert(name)?;
        Ok(cwd_node)
    }
}
