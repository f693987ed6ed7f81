//! Line-oriented command interpreter used by the `jfs` binary.

use std::io::{self, Write};

use crate::config::MAX_FILE_SIZE;
use crate::fs::{FileSystem, StatKind};
use crate::{BlockDevice, Error};

pub const PROMPT: &str = "jfs$ ";
const MAX_ARGS: usize = 2;

/// What the prompt loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Formats an operation error the way the shell reports it.
pub fn describe(err: &Error, name: &str) -> String {
    match err {
        Error::DirFull | Error::FileTooLarge | Error::DiskFull | Error::Io(_) => err.to_string(),
        _ => format!("{}: {}", name, err),
    }
}

/// Runs one command line. Regular output goes to `out`, usage problems to `err`.
pub fn run_command<D: BlockDevice>(
    fs: &mut FileSystem<D>,
    line: &str,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<Flow> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&command, args)) = tokens.split_first() else {
        return Ok(Flow::Continue);
    };
    if args.len() > MAX_ARGS {
        writeln!(err, "ERROR: too many arguments on the command line")?;
        return Ok(Flow::Continue);
    }

    match (command, args) {
        ("exit", []) => return Ok(Flow::Exit),
        ("cd", []) => report(fs.chdir(None), "", out)?,
        ("cd", [dir]) => report(fs.chdir(Some(*dir)), dir, out)?,
        ("cd", _) => writeln!(
            err,
            "usage: cd [dir_name]\n(dir_name is optional; leaving it out will return to the root directory)"
        )?,
        ("mkdir", [dir]) => report(fs.mkdir(dir), dir, out)?,
        ("mkdir", _) => writeln!(err, "usage: mkdir <dir_name>")?,
        ("rmdir", [dir]) => report(fs.rmdir(dir), dir, out)?,
        ("rmdir", _) => writeln!(err, "usage: rmdir <dir_name>")?,
        ("ls", []) => match fs.ls() {
            Ok(listing) => {
                for dir in &listing.directories {
                    writeln!(out, "{}/", dir)?;
                }
                for file in &listing.files {
                    writeln!(out, "{}", file)?;
                }
            }
            Err(e) => writeln!(out, "ls failed: {}", e)?,
        },
        ("ls", _) => writeln!(err, "usage: ls")?,
        ("touch", [file]) => report(fs.creat(file), file, out)?,
        ("touch", _) => writeln!(err, "usage: touch <file_name>")?,
        ("rm", [file]) => report(fs.remove(file), file, out)?,
        ("rm", _) => writeln!(err, "usage: rm <file_name>")?,
        ("stat", [name]) => match fs.stat(name) {
            Ok(stat) => match stat.kind {
                StatKind::Directory => {
                    writeln!(out, "Directory name: {}", stat.name)?;
                    writeln!(out, "Directory block number: {}", stat.block_id)?;
                }
                StatKind::File { size, data_blocks } => {
                    writeln!(out, "File name: {}", stat.name)?;
                    writeln!(out, "Inode block number: {}", stat.block_id)?;
                    writeln!(out, "Number of data blocks: {}", data_blocks)?;
                    writeln!(out, "File size: {}", size)?;
                }
            },
            Err(e) => writeln!(out, "{}", describe(&e, name))?,
        },
        ("stat", _) => writeln!(err, "usage: stat <file_name>")?,
        ("cat", [file]) => print_file(fs, file, MAX_FILE_SIZE, out)?,
        ("cat", _) => writeln!(err, "usage: cat <file_name>")?,
        ("head", [file, count]) => match count.parse::<usize>() {
            Ok(count) => print_file(fs, file, count.min(MAX_FILE_SIZE), out)?,
            Err(_) => writeln!(
                err,
                "usage: head <file_name> <num_bytes>\n<num_bytes> must be an integer."
            )?,
        },
        ("head", _) => writeln!(err, "usage: head <file_name> <num_bytes>")?,
        ("append", [file, data]) => report(fs.append(file, data.as_bytes()), file, out)?,
        ("append", _) => writeln!(err, "usage: append <file_name> <data>")?,
        _ => writeln!(err, "ERROR: unrecognized command")?,
    }

    Ok(Flow::Continue)
}

fn report<T>(result: crate::Result<T>, name: &str, out: &mut impl Write) -> io::Result<()> {
    if let Err(e) = result {
        writeln!(out, "{}", describe(&e, name))?;
    }
    Ok(())
}

fn print_file<D: BlockDevice>(
    fs: &FileSystem<D>,
    name: &str,
    max_bytes: usize,
    out: &mut impl Write,
) -> io::Result<()> {
    match fs.read(name, max_bytes) {
        Ok(data) => {
            out.write_all(&data)?;
            writeln!(out)
        }
        Err(e) => writeln!(out, "{}", describe(&e, name)),
    }
}
