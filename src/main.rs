use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use jumbofs::shell::{run_command, Flow, PROMPT};
use jumbofs::{FileSystem, MountOptions};

#[derive(Parser)]
#[command(about = "Interactive shell for a jumbofs disk image")]
struct Args {
    /// Disk image path, created if missing
    #[arg(short, long, default_value = "DISK")]
    disk: PathBuf,

    /// Start from an empty root directory even if the image already holds one
    #[arg(long)]
    reset_root: bool,

    /// Log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

static LOGGER: StderrLogger = StderrLogger;
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logger(verbose: u8) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| {
        log::set_max_level(match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
    })
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logger(args.verbose) {
        eprintln!("failed to install logger: {}", e);
    }

    let options = MountOptions::new().reset_root(args.reset_root);
    let mut fs = match FileSystem::open(&args.disk, options) {
        Ok(fs) => fs,
        Err(e) => {
            eprintln!("failed to mount {}: {}", args.disk.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = prompt_loop(&mut fs) {
        eprintln!("FATAL ERROR: {}", e);
        return ExitCode::FAILURE;
    }

    match fs.unmount() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("failed to unmount {}: {}", args.disk.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn prompt_loop(fs: &mut FileSystem<jumbofs::FileDisk>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let mut line = String::new();

    loop {
        write!(stdout, "{}", PROMPT)?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            // End of input behaves like `exit`.
            writeln!(stdout)?;
            return Ok(());
        }
        if run_command(fs, &line, &mut stdout, &mut stderr)? == Flow::Exit {
            return Ok(());
        }
    }
}
