//! build-linker - generate a linker script for an STM32 board
//!
//! Reads the board's descriptor, checks the build mode against it, then
//! writes a linker script with the board's flash and RAM layout.
//!
//! ```text
//! build-linker BOARD LINKER_FILE [--bootloader | --using_bootloader]
//! ```

mod cli;

use board::BoardDatabase;
use cli::Cli;
use std::{path::Path, process::ExitCode};

fn main() -> ExitCode {
    let cli = match cli::parse() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    // RUST_LOG wins over -v.
    let default_filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let db = load_board_database(cli.board_db.as_deref())?;
    log::debug!("{} boards known", db.len());

    if cli.list_boards {
        for name in db.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let (Some(board_name), Some(linker_file)) = (&cli.board, &cli.linker_file) else {
        return Err("A board name and a linker file are required".into());
    };

    log::info!("Board {board_name}, writing {}", linker_file.display());
    log::debug!(
        "Bootloader: {}, using bootloader: {}",
        cli.bootloader,
        cli.using_bootloader
    );

    // Nothing touches the output path until the layout is known to be valid.
    db.lookup(board_name)?
        .builder()
        .is_bootloader(cli.bootloader)
        .uses_bootloader(cli.using_bootloader)
        .write_to_path(linker_file)?;
    Ok(())
}

/// Built-in boards, plus any descriptors found at `path`.
fn load_board_database(path: Option<&Path>) -> Result<BoardDatabase, Box<dyn std::error::Error>> {
    let mut db = BoardDatabase::builtin()?;

    if let Some(path) = path {
        if path.is_dir() {
            let count = db.load_dir(path)?;
            log::debug!("Loaded {count} boards from {}", path.display());
        } else if path.is_file() {
            db.load_file(path)?;
        } else {
            return Err(format!("Board database path not found: {}", path.display()).into());
        }
    }
    Ok(db)
}
