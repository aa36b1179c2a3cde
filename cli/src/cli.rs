//! CLI argument parsing

use clap::{
    error::{ContextKind, ErrorKind},
    ArgAction, Parser,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "build-linker")]
#[command(version, about = "Generate a linker script for an STM32 board", long_about = None)]
pub struct Cli {
    /// Board name, as written in its descriptor
    #[arg(required_unless_present = "list_boards")]
    pub board: Option<String>,

    /// Where to write the linker script
    #[arg(required_unless_present = "list_boards")]
    pub linker_file: Option<PathBuf>,

    /// The image is a bootloader; place it where the bootloader lives
    #[arg(long = "bootloader", conflicts_with = "using_bootloader")]
    pub bootloader: bool,

    /// Step forward in flash to leave room for a bootloader
    #[arg(long = "using_bootloader", visible_alias = "uses-bootloader")]
    pub using_bootloader: bool,

    /// Extra board descriptors: a RON file, or a directory of them
    #[arg(long)]
    pub board_db: Option<PathBuf>,

    /// Print the known board names and exit
    #[arg(long)]
    pub list_boards: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Parse the process arguments.
///
/// Help and version requests, and usage errors, exit through clap. An
/// unknown option is returned as [`stm32_ldgen::Error::UnknownFlag`].
pub fn parse() -> Result<Cli, stm32_ldgen::Error> {
    parse_from(std::env::args_os())
}

pub fn parse_from<I, T>(args: I) -> Result<Cli, stm32_ldgen::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli),
        Err(err) if err.kind() == ErrorKind::UnknownArgument => {
            let flag = err
                .get(ContextKind::InvalidArg)
                .map(|arg| arg.to_string())
                .unwrap_or_default();
            Err(stm32_ldgen::Error::UnknownFlag(flag))
        }
        Err(err) => err.exit(),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_from, Cli};
    use clap::{error::ErrorKind, Parser};
    use std::path::Path;
    use stm32_ldgen::Error;

    #[test]
    fn positional_arguments() -> Result<(), Error> {
        let cli = parse_from(["build-linker", "PICO_R1_3", "linker.ld"])?;
        assert_eq!(cli.board.as_deref(), Some("PICO_R1_3"));
        assert_eq!(cli.linker_file.as_deref(), Some(Path::new("linker.ld")));
        assert!(!cli.bootloader);
        assert!(!cli.using_bootloader);
        Ok(())
    }

    #[test]
    fn bootloader_flags() -> Result<(), Error> {
        let cli = parse_from(["build-linker", "PICO_R1_3", "out.ld", "--bootloader"])?;
        assert!(cli.bootloader);

        let cli = parse_from(["build-linker", "PICO_R1_3", "out.ld", "--using_bootloader"])?;
        assert!(cli.using_bootloader);

        let cli = parse_from(["build-linker", "PICO_R1_3", "out.ld", "--uses-bootloader"])?;
        assert!(cli.using_bootloader);
        Ok(())
    }

    #[test]
    fn unknown_flag() {
        let res = parse_from(["build-linker", "PICO_R1_3", "out.ld", "--bootloader_leave_space"]);
        assert!(
            matches!(&res, Err(Error::UnknownFlag(flag)) if flag == "--bootloader_leave_space"),
            "{res:?}"
        );
    }

    #[test]
    fn bootloader_flags_conflict() {
        let res = Cli::try_parse_from([
            "build-linker",
            "PICO_R1_3",
            "out.ld",
            "--bootloader",
            "--using_bootloader",
        ]);
        assert_eq!(res.map(|_| ()).unwrap_err().kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn list_boards_needs_no_positionals() -> Result<(), Error> {
        let cli = parse_from(["build-linker", "--list-boards"])?;
        assert!(cli.list_boards);
        assert!(cli.board.is_none());
        Ok(())
    }

    #[test]
    fn verbosity() -> Result<(), Error> {
        let cli = parse_from(["build-linker", "-vv", "PICO_R1_3", "out.ld"])?;
        assert_eq!(cli.verbose, 2);
        Ok(())
    }
}
