//! Host-side linker script generation.
//!
//! See [`LinkerScriptBuilder::build`] and [`LinkerScriptBuilder::write_to_path`]
//! to understand how the script reaches the linker.

use std::{
    env,
    io::Write,
    path::{Path, PathBuf},
};

use crate::{emit, BootInfo, ChipInfo, Error, Layout, MemoryBases, Mode};

#[derive(Debug, Clone, PartialEq, Eq)]
struct EnvOverride {
    default: Option<u32>,
    env: Option<String>,
}

impl EnvOverride {
    const fn new(default: Option<u32>) -> Self {
        Self { default, env: None }
    }
    fn set_env_key(&mut self, key: String) {
        self.env = Some(key);
    }
    /// Cargo directive that re-runs a build script when the override changes.
    fn rerun_directive(&self) -> Option<String> {
        self.env
            .as_ref()
            .map(|env| format!("cargo:rerun-if-env-changed={env}"))
    }
    fn read(&self) -> Result<Option<u32>, Error> {
        let Some((key, val)) = self
            .env
            .as_ref()
            .and_then(|key| env::var(key).ok().map(|val| (key, val)))
        else {
            return Ok(self.default);
        };
        parse_size(&val)
            .map(Some)
            .ok_or_else(|| Error::InvalidEnv {
                key: key.clone(),
                value: val.clone(),
            })
    }
}

/// Parse a byte count, accepting a `k` or `K` suffix for multiples of 1024.
fn parse_size(val: &str) -> Option<u32> {
    if let Some(kib) = val.strip_suffix(['k', 'K']) {
        kib.parse::<u32>().ok()?.checked_mul(1024)
    } else {
        val.parse::<u32>().ok()
    }
}

/// Builder for a board's linker script.
///
/// `LinkerScriptBuilder` collects the board facts and the requested build mode.
/// Nothing is checked until you ask for output. Then, the builder
///
/// 1. validates the build mode against the board's bootloader flag,
/// 2. computes the flash and RAM regions,
/// 3. renders the complete script in memory,
///
/// and only then writes anything. A configuration error never produces
/// an output file.
///
/// # Default values
///
/// ```
/// use stm32_ldgen::{ChipInfo, LinkerScriptBuilder};
///
/// let chip = ChipInfo::new("STM32F4", "STM32F401CDU6", 96, 384);
///
/// let mut b = LinkerScriptBuilder::new("PICO_R1_3", chip.clone(), false);
/// b.is_bootloader(false);
/// b.uses_bootloader(false);
/// b.flash_base(0x0800_0000);
/// b.ram_base(0x2000_0000);
/// b.linker_script_name("link.ld");
///
/// assert_eq!(b, LinkerScriptBuilder::new("PICO_R1_3", chip, false));
/// ```
///
/// # Environment overrides
///
/// The bootloader reservation may be sized by an environment variable. Select
/// the variable with [`bootloader_size_env_override`](Self::bootloader_size_env_override).
///
/// ```no_run
/// # use stm32_ldgen::{ChipInfo, LinkerScriptBuilder};
/// # let chip = ChipInfo::new("STM32F4", "STM32F401CDU6", 96, 384);
/// LinkerScriptBuilder::new("PICO_R1_3", chip, true)
///     .uses_bootloader(true)
///     .bootloader_size_env_override("BOOTLOADER_SIZE")
///     .build()
///     .unwrap();
/// ```
///
/// If a user sets `BOOTLOADER_SIZE=32k`, the firmware starts 32 KiB into
/// flash. A `k` or `K` suffix means multiples of 1024 bytes. Without the
/// variable, the reservation is the value given to
/// [`bootloader_size`](Self::bootloader_size), or the chip family's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkerScriptBuilder {
    board: String,
    chip: ChipInfo,
    has_bootloader: bool,
    is_bootloader: bool,
    uses_bootloader: bool,
    bases: MemoryBases,
    bootloader_size: EnvOverride,
    linker_script_name: String,
}

const DEFAULT_LINKER_SCRIPT_NAME: &str = "link.ld";

impl LinkerScriptBuilder {
    /// Creates a builder for plain firmware on `board`.
    ///
    /// `has_bootloader` is the board descriptor's claim that the board boots
    /// through a bootloader.
    pub fn new(board: impl Into<String>, chip: ChipInfo, has_bootloader: bool) -> Self {
        Self {
            board: board.into(),
            chip,
            has_bootloader,
            is_bootloader: false,
            uses_bootloader: false,
            bases: MemoryBases::default(),
            bootloader_size: EnvOverride::new(None),
            linker_script_name: DEFAULT_LINKER_SCRIPT_NAME.into(),
        }
    }

    /// Build the bootloader image itself.
    pub fn is_bootloader(&mut self, is_bootloader: bool) -> &mut Self {
        self.is_bootloader = is_bootloader;
        self
    }
    /// Build firmware that's started by a bootloader.
    pub fn uses_bootloader(&mut self, uses_bootloader: bool) -> &mut Self {
        self.uses_bootloader = uses_bootloader;
        self
    }
    /// Set the address where flash starts.
    pub fn flash_base(&mut self, address: u32) -> &mut Self {
        self.bases.flash = address;
        self
    }
    /// Set the address where RAM starts.
    pub fn ram_base(&mut self, address: u32) -> &mut Self {
        self.bases.ram = address;
        self
    }
    /// Set the size, in bytes, reserved for the bootloader.
    ///
    /// By default, the size depends on the chip family. See
    /// [`bootloader_size`](crate::bootloader_size).
    pub fn bootloader_size(&mut self, bytes: u32) -> &mut Self {
        self.bootloader_size.default = Some(bytes);
        self
    }
    /// Let end users override the bootloader size using an environment variable.
    ///
    /// See the [environment overrides](Self#environment-overrides) documentation
    /// for more information.
    pub fn bootloader_size_env_override(&mut self, key: impl AsRef<str>) -> &mut Self {
        self.bootloader_size.set_env_key(key.as_ref().into());
        self
    }
    /// Set the name of the linker script file written by [`build()`](Self::build).
    pub fn linker_script_name(&mut self, name: &str) -> &mut Self {
        self.linker_script_name = name.into();
        self
    }

    /// Validate the build mode, then compute the memory map.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigurationMismatch`] if the build mode disagrees with the
    /// board. See [`Layout::compute`] for the remaining errors.
    pub fn layout(&self) -> Result<(Mode, Layout), Error> {
        let mode = Mode::validate(self.is_bootloader, self.uses_bootloader, self.has_bootloader)?;
        let boot = BootInfo::for_chip(
            &self.chip,
            self.has_bootloader,
            self.bootloader_size.read()?,
        );
        let layout = Layout::compute(&self.chip, &boot, mode, &self.bases)?;
        Ok((mode, layout))
    }

    /// Commit the configuration from a build script.
    ///
    /// `build()` writes the script into `OUT_DIR` and makes it available
    /// to the linker.
    ///
    /// # Errors
    ///
    /// See [`layout()`](Self::layout). Also fails if `OUT_DIR` is unset, or
    /// if the script can't be written.
    pub fn build(&self) -> Result<(), Box<dyn std::error::Error>> {
        // Since `build` is called from a build script, the output directory
        // represents the path to the _user's_ crate.
        let out_dir = PathBuf::from(env::var("OUT_DIR")?);
        println!("cargo:rustc-link-search={}", out_dir.display());
        if let Some(rerun) = self.bootloader_size.rerun_directive() {
            println!("{rerun}");
        }
        self.write_to_path(out_dir.join(&self.linker_script_name))?;
        Ok(())
    }

    /// Write the linker script to `path`.
    ///
    /// The script is rendered in memory, written to a temporary file next to
    /// `path`, then moved into place. If anything fails, `path` is left
    /// untouched.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let mut in_memory = Vec::new();
        self.write_linker_script(&mut in_memory)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(&in_memory)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|err| err.error)?;
        log::info!("Wrote {} ({} bytes)", path.display(), in_memory.len());
        Ok(())
    }

    /// Write the generated linker script into the provided writer.
    ///
    /// Use this if you want more control over where the generated linker script
    /// ends up. Otherwise, prefer [`build()`](Self::build) or
    /// [`write_to_path()`](Self::write_to_path).
    ///
    /// The layout is fully computed before the first byte reaches `writer`.
    ///
    /// # Errors
    ///
    /// See [`layout()`](Self::layout) to understand the possible errors.
    pub fn write_linker_script(&self, writer: &mut dyn Write) -> Result<(), Error> {
        let (mode, layout) = self.layout()?;
        emit::write_linker_script(writer, &self.board, &layout, &self.chip, mode)?;
        Ok(())
    }
}
