//! Errors produced while generating a memory layout.

use crate::layout::MemoryRegion;

/// Everything that can stop a linker script from being generated.
///
/// All errors are fatal. The generator never writes a partial script,
/// so any error means that no output was produced.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An unrecognized command-line option.
    #[error("Unknown option '{0}'")]
    UnknownFlag(String),

    /// No board descriptor exists for the requested name.
    #[error("Unknown board '{0}'")]
    UnknownBoard(String),

    /// The caller's build mode disagrees with the board descriptor
    /// about whether a bootloader is present.
    #[error(
        "Build flags ({requested}) and board descriptor ({board}) do not agree on whether a bootloader is present"
    )]
    ConfigurationMismatch { requested: bool, board: bool },

    /// The bootloader reservation leaves no flash for the firmware.
    #[error("Bootloader reserves {reserved} bytes, but the chip only has {flash} bytes of flash")]
    InsufficientFlash { flash: u32, reserved: u32 },

    /// A memory region computed to zero bytes.
    #[error("{region} region is empty")]
    EmptyRegion { region: &'static str },

    /// A region base violates its required alignment.
    #[error("{region} base {base:#x} is not aligned to {align:#x}")]
    Misaligned {
        region: &'static str,
        base: u32,
        align: u32,
    },

    /// The FLASH and RAM regions share addresses.
    #[error("FLASH {flash} overlaps RAM {ram}")]
    RegionOverlap {
        flash: MemoryRegion,
        ram: MemoryRegion,
    },

    /// An address or size does not fit the 32-bit address space.
    #[error("{what} does not fit in the 32-bit address space")]
    AddressOverflow { what: &'static str },

    /// An environment override held something other than a byte count.
    #[error("Environment variable {key}={value:?} is not a size in bytes")]
    InvalidEnv { key: String, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
