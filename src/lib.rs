//! Memory layout and linker script generation for STM32 boards.
//!
//! Given a chip's memory sizes and a build mode, this crate computes where
//! flash and RAM start, how large they are, and where the stack begins. Then,
//! it renders a GNU ld linker script describing that layout.
//!
//! # Build modes
//!
//! A firmware image is one of
//!
//! - plain firmware, placed at the start of flash ([`Mode::Normal`]),
//! - a bootloader, placed at address zero and limited to the bootloader
//!   reservation ([`Mode::IsBootloader`]),
//! - firmware started by a bootloader, placed after the bootloader
//!   reservation ([`Mode::UsesBootloader`]).
//!
//! The board descriptor states whether the board has a bootloader. The build
//! mode must agree with it, or generation fails with
//! [`Error::ConfigurationMismatch`].
//!
//! # Host configuration
//!
//! In your firmware project, create a `build.rs` script that describes the
//! board. The simplest `build.rs` looks like this:
//!
//! ```no_run
//! use stm32_ldgen::{ChipInfo, LinkerScriptBuilder};
//!
//! fn main() {
//!     let chip = ChipInfo::new("STM32F4", "STM32F411CEU6", 128, 512);
//!     LinkerScriptBuilder::new("ESPRUINOWIFI", chip, false)
//!         .build()
//!         .unwrap();
//! }
//! ```
//!
//! Then, link against `link.ld`, which is placed on the linker search path.
//! You may change the name of the linker script with
//! [`LinkerScriptBuilder::linker_script_name`].
//!
//! Outside of a build script, use [`LinkerScriptBuilder::write_to_path`] or
//! [`LinkerScriptBuilder::write_linker_script`].
//!
//! # Pipeline
//!
//! Every piece of the pipeline is public, if you'd rather assemble it
//! yourself:
//!
//! ```
//! use stm32_ldgen::{BootInfo, ChipInfo, Layout, MemoryBases, Mode};
//!
//! let chip = ChipInfo::new("STM32F4", "STM32F411CEU6", 128, 512);
//! let boot = BootInfo::for_chip(&chip, true, None);
//! let mode = Mode::validate(false, true, boot.has_bootloader).unwrap();
//! let layout = Layout::compute(&chip, &boot, mode, &MemoryBases::default()).unwrap();
//!
//! assert_eq!(layout.flash.base, 0x0800_4000);
//! assert_eq!(layout.stack_top, 0x2002_0000);
//!
//! let mut script = Vec::new();
//! stm32_ldgen::write_linker_script(&mut script, "ESPRUINOWIFI", &layout, &chip, mode).unwrap();
//! ```
//!
//! # Limitations
//!
//! The generator describes exactly one FLASH region and one RAM region. Chips
//! with discontinuous RAM only expose their first contiguous block; see
//! [`resolve_ram_size`].

mod chip;
mod emit;
mod error;
mod host;
mod layout;
mod mode;
mod quirks;

pub use chip::{bootloader_size, BootInfo, ChipInfo};
pub use emit::write_linker_script;
pub use error::Error;
pub use host::LinkerScriptBuilder;
pub use layout::{Layout, MemoryBases, MemoryRegion, FLASH_BASE_DEFAULT, RAM_BASE};
pub use mode::Mode;
pub use quirks::resolve_ram_size;
