//! Board descriptors, as written in RON.

use serde::Deserialize;
use stm32_ldgen::{BootInfo, ChipInfo, LinkerScriptBuilder};

/// Everything the generator needs to know about one board.
///
/// ```
/// let board: board::BoardDescriptor = ron::from_str(r#"(
///     name: "MYBOARD",
///     bootloader: false,
///     chip: (family: "STM32F4", part: "STM32F401CCU6", ram: 64, flash: 256),
/// )"#).unwrap();
///
/// assert_eq!(board.chip().ram_kb, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BoardDescriptor {
    /// Board identifier, used for lookups.
    pub name: String,
    /// Does the board boot through a bootloader?
    #[serde(default)]
    pub bootloader: bool,
    /// Bytes reserved for the bootloader, if not the chip family's default.
    #[serde(default)]
    pub bootloader_size: Option<u32>,
    pub chip: ChipDef,
}

/// Chip facts, as written in a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChipDef {
    pub family: String,
    pub part: String,
    /// KiB.
    pub ram: u32,
    /// KiB.
    pub flash: u32,
    /// Absolute flash address where `.text` should start.
    #[serde(default)]
    pub place_text_section: Option<u32>,
}

impl BoardDescriptor {
    pub fn chip(&self) -> ChipInfo {
        ChipInfo {
            family: self.chip.family.clone(),
            part: self.chip.part.clone(),
            ram_kb: self.chip.ram,
            flash_kb: self.chip.flash,
            place_text_offset: self.chip.place_text_section,
        }
    }

    pub fn boot_info(&self) -> BootInfo {
        BootInfo::for_chip(&self.chip(), self.bootloader, self.bootloader_size)
    }

    /// A linker script builder for plain firmware on this board.
    ///
    /// Select a bootloader mode on the returned builder if needed.
    pub fn builder(&self) -> LinkerScriptBuilder {
        let mut builder = LinkerScriptBuilder::new(&self.name, self.chip(), self.bootloader);
        if let Some(size) = self.bootloader_size {
            builder.bootloader_size(size);
        }
        builder
    }
}
