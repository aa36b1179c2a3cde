//! Flash and RAM region geometry.

use std::fmt::Display;

use crate::{resolve_ram_size, BootInfo, ChipInfo, Error, Mode};

/// Default start of on-chip flash.
pub const FLASH_BASE_DEFAULT: u32 = 0x0800_0000;
/// Start of SRAM.
pub const RAM_BASE: u32 = 0x2000_0000;

/// The vector table, which starts the flash region, needs this alignment.
const FLASH_ALIGN: u32 = 0x200;
/// Word alignment.
const RAM_ALIGN: u32 = 4;

/// Base addresses of flash and RAM in the chip's memory map.
///
/// The defaults match all STM32 parts. Supply different bases for chip
/// families that map their memories elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryBases {
    /// Where flash starts when the CPU boots from it.
    pub flash: u32,
    /// Where RAM starts.
    pub ram: u32,
}

impl Default for MemoryBases {
    fn default() -> Self {
        Self {
            flash: FLASH_BASE_DEFAULT,
            ram: RAM_BASE,
        }
    }
}

/// A contiguous address range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    pub base: u32,
    /// Size in bytes.
    pub size: u32,
}

impl MemoryRegion {
    /// One past the last address. Computed wide so it can't wrap.
    fn end(&self) -> u64 {
        u64::from(self.base) + u64::from(self.size)
    }

    fn overlaps(&self, other: &MemoryRegion) -> bool {
        u64::from(self.base) < other.end() && u64::from(other.base) < self.end()
    }

    /// Size in whole KiB, as written in the linker script.
    pub fn size_kb(&self) -> u32 {
        self.size / 1024
    }
}

impl Display for MemoryRegion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{:#010X}, {:#010X})", self.base, self.end())
    }
}

/// The final memory map of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub flash: MemoryRegion,
    pub ram: MemoryRegion,
    /// Initial stack pointer. Always the end of RAM.
    pub stack_top: u32,
}

impl Layout {
    /// Compute the memory map for `chip` when building an image in `mode`.
    ///
    /// # Errors
    ///
    /// - [`Error::InsufficientFlash`] if the bootloader reservation consumes
    ///   all flash in [`Mode::UsesBootloader`].
    /// - [`Error::EmptyRegion`], [`Error::Misaligned`], or
    ///   [`Error::RegionOverlap`] if the result isn't a usable memory map.
    /// - [`Error::AddressOverflow`] if a region runs past the end of the
    ///   address space.
    pub fn compute(
        chip: &ChipInfo,
        boot: &BootInfo,
        mode: Mode,
        bases: &MemoryBases,
    ) -> Result<Self, Error> {
        let ram_size = resolve_ram_size(chip);
        let flash_size = chip.flash_bytes().ok_or(Error::AddressOverflow {
            what: "Flash size",
        })?;

        let flash = match mode {
            // Some DFU bootloaders only start an image based at 0, even
            // though flash is aliased there from the usual flash base.
            Mode::IsBootloader => MemoryRegion {
                base: 0x0000_0000,
                size: boot.reserved_bytes,
            },
            Mode::UsesBootloader => {
                if flash_size <= boot.reserved_bytes {
                    return Err(Error::InsufficientFlash {
                        flash: flash_size,
                        reserved: boot.reserved_bytes,
                    });
                }
                MemoryRegion {
                    base: bases.flash.checked_add(boot.reserved_bytes).ok_or(
                        Error::AddressOverflow {
                            what: "Firmware start address",
                        },
                    )?,
                    size: flash_size - boot.reserved_bytes,
                }
            }
            Mode::Normal => MemoryRegion {
                base: bases.flash,
                size: flash_size,
            },
        };

        let ram = MemoryRegion {
            base: bases.ram,
            size: ram_size,
        };
        let stack_top = bases
            .ram
            .checked_add(ram_size)
            .ok_or(Error::AddressOverflow { what: "Stack top" })?;

        let layout = Layout {
            flash,
            ram,
            stack_top,
        };
        layout.check()?;
        log::debug!("FLASH {}, RAM {}", layout.flash, layout.ram);
        Ok(layout)
    }

    /// Make sure the regions can be handed to a linker.
    fn check(&self) -> Result<(), Error> {
        for (region, name, align) in [
            (&self.flash, "FLASH", FLASH_ALIGN),
            (&self.ram, "RAM", RAM_ALIGN),
        ] {
            if region.size == 0 {
                return Err(Error::EmptyRegion { region: name });
            }
            if region.base % align != 0 {
                return Err(Error::Misaligned {
                    region: name,
                    base: region.base,
                    align,
                });
            }
            if region.end() > 1 << 32 {
                return Err(Error::AddressOverflow { what: name });
            }
        }
        if self.flash.overlaps(&self.ram) {
            return Err(Error::RegionOverlap {
                flash: self.flash,
                ram: self.ram,
            });
        }
        Ok(())
    }
}
