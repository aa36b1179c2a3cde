//! Chip and bootloader facts taken from a board descriptor.

/// Memory facts about a microcontroller.
///
/// Sizes are nominal, as printed on the datasheet. Use
/// [`resolve_ram_size`](crate::resolve_ram_size) to learn how much RAM the
/// generator can actually place data in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipInfo {
    /// Chip family, like `"STM32F4"`.
    pub family: String,
    /// Full part number, like `"STM32F401CDU6"`.
    pub part: String,
    /// RAM size, in KiB.
    pub ram_kb: u32,
    /// Flash size, in KiB.
    pub flash_kb: u32,
    /// Absolute address where the board wants `.text` to start.
    ///
    /// Only honored for plain firmware images.
    pub place_text_offset: Option<u32>,
}

impl ChipInfo {
    /// Describe a chip without an explicit text placement.
    pub fn new(
        family: impl Into<String>,
        part: impl Into<String>,
        ram_kb: u32,
        flash_kb: u32,
    ) -> Self {
        Self {
            family: family.into(),
            part: part.into(),
            ram_kb,
            flash_kb,
            place_text_offset: None,
        }
    }

    /// Flash size in bytes.
    pub(crate) fn flash_bytes(&self) -> Option<u32> {
        self.flash_kb.checked_mul(1024)
    }
}

/// Bootloader facts for a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootInfo {
    /// Does the board descriptor say the board boots through a bootloader?
    pub has_bootloader: bool,
    /// Bytes at the start of flash that belong to the bootloader.
    pub reserved_bytes: u32,
}

impl BootInfo {
    /// Derive bootloader facts for `chip`.
    ///
    /// `explicit_size` comes from the descriptor and, when present, wins over
    /// the per-family default from [`bootloader_size`].
    pub fn for_chip(chip: &ChipInfo, has_bootloader: bool, explicit_size: Option<u32>) -> Self {
        Self {
            has_bootloader,
            reserved_bytes: explicit_size.unwrap_or_else(|| bootloader_size(chip)),
        }
    }
}

/// Default size, in bytes, reserved for a bootloader on this chip.
///
/// STM32F4 flash starts with 16 KiB sectors, so the bootloader occupies
/// a whole sector. Everything else uses 10 KiB.
pub fn bootloader_size(chip: &ChipInfo) -> u32 {
    match chip.family.as_str() {
        "STM32F4" => 16 * 1024,
        _ => 10 * 1024,
    }
}
