//! Chip-specific RAM restrictions.
//!
//! Some parts split their RAM into banks that aren't adjacent in the memory
//! map. The generator only describes one contiguous RAM region, so these
//! parts expose the first contiguous block, and nothing more.
//!
//! Adding a new part? Append a rule to [`RAM_QUIRKS`].

use crate::ChipInfo;

/// Caps the usable RAM of the chips it applies to.
struct RamQuirk {
    /// Short description for logs.
    name: &'static str,
    applies: fn(&ChipInfo) -> bool,
    /// Bytes of contiguous RAM starting at the RAM base.
    usable: u32,
}

/// Evaluated in order. Every matching rule caps the size.
const RAM_QUIRKS: &[RamQuirk] = &[
    // 112 KiB + 16 KiB SRAM are contiguous. Anything beyond that (SRAM3,
    // or the 64 KiB CCM data RAM) lives elsewhere.
    RamQuirk {
        name: "STM32F4 split SRAM",
        applies: is_stm32f4,
        usable: 128 * 1024,
    },
    // 96 KiB SRAM1 at 0x2000_0000, 32 KiB SRAM2 at 0x1000_0000.
    RamQuirk {
        name: "STM32L476 SRAM2",
        applies: is_stm32l476,
        usable: 96 * 1024,
    },
];

fn is_stm32f4(chip: &ChipInfo) -> bool {
    chip.family == "STM32F4"
}

fn is_stm32l476(chip: &ChipInfo) -> bool {
    chip.part.starts_with("STM32L476")
}

/// Returns the number of RAM bytes, starting at the RAM base, that the
/// generator may use for `chip`.
///
/// ```
/// use stm32_ldgen::{resolve_ram_size, ChipInfo};
///
/// let disco = ChipInfo::new("STM32F4", "STM32F407VGT6", 192, 1024);
/// assert_eq!(resolve_ram_size(&disco), 128 * 1024);
/// ```
pub fn resolve_ram_size(chip: &ChipInfo) -> u32 {
    let nominal = chip.ram_kb.saturating_mul(1024);
    RAM_QUIRKS
        .iter()
        .filter(|quirk| (quirk.applies)(chip))
        .fold(nominal, |size, quirk| {
            if size > quirk.usable {
                log::debug!(
                    "{}: {} RAM limited from {} to {} bytes",
                    quirk.name,
                    chip.part,
                    size,
                    quirk.usable
                );
                quirk.usable
            } else {
                size
            }
        })
}

#[cfg(test)]
mod tests {
    use super::resolve_ram_size;
    use crate::ChipInfo;

    #[test]
    fn stm32f4_caps_at_128k() {
        for ram_kb in [129, 192, 256, 320] {
            let chip = ChipInfo::new("STM32F4", "STM32F429ZIT6", ram_kb, 2048);
            assert_eq!(resolve_ram_size(&chip), 128 * 1024, "{ram_kb} KiB");
        }
    }

    #[test]
    fn stm32f4_passthrough_at_or_below_128k() {
        for ram_kb in [64, 96, 128] {
            let chip = ChipInfo::new("STM32F4", "STM32F401CDU6", ram_kb, 384);
            assert_eq!(resolve_ram_size(&chip), ram_kb * 1024, "{ram_kb} KiB");
        }
    }

    #[test]
    fn stm32l476_caps_at_96k() {
        for part in ["STM32L476RG", "STM32L476RGT6", "STM32L476VG"] {
            let chip = ChipInfo::new("STM32L4", part, 128, 1024);
            assert_eq!(resolve_ram_size(&chip), 96 * 1024, "{part}");
        }
        let chip = ChipInfo::new("STM32L4", "STM32L476RG", 64, 1024);
        assert_eq!(resolve_ram_size(&chip), 64 * 1024);
    }

    #[test]
    fn other_chips_pass_through() {
        let table = [
            ChipInfo::new("STM32F1", "STM32F103RCT6", 48, 256),
            ChipInfo::new("STM32L4", "STM32L432KC", 256, 256),
            // Family match is exact.
            ChipInfo::new("STM32F40", "STM32F407VGT6", 192, 1024),
        ];
        for chip in table {
            assert_eq!(resolve_ram_size(&chip), chip.ram_kb * 1024, "{chip:?}");
        }
    }

    #[test]
    fn both_rules_take_the_smallest_cap() {
        let chip = ChipInfo::new("STM32F4", "STM32L476-FAKE", 192, 1024);
        assert_eq!(resolve_ram_size(&chip), 96 * 1024);
    }
}
