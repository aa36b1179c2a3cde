//! Build modes.

use crate::Error;

/// What kind of image is being linked.
///
/// Construct a `Mode` with [`Mode::validate`]. Every consumer can then rely
/// on exactly one mode being active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Plain firmware at the start of flash. No bootloader involved.
    Normal,
    /// The image is the bootloader itself.
    IsBootloader,
    /// Firmware that's started by a bootloader, placed after the
    /// bootloader's reservation.
    UsesBootloader,
}

impl Mode {
    /// Reconcile the caller's build flags with the board descriptor.
    ///
    /// Both flags claim that the board has a bootloader. If that claim
    /// disagrees with the descriptor, the result is
    /// [`Error::ConfigurationMismatch`].
    ///
    /// Callers should never set both flags. If they do, `is_bootloader`
    /// wins.
    ///
    /// ```
    /// use stm32_ldgen::Mode;
    ///
    /// assert_eq!(Mode::validate(false, true, true).unwrap(), Mode::UsesBootloader);
    /// assert!(Mode::validate(false, false, true).is_err());
    /// ```
    pub fn validate(
        is_bootloader: bool,
        uses_bootloader: bool,
        board_has_bootloader: bool,
    ) -> Result<Self, Error> {
        let requested = is_bootloader || uses_bootloader;
        if requested != board_has_bootloader {
            return Err(Error::ConfigurationMismatch {
                requested,
                board: board_has_bootloader,
            });
        }
        let mode = if is_bootloader {
            Mode::IsBootloader
        } else if uses_bootloader {
            Mode::UsesBootloader
        } else {
            Mode::Normal
        };
        log::debug!("Build mode {mode:?}");
        Ok(mode)
    }
}
