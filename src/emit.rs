//! Linker script text generation.
//!
//! Section names, symbol names, and alignments are consumed by the firmware
//! startup code. Don't change them.

use std::io::{self, Write};

use crate::{ChipInfo, Layout, Mode};

/// Name written into the header of every generated script.
const GENERATOR: &str = env!("CARGO_PKG_NAME");

/// The top byte of a text placement is the absolute flash bank, which has
/// no meaning inside the section.
const PLACE_TEXT_MASK: u32 = 0x00FF_FFFF;

/// Write the complete linker script for `layout`.
///
/// The output only depends on the inputs. Calling this twice with the same
/// inputs produces identical bytes.
pub fn write_linker_script(
    output: &mut dyn Write,
    board: &str,
    layout: &Layout,
    chip: &ChipInfo,
    mode: Mode,
) -> io::Result<()> {
    write_header(output, board, layout)?;
    write_memory_map(output, layout)?;
    output.write_all(include_bytes!("host/vectors.x"))?;
    if let Some(alignment) = text_alignment(chip, mode) {
        writeln!(
            output,
            "    /* The board descriptor places text here, skipping what comes before */"
        )?;
        writeln!(output, "    . = ALIGN({alignment:#x});")?;
    }
    output.write_all(include_bytes!("host/sections.x"))?;
    Ok(())
}

/// Header comment, entry point and initial stack pointer.
fn write_header(output: &mut dyn Write, board: &str, layout: &Layout) -> io::Result<()> {
    writeln!(output, "/* Automatically generated linker file for {board}")?;
    writeln!(output, "   Generated by {GENERATOR} */")?;
    writeln!(output)?;
    writeln!(output, "ENTRY(Reset_Handler)")?;
    writeln!(output)?;
    writeln!(output, "/* Highest stack address */")?;
    writeln!(output, "_estack = {:#x};", layout.stack_top)?;
    writeln!(output)
}

/// Generate a linker script MEMORY command with one FLASH and one RAM block.
///
/// Lengths are whole KiB. Any remainder is dropped.
fn write_memory_map(output: &mut dyn Write, layout: &Layout) -> io::Result<()> {
    writeln!(output, "MEMORY")?;
    writeln!(output, "{{")?;
    writeln!(
        output,
        "  FLASH (rx)      : ORIGIN = {:#x}, LENGTH = {}K",
        layout.flash.base,
        layout.flash.size_kb()
    )?;
    writeln!(
        output,
        "  RAM (xrw)       : ORIGIN = {:#x}, LENGTH = {}K",
        layout.ram.base,
        layout.ram.size_kb()
    )?;
    writeln!(output, "}}")
}

/// Alignment that pushes `.text` to the board's requested placement.
///
/// Only plain firmware honors the placement. Images that involve a
/// bootloader are already positioned by the bootloader reservation.
fn text_alignment(chip: &ChipInfo, mode: Mode) -> Option<u32> {
    match mode {
        Mode::Normal => chip.place_text_offset.map(|offset| offset & PLACE_TEXT_MASK),
        Mode::IsBootloader | Mode::UsesBootloader => None,
    }
}
