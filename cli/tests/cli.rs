//! Runs the `build-linker` binary end to end.

use std::{error, fs, process::Command};

type Error = Box<dyn error::Error>;

fn build_linker() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_build-linker"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn writes_plain_firmware_script() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("linker.ld");

    let output = build_linker()
        .arg("STM32F4DISCOVERY")
        .arg(&path)
        .output()?;
    assert!(output.status.success(), "{output:?}");

    let script = fs::read_to_string(&path)?;
    assert!(script.starts_with("/* Automatically generated linker file for STM32F4DISCOVERY\n"));
    assert!(script.contains("_estack = 0x20020000;"));
    assert!(script.contains("FLASH (rx)      : ORIGIN = 0x8000000, LENGTH = 1024K"));
    assert!(script.contains("RAM (xrw)       : ORIGIN = 0x20000000, LENGTH = 128K"));
    Ok(())
}

#[test]
fn writes_firmware_after_bootloader() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("linker.ld");

    let status = build_linker()
        .args(["ESPRUINOWIFI"])
        .arg(&path)
        .arg("--using_bootloader")
        .status()?;
    assert!(status.success());

    let script = fs::read_to_string(&path)?;
    assert!(script.contains("FLASH (rx)      : ORIGIN = 0x8004000, LENGTH = 496K"));
    // Text placement only applies without a bootloader.
    assert!(!script.contains("ALIGN(0x10000)"));
    Ok(())
}

#[test]
fn writes_bootloader_script() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bootloader.ld");

    let status = build_linker()
        .arg("ESPRUINOBOARD")
        .arg(&path)
        .arg("--bootloader")
        .status()?;
    assert!(status.success());

    let script = fs::read_to_string(&path)?;
    assert!(script.contains("FLASH (rx)      : ORIGIN = 0x0, LENGTH = 10K"));
    Ok(())
}

#[test]
fn mismatch_fails_without_output() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("linker.ld");

    // PICO_R1_3 has a bootloader, but no bootloader flag was given.
    let output = build_linker().arg("PICO_R1_3").arg(&path).output()?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("ERROR: "), "{stderr}");
    assert!(stderr.contains("do not agree"), "{stderr}");
    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn unknown_flag_fails() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("linker.ld");

    let output = build_linker()
        .arg("STM32F4DISCOVERY")
        .arg(&path)
        .arg("--bootloader_leave_space")
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Unknown option '--bootloader_leave_space'"), "{stderr}");
    assert!(!path.exists());
    Ok(())
}

#[test]
fn unknown_board_fails() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("linker.ld");

    let output = build_linker().arg("NOT_A_BOARD").arg(&path).output()?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Unknown board 'NOT_A_BOARD'"), "{stderr}");
    assert!(!path.exists());
    Ok(())
}

#[test]
fn conflicting_flags_fail() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("linker.ld");

    let status = build_linker()
        .arg("PICO_R1_3")
        .arg(&path)
        .args(["--bootloader", "--using_bootloader"])
        .status()?;
    assert!(!status.success());
    assert!(!path.exists());
    Ok(())
}

#[test]
fn custom_board_database() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let boards = dir.path().join("boards");
    fs::create_dir(&boards)?;
    fs::write(
        boards.join("bluepill.ron"),
        r#"(
            name: "BLUEPILL",
            bootloader: false,
            chip: (family: "STM32F1", part: "STM32F103C8T6", ram: 20, flash: 64),
        )"#,
    )?;
    let path = dir.path().join("linker.ld");

    let status = build_linker()
        .arg("--board-db")
        .arg(&boards)
        .arg("BLUEPILL")
        .arg(&path)
        .status()?;
    assert!(status.success());

    let script = fs::read_to_string(&path)?;
    assert!(script.contains("_estack = 0x20005000;"));
    assert!(script.contains("FLASH (rx)      : ORIGIN = 0x8000000, LENGTH = 64K"));
    Ok(())
}

#[test]
fn list_boards() -> Result<(), Error> {
    let output = build_linker().arg("--list-boards").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let names: Vec<&str> = stdout.lines().collect();
    assert!(names.contains(&"ESPRUINOWIFI"), "{stdout}");
    assert!(names.contains(&"NUCLEOL476RG"), "{stdout}");
    Ok(())
}

#[test]
fn repeated_runs_are_identical() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let first = dir.path().join("first.ld");
    let second = dir.path().join("second.ld");

    for path in [&first, &second] {
        let status = build_linker().arg("PICO_R1_3").arg(path).arg("--using_bootloader").status()?;
        assert!(status.success());
    }
    assert_eq!(fs::read(&first)?, fs::read(&second)?);
    Ok(())
}
