use std::{
    env,
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

/// Embeds every descriptor under `boards/` into the crate.
///
/// Adding a board is a matter of dropping another RON file into the
/// directory.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let boards_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?).join("boards");
    println!("cargo:rerun-if-changed={}", boards_dir.display());

    let mut boards: Vec<PathBuf> = fs::read_dir(&boards_dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<_, _>>()?;
    boards.retain(|path| path.extension().is_some_and(|ext| ext == "ron"));
    // Directory order isn't stable across filesystems.
    boards.sort();

    let out = PathBuf::from(env::var("OUT_DIR")?).join("builtin_boards.rs");
    let mut out = File::create(out)?;
    writeln!(out, "const BUILTIN_BOARDS: &[(&str, &str)] = &[")?;
    for path in &boards {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        writeln!(
            out,
            "    ({file_name:?}, include_str!({:?})),",
            path.display().to_string()
        )?;
    }
    writeln!(out, "];")?;
    Ok(())
}
