//! Board descriptors for `stm32-ldgen`.
//!
//! A board is described by a RON file:
//!
//! ```text
//! (
//!     name: "ESPRUINOWIFI",
//!     bootloader: true,
//!     chip: (
//!         family: "STM32F4",
//!         part: "STM32F411CEU6",
//!         ram: 128,   // KiB
//!         flash: 512, // KiB
//!         place_text_section: Some(0x08010000),
//!     ),
//! )
//! ```
//!
//! [`BoardDatabase::builtin`] holds every board shipped in this crate's
//! `boards/` directory. Load more with [`BoardDatabase::load_file`] or
//! [`BoardDatabase::load_dir`].

mod descriptor;

pub use descriptor::{BoardDescriptor, ChipDef};

use std::{fs, io, path::Path};

include!(concat!(env!("OUT_DIR"), "/builtin_boards.rs"));

/// Errors while loading board descriptors.
#[derive(Debug, thiserror::Error)]
pub enum BoardDbError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse board descriptor {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// A collection of board descriptors, keyed by board name.
#[derive(Debug, Clone, Default)]
pub struct BoardDatabase {
    boards: Vec<BoardDescriptor>,
}

impl BoardDatabase {
    /// Create an empty board database.
    pub fn new() -> Self {
        Self { boards: Vec::new() }
    }

    /// The boards shipped with this crate.
    pub fn builtin() -> Result<Self, BoardDbError> {
        let mut db = Self::new();
        for (origin, content) in BUILTIN_BOARDS {
            db.load_named(origin, content)?;
        }
        Ok(db)
    }

    /// Load one board from a RON string.
    ///
    /// A board with the same name as an existing board replaces it.
    pub fn load_ron(&mut self, content: &str) -> Result<&BoardDescriptor, BoardDbError> {
        self.load_named("<string>", content)
    }

    /// Load one board from a RON file.
    pub fn load_file(&mut self, path: &Path) -> Result<&BoardDescriptor, BoardDbError> {
        let content = fs::read_to_string(path).map_err(|source| BoardDbError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.load_named(&path.display().to_string(), &content)
    }

    /// Load every `*.ron` file in `dir`. Returns how many boards were loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, BoardDbError> {
        let io_err = |source| BoardDbError::Io {
            path: dir.display().to_string(),
            source,
        };
        let mut paths = fs::read_dir(dir)
            .map_err(io_err)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_err)?;
        paths.retain(|path| path.extension().is_some_and(|ext| ext == "ron"));
        // Later files replace earlier ones, so keep the order stable.
        paths.sort();

        for path in &paths {
            self.load_file(path)?;
        }
        Ok(paths.len())
    }

    fn load_named(
        &mut self,
        origin: &str,
        content: &str,
    ) -> Result<&BoardDescriptor, BoardDbError> {
        let board: BoardDescriptor =
            ron::from_str(content).map_err(|source| BoardDbError::Parse {
                origin: origin.into(),
                source,
            })?;
        let index = match self.boards.iter().position(|b| b.name == board.name) {
            Some(index) => {
                log::warn!("{origin} replaces existing board {}", board.name);
                self.boards[index] = board;
                index
            }
            None => {
                log::debug!("Loaded board {} from {origin}", board.name);
                self.boards.push(board);
                self.boards.len() - 1
            }
        };
        Ok(&self.boards[index])
    }

    /// Find a board by its exact name.
    pub fn get(&self, name: &str) -> Option<&BoardDescriptor> {
        self.boards.iter().find(|board| board.name == name)
    }

    /// Find a board by its exact name.
    ///
    /// # Errors
    ///
    /// [`stm32_ldgen::Error::UnknownBoard`] if there's no such board.
    pub fn lookup(&self, name: &str) -> Result<&BoardDescriptor, stm32_ldgen::Error> {
        self.get(name)
            .ok_or_else(|| stm32_ldgen::Error::UnknownBoard(name.into()))
    }

    /// Board names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.boards.iter().map(|b| b.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}
