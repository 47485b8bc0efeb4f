//! JSON snapshot persistence for a book. The engine itself stays
//! storage-agnostic; this backend exists for embedding apps and tests.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::errors::EngineResult;
use crate::store::MemoryStore;

const TMP_SUFFIX: &str = "tmp";

pub const BOOK_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct BookSnapshot {
    #[serde(default = "default_schema_version")]
    schema_version: u8,
    book: MemoryStore,
}

fn default_schema_version() -> u8 {
    BOOK_SCHEMA_VERSION
}

/// Snapshot store bound to one file path.
#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    path: PathBuf,
}

impl JsonSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, book: &MemoryStore) -> EngineResult<()> {
        save_book_to_path(book, &self.path)
    }

    /// Loads the snapshot; a missing file yields an empty book.
    pub fn load(&self) -> EngineResult<MemoryStore> {
        if self.path.exists() {
            load_book_from_path(&self.path)
        } else {
            Ok(MemoryStore::new())
        }
    }
}

pub fn save_book_to_path(book: &MemoryStore, path: &Path) -> EngineResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let snapshot = BookSnapshot {
        schema_version: BOOK_SCHEMA_VERSION,
        book: book.clone(),
    };
    let json = serde_json::to_string_pretty(&snapshot)?;
    write_atomic(path, &json)
}

pub fn load_book_from_path(path: &Path) -> EngineResult<MemoryStore> {
    let data = fs::read_to_string(path)?;
    let snapshot: BookSnapshot = serde_json::from_str(&data)?;
    Ok(snapshot.book)
}

/// Writes via a sibling temp file and rename so a crash never leaves a
/// half-written snapshot behind.
fn write_atomic(path: &Path, data: &str) -> EngineResult<()> {
    let tmp = tmp_path(path);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".");
    tmp.push(TMP_SUFFIX);
    PathBuf::from(tmp)
}
