//! # Persistence Module
//!
//! Saves and loads chunks, one file per chunk named `"{cx}_{cz}.chunk"`.
//!
//! - `write_chunk` / `read_chunk` work synchronously on the calling thread
//! - `ChunkWriter` runs writes on background workers, keeping writes of the
//!   same chunk in order
//!
//! Files are written to a temporary name and renamed into place, so a reader
//! sees either the previous complete file or the new complete file.

pub mod format;
pub mod writer;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::trace;
use thiserror::Error;

use crate::voxels::chunk::{Chunk, ChunkCoord, ChunkSnapshot};

pub use writer::{ChunkWriter, WriteReport};

#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Nothing has been saved for this chunk yet.
    #[error("no chunk file at {}", .path.display())]
    NotFound { path: PathBuf },

    /// The file exists but does not hold a valid chunk.
    #[error("corrupt chunk file {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistenceError {
    fn io(path: &Path, source: io::Error) -> Self {
        PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Path of the file holding the chunk at `coord` inside `directory`.
pub fn chunk_path(directory: &Path, coord: ChunkCoord) -> PathBuf {
    directory.join(coord.file_name())
}

/// Writes a chunk snapshot to `directory`, creating the directory if needed.
///
/// # Returns
/// The path of the written file.
pub fn write_chunk(snapshot: &ChunkSnapshot, directory: &Path) -> Result<PathBuf, PersistenceError> {
    fs::create_dir_all(directory).map_err(|e| PersistenceError::io(directory, e))?;

    let path = chunk_path(directory, snapshot.position);
    let temp_path = path.with_extension("chunk.tmp");
    let bytes = format::encode(snapshot);

    let write_temp = || -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(&temp_path)?);
        writer.write_all(&bytes)?;
        writer.flush()?;
        writer.get_ref().sync_all()
    };
    write_temp().map_err(|e| PersistenceError::io(&temp_path, e))?;
    fs::rename(&temp_path, &path).map_err(|e| PersistenceError::io(&path, e))?;

    trace!("Wrote chunk {} to {}", snapshot.position, path.display());
    Ok(path)
}

/// Reads the chunk at `(cx, cz)` from `directory`.
///
/// The returned chunk has no light yet and is dirty.
pub fn read_chunk(
    directory: &Path,
    cx: i32,
    cz: i32,
    chunk_size: usize,
) -> Result<Chunk, PersistenceError> {
    let coord = ChunkCoord::new(cx, cz);
    let path = chunk_path(directory, coord);

    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PersistenceError::NotFound { path });
        }
        Err(e) => return Err(PersistenceError::io(&path, e)),
    };

    let voxels = format::decode(&bytes, coord, chunk_size)
        .map_err(|reason| PersistenceError::Corrupt { path, reason })?;

    Ok(Chunk::from_voxels(coord, chunk_size, voxels))
}
