//! Background chunk writes.
//!
//! `ChunkWriter::write` copies the chunk's voxels on the calling thread and
//! hands the copy to a worker, so the caller can keep editing the chunk
//! immediately. Each chunk coordinate is always routed to the same worker and
//! every worker drains its queue in order, so two writes of the same chunk
//! land on disk in the order they were requested: the file ends up holding
//! the later snapshot.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use log::{debug, error};

use crate::config::WorldConfig;
use crate::task_management::{Task, TaskManager};
use crate::voxels::chunk::{Chunk, ChunkCoord, ChunkSnapshot};

use super::{write_chunk, PersistenceError};

/// Outcome of one background write.
#[derive(Debug)]
pub struct WriteReport {
    pub coord: ChunkCoord,
    /// The written path, or why the write failed.
    pub result: Result<PathBuf, PersistenceError>,
}

impl WriteReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

struct WriteTask {
    snapshot: ChunkSnapshot,
    directory: PathBuf,
}

impl Task<WriteReport> for WriteTask {
    fn process(self: Box<Self>) -> WriteReport {
        WriteReport {
            coord: self.snapshot.position,
            result: write_chunk(&self.snapshot, &self.directory),
        }
    }
}

/// Writes chunks to disk on a pool of background workers.
pub struct ChunkWriter {
    tasks: TaskManager<WriteReport>,
}

impl ChunkWriter {
    pub fn new(threads: usize) -> Self {
        ChunkWriter {
            tasks: TaskManager::new(threads),
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.writer_threads)
    }

    /// Snapshots `chunk` and schedules it to be written into `directory`.
    ///
    /// Never blocks on I/O.
    pub fn write(&mut self, chunk: &Chunk, directory: impl AsRef<Path>) {
        let task = WriteTask {
            snapshot: chunk.snapshot(),
            directory: directory.as_ref().to_path_buf(),
        };
        debug!("Queued write of chunk {}", chunk.position);
        self.tasks.publish_task(route_key(chunk.position), Box::new(task));
    }

    /// Number of writes whose report has not been collected yet.
    pub fn pending(&self) -> usize {
        self.tasks.in_flight()
    }

    /// Collects the reports of finished writes without blocking.
    pub fn process_completed(&mut self) -> Vec<WriteReport> {
        log_failures(self.tasks.process_completed_tasks())
    }

    /// Blocks until every scheduled write has finished.
    ///
    /// # Returns
    /// The reports not collected before.
    pub fn flush(&mut self) -> Vec<WriteReport> {
        log_failures(self.tasks.wait_for_all())
    }

    /// Finishes all scheduled writes and stops the workers.
    pub fn shutdown(mut self) -> Vec<WriteReport> {
        self.flush()
    }
}

fn route_key(coord: ChunkCoord) -> u64 {
    let mut hasher = DefaultHasher::new();
    coord.hash(&mut hasher);
    hasher.finish()
}

fn log_failures(reports: Vec<WriteReport>) -> Vec<WriteReport> {
    for report in &reports {
        if let Err(err) = &report.result {
            error!("Failed to save chunk {}: {}", report.coord, err);
        }
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::read_chunk;
    use crate::voxels::block::Voxel;

    #[test]
    fn flush_reports_every_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ChunkWriter::new(2);
        for cx in 0..4 {
            writer.write(&Chunk::new(ChunkCoord::new(cx, 0), 4), dir.path());
        }
        let reports = writer.flush();
        assert_eq!(reports.len(), 4);
        assert!(reports.iter().all(WriteReport::is_ok));
        assert_eq!(writer.pending(), 0);
        assert!(read_chunk(dir.path(), 3, 0, 4).is_ok());
    }

    #[test]
    fn failures_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-directory");
        std::fs::write(&blocker, b"").unwrap();

        let mut writer = ChunkWriter::new(1);
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), 2);
        chunk.set(0, 0, 0, Some(Voxel::new(1)));
        writer.write(&chunk, &blocker);
        let reports = writer.shutdown();
        assert_eq!(reports.len(), 1);
        assert!(!reports[0].is_ok());
    }
}
