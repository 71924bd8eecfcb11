use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use anyhow::{Context, Result};

use super::layout::OutputLayout;

/// One append-only stream. The handle stays open from first reference until
/// the aggregator is dropped; its mutex serializes appends to this key only.
struct StreamHandle {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl StreamHandle {
    fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create stream directory: {}", parent.display())
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open output stream: {}", path.display()))?;
        Ok(Self { path, writer: Mutex::new(BufWriter::new(file)) })
    }

    fn append_line(&self, line: &str) -> Result<()> {
        let mut writer = self.writer.lock().unwrap();
        writeln!(writer, "{line}")
            .with_context(|| format!("Failed to append to {}", self.path.display()))
    }

    fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .unwrap()
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))
    }
}

type StreamMap = RwLock<HashMap<String, Arc<StreamHandle>>>;

/// Owner of all shared output streams. Appends to the same key are totally
/// ordered; appends to different keys only share a read lock on the handle
/// map, so they do not contend once the handle exists.
///
/// Streams are never truncated. A crash mid-append may leave a partial final
/// line, which downstream consumers tolerate.
pub struct OutputAggregator {
    layout: OutputLayout,
    file_index: StreamHandle,
    other_index: StreamHandle,
    project_logs: StreamMap,
    symbol_indexes: StreamMap,
    function_indexes: StreamMap,
}

impl OutputAggregator {
    /// Opens the two run-level logs eagerly; keyed streams are created on
    /// first reference.
    pub fn new(layout: &OutputLayout) -> Result<Self> {
        Ok(Self {
            layout: layout.clone(),
            file_index: StreamHandle::open(layout.file_index_path())?,
            other_index: StreamHandle::open(layout.other_index_path())?,
            project_logs: RwLock::new(HashMap::new()),
            symbol_indexes: RwLock::new(HashMap::new()),
            function_indexes: RwLock::new(HashMap::new()),
        })
    }

    /// Records one generated page in the run-level file index.
    pub fn append_to_file_index(&self, line: &str) -> Result<()> {
        self.file_index.append_line(line)
    }

    /// Records one unannotated page in the run-level other index.
    pub fn append_to_other_index(&self, line: &str) -> Result<()> {
        self.other_index.append_line(line)
    }

    pub fn append_to_project_log(&self, project: &str, line: &str) -> Result<()> {
        let path = self.layout.project_log_path(project);
        self.handle_for(&self.project_logs, project, path)?.append_line(line)
    }

    pub fn append_to_symbol_index(&self, key: &str, line: &str) -> Result<()> {
        let path = self.layout.symbol_index_path(key);
        self.handle_for(&self.symbol_indexes, key, path)?.append_line(line)
    }

    pub fn append_to_function_index(&self, key: &str, line: &str) -> Result<()> {
        let path = self.layout.function_index_path(key);
        self.handle_for(&self.function_indexes, key, path)?.append_line(line)
    }

    /// Resolve-or-create with a double check, so the write lock is taken only
    /// the first time a key is referenced. A failed open is not cached and
    /// the next append retries it.
    fn handle_for(
        &self,
        streams: &StreamMap,
        key: &str,
        path: PathBuf,
    ) -> Result<Arc<StreamHandle>> {
        if let Some(handle) = streams.read().unwrap().get(key) {
            return Ok(Arc::clone(handle));
        }

        let mut streams = streams.write().unwrap();
        if let Some(handle) = streams.get(key) {
            return Ok(Arc::clone(handle));
        }
        let handle = Arc::new(StreamHandle::open(path)?);
        streams.insert(key.to_string(), Arc::clone(&handle));
        Ok(handle)
    }
}

impl Drop for OutputAggregator {
    fn drop(&mut self) {
        for handle in [&self.file_index, &self.other_index] {
            if let Err(e) = handle.flush() {
                eprintln!("Warning: {e:#}");
            }
        }
        let keyed =
            [&mut self.project_logs, &mut self.symbol_indexes, &mut self.function_indexes];
        for streams in keyed {
            if let Ok(streams) = streams.get_mut() {
                for handle in streams.values() {
                    if let Err(e) = handle.flush() {
                        eprintln!("Warning: {e:#}");
                    }
                }
            }
        }
    }
}
