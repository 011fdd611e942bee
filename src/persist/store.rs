//! File access collaborators
//!
//! The core never touches storage directly; it reads and writes whole files
//! through a [`TextFileStore`]. Writes report success as a bool and never panic
//! or return errors: a failed write is logged and left to the host to surface.

use std::collections::HashMap;

pub trait TextFileStore {
    /// Whole file content, or `None` when missing or unreadable
    fn read_text_file(&self, path: &str) -> Option<String>;

    /// Replace the whole file; `false` on failure
    fn write_text_file(&mut self, path: &str, content: &str) -> bool;
}

/// In-memory store, used by tests and by hosts without a file system
#[derive(Debug, Clone, Default)]
pub struct MemoryFileStore {
    files: HashMap<String, String>,
    writes: Vec<String>,
    fail_writes: bool,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Paths of every successful write, in order
    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl TextFileStore for MemoryFileStore {
    fn read_text_file(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }

    fn write_text_file(&mut self, path: &str, content: &str) -> bool {
        if self.fail_writes {
            return false;
        }
        self.files.insert(path.to_string(), content.to_string());
        self.writes.push(path.to_string());
        true
    }
}

/// Native store over `std::fs`; writes go to a sibling temp file, then rename
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileStore;

#[cfg(not(target_arch = "wasm32"))]
impl FsFileStore {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl TextFileStore for FsFileStore {
    fn read_text_file(&self, path: &str) -> Option<String> {
        match std::fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("read {} failed: {}", path, e);
                None
            }
        }
    }

    fn write_text_file(&mut self, path: &str, content: &str) -> bool {
        let target = std::path::Path::new(path);
        let mut tmp_name = target.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = std::path::PathBuf::from(tmp_name);

        let result = std::fs::write(&tmp, content).and_then(|()| std::fs::rename(&tmp, target));
        match result {
            Ok(()) => true,
            Err(e) => {
                log::warn!("write {} failed: {}", path, e);
                let _ = std::fs::remove_file(&tmp);
                false
            }
        }
    }
}
