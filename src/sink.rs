use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use log::trace;

/// Destination for finished log data. One call is one append.
pub trait LogSink {
    fn append(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Human readable name of the destination, used in diagnostics.
    fn describe(&self) -> String {
        "sink".to_string()
    }
}

/// Appends to a named file, opening and closing it on every write so that
/// no handle is held between calls.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(bytes)?;
        trace!("Appended {} bytes to {:?}", bytes.len(), self.path);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{:?}", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn creates_then_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("daemon.log");
        let mut sink = FileSink::new(&path);

        sink.append(b"first\n").unwrap();
        sink.append(b"second\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let mut sink = FileSink::new(dir.path().join("no/such/dir/daemon.log"));
        assert!(sink.append(b"lost\n").is_err());
    }
}
