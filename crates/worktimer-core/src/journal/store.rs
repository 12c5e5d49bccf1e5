//! File-backed segment log with upward discovery.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::{Path, PathBuf};

use super::segment::Segment;
use crate::error::{Result, TimerError};

/// Directories searched for an existing log, nearest first: `dir` and then
/// each of its ancestors up to the filesystem root.
pub fn candidate_dirs(dir: &Path) -> Vec<PathBuf> {
    dir.ancestors().map(Path::to_path_buf).collect()
}

/// The append-only log of one project.
#[derive(Debug, Clone)]
pub struct LogStore {
    directory: PathBuf,
    path: PathBuf,
}

impl LogStore {
    /// Log stored directly in `directory`.
    pub fn at(directory: impl Into<PathBuf>, file_name: &str) -> Self {
        let directory = directory.into();
        let path = directory.join(file_name);
        Self { directory, path }
    }

    /// Locate the log that owns `dir`.
    ///
    /// Walks [`candidate_dirs`] and picks the first directory that already
    /// contains `file_name`. When none does, the log belongs to `dir` itself
    /// and is created there by the first append.
    pub fn discover(dir: &Path, file_name: &str) -> Self {
        let found = candidate_dirs(dir)
            .into_iter()
            .find(|candidate| candidate.join(file_name).is_file());

        match found {
            Some(owner) => {
                tracing::debug!(log = %owner.join(file_name).display(), "found existing log");
                Self::at(owner, file_name)
            }
            None => {
                tracing::debug!(dir = %dir.display(), "no log found, using target directory");
                Self::at(dir, file_name)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory owning the log (the project directory).
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Display name of the project: the owning directory's base name.
    pub fn project(&self) -> String {
        self.directory
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.directory.display().to_string())
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Most recently written segment, or `None` for a missing or empty log.
    pub fn latest(&self) -> Result<Option<Segment>> {
        let mut latest = None;
        for segment in self.all()? {
            latest = Some(segment?);
        }
        Ok(latest)
    }

    /// Append one line. Existing lines are never touched.
    pub fn append(&self, segment: &Segment) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| TimerError::bad_log(&self.path, e.to_string()))?;
        writeln!(file, "{}", segment.to_line())
            .map_err(|e| TimerError::bad_log(&self.path, e.to_string()))?;
        tracing::debug!(log = %self.path.display(), line = %segment.to_line(), "appended segment");
        Ok(())
    }

    /// Every segment in write order, read lazily in a single pass.
    pub fn all(&self) -> Result<Segments> {
        let lines = match File::open(&self.path) {
            Ok(file) => Some(BufReader::new(file).lines()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(TimerError::bad_log(&self.path, e.to_string())),
        };
        Ok(Segments {
            path: self.path.clone(),
            lines,
            line_no: 0,
        })
    }

    /// Raw text, for assertions on the append-only property.
    #[cfg(test)]
    pub(crate) fn raw(&self) -> String {
        std::fs::read_to_string(&self.path).unwrap_or_default()
    }
}

/// Lazy iterator over the segments of a log file.
///
/// Not restartable: call [`LogStore::all`] again to read the file afresh.
/// Iteration stops after the first error.
pub struct Segments {
    path: PathBuf,
    lines: Option<Lines<BufReader<File>>>,
    line_no: usize,
}

impl Iterator for Segments {
    type Item = Result<Segment>;

    fn next(&mut self) -> Option<Self::Item> {
        let lines = self.lines.as_mut()?;
        loop {
            let line = match lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.lines = None;
                    return Some(Err(TimerError::bad_log(&self.path, e.to_string())));
                }
            };
            self.line_no += 1;

            match Segment::parse_line(&line) {
                Ok(Some(segment)) => return Some(Ok(segment)),
                Ok(None) => continue,
                Err(reason) => {
                    self.lines = None;
                    return Some(Err(TimerError::bad_log(
                        &self.path,
                        format!("line {}: {reason}", self.line_no),
                    )));
                }
            }
        }
    }
}
