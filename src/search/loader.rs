//! Background loading of candidate sources.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crate::core::status::LoadProgress;
use crate::error::Result;
use crate::search::candidates::{Candidate, Candidates};
use crate::search::source::SourceName;

/// Appends every line of `path` to `candidates`. Returns the number of lines read.
pub fn load_source(path: &Path, candidates: &Candidates) -> Result<usize> {
    let source = SourceName::new(path);
    let reader = BufReader::new(File::open(path)?);
    let mut batch = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        batch.push(Candidate::new(source.clone(), idx + 1, line));
    }
    let count = batch.len();
    candidates.extend(batch);
    Ok(count)
}

/// Loads each path in order, advancing `progress` once per source.
///
/// A source that cannot be read is logged and still counted, so the status
/// always reaches its total.
pub fn load_sources(paths: &[PathBuf], candidates: &Candidates, progress: &LoadProgress) -> usize {
    let mut total_lines = 0;
    for path in paths {
        match load_source(path, candidates) {
            Ok(lines) => {
                tracing::debug!(path = %path.display(), lines, "source loaded");
                total_lines += lines;
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to load source");
            }
        }
        progress.advance();
    }
    total_lines
}

/// Runs [`load_sources`] on a background thread.
pub fn spawn_loader(
    paths: Vec<PathBuf>,
    candidates: Candidates,
    progress: LoadProgress,
) -> JoinHandle<usize> {
    thread::spawn(move || load_sources(&paths, &candidates, &progress))
}

#[cfg(test)]
mod tests {
    use super::{load_source, load_sources, spawn_loader};
    use crate::core::status::{LoadStatus, Status};
    use crate::search::candidates::Candidates;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn load_source_numbers_lines_from_one() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("book.txt");
        fs::write(&path, "alpha\nbeta\n").expect("write");

        let candidates = Candidates::new();
        assert_eq!(load_source(&path, &candidates).expect("load"), 2);

        let mut lines = Vec::new();
        candidates.each_by_filter("", |_, candidate| {
            lines.push((candidate.line_no, candidate.text.clone()));
            true
        });
        assert_eq!(lines, vec![(1, "alpha".to_string()), (2, "beta".to_string())]);
    }

    #[test]
    fn missing_sources_still_advance_progress() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = dir.path().join("good.txt");
        fs::write(&good, "one\n").expect("write");
        let missing = dir.path().join("missing.txt");

        let status = LoadStatus::new(2);
        let candidates = Candidates::new();
        let lines = load_sources(&[missing, good], &candidates, &status.progress());

        assert_eq!(lines, 1);
        assert_eq!(status.loaded(), 2);
        assert_eq!(status.summary(), "[2/2]");
    }

    #[test]
    fn spawned_loader_fills_shared_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths: Vec<PathBuf> = (0..3)
            .map(|idx| {
                let path = dir.path().join(format!("{idx}.txt"));
                fs::write(&path, format!("line {idx}\n")).expect("write");
                path
            })
            .collect();

        let status = LoadStatus::new(paths.len());
        let candidates = Candidates::new();
        let handle = spawn_loader(paths, candidates.clone(), status.progress());
        assert_eq!(handle.join().expect("loader thread"), 3);
        assert_eq!(candidates.len(), 3);
        assert_eq!(status.loaded(), 3);
    }
}
