use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info_span};

use super::{read_line, read_lines, ReadError};
use crate::tree::Node;

/// Settings of a [`BatchReader`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ReaderConfig {
    /// Reconstruct lines on the rayon thread pool.
    pub parallel: bool,
    /// Smallest batch for which `parallel` takes effect.
    pub parallel_threshold: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            parallel: false,
            parallel_threshold: 256,
        }
    }
}

impl ReaderConfig {
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

/// Reconstructs one tree per line, pairing parent lines with label lines by
/// position.
///
/// Every line gets its own memo table, so lines are independent and may be
/// processed in parallel; results always come back in input order.
#[derive(Clone, Debug, Default)]
pub struct BatchReader {
    config: ReaderConfig,
}

impl BatchReader {
    pub fn new(config: ReaderConfig) -> Self {
        BatchReader { config }
    }

    /// Reconstructs every line, keeping one result per line.
    ///
    /// Fails as a whole only when the label lines do not pair up with the
    /// parent lines.
    pub fn read_each<P, L>(
        &self,
        parent_lines: &[P],
        label_lines: Option<&[L]>,
    ) -> Result<Vec<Result<Node, ReadError>>, ReadError>
    where
        P: AsRef<str> + Sync,
        L: AsRef<str> + Sync,
    {
        let n = parent_lines.len();
        if let Some(labels) = label_lines {
            if labels.len() != n {
                return Err(ReadError::LineCountMismatch {
                    left: "parent lines".into(),
                    left_lines: n,
                    right: "label lines".into(),
                    right_lines: labels.len(),
                });
            }
        }

        let parallel = self.config.parallel && n >= self.config.parallel_threshold;
        let _span = info_span!("read_trees", lines = n, labelled = label_lines.is_some(), parallel)
            .entered();

        let line = |i: usize| {
            read_line(
                i + 1,
                parent_lines[i].as_ref(),
                label_lines.map(|labels| labels[i].as_ref()),
            )
        };
        let trees: Vec<_> = if parallel {
            (0..n).into_par_iter().map(line).collect()
        } else {
            (0..n).map(line).collect()
        };

        debug!(
            failed = trees.iter().filter(|t| t.is_err()).count(),
            "reconstructed batch"
        );
        Ok(trees)
    }

    /// Reconstructs every line; the first failing line aborts the batch.
    pub fn read_all<P, L>(
        &self,
        parent_lines: &[P],
        label_lines: Option<&[L]>,
    ) -> Result<Vec<Node>, ReadError>
    where
        P: AsRef<str> + Sync,
        L: AsRef<str> + Sync,
    {
        self.read_each(parent_lines, label_lines)?
            .into_iter()
            .collect()
    }

    /// [`BatchReader::read_all`] without labels.
    pub fn read_unlabelled<P: AsRef<str> + Sync>(
        &self,
        parent_lines: &[P],
    ) -> Result<Vec<Node>, ReadError> {
        self.read_all::<P, &str>(parent_lines, None)
    }

    /// Reads a parent-pointer file and, optionally, its label file.
    pub fn read_files(
        &self,
        parents: &Path,
        labels: Option<&Path>,
    ) -> Result<Vec<Node>, ReadError> {
        let parent_lines = read_lines(parents)?;
        let label_lines = labels.map(read_lines).transpose()?;
        self.read_all(&parent_lines, label_lines.as_deref())
    }
}
