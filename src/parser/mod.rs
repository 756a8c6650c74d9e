//! # Line parsing and batch reading
//!
//! Encoded trees come as text, one tree per line:
//!
//! - a parent-pointer line holds whitespace separated integers, one per token
//!   position, each `-1`, `0` or a 1-based position;
//! - an optional label line holds the same number of whitespace separated
//!   tokens, each an integer literal or an arbitrary placeholder.
//!
//! [`read_tree`] and [`read_tree_with_labels`] handle a single line,
//! [`BatchReader`] pairs whole files (or slices of lines) positionally and
//! returns one root per line in input order.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{
    reconstruct::{reconstruct, LabelArray, ParentArray},
    tree::Node,
};

pub mod error;
pub use error::{MalformedLineError, ReadError};

pub mod reader;
pub use reader::{BatchReader, ReaderConfig};

/// Splits a parent-pointer line into integers.
pub fn parse_parents(line: &str) -> Result<Vec<i64>, MalformedLineError> {
    line.split_whitespace()
        .enumerate()
        .map(|(i, token)| {
            token
                .parse()
                .map_err(|_| MalformedLineError::NotAnInteger {
                    position: i + 1,
                    token: token.to_owned(),
                })
        })
        .collect()
}

/// Splits a label line into raw tokens. Never fails: coercion happens per node.
pub fn parse_labels(line: &str) -> LabelArray {
    line.split_whitespace().collect()
}

/// Reconstructs the tree of a single unlabeled line.
pub fn read_tree(line: &str) -> Result<Node, ReadError> {
    read_line(1, line, None)
}

/// Reconstructs the tree of a single line, labelling nodes from `labels`.
pub fn read_tree_with_labels(line: &str, labels: &str) -> Result<Node, ReadError> {
    read_line(1, line, Some(labels))
}

pub(crate) fn read_line(
    line_no: usize,
    parents: &str,
    labels: Option<&str>,
) -> Result<Node, ReadError> {
    let malformed = |source| ReadError::MalformedLine {
        line: line_no,
        source,
    };
    let invalid = |source| ReadError::InvalidTree {
        line: line_no,
        source,
    };

    let parents = parse_parents(parents).map_err(malformed)?;
    let labels = labels.map(parse_labels);
    if let Some(labels) = &labels {
        if labels.len() != parents.len() {
            return Err(malformed(MalformedLineError::TokenCount {
                expected: parents.len(),
                found: labels.len(),
            }));
        }
    }

    let parents = ParentArray::new(parents).map_err(invalid)?;
    reconstruct(&parents, labels.as_ref()).map_err(invalid)
}

/// Reads every line of `path`.
pub fn read_lines(path: &Path) -> Result<Vec<String>, ReadError> {
    let io_err = |source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    BufReader::new(file)
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)
}

#[cfg(test)]
mod test;
