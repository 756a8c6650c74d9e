//! Sentence datasets whose items pair a reconstructed tree with its tokens.
//!
//! Two layouts are supported, both directories of line-aligned text files:
//!
//! - sentiment ([`SentimentDataset`]): `sents.toks`, `dparents.txt` and
//!   `dlabels.txt`, one labeled tree per sentence, the gold class read off the
//!   root label;
//! - similarity ([`SimilarityDataset`]): `a.toks`, `b.toks`, `a.parents`,
//!   `b.parents` and `sim.txt`, two unlabeled trees and a score per pair.
//!
//! Items borrow from the dataset. Trees are immutable once built, so handing
//! out references is enough to keep consumers from interfering with each other.
//! Tokens stay strings; vocabulary lookup belongs to the caller, joined on
//! [`Node::index`].

use std::path::Path;

use tracing::info;

use crate::{
    label::NEUTRAL_LABEL,
    parser::{read_lines, BatchReader, ReadError},
    tree::Node,
};

pub const SENTENCES_FILE: &str = "sents.toks";
pub const SENTIMENT_PARENTS_FILE: &str = "dparents.txt";
pub const SENTIMENT_LABELS_FILE: &str = "dlabels.txt";

pub const LEFT_TOKENS_FILE: &str = "a.toks";
pub const RIGHT_TOKENS_FILE: &str = "b.toks";
pub const LEFT_PARENTS_FILE: &str = "a.parents";
pub const RIGHT_PARENTS_FILE: &str = "b.parents";
pub const SCORES_FILE: &str = "sim.txt";

/// Shift from root sentiment labels (`-2..=2`) to class ids (`0..=4`).
pub const SENTIMENT_OFFSET: i64 = 2;

pub type Sentence = Vec<String>;

fn tokenize(line: &str) -> Sentence {
    line.split_whitespace().map(str::to_owned).collect()
}

fn ensure_same_len(
    left: &str,
    left_lines: usize,
    right: &str,
    right_lines: usize,
) -> Result<(), ReadError> {
    if left_lines == right_lines {
        Ok(())
    } else {
        Err(ReadError::LineCountMismatch {
            left: left.to_owned(),
            left_lines,
            right: right.to_owned(),
            right_lines,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SentimentItem<'a> {
    pub tree: &'a Node,
    pub sentence: &'a [String],
    pub label: i64,
}

/// Sentences with labeled trees; the gold class is the root label shifted by
/// [`SENTIMENT_OFFSET`].
#[derive(Debug, Clone)]
pub struct SentimentDataset {
    num_classes: usize,
    sentences: Vec<Sentence>,
    trees: Vec<Node>,
    labels: Vec<i64>,
}

impl SentimentDataset {
    pub fn load(
        dir: impl AsRef<Path>,
        num_classes: usize,
        reader: &BatchReader,
    ) -> Result<Self, ReadError> {
        let dir = dir.as_ref();
        let sentences = read_lines(&dir.join(SENTENCES_FILE))?;
        let parents = read_lines(&dir.join(SENTIMENT_PARENTS_FILE))?;
        let labels = read_lines(&dir.join(SENTIMENT_LABELS_FILE))?;
        let dataset = Self::from_lines(&sentences, &parents, &labels, num_classes, reader)?;
        info!(dir = %dir.display(), items = dataset.len(), "loaded sentiment dataset");
        Ok(dataset)
    }

    pub fn from_lines<S: AsRef<str> + Sync>(
        sentence_lines: &[S],
        parent_lines: &[S],
        label_lines: &[S],
        num_classes: usize,
        reader: &BatchReader,
    ) -> Result<Self, ReadError> {
        ensure_same_len(
            SENTENCES_FILE,
            sentence_lines.len(),
            SENTIMENT_PARENTS_FILE,
            parent_lines.len(),
        )?;
        let trees = reader.read_all(parent_lines, Some(label_lines))?;
        let labels = trees
            .iter()
            .map(|t| t.label().unwrap_or(NEUTRAL_LABEL) + SENTIMENT_OFFSET)
            .collect();
        Ok(SentimentDataset {
            num_classes,
            sentences: sentence_lines.iter().map(|l| tokenize(l.as_ref())).collect(),
            trees,
            labels,
        })
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<SentimentItem<'_>> {
        Some(SentimentItem {
            tree: self.trees.get(index)?,
            sentence: self.sentences.get(index)?,
            label: *self.labels.get(index)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = SentimentItem<'_>> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SimilarityItem<'a> {
    pub left_tree: &'a Node,
    pub left_sentence: &'a [String],
    pub right_tree: &'a Node,
    pub right_sentence: &'a [String],
    pub score: f64,
}

/// Sentence pairs with unlabeled trees and a similarity score each.
#[derive(Debug, Clone)]
pub struct SimilarityDataset {
    num_classes: usize,
    left_sentences: Vec<Sentence>,
    right_sentences: Vec<Sentence>,
    left_trees: Vec<Node>,
    right_trees: Vec<Node>,
    scores: Vec<f64>,
}

impl SimilarityDataset {
    pub fn load(
        dir: impl AsRef<Path>,
        num_classes: usize,
        reader: &BatchReader,
    ) -> Result<Self, ReadError> {
        let dir = dir.as_ref();
        let read = |name: &str| read_lines(&dir.join(name));
        let dataset = Self::from_lines(
            [read(LEFT_TOKENS_FILE)?, read(RIGHT_TOKENS_FILE)?],
            [read(LEFT_PARENTS_FILE)?, read(RIGHT_PARENTS_FILE)?],
            &read(SCORES_FILE)?,
            num_classes,
            reader,
        )?;
        info!(dir = %dir.display(), items = dataset.len(), "loaded similarity dataset");
        Ok(dataset)
    }

    /// Builds the dataset from `[left, right]` token and parent lines plus
    /// one score line per pair.
    pub fn from_lines<S: AsRef<str> + Sync>(
        [left_tokens, right_tokens]: [Vec<S>; 2],
        [left_parents, right_parents]: [Vec<S>; 2],
        score_lines: &[S],
        num_classes: usize,
        reader: &BatchReader,
    ) -> Result<Self, ReadError> {
        let n = score_lines.len();
        for (name, lines) in [
            (LEFT_TOKENS_FILE, left_tokens.len()),
            (RIGHT_TOKENS_FILE, right_tokens.len()),
            (LEFT_PARENTS_FILE, left_parents.len()),
            (RIGHT_PARENTS_FILE, right_parents.len()),
        ] {
            ensure_same_len(name, lines, SCORES_FILE, n)?;
        }

        let scores = score_lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let token = line.as_ref().trim();
                token.parse().map_err(|_| ReadError::MalformedScore {
                    line: i + 1,
                    token: token.to_owned(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        Ok(SimilarityDataset {
            num_classes,
            left_trees: reader.read_unlabelled(&left_parents)?,
            right_trees: reader.read_unlabelled(&right_parents)?,
            left_sentences: left_tokens.iter().map(|l| tokenize(l.as_ref())).collect(),
            right_sentences: right_tokens.iter().map(|l| tokenize(l.as_ref())).collect(),
            scores,
        })
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<SimilarityItem<'_>> {
        Some(SimilarityItem {
            left_tree: self.left_trees.get(index)?,
            left_sentence: self.left_sentences.get(index)?,
            right_tree: self.right_trees.get(index)?,
            right_sentence: self.right_sentences.get(index)?,
            score: *self.scores.get(index)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = SimilarityItem<'_>> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn sentiment_gold_label_from_root() {
        let dataset = SentimentDataset::from_lines(
            &["a good film", "meh"],
            &["2 0 2", "0"],
            &["0 2 NONE", "x"],
            5,
            &BatchReader::default(),
        )
        .unwrap();

        assert_eq!(dataset.len(), 2);
        let first = dataset.get(0).unwrap();
        assert_eq!(first.label, 4);
        assert_eq!(first.sentence, ["a", "good", "film"]);
        assert_eq!(first.tree.to_string(), "1[2](0[0] 2[0])");
        assert_eq!(dataset.get(1).unwrap().label, 2);
        assert!(dataset.get(2).is_none());
        assert_eq!(dataset.iter().map(|item| item.label).collect::<Vec<_>>(), [4, 2]);
    }

    #[test]
    fn sentiment_line_counts_checked() {
        let err = SentimentDataset::from_lines(
            &["one", "two"],
            &["0"],
            &["1"],
            5,
            &BatchReader::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ReadError::LineCountMismatch { .. }));
    }

    #[test]
    fn similarity_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let files = [
            (LEFT_TOKENS_FILE, "a dog runs\na cat\n"),
            (RIGHT_TOKENS_FILE, "dogs run\nthe cat sleeps\n"),
            (LEFT_PARENTS_FILE, "2 3 0\n2 0\n"),
            (RIGHT_PARENTS_FILE, "2 0\n2 3 0\n"),
            (SCORES_FILE, "4.5\n1.25\n"),
        ];
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }

        let dataset = SimilarityDataset::load(dir.path(), 5, &BatchReader::default()).unwrap();
        assert_eq!(dataset.len(), 2);

        let second = dataset.get(1).unwrap();
        assert_eq!(second.score, 1.25);
        assert_eq!(second.left_tree.to_string(), "1(0)");
        assert_eq!(second.right_tree.to_string(), "2(1(0))");
        assert_eq!(second.right_sentence, ["the", "cat", "sleeps"]);
        assert!(second.left_tree.iter_preorder().all(|n| n.label().is_none()));
    }

    #[test]
    fn similarity_bad_score() {
        let err = SimilarityDataset::from_lines(
            [vec!["a"], vec!["b"]],
            [vec!["0"], vec!["0"]],
            &["high"],
            5,
            &BatchReader::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ReadError::MalformedScore { line: 1, .. }));
    }
}
