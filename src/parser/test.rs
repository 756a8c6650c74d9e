use std::{fs::File, io::Write};

use super::*;
use crate::reconstruct::InvalidTreeEncoding;

#[test]
fn parse_parent_tokens() {
    assert_eq!(parse_parents(" 2 0\t-1 "), Ok(vec![2, 0, -1]));
    assert_eq!(
        parse_parents("2 x 0"),
        Err(MalformedLineError::NotAnInteger {
            position: 2,
            token: "x".into()
        })
    );
}

#[test]
fn single_line_with_labels() {
    let tree = read_tree_with_labels("2 0 2", "1 NONE 3").unwrap();
    assert_eq!(tree.to_string(), "1[0](0[1] 2[3])");
}

#[test]
fn label_token_count_must_match() {
    let err = read_tree_with_labels("2 0 2", "1 2").unwrap_err();
    assert!(matches!(
        err,
        ReadError::MalformedLine {
            line: 1,
            source: MalformedLineError::TokenCount {
                expected: 3,
                found: 2
            }
        }
    ));
}

#[test]
fn batch_lines_are_independent() {
    let reader = BatchReader::default();
    let trees = reader.read_unlabelled(&["2 0", "0 1"]).unwrap();

    assert_eq!(trees.len(), 2);
    assert_eq!(trees[0].to_string(), "1(0)");
    assert_eq!(trees[1].to_string(), "0(1)");
}

#[test]
fn batch_with_labels() {
    let reader = BatchReader::default();
    let parents = ["2 0", "-1 0 2"];
    let labels = ["-2 1", "x 0 2"];
    let trees = reader.read_all(&parents, Some(&labels[..])).unwrap();

    assert_eq!(trees[0].to_string(), "1[1](0[-2])");
    assert_eq!(trees[1].to_string(), "1[0](2[2])");
}

#[test]
fn first_failing_line_aborts() {
    let reader = BatchReader::default();
    let err = reader
        .read_unlabelled(&["0", "0 a", "1 1"])
        .unwrap_err();
    assert_eq!(err.line(), Some(2));
    assert!(matches!(err, ReadError::MalformedLine { .. }));
}

#[test]
fn lenient_read_keeps_positions() {
    let reader = BatchReader::default();
    let results = reader
        .read_each::<_, &str>(&["0", "", "2 0"], None)
        .unwrap();

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(ReadError::InvalidTree {
            line: 2,
            source: InvalidTreeEncoding::Empty
        })
    ));
    assert_eq!(results[2].as_ref().unwrap().to_string(), "1(0)");
}

#[test]
fn line_counts_must_pair() {
    let reader = BatchReader::default();
    let err = reader
        .read_all(&["0", "0"], Some(&["1"][..]))
        .unwrap_err();
    assert!(matches!(
        err,
        ReadError::LineCountMismatch {
            left_lines: 2,
            right_lines: 1,
            ..
        }
    ));
}

#[test]
fn parallel_matches_sequential() {
    let lines: Vec<String> = (1..200)
        .map(|n| {
            (0..n)
                .map(|i| if i == 0 { 0 } else { i / 2 + 1 })
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    let sequential = BatchReader::default().read_unlabelled(&lines).unwrap();
    let parallel = BatchReader::new(
        ReaderConfig::default()
            .with_parallel(true)
            .with_parallel_threshold(1),
    )
    .read_unlabelled(&lines)
    .unwrap();

    similar_asserts::assert_eq!(sequential, parallel);
}

#[test]
fn parallel_error_is_first_failing_line() {
    let mut lines = vec!["0".to_string(); 50];
    lines[30] = "1 2 3".into();
    lines[10] = "7".into();

    let reader = BatchReader::new(ReaderConfig {
        parallel: true,
        parallel_threshold: 0,
    });
    let err = reader.read_unlabelled(&lines).unwrap_err();
    assert_eq!(err.line(), Some(11));
}

#[test]
fn read_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let parents = dir.path().join("a.parents");
    let labels = dir.path().join("a.labels");
    let mut f = File::create(&parents).unwrap();
    writeln!(f, "3 0 2").unwrap();
    writeln!(f, "0").unwrap();
    let mut f = File::create(&labels).unwrap();
    writeln!(f, "1 2 3").unwrap();
    writeln!(f, "NONE").unwrap();

    let reader = BatchReader::default();
    let trees = reader.read_files(&parents, Some(labels.as_path())).unwrap();
    assert_eq!(trees.len(), 2);
    assert_eq!(trees[0].to_string(), "1[2](2[3](0[1]))");
    assert_eq!(trees[1].to_string(), "0[0]");

    let missing = reader.read_files(&dir.path().join("nope"), None);
    assert!(matches!(missing, Err(ReadError::Io { .. })));
}
