//! # Deptree
//!
//! Deptree rebuilds explicit rooted trees from flat parent-pointer encodings,
//! the format dependency and constituency parsers commonly emit for
//! sentences: one integer per token position naming the position's parent,
//! `0` for the root and `-1` for positions that take no part in the tree.
//! An optional parallel label line attaches an integer label to every node.
//!
//! The reconstructed [`tree::Node`] owns its children and carries the 0-based
//! token position as `index`, which is the key for joining nodes back to
//! sentence tokens or embeddings in recursive models over sentences.
//!
//! - [`reconstruct`]: the single-pass memoized reconstruction of one line.
//! - [`parser`]: line tokenization and the [`parser::BatchReader`].
//! - [`label`]: best-effort label coercion.
//! - [`dataset`]: sentiment and similarity datasets built on top.

pub mod dataset;
pub mod label;
pub mod parser;
pub mod reconstruct;
pub mod tree;
