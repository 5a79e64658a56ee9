//! 类型模块：定义在检索、缓存与问答编排之间流动的核心数据类型。
//!
//! # Types Module
//!
//! Core data types shared across the pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ScoredDocument`] | Retrieved passage with a similarity score |
//! | [`IndexDocument`] | Document submitted for ingestion |
//! | [`IndexHit`] | Raw nearest-neighbor hit from the vector index |

mod document;

pub use document::{IndexDocument, IndexHit, ScoredDocument};
