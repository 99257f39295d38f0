// Copyright 2026 The itemlens authors
// Licensed under the Apache License, Version 2.0

pub mod document;
pub mod engine;
pub mod schema;

pub use document::{DEFAULT_OUTPUT_FILE, DEFAULT_TITLE, Document, RenderedRow};
pub use engine::{Direction, TableState, natural_cmp};
pub use schema::{ColumnSet, Record, Value};

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("records must form a non-empty list")]
    InvalidInput,
    #[error("write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
