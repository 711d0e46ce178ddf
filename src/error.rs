use std::path::PathBuf;

use thiserror::Error;

/// The single error type threaded through loading, slicing, contouring and rasterizing.
///
/// The CLI matches only on the top-level variant to pick an exit code; it never
/// inspects nested context.
#[derive(Debug, Error)]
pub enum SliceError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {path} at line {line}")]
    Parse { path: PathBuf, line: usize },

    #[error("unsupported geometry directive {directive:?} in {path} at line {line}")]
    UnsupportedGeometry {
        path: PathBuf,
        line: usize,
        directive: String,
    },

    #[error("non-manifold edge between vertices {a} and {b}: shared by more than two triangles")]
    NonManifold { a: u32, b: u32 },

    #[error("internal invariant violated at site {key:#x}: expected edge_count == 2, got {edge_count}")]
    InternalInvariant { key: u64, edge_count: u8 },
}
