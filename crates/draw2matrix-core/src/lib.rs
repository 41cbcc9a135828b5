//! Core types shared by the `draw2matrix-*` crates.
//!
//! This crate is small and image-free: it holds the [`BinaryMatrix`] type,
//! the capture [`Region`], the flatten/transpose helpers used by dataset
//! export, and a minimal logger.

mod logger;
mod matrix;
mod region;

pub use matrix::{
    flatten, format_list, transpose, BinaryMatrix, FlattenOrder, Flattened, MatrixError,
};
pub use region::Region;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, LOG_ENV_VAR};
