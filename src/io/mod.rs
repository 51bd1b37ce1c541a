//! File output surfaces.

pub mod export;
