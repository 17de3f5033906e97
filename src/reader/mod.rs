// src/reader/mod.rs
mod hybrid_reader;

pub use hybrid_reader::HybridReader;
