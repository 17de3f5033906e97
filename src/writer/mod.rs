// src/writer/mod.rs
mod image_writer;

pub use image_writer::ImageWriter;
