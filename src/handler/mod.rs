//! Built-in callbacks backed by the file system

pub mod static_files;

pub use static_files::FileCallback;
