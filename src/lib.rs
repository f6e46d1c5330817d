//! Bookshelf application library
//!
//! Project modules plus the bootstrap shared by the `bookshelf` and
//! `bookshelf-cli` binaries.

pub mod bootstrap;
pub mod modules;

pub use modules::*;
