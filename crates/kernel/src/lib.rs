//! Core building blocks shared by every bookshelf crate: layered settings,
//! the [`Module`] contract, and the [`ModuleRegistry`] lifecycle driver.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Migration, Module};
pub use registry::ModuleRegistry;
