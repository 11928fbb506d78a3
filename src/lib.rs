pub mod catalog;
pub mod error;
pub mod orientation;
pub mod pallet;
pub mod render;
pub mod search;
pub mod solver;
pub mod types;

pub use catalog::{Catalog, DefaultPallet};
pub use error::{PackError, Result};
pub use solver::{PackConfig, Packer};
