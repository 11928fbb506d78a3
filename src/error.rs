use thiserror::Error;

use crate::types::{Dims, ItemId};

pub type Result<T> = std::result::Result<T, PackError>;

#[derive(Debug, Error, PartialEq)]
pub enum PackError {
    #[error("pallet catalog is empty")]
    EmptyCatalog,

    #[error("no pallet with type_id {0} found")]
    UnknownPalletType(u32),

    /// No pallet type reachable from the default one can hold the item.
    #[error("item {item} ({dims}) cannot fit on any available pallet type")]
    Unplaceable { item: ItemId, dims: Dims },

    /// The escalation chain was cut off before it ran out of pallet types.
    #[error("item {item} ({dims}) did not fit within {depth} escalation steps")]
    EscalationLimit { item: ItemId, dims: Dims, depth: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
