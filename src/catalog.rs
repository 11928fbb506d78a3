use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PackError, Result};
use crate::pallet::Pallet;
use crate::types::PalletType;

/// Which catalog entry backs the first pallet and every freshly opened one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultPallet {
    /// The first entry in catalog order.
    #[default]
    First,
    Type(u32),
}

/// Pallet types, one template per distinct `type_id`, in input order.
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: Vec<PalletType>,
    default_type: u32,
}

impl Catalog {
    /// Deduplicates `pallets` by type id (first occurrence wins) and resolves
    /// the default pallet policy against the result.
    pub fn new(pallets: &[PalletType], default: DefaultPallet) -> Result<Self> {
        let mut seen = HashSet::new();
        let templates: Vec<PalletType> = pallets
            .iter()
            .filter(|p| seen.insert(p.type_id))
            .cloned()
            .collect();

        let first = templates.first().ok_or(PackError::EmptyCatalog)?;
        let default_type = match default {
            DefaultPallet::First => first.type_id,
            DefaultPallet::Type(type_id) => type_id,
        };

        let catalog = Self {
            templates,
            default_type,
        };
        catalog.get(default_type)?;
        Ok(catalog)
    }

    pub fn templates(&self) -> &[PalletType] {
        &self.templates
    }

    pub fn default_type(&self) -> u32 {
        self.default_type
    }

    pub fn get(&self, type_id: u32) -> Result<&PalletType> {
        self.templates
            .iter()
            .find(|p| p.type_id == type_id)
            .ok_or(PackError::UnknownPalletType(type_id))
    }

    /// Fresh, empty instance of `type_id`.
    pub fn open(&self, type_id: u32, max_items: usize) -> Result<Pallet> {
        Ok(Pallet::new(self.get(type_id)?.clone(), max_items))
    }

    pub fn open_default(&self, max_items: usize) -> Result<Pallet> {
        self.open(self.default_type, max_items)
    }

    /// Smallest type with at least the volume of `current` and a strictly
    /// higher weight limit. Ties go to lower volume, then lower weight limit,
    /// then catalog order.
    pub fn next_bigger(&self, current: &PalletType) -> Option<&PalletType> {
        let volume = current.volume();
        self.templates
            .iter()
            .filter(|p| {
                p.type_id != current.type_id
                    && p.volume() >= volume
                    && p.max_weight > current.max_weight
            })
            .min_by(|a, b| {
                a.volume()
                    .cmp(&b.volume())
                    .then(a.max_weight.total_cmp(&b.max_weight))
            })
    }
}
