use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{Catalog, DefaultPallet};
use crate::error::{PackError, Result};
use crate::pallet::{MAX_ITEMS_PER_PALLET, Pallet};
use crate::search::try_place;
use crate::types::{BoxSpec, ItemId, PalletType, PlanRecord, Unit};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    pub default_pallet: DefaultPallet,
    pub max_items_per_pallet: usize,
    /// A rectangular item opens a new pallet once the current one holds more
    /// round items than this.
    pub max_round_before_rectangular: usize,
    pub max_escalation_depth: usize,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            default_pallet: DefaultPallet::First,
            max_items_per_pallet: MAX_ITEMS_PER_PALLET,
            max_round_before_rectangular: 2,
            max_escalation_depth: 16,
        }
    }
}

/// Outcome of an escalation attempt.
#[derive(Debug)]
pub enum Escalation {
    /// The item now sits on this bigger pallet, which carries the old load.
    Placed(Pallet),
    /// The old pallet was finalized; the item still has to be placed on this
    /// fresh default pallet.
    Opened(Pallet),
}

pub struct Packer {
    pallets: Vec<PalletType>,
    demands: Vec<BoxSpec>,
    config: PackConfig,
}

impl Packer {
    pub fn new(pallets: Vec<PalletType>, demands: Vec<BoxSpec>) -> Self {
        Self::with_config(pallets, demands, PackConfig::default())
    }

    pub fn with_config(pallets: Vec<PalletType>, demands: Vec<BoxSpec>, config: PackConfig) -> Self {
        Self {
            pallets,
            demands,
            config,
        }
    }

    /// Runs the whole greedy pass and returns one record per loaded pallet,
    /// in the order the pallets were finalized.
    pub fn pack(&self) -> Result<Vec<PlanRecord>> {
        for p in &self.pallets {
            p.validate()?;
        }
        for d in &self.demands {
            d.validate()?;
        }

        let catalog = Catalog::new(&self.pallets, self.config.default_pallet)?;
        let queue = self.expand_demands();
        info!(
            pallet_types = catalog.templates().len(),
            units = queue.len(),
            default_type = catalog.default_type(),
            "packing started"
        );

        let mut plan = Vec::new();
        let mut current = catalog.open_default(self.config.max_items_per_pallet)?;

        for unit in queue {
            if !unit.is_round() {
                let rounds = current.round_count();
                if rounds > self.config.max_round_before_rectangular {
                    info!(
                        item = %unit.id,
                        rounds,
                        "opening new pallet: rectangular item after round items"
                    );
                    finish_pallet(&current, &mut plan);
                    current = catalog.open_default(self.config.max_items_per_pallet)?;
                }
            }

            loop {
                if try_place(&unit, &mut current).is_some() {
                    break;
                }
                match self.escalate_or_open_new(&catalog, current, &unit, &mut plan)? {
                    Escalation::Placed(bigger) => {
                        current = bigger;
                        break;
                    }
                    Escalation::Opened(fresh) => current = fresh,
                }
            }
        }

        finish_pallet(&current, &mut plan);
        info!(pallets = plan.len(), "packing finished");
        Ok(plan)
    }

    /// Expands each demand line into unit instances and orders them round
    /// first, then by weight and volume, both descending.
    pub fn expand_demands(&self) -> Vec<Unit> {
        let mut next_unit = 0u64;
        let mut units = Vec::new();
        for d in &self.demands {
            for _ in 0..d.quantity {
                // A zero type id counts as absent.
                let id = match d.type_id {
                    Some(type_id) if type_id != 0 => ItemId::Type(type_id),
                    _ => ItemId::Unit(next_unit),
                };
                next_unit += 1;
                units.push(Unit::from_spec(d, id));
            }
        }

        units.sort_by(|a, b| {
            b.is_round()
                .cmp(&a.is_round())
                .then(b.weight.total_cmp(&a.weight))
                .then(b.dims.volume().cmp(&a.dims.volume()))
        });
        units
    }

    /// Moves the load of `current` onto successively bigger pallet types until
    /// one of them takes `unit` as well. When the chain runs out, `current`
    /// is finalized into `plan` and a fresh default pallet is returned.
    ///
    /// Fails when `current` was empty: with `Unplaceable` if the unit was
    /// refused by a bare pallet and every type reachable from it, with
    /// `EscalationLimit` if the chain was cut off by `max_escalation_depth`.
    pub fn escalate_or_open_new(
        &self,
        catalog: &Catalog,
        current: Pallet,
        unit: &Unit,
        plan: &mut Vec<PlanRecord>,
    ) -> Result<Escalation> {
        let mut from = current.kind.clone();
        for depth in 1..=self.config.max_escalation_depth {
            let Some(bigger) = catalog.next_bigger(&from) else {
                break;
            };
            debug!(
                item = %unit.id,
                from = from.type_id,
                to = bigger.type_id,
                depth,
                "escalating to bigger pallet"
            );

            let mut candidate = catalog.open(bigger.type_id, self.config.max_items_per_pallet)?;
            candidate.take_load_from(&current);
            if try_place(unit, &mut candidate).is_some() {
                info!(
                    item = %unit.id,
                    from = current.type_id(),
                    to = candidate.type_id(),
                    items = candidate.len(),
                    "moved load to bigger pallet"
                );
                return Ok(Escalation::Placed(candidate));
            }
            from = candidate.kind;
        }

        if current.is_empty() {
            if catalog.next_bigger(&from).is_some() {
                return Err(PackError::EscalationLimit {
                    item: unit.id,
                    dims: unit.dims,
                    depth: self.config.max_escalation_depth,
                });
            }
            return Err(PackError::Unplaceable {
                item: unit.id,
                dims: unit.dims,
            });
        }

        finish_pallet(&current, plan);
        let fresh = catalog.open_default(self.config.max_items_per_pallet)?;
        info!(
            item = %unit.id,
            type_id = fresh.type_id(),
            "opened new pallet"
        );
        Ok(Escalation::Opened(fresh))
    }
}

/// Appends the record for `pallet` to `plan` when it holds anything.
pub fn finish_pallet(pallet: &Pallet, plan: &mut Vec<PlanRecord>) {
    if let Some(record) = pallet.finish() {
        info!(
            type_id = record.type_id,
            items = record.total_items,
            load_weight = record.load_weight,
            "pallet finalized"
        );
        plan.push(record);
    }
}
