use crate::types::{Dims, PalletType, PlanItem, PlanRecord, Position, Unit};

/// Reference item-count ceiling per pallet.
pub const MAX_ITEMS_PER_PALLET: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedItem {
    pub unit: Unit,
    pub position: Position,
}

/// Why a candidate placement was refused. `Overlap` carries the index of the
/// first placed item that intersects the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    ItemLimit,
    OutOfBounds,
    Overweight,
    Overlap(usize),
}

impl Rejection {
    /// Item-count and weight refusals hold for every coordinate on the pallet.
    pub fn is_position_independent(&self) -> bool {
        matches!(self, Rejection::ItemLimit | Rejection::Overweight)
    }
}

/// Live pallet instance: a catalog template plus its running load.
#[derive(Debug, Clone)]
pub struct Pallet {
    pub kind: PalletType,
    pub current_weight: f64,
    pub used_space: Vec<PlacedItem>,
    max_items: usize,
}

impl Pallet {
    pub fn new(kind: PalletType, max_items: usize) -> Self {
        Self {
            kind,
            current_weight: 0.0,
            used_space: Vec::new(),
            max_items,
        }
    }

    pub fn type_id(&self) -> u32 {
        self.kind.type_id
    }

    pub fn is_empty(&self) -> bool {
        self.used_space.is_empty()
    }

    pub fn len(&self) -> usize {
        self.used_space.len()
    }

    pub fn round_count(&self) -> usize {
        self.used_space.iter().filter(|p| p.unit.is_round()).count()
    }

    /// Feasibility of putting `unit` at `at` in orientation `dims`. Checks run
    /// in a fixed order and stop at the first violation.
    pub fn check(&self, at: Position, dims: Dims, unit: &Unit) -> Result<(), Rejection> {
        if self.used_space.len() >= self.max_items {
            return Err(Rejection::ItemLimit);
        }

        // Overage comes from the unit and only widens the x bound.
        if at.x as u64 + dims.width as u64 > self.kind.width as u64 + unit.overage as u64
            || at.y as u64 + dims.depth as u64 > self.kind.depth as u64
            || at.z as u64 + dims.height as u64 > self.kind.height as u64
        {
            return Err(Rejection::OutOfBounds);
        }

        if self.current_weight + unit.weight > self.kind.max_weight {
            return Err(Rejection::Overweight);
        }

        match self
            .used_space
            .iter()
            .position(|placed| overlaps(at, dims, placed.position, placed.unit.dims))
        {
            Some(idx) => Err(Rejection::Overlap(idx)),
            None => Ok(()),
        }
    }

    pub fn can_place(&self, at: Position, dims: Dims, unit: &Unit) -> bool {
        self.check(at, dims, unit).is_ok()
    }

    /// Records `unit` (already carrying its final orientation) at `at`.
    pub fn place(&mut self, at: Position, unit: Unit) {
        self.current_weight += unit.weight;
        self.used_space.push(PlacedItem { unit, position: at });
    }

    /// Moves the load of `other` onto this pallet without re-validating it.
    pub fn take_load_from(&mut self, other: &Pallet) {
        self.used_space = other.used_space.clone();
        self.current_weight = other.current_weight;
    }

    /// Summarizes the pallet. Empty pallets produce no record.
    pub fn finish(&self) -> Option<PlanRecord> {
        if self.used_space.is_empty() {
            return None;
        }

        let items: Vec<PlanItem> = self
            .used_space
            .iter()
            .map(|p| PlanItem {
                box_id: p.unit.id,
                shape: p.unit.shape,
                weight: p.unit.weight,
                dimensions: p.unit.dims,
                position: p.position,
            })
            .collect();
        let total_height = self
            .used_space
            .iter()
            .map(|p| p.position.z + p.unit.dims.height)
            .max()
            .unwrap_or(0);

        Some(PlanRecord {
            type_id: self.kind.type_id,
            total_items: items.len(),
            items,
            load_weight: self.current_weight,
            total_weight: self.current_weight + self.kind.own_weight,
            total_height,
        })
    }
}

/// Standard AABB test: two boxes overlap unless separated along some axis.
pub fn overlaps(a: Position, a_dims: Dims, b: Position, b_dims: Dims) -> bool {
    let separated = |a0: u32, a_len: u32, b0: u32, b_len: u32| {
        a0 as u64 + a_len as u64 <= b0 as u64 || b0 as u64 + b_len as u64 <= a0 as u64
    };
    !(separated(a.x, a_dims.width, b.x, b_dims.width)
        || separated(a.y, a_dims.depth, b.y, b_dims.depth)
        || separated(a.z, a_dims.height, b.z, b_dims.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoxSpec, ItemId};

    fn pallet() -> Pallet {
        Pallet::new(
            PalletType::new(120, 80, 105, 22.0, 478.0, 2),
            MAX_ITEMS_PER_PALLET,
        )
    }

    fn unit(spec: BoxSpec) -> Unit {
        Unit::from_spec(&spec, ItemId::Unit(0))
    }

    #[test]
    fn test_empty_pallet_accepts_origin() {
        let p = pallet();
        let u = unit(BoxSpec::new(30, 20, 10, 5.0, 1));
        assert!(p.can_place(Position::default(), u.dims, &u));
    }

    #[test]
    fn test_bounds_on_each_axis() {
        let p = pallet();
        let u = unit(BoxSpec::new(30, 20, 10, 5.0, 1));
        assert_eq!(p.check(Position::new(90, 0, 0), u.dims, &u), Ok(()));
        assert_eq!(
            p.check(Position::new(91, 0, 0), u.dims, &u),
            Err(Rejection::OutOfBounds)
        );
        assert_eq!(
            p.check(Position::new(0, 61, 0), u.dims, &u),
            Err(Rejection::OutOfBounds)
        );
        assert_eq!(
            p.check(Position::new(0, 0, 96), u.dims, &u),
            Err(Rejection::OutOfBounds)
        );
    }

    #[test]
    fn test_overage_extends_width_only() {
        let p = pallet();
        let u = unit(BoxSpec::new(130, 20, 10, 5.0, 1).with_overage(10));
        assert!(p.can_place(Position::default(), u.dims, &u));
        assert!(!p.can_place(Position::new(1, 0, 0), u.dims, &u));

        let deep = unit(BoxSpec::new(20, 90, 10, 5.0, 1).with_overage(10));
        assert!(!p.can_place(Position::default(), deep.dims, &deep));
    }

    #[test]
    fn test_weight_ceiling() {
        let mut p = pallet();
        let heavy = unit(BoxSpec::new(10, 10, 10, 400.0, 1));
        p.place(Position::default(), heavy);
        let u = unit(BoxSpec::new(10, 10, 10, 79.0, 1));
        assert_eq!(
            p.check(Position::new(50, 0, 0), u.dims, &u),
            Err(Rejection::Overweight)
        );
        let light = unit(BoxSpec::new(10, 10, 10, 78.0, 1));
        assert!(p.can_place(Position::new(50, 0, 0), light.dims, &light));
    }

    #[test]
    fn test_overlap_reports_first_blocker() {
        let mut p = pallet();
        p.place(Position::default(), unit(BoxSpec::new(30, 20, 10, 1.0, 1)));
        p.place(Position::new(30, 0, 0), unit(BoxSpec::new(30, 20, 10, 1.0, 1)));
        let u = unit(BoxSpec::new(10, 10, 10, 1.0, 1));
        assert_eq!(
            p.check(Position::new(35, 5, 0), u.dims, &u),
            Err(Rejection::Overlap(1))
        );
        // Touching faces are not an overlap.
        assert!(p.can_place(Position::new(60, 0, 0), u.dims, &u));
        assert!(p.can_place(Position::new(0, 0, 10), u.dims, &u));
    }

    #[test]
    fn test_item_limit() {
        let mut p = Pallet::new(PalletType::new(100, 100, 100, 0.0, 1000.0, 1), 2);
        p.place(Position::new(0, 0, 0), unit(BoxSpec::new(1, 1, 1, 1.0, 1)));
        p.place(Position::new(1, 0, 0), unit(BoxSpec::new(1, 1, 1, 1.0, 1)));
        let u = unit(BoxSpec::new(1, 1, 1, 1.0, 1));
        let rejection = p.check(Position::new(50, 50, 50), u.dims, &u).unwrap_err();
        assert_eq!(rejection, Rejection::ItemLimit);
        assert!(rejection.is_position_independent());
    }

    #[test]
    fn test_finish_summarizes_load() {
        let mut p = pallet();
        assert!(p.finish().is_none());
        p.place(Position::new(0, 0, 0), unit(BoxSpec::new(30, 20, 10, 5.0, 1)));
        p.place(Position::new(0, 0, 10), unit(BoxSpec::new(30, 20, 15, 5.0, 1)));
        let record = p.finish().unwrap();
        assert_eq!(record.type_id, 2);
        assert_eq!(record.total_items, 2);
        assert_eq!(record.load_weight, 10.0);
        assert_eq!(record.total_weight, 32.0);
        assert_eq!(record.total_height, 25);
    }

    #[test]
    fn test_take_load_from() {
        let mut small = pallet();
        small.place(Position::default(), unit(BoxSpec::new(30, 20, 10, 5.0, 1)));
        let mut big = Pallet::new(
            PalletType::new(220, 80, 105, 20.0, 680.0, 3),
            MAX_ITEMS_PER_PALLET,
        );
        big.take_load_from(&small);
        assert_eq!(big.len(), 1);
        assert_eq!(big.current_weight, 5.0);
        assert_eq!(big.type_id(), 3);
    }
}
