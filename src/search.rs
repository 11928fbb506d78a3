use tracing::debug;

use crate::orientation::orientations;
use crate::pallet::{Pallet, Rejection};
use crate::types::{Dims, Position, Unit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub position: Position,
    pub dims: Dims,
}

/// Places `unit` on the first admissible coordinate of the first orientation
/// that has one. The unit is left untouched; the pallet receives a copy
/// carrying the winning orientation.
pub fn try_place(unit: &Unit, pallet: &mut Pallet) -> Option<Placement> {
    for dims in orientations(unit) {
        match find_position(pallet, unit, dims) {
            Ok(Some(position)) => {
                pallet.place(
                    position,
                    Unit {
                        dims,
                        ..unit.clone()
                    },
                );
                return Some(Placement { position, dims });
            }
            Ok(None) => {}
            Err(rejection) => {
                debug!(
                    item = %unit.id,
                    pallet_type = pallet.type_id(),
                    ?rejection,
                    "item refused by pallet"
                );
                return None;
            }
        }
    }
    None
}

/// Scans z outer, y middle, x inner for the first coordinate the pallet
/// accepts in orientation `dims`. Position-independent refusals end the scan
/// early as an `Err`.
pub fn find_position(
    pallet: &Pallet,
    unit: &Unit,
    dims: Dims,
) -> Result<Option<Position>, Rejection> {
    let reach_x = pallet.kind.width.saturating_add(unit.overage);
    let (Some(max_x), Some(max_y), Some(max_z)) = (
        reach_x.checked_sub(dims.width),
        pallet.kind.depth.checked_sub(dims.depth),
        pallet.kind.height.checked_sub(dims.height),
    ) else {
        return Ok(None);
    };

    for z in 0..=max_z {
        for y in 0..=max_y {
            let mut x = 0;
            while x <= max_x {
                let at = Position::new(x, y, z);
                match pallet.check(at, dims, unit) {
                    Ok(()) => return Ok(Some(at)),
                    // Every x short of the blocker's far face still hits it.
                    Err(Rejection::Overlap(idx)) => {
                        let blocker = &pallet.used_space[idx];
                        x = blocker.position.x + blocker.unit.dims.width;
                    }
                    Err(r) if r.is_position_independent() => return Err(r),
                    Err(_) => x += 1,
                }
            }
        }
    }
    Ok(None)
}
