use crate::types::{Dims, Unit};

/// Allowed orientations of a unit, in canonical order with duplicates
/// removed. A unit that cannot rotate keeps its stored dimensions.
pub fn orientations(unit: &Unit) -> Vec<Dims> {
    let Dims {
        width: w,
        depth: d,
        height: h,
    } = unit.dims;

    if !unit.can_rotate {
        return vec![unit.dims];
    }

    let candidates = [
        Dims::new(w, d, h),
        Dims::new(d, w, h),
        Dims::new(h, d, w),
        Dims::new(w, h, d),
        Dims::new(d, h, w),
        Dims::new(h, w, d),
    ];

    let mut out: Vec<Dims> = Vec::with_capacity(candidates.len());
    for c in candidates {
        if !out.contains(&c) {
            out.push(c);
        }
    }
    out
}
