use crate::shared::region::Region;

/// Drops regions narrower or shorter than `min_size`, keeping detector order.
///
/// Backends usually honour the minimum themselves; applying it again here
/// makes the floor hold for every detector implementation.
pub fn retain_min_size(regions: Vec<Region>, min_size: (u32, u32)) -> Vec<Region> {
    let before = regions.len();
    let kept: Vec<Region> = regions
        .into_iter()
        .filter(|r| r.meets_min_size(min_size))
        .collect();
    if kept.len() != before {
        log::trace!(
            "Dropped {} region(s) below {}x{}",
            before - kept.len(),
            min_size.0,
            min_size.1
        );
    }
    kept
}
