//! Space distribution across a sequence of lines or cells.

use trellis_render::ScreenCoord;

/// Bounds of one line (or cell) along the axis being distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBounds {
    /// The least space the line accepts.
    pub min: ScreenCoord,
    /// The most space the line accepts; `None` when unbounded.
    pub max: Option<ScreenCoord>,
}

impl LineBounds {
    /// Bounds with a minimum and no maximum.
    pub const fn at_least(min: ScreenCoord) -> Self {
        Self { min, max: None }
    }

    /// Bounds with both a minimum and a maximum.
    pub const fn between(min: ScreenCoord, max: ScreenCoord) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    fn room(&self, allocated: ScreenCoord) -> ScreenCoord {
        self.max.map_or(ScreenCoord::MAX, |max| max - allocated)
    }
}

/// Distribute `available` space across `bounds`.
///
/// Every entry first receives its minimum. The remainder is split evenly
/// among entries still below their maximum; the leftover pixels of an
/// uneven split go to the earliest entries. Entries that reach their
/// maximum leave the pool and what they could not absorb is split again
/// among the rest, until the space is used up or no entry can grow.
///
/// If `available` is less than the sum of the minimums, every entry gets
/// exactly its minimum and the overflow is the caller's to clip.
///
/// ```
/// use trellis::widget::layout::{distribute, LineBounds};
///
/// let bounds = [LineBounds::at_least(10); 3];
/// assert_eq!(distribute(100, &bounds), vec![34, 33, 33]);
/// ```
pub fn distribute(available: ScreenCoord, bounds: &[LineBounds]) -> Vec<ScreenCoord> {
    let mut allocation: Vec<ScreenCoord> = bounds.iter().map(|b| b.min.max(0)).collect();
    let claimed = allocation.iter().fold(0, |acc: ScreenCoord, &a| acc.saturating_add(a));
    let mut remaining = available.saturating_sub(claimed);

    let mut pool: Vec<usize> = (0..bounds.len())
        .filter(|&i| bounds[i].room(allocation[i]) > 0)
        .collect();

    while remaining > 0 && !pool.is_empty() {
        let count = pool.len() as ScreenCoord;
        let share = remaining / count;
        let extra = remaining % count;

        let mut given = 0;
        let mut next_pool = Vec::with_capacity(pool.len());
        for (k, &i) in pool.iter().enumerate() {
            let want = share + ScreenCoord::from((k as ScreenCoord) < extra);
            let give = want.min(bounds[i].room(allocation[i]));
            allocation[i] += give;
            given += give;
            if bounds[i].room(allocation[i]) > 0 {
                next_pool.push(i);
            }
        }

        if given == 0 {
            break;
        }
        remaining -= given;
        pool = next_pool;
    }

    allocation
}
