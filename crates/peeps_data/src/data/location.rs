use serde::{Deserialize, Serialize};
use std::fmt;

/// One cell of the world grid.
///
/// Ordering is lexicographic on `(x, y, z)` and is what every deterministic
/// iteration over cells relies on.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Location {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Location {
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn origin() -> Self {
        Self { x: 0, y: 0, z: 0 }
    }

    /// Translates by a displacement, saturating instead of wrapping.
    #[must_use]
    pub fn offset(&self, d: Displacement) -> Self {
        Self {
            x: self.x.saturating_add(d.dx),
            y: self.y.saturating_add(d.dy),
            z: self.z.saturating_add(d.dz),
        }
    }

    /// Euclidean distance over all three axes.
    #[must_use]
    pub fn distance(&self, other: &Location) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        let dz = f64::from(other.z) - f64::from(self.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A per-axis step, each component normally in `-1..=1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Displacement {
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
}

impl Displacement {
    pub const ZERO: Displacement = Displacement {
        dx: 0,
        dy: 0,
        dz: 0,
    };

    #[must_use]
    pub const fn new(dx: i32, dy: i32, dz: i32) -> Self {
        Self { dx, dy, dz }
    }

    /// Unit step from `src` toward `dst`: the sign of the difference per axis.
    #[must_use]
    pub fn toward(src: &Location, dst: &Location) -> Self {
        Self {
            dx: (dst.x - src.x).signum(),
            dy: (dst.y - src.y).signum(),
            dz: (dst.z - src.z).signum(),
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl From<(i32, i32, i32)> for Displacement {
    fn from((dx, dy, dz): (i32, i32, i32)) -> Self {
        Self { dx, dy, dz }
    }
}

/// World extents per axis.
///
/// On X and Y the outermost row/column is a border and cannot be occupied;
/// Z bounds are used as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSize {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl Default for WorldSize {
    fn default() -> Self {
        Self {
            min_x: -40,
            max_x: 40,
            min_y: -12,
            max_y: 12,
            min_z: 0,
            max_z: 0,
        }
    }
}

impl WorldSize {
    /// Flat world with `z` pinned to zero.
    #[must_use]
    pub const fn flat(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            min_z: 0,
            max_z: 0,
        }
    }

    /// Number of cells inside the border.
    #[must_use]
    pub fn usable_cells(&self) -> usize {
        let w = i64::from(self.max_x) - i64::from(self.min_x) - 1;
        let h = i64::from(self.max_y) - i64::from(self.min_y) - 1;
        let d = i64::from(self.max_z) - i64::from(self.min_z) + 1;
        (w.max(0) * h.max(0) * d.max(0)) as usize
    }

    /// All usable cells in location order.
    pub fn usable_locations(&self) -> impl Iterator<Item = Location> + '_ {
        (self.min_x + 1..self.max_x).flat_map(move |x| {
            (self.min_y + 1..self.max_y).flat_map(move |y| {
                (self.min_z..=self.max_z).map(move |z| Location::new(x, y, z))
            })
        })
    }
}
