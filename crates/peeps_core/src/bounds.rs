//! Grid bounds checks.
//!
//! X and Y lose one line on each edge to the border; Z uses its bounds as-is.

use crate::error::{SimError, SimResult};
use peeps_data::{Displacement, Location, WorldSize};

/// True if `(x, y, z)` is not an occupiable cell.
#[inline]
#[must_use]
pub fn is_outside(x: i32, y: i32, z: i32, size: &WorldSize) -> bool {
    x > size.max_x - 1
        || x < size.min_x + 1
        || y > size.max_y - 1
        || y < size.min_y + 1
        || z > size.max_z
        || z < size.min_z
}

/// True if moving from `src` by `(dx, dy, dz)` would leave the usable region.
#[inline]
#[must_use]
pub fn check_movement(src: &Location, dx: i32, dy: i32, dz: i32, size: &WorldSize) -> bool {
    let dst = src.offset(Displacement::new(dx, dy, dz));
    is_outside(dst.x, dst.y, dst.z, size)
}

/// `Err(OutOfBounds)` unless `location` is occupiable.
pub fn check(location: &Location, size: &WorldSize) -> SimResult<()> {
    if is_outside(location.x, location.y, location.z, size) {
        Err(SimError::OutOfBounds(*location))
    } else {
        Ok(())
    }
}
