//! Global tuning constants based on meters-kilograms-seconds (MKS) units.

/// The length unit used by the broad-phase. Scale this if your world is
/// authored in something other than meters.
pub const LENGTH_UNITS_PER_METER: f32 = 1.0;

/// This is used to fatten AABBs in the dynamic tree. This allows proxies
/// to move by a small amount without triggering a tree adjustment.
/// This is in meters.
pub const AABB_EXTENSION: f32 = 0.1 * LENGTH_UNITS_PER_METER;

/// This is used to fatten AABBs in the dynamic tree. This is used to predict
/// the future position based on the current displacement.
/// This is a dimensionless multiplier.
pub const AABB_MULTIPLIER: f32 = 4.0;
