// dn-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, Length as UomLength, Velocity as UomVelocity,
    VolumeRate as UomVolumeRate,
};

// Public canonical unit types (f64 storage, SI internally)
pub type Area = UomArea;
pub type Length = UomLength;
pub type Velocity = UomVelocity;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn inches(v: f64) -> Length {
    use uom::si::length::inch;
    Length::new::<inch>(v)
}

#[inline]
pub fn feet(v: f64) -> Length {
    use uom::si::length::foot;
    Length::new::<foot>(v)
}

#[inline]
pub fn fpm(v: f64) -> Velocity {
    use uom::si::velocity::foot_per_minute;
    Velocity::new::<foot_per_minute>(v)
}

#[inline]
pub fn cfm(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_foot_per_minute;
    VolumeRate::new::<cubic_foot_per_minute>(v)
}

#[inline]
pub fn as_sq_ft(a: Area) -> f64 {
    use uom::si::area::square_foot;
    a.get::<square_foot>()
}

#[inline]
pub fn as_fpm(v: Velocity) -> f64 {
    use uom::si::velocity::foot_per_minute;
    v.get::<foot_per_minute>()
}

#[inline]
pub fn as_cfm(q: VolumeRate) -> f64 {
    use uom::si::volume_rate::cubic_foot_per_minute;
    q.get::<cubic_foot_per_minute>()
}

/// Cross-section of a rectangular duct given inside dimensions in inches.
pub fn rectangular_area(width_in: f64, height_in: f64) -> Area {
    inches(width_in) * inches(height_in)
}

/// Cross-section of a round duct given its diameter in inches.
pub fn circular_area(diameter_in: f64) -> Area {
    let r = inches(diameter_in / 2.0);
    r * r * core::f64::consts::PI
}

/// Volumetric flow through a cross-section at a mean velocity.
pub fn flow_through(area: Area, velocity: Velocity) -> VolumeRate {
    area * velocity
}

/// Mean velocity of a volumetric flow through a cross-section.
pub fn velocity_through(flow: VolumeRate, area: Area) -> Velocity {
    flow / area
}
