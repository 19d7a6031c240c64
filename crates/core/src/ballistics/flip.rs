//! Azimuth flip decision
//!
//! The turret cannot rotate past its soft limits, so targets behind the
//! robot are reached by turning the turret half a revolution and firing
//! out of the mirrored side of the shooter with the tilt negated.
//!
//! Every raw azimuth has a direct candidate and a flipped candidate (raw ± π).
//! The direct candidate is used whenever it is inside the soft limits. The
//! exception is the overlap band either side of ±90° (soft limits wider than
//! 90°): a turret already on the flipped side stays flipped there as long as
//! the flipped candidate is still reachable.

use core::f32::consts::PI;

use crate::control::SoftLimits;

/// Turret/tilt pair after the flip decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AimDecision {
    pub turret_angle: f32,
    pub tilt_angle: f32,
    pub flipped: bool,
}

/// The raw azimuth rotated by half a turn, staying in (-π, π].
pub fn flipped_azimuth(raw_azimuth: f32) -> f32 {
    if raw_azimuth > 0.0 {
        raw_azimuth - PI
    } else {
        raw_azimuth + PI
    }
}

/// Choose between the direct and flipped solutions. `was_flipped` is the
/// flip state of the previous solution.
///
/// Fixed limits never flip: a mount that cannot turn has no mirrored side.
/// If neither candidate is reachable (limits narrower than ±90°) the direct
/// solution is clamped into the limits.
pub fn choose_aim(
    raw_azimuth: f32,
    tilt: f32,
    limits: &SoftLimits,
    was_flipped: bool,
) -> AimDecision {
    let direct = AimDecision {
        turret_angle: raw_azimuth,
        tilt_angle: tilt,
        flipped: false,
    };
    if limits.is_fixed() {
        return AimDecision {
            turret_angle: limits.clamp(raw_azimuth),
            ..direct
        };
    }
    let flipped = AimDecision {
        turret_angle: flipped_azimuth(raw_azimuth),
        tilt_angle: -tilt,
        flipped: true,
    };

    match (
        limits.contains(direct.turret_angle),
        limits.contains(flipped.turret_angle),
    ) {
        (true, true) if was_flipped => flipped,
        (true, true) => direct,
        (true, false) => direct,
        (false, true) => flipped,
        (false, false) => AimDecision {
            turret_angle: limits.clamp(raw_azimuth),
            ..direct
        },
    }
}
