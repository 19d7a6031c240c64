//! Vision measurement gating
//!
//! Decides which camera results are trustworthy enough to correct the
//! chassis pose estimate. Checks run in a fixed order per frame:
//!
//! 1. Frame has no targets: ignored.
//! 2. Same timestamp as the last processed frame: ignored as a duplicate.
//! 3. Timestamp recorded as processed.
//! 4. Older than the latency limit: ignored as stale.
//!
//! Then per detected fiducial:
//!
//! 1. Fiducial id not in the field layout: skipped.
//! 2. Ambiguity above the limit: skipped.
//! 3. |yaw| above the limit: skipped.
//! 4. Pose jump check against the current estimate (see [`RejectionCounter`]).
//!
//! The pose jump check is the only one that counts towards the consecutive
//! rejection counter. A measurement far from the estimate is discarded
//! until the counter reaches its cap; the far measurement that brings it to
//! the cap is accepted anyway, on the assumption that the estimate itself
//! has drifted. Every
//! acceptance halves the counter.

pub mod types;

pub use types::{CameraMount, TargetDetection, VisionFrame, VisionMeasurement, MAX_TARGETS};

use crate::geometry::Pose2d;

/// Reasons a whole frame is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRejection {
    NoTargets,
    Duplicate,
    Stale,
}

impl core::fmt::Display for FrameRejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameRejection::NoTargets => write!(f, "frame has no targets"),
            FrameRejection::Duplicate => write!(f, "frame already processed"),
            FrameRejection::Stale => write!(f, "frame is stale"),
        }
    }
}

/// Reasons a single detection is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRejection {
    UnknownFiducial(u8),
    Ambiguous,
    OffAxis,
}

impl core::fmt::Display for TargetRejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TargetRejection::UnknownFiducial(id) => write!(f, "unknown fiducial {}", id),
            TargetRejection::Ambiguous => write!(f, "pose ambiguity too high"),
            TargetRejection::OffAxis => write!(f, "target yaw too large"),
        }
    }
}

/// Outcome of the pose jump check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseDecision {
    /// Within the jump threshold
    Accepted,
    /// Beyond the threshold but the rejection cap was reached
    ForcedAccepted,
    /// Beyond the threshold; counter after increment
    Rejected(u16),
}

impl PoseDecision {
    pub fn is_accepted(self) -> bool {
        !matches!(self, PoseDecision::Rejected(_))
    }
}

/// Gate thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisionGateConfig {
    /// Frames older than this are ignored (s)
    pub max_latency: f32,
    pub max_ambiguity: f32,
    /// Largest accepted |yaw| (rad)
    pub max_yaw: f32,
    /// Largest accepted distance from the current estimate (m)
    pub max_pose_jump: f32,
    /// Consecutive rejections after which a jump is accepted anyway
    pub rejection_cap: u16,
    /// Measurement standard deviations (x m, y m, heading rad)
    pub std_devs: [f32; 3],
    /// Forward accepted measurements to the pose estimator
    pub forward_to_estimator: bool,
}

impl Default for VisionGateConfig {
    fn default() -> Self {
        Self {
            max_latency: 0.5,
            max_ambiguity: 0.25,
            max_yaw: 20.0 * core::f32::consts::PI / 180.0,
            max_pose_jump: 1.0,
            rejection_cap: 20,
            std_devs: [3.0, 3.0, 1.0],
            forward_to_estimator: true,
        }
    }
}

impl VisionGateConfig {
    pub fn is_valid(&self) -> bool {
        self.max_latency > 0.0
            && self.max_ambiguity >= 0.0
            && self.max_yaw > 0.0
            && self.max_pose_jump > 0.0
            && self.rejection_cap > 0
            && self.std_devs.iter().all(|s| s.is_finite() && *s > 0.0)
    }

    fn max_latency_us(&self) -> u64 {
        (self.max_latency * 1_000_000.0) as u64
    }
}

/// Consecutive far-measurement counter, one per camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RejectionCounter {
    count: u16,
}

impl RejectionCounter {
    pub fn new() -> Self {
        Self { count: 0 }
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    pub fn halve(&mut self) {
        self.count /= 2;
    }

    pub fn reached(&self, cap: u16) -> bool {
        self.count >= cap
    }
}

/// Per-camera gate state.
#[derive(Clone, Debug)]
pub struct VisionGate {
    config: VisionGateConfig,
    last_timestamp_us: Option<u64>,
    rejections: RejectionCounter,
}

impl VisionGate {
    pub fn new(config: VisionGateConfig) -> Self {
        Self {
            config,
            last_timestamp_us: None,
            rejections: RejectionCounter::new(),
        }
    }

    pub fn config(&self) -> &VisionGateConfig {
        &self.config
    }

    pub fn rejections(&self) -> u16 {
        self.rejections.count()
    }

    /// Frame-level checks. Records the timestamp once the frame is known to
    /// be new, even if it then turns out to be stale.
    pub fn check_frame(&mut self, frame: &VisionFrame, now_us: u64) -> Result<(), FrameRejection> {
        if !frame.has_targets() {
            return Err(FrameRejection::NoTargets);
        }
        if self.last_timestamp_us == Some(frame.timestamp_us) {
            return Err(FrameRejection::Duplicate);
        }
        self.last_timestamp_us = Some(frame.timestamp_us);

        // Future timestamps count as fresh
        if now_us.saturating_sub(frame.timestamp_us) > self.config.max_latency_us() {
            return Err(FrameRejection::Stale);
        }
        Ok(())
    }

    /// Detection-level quality checks. `known` is whether the layout has a
    /// pose for the detection's fiducial.
    pub fn check_target(
        &self,
        detection: &TargetDetection,
        known: bool,
    ) -> Result<(), TargetRejection> {
        if !known {
            return Err(TargetRejection::UnknownFiducial(detection.fiducial_id));
        }
        if !(detection.ambiguity <= self.config.max_ambiguity) {
            return Err(TargetRejection::Ambiguous);
        }
        if !(libm::fabsf(detection.yaw) <= self.config.max_yaw) {
            return Err(TargetRejection::OffAxis);
        }
        Ok(())
    }

    /// Compare a candidate pose with the current estimate and update the
    /// rejection counter.
    pub fn check_pose_jump(&mut self, candidate: &Pose2d, current: &Pose2d) -> PoseDecision {
        let jump = candidate.distance_to(current);
        if jump > self.config.max_pose_jump || jump.is_nan() {
            self.rejections.increment();
            if self.rejections.reached(self.config.rejection_cap) {
                self.rejections.halve();
                PoseDecision::ForcedAccepted
            } else {
                PoseDecision::Rejected(self.rejections.count())
            }
        } else {
            self.rejections.halve();
            PoseDecision::Accepted
        }
    }

    /// Measurement to forward for an accepted pose.
    pub fn measurement(&self, pose: Pose2d, timestamp_us: u64) -> VisionMeasurement {
        VisionMeasurement {
            pose,
            timestamp_us,
            std_devs: self.config.std_devs,
        }
    }
}
