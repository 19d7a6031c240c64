//! Vision pose correction
//!
//! One corrector per camera. Each tick it takes the camera's latest frame,
//! drops frames and detections that are not worth fusing, turns each
//! remaining detection into a robot pose through the turret-mounted camera
//! geometry, and forwards poses that agree with the chassis estimate.
//!
//! A pose far from the estimate is normally discarded. After enough
//! consecutive discards the estimate itself is assumed to have drifted and
//! the far pose is accepted anyway.

use fire_control_core::geometry::Pose2d;
use fire_control_core::targeting::FieldLayout;
use fire_control_core::vision::{
    CameraMount, FrameRejection, PoseDecision, VisionGate, VisionGateConfig,
};

use super::traits::{Camera, Chassis};

/// What one `execute()` did with the frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionReport {
    /// Why the whole frame was ignored, if it was
    pub ignored: Option<FrameRejection>,
    /// Detections that failed the quality checks
    pub skipped: u8,
    /// Poses discarded as too far from the estimate
    pub rejected: u8,
    /// Poses accepted normally
    pub accepted: u8,
    /// Far poses accepted because the rejection cap was reached
    pub forced: u8,
}

pub struct VisionCorrector<C> {
    camera: C,
    mount: CameraMount,
    gate: VisionGate,
    last_range: f32,
    last_pose_z: f32,
}

impl<C: Camera> VisionCorrector<C> {
    pub fn new(camera: C, mount: CameraMount, config: VisionGateConfig) -> Self {
        Self {
            camera,
            mount,
            gate: VisionGate::new(config),
            last_range: 0.0,
            last_pose_z: 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.camera.name()
    }

    /// Consecutive far-pose rejections
    pub fn rejections(&self) -> u16 {
        self.gate.rejections()
    }

    /// Camera to fiducial distance of the last usable detection (m)
    pub fn last_range(&self) -> f32 {
        self.last_range
    }

    /// Height of the last estimated robot pose (m); should be near zero
    pub fn last_pose_z(&self) -> f32 {
        self.last_pose_z
    }

    pub fn config(&self) -> &VisionGateConfig {
        self.gate.config()
    }

    /// Process the latest frame. `turret_angle` is the azimuth the camera
    /// was at when the frame was captured.
    pub fn execute<L, Ch>(
        &mut self,
        layout: &L,
        chassis: &mut Ch,
        turret_angle: f32,
        now_us: u64,
    ) -> CorrectionReport
    where
        L: FieldLayout + ?Sized,
        Ch: Chassis + ?Sized,
    {
        let mut report = CorrectionReport::default();
        let frame = self.camera.latest_frame();
        if let Err(rejection) = self.gate.check_frame(&frame, now_us) {
            // Repeats and empty frames are routine
            if rejection == FrameRejection::Stale {
                log_debug!("vision {}: stale frame", self.camera.name());
            }
            report.ignored = Some(rejection);
            return report;
        }

        for detection in frame.targets.iter() {
            let tag = layout.fiducial_pose(detection.fiducial_id);
            let robot = tag.map(|tag| {
                self.mount
                    .robot_pose_from_detection(&tag, &detection.camera_to_target, turret_angle)
            });
            if let Some(robot) = robot {
                self.last_range = detection.camera_to_target.translation.vector.norm();
                self.last_pose_z = robot.translation.vector.z;
            }

            let robot = match (self.gate.check_target(detection, robot.is_some()), robot) {
                (Ok(()), Some(robot)) => robot,
                (Err(_), _) | (Ok(()), None) => {
                    log_debug!(
                        "vision {}: skipped fiducial {}",
                        self.camera.name(),
                        detection.fiducial_id
                    );
                    report.skipped = report.skipped.saturating_add(1);
                    continue;
                }
            };

            let candidate = Pose2d::from_pose3d(&robot);
            match self.gate.check_pose_jump(&candidate, &chassis.pose()) {
                PoseDecision::Rejected(count) => {
                    log_debug!(
                        "vision {}: far pose rejected ({} in a row)",
                        self.camera.name(),
                        count
                    );
                    report.rejected = report.rejected.saturating_add(1);
                    continue;
                }
                PoseDecision::ForcedAccepted => {
                    log_warn!(
                        "vision {}: accepting far pose at rejection cap {}",
                        self.camera.name(),
                        self.gate.config().rejection_cap
                    );
                    report.forced = report.forced.saturating_add(1);
                }
                PoseDecision::Accepted => {
                    report.accepted = report.accepted.saturating_add(1);
                }
            }

            if self.gate.config().forward_to_estimator {
                let measurement = self.gate.measurement(candidate, frame.timestamp_us);
                chassis.add_vision_measurement(&measurement);
            }
        }
        report
    }
}
