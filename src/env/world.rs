use super::traits::{ContactSignal, MovementSink, PoseProvider};
use crate::geometry::Pose;

/// In-process host world: poses live in plain fields, nothing else moves.
///
/// Contact is reported when a host injects it, or, if a contact radius is
/// set, whenever the seeker overlaps the target within that radius.
#[derive(Debug, Clone)]
pub struct KinematicWorld {
    seeker: Pose,
    target: Option<Pose>,
    contact_radius: Option<f32>,
    pending_contact: bool,
}

impl KinematicWorld {
    pub fn new() -> Self {
        Self {
            seeker: Pose::default(),
            target: Some(Pose::default()),
            contact_radius: None,
            pending_contact: false,
        }
    }

    /// A world whose episodes have no target bound.
    pub fn without_target() -> Self {
        Self { target: None, ..Self::new() }
    }

    pub fn with_contact_radius(mut self, radius: f32) -> Self {
        self.contact_radius = Some(radius);
        self
    }

    pub fn bind_target(&mut self, target: Pose) {
        self.target = Some(target);
    }

    pub fn unbind_target(&mut self) {
        self.target = None;
    }

    /// Records a contact event, as a trigger callback in a host engine would.
    pub fn inject_contact(&mut self) {
        self.pending_contact = true;
    }

    fn overlapping(&self) -> bool {
        match (self.contact_radius, self.target) {
            (Some(radius), Some(target)) => self.seeker.planar_distance(&target) <= radius,
            _ => false,
        }
    }
}

impl Default for KinematicWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseProvider for KinematicWorld {
    fn seeker_pose(&self) -> Pose {
        self.seeker
    }

    fn target_pose(&self) -> Option<Pose> {
        self.target
    }
}

impl MovementSink for KinematicWorld {
    fn commit_seeker(&mut self, pose: Pose) {
        self.seeker = pose;
    }

    fn place(&mut self, seeker: Pose, target: Pose) {
        self.seeker = seeker;
        if self.target.is_some() {
            self.target = Some(target);
        }
    }
}

impl ContactSignal for KinematicWorld {
    fn take_contact(&mut self) -> bool {
        let contact = self.pending_contact || self.overlapping();
        self.pending_contact = false;
        contact
    }
}
