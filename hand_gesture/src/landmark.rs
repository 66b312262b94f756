//! Hand landmarks and the pure geometry used by the recogniser.
//!
//! A pose is the 21-point hand skeleton produced by a landmark tracker
//! (wrist, four thumb joints, four joints per finger).  `x`/`y` are
//! normalized to the camera frame (0.0–1.0, y grows downward), `z` is a
//! relative depth on roughly the same scale.

use crate::error::PoseError;

// ════════════════════════════════════════════════════════════════════════════
// Joint
// ════════════════════════════════════════════════════════════════════════════

/// The 21 tracked joints, in tracker order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Number of landmarks in one pose.
pub const LANDMARK_COUNT: usize = 21;

impl Joint {
    /// All joints in index order.
    pub const ALL: [Joint; LANDMARK_COUNT] = [
        Joint::Wrist,
        Joint::ThumbCmc, Joint::ThumbMcp, Joint::ThumbIp, Joint::ThumbTip,
        Joint::IndexMcp, Joint::IndexPip, Joint::IndexDip, Joint::IndexTip,
        Joint::MiddleMcp, Joint::MiddlePip, Joint::MiddleDip, Joint::MiddleTip,
        Joint::RingMcp, Joint::RingPip, Joint::RingDip, Joint::RingTip,
        Joint::PinkyMcp, Joint::PinkyPip, Joint::PinkyDip, Joint::PinkyTip,
    ];

    /// Position of this joint in a pose (0–20).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wrist     => "wrist",
            Self::ThumbCmc  => "thumb-cmc",
            Self::ThumbMcp  => "thumb-mcp",
            Self::ThumbIp   => "thumb-ip",
            Self::ThumbTip  => "thumb-tip",
            Self::IndexMcp  => "index-mcp",
            Self::IndexPip  => "index-pip",
            Self::IndexDip  => "index-dip",
            Self::IndexTip  => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp   => "ring-mcp",
            Self::RingPip   => "ring-pip",
            Self::RingDip   => "ring-dip",
            Self::RingTip   => "ring-tip",
            Self::PinkyMcp  => "pinky-mcp",
            Self::PinkyPip  => "pinky-pip",
            Self::PinkyDip  => "pinky-dip",
            Self::PinkyTip  => "pinky-tip",
        }
    }
}

/// Bone connections for drawing the skeleton.
pub const HAND_SKELETON: [(Joint, Joint); 21] = [
    (Joint::Wrist, Joint::ThumbCmc), (Joint::ThumbCmc, Joint::ThumbMcp),
    (Joint::ThumbMcp, Joint::ThumbIp), (Joint::ThumbIp, Joint::ThumbTip),
    (Joint::Wrist, Joint::IndexMcp), (Joint::IndexMcp, Joint::IndexPip),
    (Joint::IndexPip, Joint::IndexDip), (Joint::IndexDip, Joint::IndexTip),
    (Joint::Wrist, Joint::MiddleMcp), (Joint::MiddleMcp, Joint::MiddlePip),
    (Joint::MiddlePip, Joint::MiddleDip), (Joint::MiddleDip, Joint::MiddleTip),
    (Joint::Wrist, Joint::RingMcp), (Joint::RingMcp, Joint::RingPip),
    (Joint::RingPip, Joint::RingDip), (Joint::RingDip, Joint::RingTip),
    (Joint::Wrist, Joint::PinkyMcp), (Joint::PinkyMcp, Joint::PinkyPip),
    (Joint::PinkyPip, Joint::PinkyDip), (Joint::PinkyDip, Joint::PinkyTip),
    (Joint::IndexMcp, Joint::MiddleMcp),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark / HandPose
// ════════════════════════════════════════════════════════════════════════════

/// One tracked point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A complete 21-landmark snapshot of one hand in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandPose {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandPose {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        HandPose { landmarks }
    }

    /// Build a pose from tracker output of unknown length.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, PoseError> {
        let landmarks: [Landmark; LANDMARK_COUNT] =
            points.try_into().map_err(|_| PoseError::WrongLength {
                expected: LANDMARK_COUNT,
                got:      points.len(),
            })?;
        Ok(HandPose { landmarks })
    }

    pub fn get(&self, joint: Joint) -> Landmark {
        self.landmarks[joint.index()]
    }

    /// Copy of this pose with one joint moved.
    pub fn with(mut self, joint: Joint, landmark: Landmark) -> Self {
        self.landmarks[joint.index()] = landmark;
        self
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// False when any coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.landmarks.iter().all(Landmark::is_finite)
    }
}

impl TryFrom<&[[f32; 3]]> for HandPose {
    type Error = PoseError;

    fn try_from(points: &[[f32; 3]]) -> Result<Self, Self::Error> {
        let landmarks: Vec<Landmark> = points
            .iter()
            .map(|p| Landmark::new(p[0], p[1], p[2]))
            .collect();
        HandPose::from_slice(&landmarks)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Geometry
// ════════════════════════════════════════════════════════════════════════════

pub fn distance_3d(a: Landmark, b: Landmark) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

pub fn distance_2d(a: Landmark, b: Landmark) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// A finger is extended when its tip lies farther from the wrist than its
/// PIP joint.
pub fn finger_extended(pose: &HandPose, tip: Joint, pip: Joint) -> bool {
    let wrist = pose.get(Joint::Wrist);
    distance_3d(pose.get(tip), wrist) > distance_3d(pose.get(pip), wrist)
}

/// The thumb is extended when its tip lies farther from the thumb MCP than
/// its IP joint.
pub fn thumb_extended(pose: &HandPose) -> bool {
    let mcp = pose.get(Joint::ThumbMcp);
    distance_3d(pose.get(Joint::ThumbTip), mcp) > distance_3d(pose.get(Joint::ThumbIp), mcp)
}

/// Extension state of the four non-thumb fingers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FingerExtension {
    pub index:  bool,
    pub middle: bool,
    pub ring:   bool,
    pub pinky:  bool,
}

impl FingerExtension {
    pub fn of(pose: &HandPose) -> Self {
        FingerExtension {
            index:  finger_extended(pose, Joint::IndexTip,  Joint::IndexPip),
            middle: finger_extended(pose, Joint::MiddleTip, Joint::MiddlePip),
            ring:   finger_extended(pose, Joint::RingTip,   Joint::RingPip),
            pinky:  finger_extended(pose, Joint::PinkyTip,  Joint::PinkyPip),
        }
    }

    /// Pointing: index out, the other three curled.
    pub fn only_index(&self) -> bool {
        self.index && !self.middle && !self.ring && !self.pinky
    }

    /// Scroll shape: index and middle out, ring and pinky curled.
    pub fn index_and_middle(&self) -> bool {
        self.index && self.middle && !self.ring && !self.pinky
    }

    pub fn all(&self) -> bool {
        self.index && self.middle && self.ring && self.pinky
    }

    pub fn as_array(&self) -> [bool; 4] {
        [self.index, self.middle, self.ring, self.pinky]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{synth_pose, HandShape};

    #[test]
    fn joint_indices_follow_tracker_order() {
        assert_eq!(Joint::Wrist.index(), 0);
        assert_eq!(Joint::ThumbTip.index(), 4);
        assert_eq!(Joint::IndexMcp.index(), 5);
        assert_eq!(Joint::MiddleTip.index(), 12);
        assert_eq!(Joint::PinkyTip.index(), 20);
        for (i, j) in Joint::ALL.iter().enumerate() {
            assert_eq!(j.index(), i, "{} out of order", j.as_str());
        }
    }

    #[test]
    fn distances() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(3.0, 4.0, 12.0);
        assert!((distance_2d(a, b) - 5.0).abs() < 1e-6);
        assert!((distance_3d(a, b) - 13.0).abs() < 1e-6);
    }

    #[test]
    fn from_slice_rejects_wrong_length() {
        let err = HandPose::from_slice(&[Landmark::default(); 10]).unwrap_err();
        assert_eq!(err, PoseError::WrongLength { expected: 21, got: 10 });
        assert!(HandPose::from_slice(&[Landmark::default(); 21]).is_ok());
    }

    #[test]
    fn try_from_raw_triples() {
        let raw: Vec<[f32; 3]> = (0..21).map(|i| [i as f32 * 0.01, 0.5, 0.0]).collect();
        let pose = HandPose::try_from(raw.as_slice()).unwrap();
        assert!((pose.get(Joint::IndexTip).x - 0.08).abs() < 1e-6);
    }

    #[test]
    fn nan_makes_pose_non_finite() {
        let pose = synth_pose(HandShape::Point, 0.5, 0.5);
        assert!(pose.is_finite());
        let bad = pose.with(Joint::RingDip, Landmark::new(f32::NAN, 0.5, 0.0));
        assert!(!bad.is_finite());
    }

    #[test]
    fn extension_vector_matches_shape() {
        let point = FingerExtension::of(&synth_pose(HandShape::Point, 0.5, 0.5));
        assert_eq!(point.as_array(), [true, false, false, false]);
        assert!(point.only_index());

        let two = FingerExtension::of(&synth_pose(HandShape::TwoFinger, 0.5, 0.5));
        assert!(two.index_and_middle());
        assert!(!two.only_index());

        let open = FingerExtension::of(&synth_pose(HandShape::OpenPalm, 0.5, 0.5));
        assert!(open.all());

        let fist = FingerExtension::of(&synth_pose(HandShape::Fist, 0.5, 0.5));
        assert_eq!(fist.as_array(), [false; 4]);
    }

    #[test]
    fn thumb_extension() {
        assert!(thumb_extended(&synth_pose(HandShape::OpenPalm, 0.5, 0.5)));
        // Fold the thumb tip back onto its MCP.
        let pose = synth_pose(HandShape::OpenPalm, 0.5, 0.5);
        let mcp = pose.get(Joint::ThumbMcp);
        let folded = pose.with(Joint::ThumbTip, Landmark::new(mcp.x + 0.005, mcp.y, 0.0));
        assert!(!thumb_extended(&folded));
    }

    #[test]
    fn skeleton_covers_every_joint() {
        for j in Joint::ALL {
            assert!(
                HAND_SKELETON.iter().any(|&(a, b)| a == j || b == j),
                "{} not drawn", j.as_str()
            );
        }
    }
}
