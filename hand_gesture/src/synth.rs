//! Synthetic hand poses.
//!
//! Builds plausible 21-landmark skeletons for each hand shape the recogniser
//! understands, centred on a chosen point of the frame.  The simulation
//! source uses these to drive the pipeline from a mouse and keyboard; the
//! tests use them as fixtures.
//!
//! Layout (normalized units, y down): the wrist sits 0.15 below the
//! knuckle line, fingers point up, the thumb hangs off the low-x side.

use crate::landmark::{HandPose, Joint, Landmark, LANDMARK_COUNT};

/// Hand shapes that map onto the gesture vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandShape {
    /// All fingers curled.
    Fist,
    /// Index only: pointer motion.
    Point,
    /// Index + middle: scrolling.
    TwoFinger,
    /// Everything extended: swipe stroke.
    OpenPalm,
    /// Thumb tip on the middle tip: drag.
    DragPinch,
    /// Thumb tip pushed across the index knuckle: left click.
    ThumbCross,
    /// Pinky folded onto the thumb tip: right click.
    PinkyPinch,
}

impl HandShape {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fist       => "fist",
            Self::Point      => "point",
            Self::TwoFinger  => "two-finger",
            Self::OpenPalm   => "open-palm",
            Self::DragPinch  => "drag-pinch",
            Self::ThumbCross => "thumb-cross",
            Self::PinkyPinch => "pinky-pinch",
        }
    }
}

const WRIST_DROP: f32 = 0.15;

/// x offsets of the index/middle/ring/pinky columns from the centre.
const FINGER_COLUMNS: [f32; 4] = [-0.03, -0.01, 0.01, 0.03];

/// (pip, dip, tip) heights above the knuckle line.
const EXTENDED: [f32; 3] = [-0.04, -0.07, -0.10];
const CURLED:   [f32; 3] = [-0.03, -0.01,  0.01];

/// Build a pose of `shape` whose knuckle line is centred on `(cx, cy)`.
pub fn synth_pose(shape: HandShape, cx: f32, cy: f32) -> HandPose {
    let extended = match shape {
        HandShape::Fist       => [false, false, false, false],
        HandShape::TwoFinger  => [true,  true,  false, false],
        HandShape::OpenPalm   => [true,  true,  true,  true ],
        HandShape::Point
        | HandShape::DragPinch
        | HandShape::ThumbCross
        | HandShape::PinkyPinch => [true, false, false, false],
    };

    let at = |dx: f32, dy: f32| Landmark::new(cx + dx, cy + dy, 0.0);
    let mut lm = [Landmark::default(); LANDMARK_COUNT];

    lm[Joint::Wrist.index()]    = at(0.0, WRIST_DROP);
    lm[Joint::ThumbCmc.index()] = at(-0.05, 0.12);
    lm[Joint::ThumbMcp.index()] = at(-0.08, 0.06);
    lm[Joint::ThumbIp.index()]  = at(-0.10, 0.03);
    lm[Joint::ThumbTip.index()] = at(-0.11, 0.00);

    let fingers = [
        [Joint::IndexMcp,  Joint::IndexPip,  Joint::IndexDip,  Joint::IndexTip ],
        [Joint::MiddleMcp, Joint::MiddlePip, Joint::MiddleDip, Joint::MiddleTip],
        [Joint::RingMcp,   Joint::RingPip,   Joint::RingDip,   Joint::RingTip  ],
        [Joint::PinkyMcp,  Joint::PinkyPip,  Joint::PinkyDip,  Joint::PinkyTip ],
    ];
    for (f, joints) in fingers.iter().enumerate() {
        let fx = FINGER_COLUMNS[f];
        let heights = if extended[f] { EXTENDED } else { CURLED };
        lm[joints[0].index()] = at(fx, 0.0);
        for (j, dy) in heights.iter().enumerate() {
            lm[joints[j + 1].index()] = at(fx, *dy);
        }
    }

    match shape {
        HandShape::DragPinch => {
            lm[Joint::ThumbIp.index()]  = at(-0.06, 0.04);
            lm[Joint::ThumbTip.index()] = at(-0.02, 0.01);
        }
        HandShape::ThumbCross => {
            lm[Joint::ThumbIp.index()]  = at(-0.03, 0.07);
            lm[Joint::ThumbTip.index()] = at(0.01, 0.08);
        }
        HandShape::PinkyPinch => {
            lm[Joint::ThumbIp.index()]  = at(-0.09, 0.04);
            lm[Joint::ThumbTip.index()] = at(-0.06, 0.02);
            lm[Joint::PinkyTip.index()] = at(-0.05, 0.02);
        }
        _ => {}
    }

    HandPose::new(lm)
}
