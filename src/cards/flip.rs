//! Flip transition: a two-phase rotation about the card's vertical axis.
//!
//! The first half rotates from the resting angle to the perpendicular
//! midpoint (90°), where the visible side swaps. The second half rotates on to
//! the final resting angle. Face-down rests at 0°, face-up at 180°.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Resting angle of a face-down card.
pub const BACK_ANGLE: f32 = 0.0;

/// Resting angle of a face-up card.
pub const FACE_ANGLE: f32 = 180.0;

/// An in-progress flip.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlipTransition {
    to_face: bool,
    duration: Duration,
    elapsed: Duration,
}

impl FlipTransition {
    /// Start a flip towards the face (`to_face`) or towards the back.
    #[must_use]
    pub fn new(to_face: bool, duration: Duration) -> Self {
        Self {
            to_face,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Whether this flip ends face-up.
    #[must_use]
    pub fn to_face(&self) -> bool {
        self.to_face
    }

    /// Advance by `dt`. Returns true once the flip has fully completed.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.is_complete()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Time left until completion.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }

    /// Overall progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Whether the face side is the visible one at the current instant.
    ///
    /// The sides swap exactly at the midpoint.
    #[must_use]
    pub fn showing_face(&self) -> bool {
        if self.elapsed * 2 >= self.duration {
            self.to_face
        } else {
            !self.to_face
        }
    }

    /// Current rotation in degrees.
    #[must_use]
    pub fn angle(&self) -> f32 {
        let (start, end) = if self.to_face {
            (BACK_ANGLE, FACE_ANGLE)
        } else {
            (FACE_ANGLE, BACK_ANGLE)
        };
        let mid = start + (end - start) / 2.0;
        let p = self.progress();

        if p < 0.5 {
            lerp(start, mid, p * 2.0)
        } else {
            lerp(mid, end, (p - 0.5) * 2.0)
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
