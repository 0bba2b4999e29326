//! Pointer smoothing.
//!
//! The tracked pointer chases the raw pointer target by at most `max_step`
//! per frame. The length of that step, scaled by `gain`, is the velocity the
//! distortion shader reacts to, so a fast flick produces a strong wake that
//! fades as the tracked point catches up.

use std::cell::Cell;
use std::rc::Rc;

use ripple_engine::coords::Vec2;

use crate::config::TrackerConfig;

/// Raw pointer target written by the event path, read once per frame.
///
/// Cloning shares the same cell.
#[derive(Debug, Clone, Default)]
pub struct PointerTarget(Rc<Cell<Vec2>>);

impl PointerTarget {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self) -> Vec2 {
        self.0.get()
    }

    #[inline]
    pub fn set(&self, target: Vec2) {
        self.0.set(target);
    }
}

/// Pointer state in normalized pointer space (origin bottom-left).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PointerState {
    pub target: Vec2,
    pub current: Vec2,
    /// Displacement applied to `current` during the last frame.
    pub direction: Vec2,
    /// `|direction| * gain`.
    pub speed: f32,
}

/// Result of one [`VelocityTracker::advance`] step.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Advance {
    pub current: Vec2,
    pub direction: Vec2,
    pub speed: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VelocityTracker {
    max_step: f32,
    gain: f32,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl VelocityTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            max_step: config.max_step.max(0.0),
            gain: config.gain,
        }
    }

    #[inline]
    pub fn max_step(&self) -> f32 {
        self.max_step
    }

    #[inline]
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Moves `current` toward `target` by at most `max_step`.
    ///
    /// When the target is within reach the result lands on it exactly, so the
    /// tracked point never overshoots and comes to rest with zero speed.
    pub fn advance(&self, target: Vec2, current: Vec2) -> Advance {
        let delta = target - current;

        if delta.length() <= self.max_step {
            return Advance {
                current: target,
                direction: delta,
                speed: delta.length() * self.gain,
            };
        }

        let direction = delta.clamp_length_max(self.max_step);
        Advance {
            current: current + direction,
            direction,
            speed: direction.length() * self.gain,
        }
    }

    /// Advances `state` in place toward its `target`.
    pub fn step(&self, state: &mut PointerState) {
        let Advance { current, direction, speed } = self.advance(state.target, state.current);
        state.current = current;
        state.direction = direction;
        state.speed = speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn tracker() -> VelocityTracker {
        VelocityTracker::default()
    }

    // ── single step ───────────────────────────────────────────────────────

    #[test]
    fn far_target_moves_exactly_max_step() {
        let a = tracker().advance(Vec2::new(1.0, 0.0), Vec2::zero());
        assert!((a.current.x - 0.05).abs() < EPS);
        assert_eq!(a.current.y, 0.0);
        assert!((a.speed - 1.0).abs() < EPS);
    }

    #[test]
    fn step_never_exceeds_cap() {
        let t = tracker();
        let targets = [
            Vec2::new(1.0, 1.0),
            Vec2::new(-3.0, 0.2),
            Vec2::new(0.03, 0.04),
            Vec2::new(0.5, -0.5),
        ];
        let current = Vec2::new(0.1, 0.2);
        for target in targets {
            let a = t.advance(target, current);
            assert!((a.current - current).length() <= t.max_step() + EPS);
        }
    }

    #[test]
    fn near_target_is_reached_exactly() {
        let current = Vec2::new(0.1, 0.1);
        let target = Vec2::new(0.13, 0.14);
        let a = tracker().advance(target, current);
        assert_eq!(a.current, target);
    }

    #[test]
    fn at_rest_is_idempotent() {
        let p = Vec2::new(0.4, 0.6);
        let a = tracker().advance(p, p);
        assert_eq!(a.current, p);
        assert_eq!(a.direction, Vec2::zero());
        assert_eq!(a.speed, 0.0);
    }

    #[test]
    fn speed_scales_with_gain() {
        let t = VelocityTracker::new(TrackerConfig { max_step: 0.05, gain: 10.0 });
        let a = t.advance(Vec2::new(0.0, 1.0), Vec2::zero());
        assert!((a.speed - 0.5).abs() < EPS);
    }

    // ── convergence ───────────────────────────────────────────────────────

    #[test]
    fn diagonal_converges_without_overshoot() {
        let t = tracker();
        let mut state = PointerState {
            target: Vec2::new(1.0, 1.0),
            ..PointerState::default()
        };

        // ceil(sqrt(2) / 0.05) = 29 steps along the diagonal.
        for _ in 0..29 {
            t.step(&mut state);
            assert!(state.current.x <= 1.0 && state.current.y <= 1.0);
        }
        assert_eq!(state.current, state.target);

        t.step(&mut state);
        assert_eq!(state.speed, 0.0);
    }

    #[test]
    fn shared_target_cell() {
        let a = PointerTarget::new();
        let b = a.clone();
        a.set(Vec2::new(0.3, 0.7));
        assert_eq!(b.get(), Vec2::new(0.3, 0.7));
    }
}
