//! Door crossfade animation.
//!
//! The door is drawn as two separate models, one closed and one open. Opening
//! or closing the door fades one into the other: the closed model's opacity is
//! `1 - progress` and the open model's opacity is `progress`.

/// Which way the door animation is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoorDirection {
    #[default]
    Idle,
    Opening,
    Closing,
}

/// Where the door rests, or where it is heading while it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorPosition {
    Closed,
    Open,
}

/// Opacities for the two door models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorOpacity {
    pub closed: f32,
    pub open: f32,
}

// Float steps like 25 * 0.04 land a hair short of the bound.
const SNAP_EPSILON: f32 = 1e-5;

/// Progress of the door between fully closed (0.0) and fully open (1.0).
///
/// The state is advanced once per frame while it is not idle. It only becomes
/// idle when the progress reaches the bound it is travelling toward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DoorAnimationState {
    progress: f32,
    direction: DoorDirection,
}

impl DoorAnimationState {
    /// A closed door at rest.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn direction(&self) -> DoorDirection {
        self.direction
    }

    pub fn is_animating(&self) -> bool {
        self.direction != DoorDirection::Idle
    }

    /// Moves the animation one frame forward by `speed`.
    ///
    /// Idle states are returned unchanged. The progress is clamped to `[0, 1]`
    /// and the direction drops back to idle once the target bound is reached.
    pub fn advance(self, speed: f32) -> Self {
        let sign = match self.direction {
            DoorDirection::Idle => return self,
            DoorDirection::Opening => 1.0,
            DoorDirection::Closing => -1.0,
        };
        if !speed.is_finite() {
            return self;
        }

        let mut progress = (self.progress + speed * sign).clamp(0.0, 1.0);
        // Only snap onto the bound the door is heading for
        match self.direction {
            DoorDirection::Opening if progress > 1.0 - SNAP_EPSILON => progress = 1.0,
            DoorDirection::Closing if progress < SNAP_EPSILON => progress = 0.0,
            _ => {}
        }

        let direction = match self.direction {
            DoorDirection::Opening if progress == 1.0 => DoorDirection::Idle,
            DoorDirection::Closing if progress == 0.0 => DoorDirection::Idle,
            direction => direction,
        };

        Self { progress, direction }
    }

    /// Starts opening the door. Only a closed door at rest accepts this.
    pub fn open(&mut self) -> bool {
        if self.direction != DoorDirection::Idle || self.progress != 0.0 {
            return false;
        }
        self.direction = DoorDirection::Opening;
        self.progress = 0.0;
        true
    }

    /// Starts closing the door. Only an open door at rest accepts this.
    pub fn close(&mut self) -> bool {
        if self.direction != DoorDirection::Idle || self.progress != 1.0 {
            return false;
        }
        self.direction = DoorDirection::Closing;
        self.progress = 1.0;
        true
    }

    /// Opens a closed door or closes an open one.
    ///
    /// Returns `false` and leaves the state untouched while a transition is
    /// still running.
    pub fn toggle(&mut self) -> bool {
        match self.position() {
            DoorPosition::Closed => self.open(),
            DoorPosition::Open => self.close(),
        }
    }

    pub fn position(&self) -> DoorPosition {
        match self.direction {
            DoorDirection::Opening => DoorPosition::Open,
            DoorDirection::Closing => DoorPosition::Closed,
            DoorDirection::Idle if self.progress >= 1.0 => DoorPosition::Open,
            DoorDirection::Idle => DoorPosition::Closed,
        }
    }

    pub fn opacity(&self) -> DoorOpacity {
        DoorOpacity {
            closed: 1.0 - self.progress,
            open: self.progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(progress: f32, direction: DoorDirection) -> DoorAnimationState {
        DoorAnimationState { progress, direction }
    }

    #[test]
    fn test_new_is_closed_and_idle() {
        let door = DoorAnimationState::new();
        assert_eq!(door.progress(), 0.0);
        assert_eq!(door.direction(), DoorDirection::Idle);
        assert_eq!(door.position(), DoorPosition::Closed);
    }

    #[test]
    fn test_advance_idle_is_noop() {
        for progress in [0.0, 0.5, 1.0] {
            let door = state(progress, DoorDirection::Idle);
            assert_eq!(door.advance(0.04), door);
            assert_eq!(door.advance(-3.0), door);
        }
    }

    #[test]
    fn test_open_reaches_one_within_25_frames() {
        let mut door = state(0.0, DoorDirection::Opening);
        let mut frames = 0;
        while door.is_animating() {
            door = door.advance(0.04);
            frames += 1;
            assert!(frames <= 25, "door still opening after {} frames", frames);
        }
        assert_eq!(door.progress(), 1.0);
        assert_eq!(door.direction(), DoorDirection::Idle);
        assert_eq!(door.position(), DoorPosition::Open);
    }

    #[test]
    fn test_close_reaches_zero_within_25_frames() {
        let mut door = state(1.0, DoorDirection::Closing);
        let mut frames = 0;
        while door.is_animating() {
            door = door.advance(0.04);
            frames += 1;
            assert!(frames <= 25, "door still closing after {} frames", frames);
        }
        assert_eq!(door.progress(), 0.0);
        assert_eq!(door.direction(), DoorDirection::Idle);
        assert_eq!(door.position(), DoorPosition::Closed);
    }

    #[test]
    fn test_progress_stays_in_range_for_any_speed() {
        let speeds = [0.0, 0.04, 0.7, 1.0, 5.0, -0.3, -10.0, f32::MAX, f32::MIN, f32::NAN, f32::INFINITY];
        let progresses = [0.0, 0.1, 0.5, 0.96, 1.0];
        for direction in [DoorDirection::Opening, DoorDirection::Closing, DoorDirection::Idle] {
            for &progress in &progresses {
                for &speed in &speeds {
                    let next = state(progress, direction).advance(speed);
                    assert!(
                        (0.0..=1.0).contains(&next.progress()),
                        "progress {} out of range for speed {} from {:?}",
                        next.progress(), speed, direction
                    );
                }
            }
        }
    }

    #[test]
    fn test_large_step_clamps_and_stops() {
        let door = state(0.2, DoorDirection::Opening).advance(3.0);
        assert_eq!(door.progress(), 1.0);
        assert_eq!(door.direction(), DoorDirection::Idle);

        let door = state(0.8, DoorDirection::Closing).advance(3.0);
        assert_eq!(door.progress(), 0.0);
        assert_eq!(door.direction(), DoorDirection::Idle);
    }

    #[test]
    fn test_direction_stays_until_bound_reached() {
        let door = state(0.0, DoorDirection::Opening).advance(0.04);
        assert_eq!(door.direction(), DoorDirection::Opening);
        assert!((door.progress() - 0.04).abs() < 1e-6);

        // Moving away from the target bound never finishes the transition
        let door = state(0.5, DoorDirection::Opening).advance(-1.0);
        assert_eq!(door.progress(), 0.0);
        assert_eq!(door.direction(), DoorDirection::Opening);
    }

    #[test]
    fn test_tiny_speed_still_moves_and_finishes() {
        let speed = 0.000005;
        let mut door = state(0.0, DoorDirection::Opening);
        for _ in 0..1000 {
            door = door.advance(speed);
        }
        assert!(door.progress() > 0.0, "opening door did not move");
        assert_eq!(door.direction(), DoorDirection::Opening);

        let mut door = state(1.0, DoorDirection::Closing);
        for _ in 0..1000 {
            door = door.advance(speed);
        }
        assert!(door.progress() < 1.0, "closing door did not move");
        assert_eq!(door.direction(), DoorDirection::Closing);

        // Close to the target the door snaps onto it and rests
        let door = state(1.0 - 0.000008, DoorDirection::Opening).advance(speed);
        assert_eq!(door.progress(), 1.0);
        assert_eq!(door.direction(), DoorDirection::Idle);
        let door = state(0.000008, DoorDirection::Closing).advance(speed);
        assert_eq!(door.progress(), 0.0);
        assert_eq!(door.direction(), DoorDirection::Idle);
    }

    #[test]
    fn test_opacities_sum_to_one() {
        let mut door = state(0.0, DoorDirection::Opening);
        loop {
            let opacity = door.opacity();
            assert!((opacity.closed + opacity.open - 1.0).abs() < 1e-6);
            assert_eq!(opacity.open, door.progress());
            if !door.is_animating() {
                break;
            }
            door = door.advance(0.04);
        }
        assert_eq!(door.opacity(), DoorOpacity { closed: 0.0, open: 1.0 });
    }

    #[test]
    fn test_open_from_closed_rest() {
        let mut door = DoorAnimationState::new();
        assert!(door.open());
        assert_eq!(door.direction(), DoorDirection::Opening);
        assert_eq!(door.progress(), 0.0);
        assert_eq!(door.position(), DoorPosition::Open);
    }

    #[test]
    fn test_open_while_opening_is_ignored() {
        let mut door = DoorAnimationState::new();
        door.open();
        door = door.advance(0.04).advance(0.04);
        let before = door;

        assert!(!door.open());
        assert!(!door.toggle());
        assert_eq!(door, before);
    }

    #[test]
    fn test_close_while_opening_is_ignored() {
        let mut door = state(0.4, DoorDirection::Opening);
        assert!(!door.close());
        assert_eq!(door, state(0.4, DoorDirection::Opening));
    }

    #[test]
    fn test_close_only_from_open_rest() {
        let mut door = DoorAnimationState::new();
        assert!(!door.close());

        let mut door_open = state(1.0, DoorDirection::Idle);
        assert!(door_open.close());
        assert_eq!(door_open.direction(), DoorDirection::Closing);
        assert_eq!(door_open.progress(), 1.0);
        assert!(!door.is_animating());
    }

    #[test]
    fn test_toggle_full_cycle() {
        let mut door = DoorAnimationState::new();
        assert!(door.toggle());
        while door.is_animating() {
            door = door.advance(0.04);
        }
        assert_eq!(door.position(), DoorPosition::Open);

        assert!(door.toggle());
        assert_eq!(door.direction(), DoorDirection::Closing);
        while door.is_animating() {
            door = door.advance(0.04);
        }
        assert_eq!(door, DoorAnimationState::new());
    }
}
