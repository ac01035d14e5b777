use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SwipeConfig;

/// Horizontal displacement is divided by this to get the card tilt in degrees
const ROTATION_DIVISOR: f64 = 20.0;

/// Tilt applied to a card while it flies off the deck
const EXIT_ROTATION_DEG: f64 = 30.0;

/// Raw pointer sample delivered by the platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pointer_id: i64,
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerEvent {
    pub fn new(pointer_id: i64, client_x: f64, client_y: f64) -> Self {
        Self {
            pointer_id,
            client_x,
            client_y,
        }
    }
}

/// What the pointer went down on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    /// The card surface itself
    #[default]
    Card,
    /// An embedded interactive control such as the ticket link
    Control,
}

/// Visual offset of a card relative to its rest position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CardTransform {
    pub dx: f64,
    pub dy: f64,
    pub rotation_deg: f64,
}

impl CardTransform {
    pub const REST: CardTransform = CardTransform {
        dx: 0.0,
        dy: 0.0,
        rotation_deg: 0.0,
    };

    /// Transform for a drag displacement: pure function of `(dx, dy)`
    pub fn from_displacement(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            rotation_deg: dx / ROTATION_DIVISOR,
        }
    }
}

/// Visual hint shown once a drag crosses the commit threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Affordance {
    #[default]
    None,
    Like,
    Nope,
}

/// Public view of where a tracker is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    Idle,
    Dragging,
    Committing,
    Terminated,
}

/// Result of a gesture ending
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEnd {
    /// Not our pointer, or no drag in progress
    Ignored,
    /// Below threshold: the card animates back to rest
    SnapBack { duration: Duration },
    /// Past threshold: the card flies off and commits once `duration` elapses
    Commit {
        liked: bool,
        exit: CardTransform,
        duration: Duration,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TrackerState {
    Idle,
    Dragging {
        pointer_id: i64,
        origin_x: f64,
        origin_y: f64,
    },
    Committing {
        liked: bool,
    },
    Terminated,
}

/// Classifies one pointer interaction on a single card as like, dislike or cancel
///
/// The tracker never schedules anything itself. When a drag commits it reports the
/// exit animation length and whoever drives the event loop calls
/// [`GestureTracker::complete_exit`] once that window has elapsed.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    threshold: f64,
    exit_duration: Duration,
    snap_back_duration: Duration,
    state: TrackerState,
    transform: CardTransform,
}

impl GestureTracker {
    pub fn new(config: &SwipeConfig) -> Self {
        Self {
            threshold: config.commit_threshold,
            exit_duration: config.exit_duration,
            snap_back_duration: config.snap_back_duration,
            state: TrackerState::Idle,
            transform: CardTransform::REST,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        match self.state {
            TrackerState::Idle => GesturePhase::Idle,
            TrackerState::Dragging { .. } => GesturePhase::Dragging,
            TrackerState::Committing { .. } => GesturePhase::Committing,
            TrackerState::Terminated => GesturePhase::Terminated,
        }
    }

    /// Whether the card can still take part in a gesture
    pub fn is_interactive(&self) -> bool {
        matches!(self.state, TrackerState::Idle | TrackerState::Dragging { .. })
    }

    pub fn transform(&self) -> CardTransform {
        self.transform
    }

    /// Like/nope hint for the current displacement
    pub fn affordance(&self) -> Affordance {
        match self.state {
            TrackerState::Dragging { .. } if self.transform.dx.abs() > self.threshold => {
                if self.transform.dx > 0.0 {
                    Affordance::Like
                } else {
                    Affordance::Nope
                }
            }
            TrackerState::Committing { liked: true } => Affordance::Like,
            TrackerState::Committing { liked: false } => Affordance::Nope,
            _ => Affordance::None,
        }
    }

    /// Starts a drag; returns `false` if the event was not taken
    pub fn pointer_down(&mut self, event: &PointerEvent, target: PointerTarget) -> bool {
        if target == PointerTarget::Control || self.state != TrackerState::Idle {
            return false;
        }

        self.state = TrackerState::Dragging {
            pointer_id: event.pointer_id,
            origin_x: event.client_x,
            origin_y: event.client_y,
        };
        self.transform = CardTransform::REST;
        true
    }

    /// Follows the captured pointer; other pointers are noise
    pub fn pointer_move(&mut self, event: &PointerEvent) -> Option<CardTransform> {
        let TrackerState::Dragging {
            pointer_id,
            origin_x,
            origin_y,
        } = self.state
        else {
            return None;
        };
        if event.pointer_id != pointer_id {
            return None;
        }

        self.transform =
            CardTransform::from_displacement(event.client_x - origin_x, event.client_y - origin_y);
        Some(self.transform)
    }

    /// Handles pointer-up, pointer-cancel and lost capture alike
    ///
    /// The outcome is decided from the last tracked displacement. A drag commits only
    /// when `|dx|` is strictly greater than the threshold.
    pub fn pointer_end(&mut self, event: &PointerEvent) -> GestureEnd {
        let TrackerState::Dragging { pointer_id, .. } = self.state else {
            return GestureEnd::Ignored;
        };
        if event.pointer_id != pointer_id {
            return GestureEnd::Ignored;
        }

        let CardTransform { dx, dy, .. } = self.transform;
        if dx.abs() > self.threshold {
            let liked = dx > 0.0;
            self.state = TrackerState::Committing { liked };
            self.transform = CardTransform {
                dx,
                dy,
                rotation_deg: if liked {
                    EXIT_ROTATION_DEG
                } else {
                    -EXIT_ROTATION_DEG
                },
            };
            GestureEnd::Commit {
                liked,
                exit: self.transform,
                duration: self.exit_duration,
            }
        } else {
            self.state = TrackerState::Idle;
            self.transform = CardTransform::REST;
            GestureEnd::SnapBack {
                duration: self.snap_back_duration,
            }
        }
    }

    /// Finishes the exit animation, yielding the decision exactly once
    pub fn complete_exit(&mut self) -> Option<bool> {
        match self.state {
            TrackerState::Committing { liked } => {
                self.state = TrackerState::Terminated;
                Some(liked)
            }
            _ => None,
        }
    }

    /// Puts the tracker in its terminal state without emitting anything
    pub fn terminate(&mut self) {
        self.state = TrackerState::Terminated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> GestureTracker {
        GestureTracker::new(&SwipeConfig::default())
    }

    fn drag(tracker: &mut GestureTracker, dx: f64, dy: f64) -> GestureEnd {
        assert!(tracker.pointer_down(&PointerEvent::new(1, 200.0, 300.0), PointerTarget::Card));
        tracker.pointer_move(&PointerEvent::new(1, 200.0 + dx, 300.0 + dy));
        tracker.pointer_end(&PointerEvent::new(1, 200.0 + dx, 300.0 + dy))
    }

    #[test]
    fn test_drag_right_past_threshold_commits_like() {
        let mut t = tracker();
        let end = drag(&mut t, 150.0, 10.0);

        match end {
            GestureEnd::Commit {
                liked,
                exit,
                duration,
            } => {
                assert!(liked);
                assert_eq!(exit.rotation_deg, 30.0);
                assert_eq!(exit.dy, 10.0);
                assert_eq!(duration, Duration::from_millis(300));
            }
            other => panic!("expected commit, got {:?}", other),
        }
        assert_eq!(t.phase(), GesturePhase::Committing);
        assert!(!t.is_interactive());
    }

    #[test]
    fn test_drag_left_past_threshold_commits_dislike() {
        let mut t = tracker();
        let end = drag(&mut t, -121.0, 0.0);
        assert!(matches!(end, GestureEnd::Commit { liked: false, .. }));
        assert_eq!(t.affordance(), Affordance::Nope);
    }

    #[test]
    fn test_exact_threshold_snaps_back() {
        let mut t = tracker();
        let end = drag(&mut t, 120.0, 0.0);
        assert_eq!(
            end,
            GestureEnd::SnapBack {
                duration: Duration::from_millis(300)
            }
        );
        assert_eq!(t.phase(), GesturePhase::Idle);
        assert_eq!(t.transform(), CardTransform::REST);

        let end = drag(&mut t, -120.0, 0.0);
        assert!(matches!(end, GestureEnd::SnapBack { .. }));
    }

    #[test]
    fn test_move_applies_transform_and_affordance() {
        let mut t = tracker();
        t.pointer_down(&PointerEvent::new(3, 0.0, 0.0), PointerTarget::Card);

        let transform = t.pointer_move(&PointerEvent::new(3, 40.0, -5.0)).unwrap();
        assert_eq!(transform, CardTransform::from_displacement(40.0, -5.0));
        assert_eq!(transform.rotation_deg, 2.0);
        assert_eq!(t.affordance(), Affordance::None);

        t.pointer_move(&PointerEvent::new(3, 130.0, 0.0));
        assert_eq!(t.affordance(), Affordance::Like);

        t.pointer_move(&PointerEvent::new(3, -130.0, 0.0));
        assert_eq!(t.affordance(), Affordance::Nope);

        t.pointer_move(&PointerEvent::new(3, 10.0, 0.0));
        assert_eq!(t.affordance(), Affordance::None);
    }

    #[test]
    fn test_other_pointer_is_ignored() {
        let mut t = tracker();
        t.pointer_down(&PointerEvent::new(1, 0.0, 0.0), PointerTarget::Card);

        assert!(!t.pointer_down(&PointerEvent::new(2, 0.0, 0.0), PointerTarget::Card));
        assert_eq!(t.pointer_move(&PointerEvent::new(2, 500.0, 0.0)), None);
        assert_eq!(t.pointer_end(&PointerEvent::new(2, 500.0, 0.0)), GestureEnd::Ignored);
        assert_eq!(t.phase(), GesturePhase::Dragging);
        assert_eq!(t.transform(), CardTransform::REST);
    }

    #[test]
    fn test_control_target_never_drags() {
        let mut t = tracker();
        assert!(!t.pointer_down(&PointerEvent::new(1, 0.0, 0.0), PointerTarget::Control));
        assert_eq!(t.phase(), GesturePhase::Idle);
        assert_eq!(t.pointer_move(&PointerEvent::new(1, 300.0, 0.0)), None);
        assert_eq!(t.pointer_end(&PointerEvent::new(1, 300.0, 0.0)), GestureEnd::Ignored);
    }

    #[test]
    fn test_redrag_after_snap_back_starts_fresh() {
        let mut t = tracker();
        drag(&mut t, 100.0, 0.0);
        assert_eq!(t.phase(), GesturePhase::Idle);

        // No move this time: the previous displacement must not leak into the outcome
        t.pointer_down(&PointerEvent::new(1, 0.0, 0.0), PointerTarget::Card);
        assert_eq!(t.transform(), CardTransform::REST);
        let end = t.pointer_end(&PointerEvent::new(1, 0.0, 0.0));
        assert!(matches!(end, GestureEnd::SnapBack { .. }));

        let end = drag(&mut t, 200.0, 0.0);
        assert!(matches!(end, GestureEnd::Commit { liked: true, .. }));
    }

    #[test]
    fn test_commit_emits_once_and_locks_card() {
        let mut t = tracker();
        drag(&mut t, 200.0, 0.0);

        assert!(!t.pointer_down(&PointerEvent::new(1, 0.0, 0.0), PointerTarget::Card));
        assert_eq!(t.pointer_end(&PointerEvent::new(1, 0.0, 0.0)), GestureEnd::Ignored);

        assert_eq!(t.complete_exit(), Some(true));
        assert_eq!(t.complete_exit(), None);
        assert_eq!(t.phase(), GesturePhase::Terminated);
    }

    #[test]
    fn test_terminate_suppresses_pending_commit() {
        let mut t = tracker();
        drag(&mut t, -200.0, 0.0);
        t.terminate();
        assert_eq!(t.complete_exit(), None);
    }

    #[test]
    fn test_custom_threshold() {
        let config = SwipeConfig {
            commit_threshold: 50.0,
            ..SwipeConfig::default()
        };
        let mut t = GestureTracker::new(&config);
        assert!(matches!(drag(&mut t, 60.0, 0.0), GestureEnd::Commit { .. }));
    }
}
