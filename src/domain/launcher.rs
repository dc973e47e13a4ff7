//! The always-on-screen floating launcher.
//!
//! Position state machine (`idle → pressed → dragging → snapping → idle`)
//! plus two independent cosmetic loops: the idle breathing pulse and the
//! unread badge. Coordinates are screen cell units.

use chrono::{DateTime, Utc};

use super::animation::{Pulse, Spring};

/// Launcher footprint in cells.
pub const LAUNCHER_WIDTH: f32 = 4.0;
pub const LAUNCHER_HEIGHT: f32 = 2.0;
/// Horizontal resting distance from the screen edge after a snap.
pub const EDGE_MARGIN: f32 = 2.0;
pub const TOP_MARGIN: f32 = 1.0;
pub const BOTTOM_MARGIN: f32 = 1.0;

/// Pointer travel needed before the gesture claims the launcher; anything
/// shorter stays a clean tap.
pub const CLAIM_THRESHOLD: f32 = 5.0;
/// Cumulative travel past which the gesture counts as a real drag rather
/// than a jittery tap.
pub const REAL_DRAG_THRESHOLD: f32 = 10.0;

const SNAP_SPRING: Spring = Spring::new(120.0, 14.0);
const IDLE_PULSE: Pulse = Pulse::new(2_000, 1.05);
const BADGE_POP_SPRING: Spring = Spring::new(180.0, 12.0);
const BADGE_PULSE: Pulse = Pulse::new(800, 1.2);
pub const BADGE_FADE_OUT_MS: i64 = 200;

/// The visible screen area the launcher moves within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBounds {
    pub width: f32,
    pub height: f32,
}

impl ScreenBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// What a gesture sample asks the caller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    None,
    /// The gesture crossed the claim threshold; fire the medium haptic.
    Claimed,
    /// Released without a real drag; invoke the press callback.
    Tap,
    /// Released after a real drag; a snap animation is now running.
    SnapStarted,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Pressed {
        origin: (f32, f32),
        pointer_start: (f32, f32),
    },
    Dragging {
        origin: (f32, f32),
        pointer_start: (f32, f32),
        real_drag: bool,
    },
    Snapping {
        from: (f32, f32),
        target: (f32, f32),
        started: DateTime<Utc>,
    },
}

/// Reported phase, collapsing the internal pressed sub-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherPhase {
    Idle,
    Dragging,
    Snapping,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LauncherState {
    x: f32,
    y: f32,
    phase: Phase,
    pulse_anchor: DateTime<Utc>,
    badge: BadgeAnimation,
}

impl LauncherState {
    /// Places the launcher at its default corner (bottom-right). Called on
    /// cold start only; position is never persisted.
    pub fn at_default_corner(screen: ScreenBounds, now: DateTime<Utc>) -> Self {
        Self {
            x: screen.width - LAUNCHER_WIDTH - EDGE_MARGIN,
            y: screen.height - LAUNCHER_HEIGHT - BOTTOM_MARGIN,
            phase: Phase::Idle,
            pulse_anchor: now,
            badge: BadgeAnimation::default(),
        }
    }

    pub fn phase(&self) -> LauncherPhase {
        match self.phase {
            Phase::Idle => LauncherPhase::Idle,
            Phase::Pressed { .. } | Phase::Dragging { .. } => LauncherPhase::Dragging,
            Phase::Snapping { .. } => LauncherPhase::Snapping,
        }
    }

    /// Current top-left position, interpolated while snapping.
    pub fn position(&self, now: DateTime<Utc>) -> (f32, f32) {
        match &self.phase {
            Phase::Snapping {
                from,
                target,
                started,
            } => {
                let elapsed = (now - *started).num_milliseconds().max(0) as f32 / 1000.0;
                let p = SNAP_SPRING.progress_at(elapsed);
                (
                    from.0 + (target.0 - from.0) * p,
                    from.1 + (target.1 - from.1) * p,
                )
            }
            _ => (self.x, self.y),
        }
    }

    /// True when the pointer coordinate falls on the launcher.
    pub fn hit_test(&self, x: f32, y: f32) -> bool {
        x >= self.x
            && x < self.x + LAUNCHER_WIDTH
            && y >= self.y
            && y < self.y + LAUNCHER_HEIGHT
    }

    /// Begins a gesture. Ignored unless the launcher is idle and the pointer
    /// is on it.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        if !matches!(self.phase, Phase::Idle) || !self.hit_test(x, y) {
            return false;
        }
        self.phase = Phase::Pressed {
            origin: (self.x, self.y),
            pointer_start: (x, y),
        };
        true
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, screen: ScreenBounds) -> GestureOutcome {
        match self.phase.clone() {
            Phase::Pressed {
                origin,
                pointer_start,
            } => {
                let moved = travel(pointer_start, (x, y));
                if moved > CLAIM_THRESHOLD {
                    self.phase = Phase::Dragging {
                        origin,
                        pointer_start,
                        real_drag: moved > REAL_DRAG_THRESHOLD,
                    };
                    self.track_pointer(origin, pointer_start, (x, y), screen);
                    GestureOutcome::Claimed
                } else {
                    GestureOutcome::None
                }
            }
            Phase::Dragging {
                origin,
                pointer_start,
                real_drag,
            } => {
                let real_drag = real_drag || travel(pointer_start, (x, y)) > REAL_DRAG_THRESHOLD;
                self.phase = Phase::Dragging {
                    origin,
                    pointer_start,
                    real_drag,
                };
                self.track_pointer(origin, pointer_start, (x, y), screen);
                GestureOutcome::None
            }
            _ => GestureOutcome::None,
        }
    }

    pub fn pointer_up(
        &mut self,
        x: f32,
        y: f32,
        screen: ScreenBounds,
        now: DateTime<Utc>,
    ) -> GestureOutcome {
        match self.phase.clone() {
            Phase::Pressed { origin, .. } => {
                self.x = origin.0;
                self.y = origin.1;
                self.phase = Phase::Idle;
                GestureOutcome::Tap
            }
            Phase::Dragging {
                origin,
                pointer_start,
                real_drag,
            } => {
                let real_drag =
                    real_drag || travel(pointer_start, (x, y)) > REAL_DRAG_THRESHOLD;
                if !real_drag {
                    // Jitter-only tap: no net position change, no animation.
                    self.x = origin.0;
                    self.y = origin.1;
                    self.phase = Phase::Idle;
                    return GestureOutcome::Tap;
                }

                self.track_pointer(origin, pointer_start, (x, y), screen);
                let target = snap_target(self.x, self.y, screen);
                self.phase = Phase::Snapping {
                    from: (self.x, self.y),
                    target,
                    started: now,
                };
                self.x = target.0;
                self.y = target.1;
                GestureOutcome::SnapStarted
            }
            _ => GestureOutcome::None,
        }
    }

    /// Advances the snap animation. Returns true on the tick the launcher
    /// settles (the caller fires the light haptic then).
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        self.badge.tick(now);
        if let Phase::Snapping { started, .. } = self.phase {
            let elapsed = (now - started).num_milliseconds().max(0) as f32 / 1000.0;
            if SNAP_SPRING.is_settled_at(elapsed) {
                self.phase = Phase::Idle;
                return true;
            }
        }
        false
    }

    /// Scale of the idle breathing pulse. Runs continuously; dragging does
    /// not interrupt it.
    pub fn idle_scale(&self, now: DateTime<Utc>) -> f32 {
        let elapsed = (now - self.pulse_anchor).num_milliseconds().max(0);
        IDLE_PULSE.scale_at(elapsed)
    }

    /// Mirrors the unread flag into the badge animation.
    pub fn set_unread(&mut self, has_unread: bool, now: DateTime<Utc>) {
        self.badge.sync(has_unread, now);
    }

    pub fn badge(&self) -> &BadgeAnimation {
        &self.badge
    }

    /// Re-clamps the resting position after a terminal resize.
    pub fn clamp_to(&mut self, screen: ScreenBounds) {
        self.x = self
            .x
            .clamp(0.0, (screen.width - LAUNCHER_WIDTH).max(0.0));
        self.y = self
            .y
            .clamp(0.0, (screen.height - LAUNCHER_HEIGHT).max(0.0));
    }

    fn track_pointer(
        &mut self,
        origin: (f32, f32),
        pointer_start: (f32, f32),
        pointer: (f32, f32),
        screen: ScreenBounds,
    ) {
        self.x = (origin.0 + pointer.0 - pointer_start.0)
            .clamp(0.0, (screen.width - LAUNCHER_WIDTH).max(0.0));
        self.y = (origin.1 + pointer.1 - pointer_start.1)
            .clamp(0.0, (screen.height - LAUNCHER_HEIGHT).max(0.0));
    }
}

/// Resting position after a real drag: left or right margin depending on
/// which half of the screen the launcher was released in, vertical position
/// clamped inside the margins.
fn snap_target(x: f32, y: f32, screen: ScreenBounds) -> (f32, f32) {
    let center = x + LAUNCHER_WIDTH / 2.0;
    let snapped_x = if center < screen.width / 2.0 {
        EDGE_MARGIN
    } else {
        screen.width - LAUNCHER_WIDTH - EDGE_MARGIN
    };
    let max_y = (screen.height - LAUNCHER_HEIGHT - BOTTOM_MARGIN).max(TOP_MARGIN);
    (snapped_x, y.clamp(TOP_MARGIN, max_y))
}

fn travel(from: (f32, f32), to: (f32, f32)) -> f32 {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    (dx * dx + dy * dy).sqrt()
}

#[derive(Debug, Clone, PartialEq)]
enum BadgePhase {
    Hidden,
    PoppingIn { started: DateTime<Utc> },
    Pulsing { anchor: DateTime<Utc> },
    FadingOut { started: DateTime<Utc> },
}

/// Unread badge: one-shot spring pop-in, then an infinite attention pulse
/// until the unread flag clears, then a short fade-out.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeAnimation {
    phase: BadgePhase,
}

impl Default for BadgeAnimation {
    fn default() -> Self {
        Self {
            phase: BadgePhase::Hidden,
        }
    }
}

impl BadgeAnimation {
    fn sync(&mut self, has_unread: bool, now: DateTime<Utc>) {
        match (&self.phase, has_unread) {
            (BadgePhase::Hidden, true) | (BadgePhase::FadingOut { .. }, true) => {
                self.phase = BadgePhase::PoppingIn { started: now };
            }
            (BadgePhase::PoppingIn { .. }, false) | (BadgePhase::Pulsing { .. }, false) => {
                self.phase = BadgePhase::FadingOut { started: now };
            }
            _ => {}
        }
    }

    fn tick(&mut self, now: DateTime<Utc>) {
        match self.phase {
            BadgePhase::PoppingIn { started } => {
                let elapsed = (now - started).num_milliseconds().max(0) as f32 / 1000.0;
                if BADGE_POP_SPRING.is_settled_at(elapsed) {
                    self.phase = BadgePhase::Pulsing { anchor: now };
                }
            }
            BadgePhase::FadingOut { started } => {
                if (now - started).num_milliseconds() >= BADGE_FADE_OUT_MS {
                    self.phase = BadgePhase::Hidden;
                }
            }
            BadgePhase::Hidden | BadgePhase::Pulsing { .. } => {}
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.phase, BadgePhase::Hidden)
    }

    pub fn scale(&self, now: DateTime<Utc>) -> f32 {
        match self.phase {
            BadgePhase::Hidden => 0.0,
            BadgePhase::PoppingIn { started } => {
                let elapsed = (now - started).num_milliseconds().max(0) as f32 / 1000.0;
                BADGE_POP_SPRING.progress_at(elapsed)
            }
            BadgePhase::Pulsing { anchor } => {
                BADGE_PULSE.scale_at((now - anchor).num_milliseconds().max(0))
            }
            BadgePhase::FadingOut { .. } => 1.0,
        }
    }

    pub fn opacity(&self, now: DateTime<Utc>) -> f32 {
        match self.phase {
            BadgePhase::Hidden => 0.0,
            BadgePhase::FadingOut { started } => {
                let t = (now - started).num_milliseconds().max(0) as f32
                    / BADGE_FADE_OUT_MS as f32;
                (1.0 - t).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }
}
