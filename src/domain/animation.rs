//! Timing curves and the modal open/close choreography.
//!
//! The durations and spring constants here are behavioral contracts shared
//! with the interaction tests, not incidental tuning.

use chrono::{DateTime, Utc};

/// Linear opacity fade duration for both modal transitions.
pub const MODAL_FADE_MS: i64 = 250;
/// Eased scale-down duration of the close transition.
pub const MODAL_CLOSE_MS: i64 = 250;
/// Spring constants of the open transition's scale curve.
pub const OPEN_SPRING_TENSION: f32 = 65.0;
pub const OPEN_SPRING_FRICTION: f32 = 8.0;

/// Residual amplitude below which a spring counts as settled.
const SPRING_SETTLE_EPSILON: f32 = 0.001;

/// An analytically evaluated unit spring: progress runs 0 → 1 with the
/// overshoot/ringing implied by tension and friction (unit mass).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    tension: f32,
    friction: f32,
}

impl Spring {
    pub const fn new(tension: f32, friction: f32) -> Self {
        Self { tension, friction }
    }

    /// Spring used by the modal open transition.
    pub const fn modal_open() -> Self {
        Self::new(OPEN_SPRING_TENSION, OPEN_SPRING_FRICTION)
    }

    /// Progress at `elapsed` seconds since the spring was released.
    pub fn progress_at(&self, elapsed_secs: f32) -> f32 {
        if elapsed_secs <= 0.0 {
            return 0.0;
        }

        let omega = self.tension.sqrt();
        let zeta = self.friction / (2.0 * omega);

        if zeta < 1.0 {
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            let envelope = (-zeta * omega * elapsed_secs).exp();
            let phase = damped * elapsed_secs;
            1.0 - envelope * (phase.cos() + (zeta * omega / damped) * phase.sin())
        } else {
            // Critically damped or overdamped: no ringing.
            let envelope = (-omega * elapsed_secs).exp();
            1.0 - envelope * (1.0 + omega * elapsed_secs)
        }
    }

    /// True once the residual oscillation has decayed below the settle
    /// threshold.
    pub fn is_settled_at(&self, elapsed_secs: f32) -> bool {
        if elapsed_secs <= 0.0 {
            return false;
        }
        let omega = self.tension.sqrt();
        let zeta = (self.friction / (2.0 * omega)).min(1.0);
        (-zeta * omega * elapsed_secs).exp() < SPRING_SETTLE_EPSILON
    }
}

/// Standard ease-in-out cubic over a unit interval.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// An infinite cosine-smoothed pulse between scale 1.0 and `max_scale`,
/// reaching the peak every `half_cycle_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub half_cycle_ms: i64,
    pub max_scale: f32,
}

impl Pulse {
    pub const fn new(half_cycle_ms: i64, max_scale: f32) -> Self {
        Self {
            half_cycle_ms,
            max_scale,
        }
    }

    pub fn scale_at(&self, elapsed_ms: i64) -> f32 {
        let half = self.half_cycle_ms.max(1) as f32;
        let phase = (elapsed_ms.max(0) as f32 / half) * std::f32::consts::PI;
        let wave = 0.5 * (1.0 - phase.cos());
        1.0 + (self.max_scale - 1.0) * wave
    }
}

/// The modal's transition phase. The modal is visible from the instant an
/// open starts, and hidden only after a close completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Drives the modal's open/close choreography as a pure function of the
/// session open flag and the clock.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalTransition {
    phase: ModalPhase,
    phase_started: Option<DateTime<Utc>>,
    spring: Spring,
}

impl Default for ModalTransition {
    fn default() -> Self {
        Self {
            phase: ModalPhase::Closed,
            phase_started: None,
            spring: Spring::modal_open(),
        }
    }
}

impl ModalTransition {
    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase != ModalPhase::Closed
    }

    /// Starts (or restarts) the open transition. Replaying while already
    /// opening or open resets both animation values to their start state,
    /// guarding against stacked partial animations.
    pub fn play_open(&mut self, now: DateTime<Utc>) {
        self.phase = ModalPhase::Opening;
        self.phase_started = Some(now);
    }

    /// Starts the close transition. No-op when already closed or closing.
    pub fn play_close(&mut self, now: DateTime<Utc>) {
        match self.phase {
            ModalPhase::Closed | ModalPhase::Closing => {}
            ModalPhase::Opening | ModalPhase::Open => {
                self.phase = ModalPhase::Closing;
                self.phase_started = Some(now);
            }
        }
    }

    /// Advances phase boundaries: Opening settles into Open, Closing ends in
    /// Closed.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        match self.phase {
            ModalPhase::Opening => {
                if self.spring.is_settled_at(self.elapsed_secs(now)) {
                    self.phase = ModalPhase::Open;
                    self.phase_started = None;
                }
            }
            ModalPhase::Closing => {
                if self.elapsed_ms(now) >= MODAL_CLOSE_MS {
                    self.phase = ModalPhase::Closed;
                    self.phase_started = None;
                }
            }
            ModalPhase::Closed | ModalPhase::Open => {}
        }
    }

    /// Scale of the modal surface: sprung on open, eased on close.
    pub fn scale(&self, now: DateTime<Utc>) -> f32 {
        match self.phase {
            ModalPhase::Closed => 0.0,
            ModalPhase::Open => 1.0,
            ModalPhase::Opening => self.spring.progress_at(self.elapsed_secs(now)),
            ModalPhase::Closing => {
                let t = self.elapsed_ms(now) as f32 / MODAL_CLOSE_MS as f32;
                1.0 - ease_in_out_cubic(t)
            }
        }
    }

    /// Opacity of the modal surface: linear fade both ways.
    pub fn opacity(&self, now: DateTime<Utc>) -> f32 {
        match self.phase {
            ModalPhase::Closed => 0.0,
            ModalPhase::Open => 1.0,
            ModalPhase::Opening => {
                (self.elapsed_ms(now) as f32 / MODAL_FADE_MS as f32).clamp(0.0, 1.0)
            }
            ModalPhase::Closing => {
                1.0 - (self.elapsed_ms(now) as f32 / MODAL_FADE_MS as f32).clamp(0.0, 1.0)
            }
        }
    }

    fn elapsed_ms(&self, now: DateTime<Utc>) -> i64 {
        self.phase_started
            .map(|started| (now - started).num_milliseconds().max(0))
            .unwrap_or(0)
    }

    fn elapsed_secs(&self, now: DateTime<Utc>) -> f32 {
        self.elapsed_ms(now) as f32 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn after_ms(ms: i64) -> DateTime<Utc> {
        t0() + Duration::milliseconds(ms)
    }

    #[test]
    fn spring_starts_at_zero_and_converges_to_one() {
        let spring = Spring::modal_open();
        assert_eq!(spring.progress_at(0.0), 0.0);
        assert!((spring.progress_at(10.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn modal_open_spring_overshoots_before_settling() {
        let spring = Spring::modal_open();
        let peak = (0..300)
            .map(|i| spring.progress_at(i as f32 * 0.01))
            .fold(f32::MIN, f32::max);

        // Tension 65 / friction 8 is underdamped, so the scale rings past 1.
        assert!(peak > 1.0);
    }

    #[test]
    fn spring_settles_within_a_few_seconds() {
        let spring = Spring::modal_open();
        assert!(!spring.is_settled_at(0.1));
        assert!(spring.is_settled_at(5.0));
    }

    #[test]
    fn ease_in_out_cubic_hits_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn pulse_peaks_at_half_cycle_and_returns_to_rest() {
        let pulse = Pulse::new(2_000, 1.05);
        assert!((pulse.scale_at(0) - 1.0).abs() < 0.001);
        assert!((pulse.scale_at(2_000) - 1.05).abs() < 0.001);
        assert!((pulse.scale_at(4_000) - 1.0).abs() < 0.001);
    }

    #[test]
    fn modal_starts_closed_and_invisible() {
        let modal = ModalTransition::default();
        assert_eq!(modal.phase(), ModalPhase::Closed);
        assert!(!modal.is_visible());
        assert_eq!(modal.scale(t0()), 0.0);
    }

    #[test]
    fn modal_is_visible_from_the_start_of_the_open_transition() {
        let mut modal = ModalTransition::default();
        modal.play_open(t0());

        assert!(modal.is_visible());
        assert_eq!(modal.phase(), ModalPhase::Opening);
    }

    #[test]
    fn opening_settles_into_open() {
        let mut modal = ModalTransition::default();
        modal.play_open(t0());
        modal.tick(after_ms(10_000));

        assert_eq!(modal.phase(), ModalPhase::Open);
        assert_eq!(modal.scale(after_ms(10_000)), 1.0);
    }

    #[test]
    fn replaying_open_resets_the_animation_values() {
        let mut modal = ModalTransition::default();
        modal.play_open(t0());
        modal.tick(after_ms(10_000));
        assert_eq!(modal.phase(), ModalPhase::Open);

        modal.play_open(after_ms(10_000));

        assert_eq!(modal.phase(), ModalPhase::Opening);
        assert_eq!(modal.scale(after_ms(10_000)), 0.0);
        assert_eq!(modal.opacity(after_ms(10_000)), 0.0);
    }

    #[test]
    fn modal_stays_visible_until_the_close_transition_completes() {
        let mut modal = ModalTransition::default();
        modal.play_open(t0());
        modal.tick(after_ms(10_000));
        modal.play_close(after_ms(10_000));

        modal.tick(after_ms(10_100));
        assert!(modal.is_visible());

        modal.tick(after_ms(10_000 + MODAL_CLOSE_MS));
        assert!(!modal.is_visible());
    }

    #[test]
    fn close_opacity_fades_linearly() {
        let mut modal = ModalTransition::default();
        modal.play_open(t0());
        modal.tick(after_ms(10_000));
        modal.play_close(after_ms(10_000));

        let mid = modal.opacity(after_ms(10_000 + MODAL_FADE_MS / 2));
        assert!((mid - 0.5).abs() < 0.01);
    }

    #[test]
    fn play_close_when_closed_is_a_no_op() {
        let mut modal = ModalTransition::default();
        modal.play_close(t0());

        assert_eq!(modal.phase(), ModalPhase::Closed);
    }
}
