//! Decay computation
//!
//! Measures how stale a narrative's last reinforcement is relative to its
//! half-life. The result is a separate staleness signal: it never feeds back
//! into `Confidence::score`.
//!
//! ```text
//! progress = clamp(elapsed_days / half_life_days, 0, 1) * 100
//! ```

use crate::narrative::{Decay, Narrative};
use chrono::{DateTime, Utc};

/// Progress above which a narrative is considered fading
pub const FADING_THRESHOLD: f64 = 50.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Decay state of a narrative at a given instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayState {
    /// Days since last reinforcement, never negative
    pub days_since_reinforced: f64,

    /// Staleness percentage in [0, 100]
    pub progress: f64,

    /// Whether progress exceeds [`FADING_THRESHOLD`]
    pub fading: bool,
}

impl DecayState {
    /// Compute the decay state for `decay` at `now`
    pub fn at(decay: &Decay, now: DateTime<Utc>) -> Self {
        let days = elapsed_days(decay.last_reinforced, now);
        let progress = progress_for(days, decay.half_life_days);
        Self {
            days_since_reinforced: days,
            progress,
            fading: progress > FADING_THRESHOLD,
        }
    }
}

/// Decay progress of `narrative` at `now`, as a percentage in [0, 100]
///
/// A `now` earlier than the last reinforcement (clock skew) yields 0.
/// A non-positive or non-finite half-life yields 100 (fully decayed).
pub fn decay_progress(narrative: &Narrative, now: DateTime<Utc>) -> f64 {
    DecayState::at(&narrative.decay, now).progress
}

/// Whether `narrative` is fading at `now`
pub fn is_fading(narrative: &Narrative, now: DateTime<Utc>) -> bool {
    DecayState::at(&narrative.decay, now).fading
}

/// Fractional days from `since` to `now`, clamped at 0
fn elapsed_days(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - since).num_milliseconds();
    if millis <= 0 {
        return 0.0;
    }
    millis as f64 / MILLIS_PER_DAY
}

fn progress_for(days: f64, half_life_days: f64) -> f64 {
    if !(half_life_days.is_finite() && half_life_days > 0.0) {
        return 100.0;
    }
    (days / half_life_days).clamp(0.0, 1.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Confidence, ConfidenceTrend};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn narrative(half_life_days: f64, reinforced_days_ago: i64) -> Narrative {
        let now = now();
        Narrative::new(
            "n",
            "N",
            "",
            Confidence::new(60, ConfidenceTrend::Flat, now).unwrap(),
            Decay::new(half_life_days, now - Duration::days(reinforced_days_ago)),
            now - Duration::days(90),
        )
    }

    #[test]
    fn test_half_of_half_life_is_fifty_percent() {
        let n = narrative(30.0, 15);
        assert_eq!(decay_progress(&n, now()), 50.0);
        // Exactly 50 is not fading
        assert!(!is_fading(&n, now()));
    }

    #[test]
    fn test_clamps_at_one_hundred() {
        let n = narrative(30.0, 45);
        assert_eq!(decay_progress(&n, now()), 100.0);
        assert!(is_fading(&n, now()));
    }

    #[test]
    fn test_now_before_reinforcement_is_zero() {
        let n = narrative(30.0, -5);
        assert_eq!(decay_progress(&n, now()), 0.0);
    }

    #[test]
    fn test_zero_half_life_is_fully_decayed() {
        let mut n = narrative(30.0, 1);
        n.decay.half_life_days = 0.0;
        assert_eq!(decay_progress(&n, now()), 100.0);

        n.decay.half_life_days = f64::NAN;
        assert_eq!(decay_progress(&n, now()), 100.0);
    }

    #[test]
    fn test_fractional_days() {
        let mut n = narrative(10.0, 0);
        n.decay.last_reinforced = now() - Duration::hours(36);
        let state = DecayState::at(&n.decay, now());
        assert!((state.days_since_reinforced - 1.5).abs() < 1e-9);
        assert!((state.progress - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_decay_does_not_touch_confidence() {
        let n = narrative(7.0, 30);
        let _ = decay_progress(&n, now());
        assert_eq!(n.confidence.score, 60);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::{Confidence, ConfidenceTrend};
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn narrative(half_life_days: f64) -> Narrative {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Narrative::new(
            "n",
            "N",
            "",
            Confidence::new(50, ConfidenceTrend::Flat, base).unwrap(),
            Decay::new(half_life_days, base),
            base,
        )
    }

    proptest! {
        /// Property: progress is always within [0, 100], including before reinforcement
        #[test]
        fn test_progress_bounded(
            half_life in 0.01f64..365.0,
            offset_minutes in -1_000_000i64..1_000_000i64,
        ) {
            let n = narrative(half_life);
            let now = n.decay.last_reinforced + Duration::minutes(offset_minutes);
            let p = decay_progress(&n, now);
            prop_assert!((0.0..=100.0).contains(&p), "progress {} out of range", p);
        }

        /// Property: progress never decreases as time moves forward
        #[test]
        fn test_progress_monotonic(
            half_life in 0.01f64..365.0,
            a in -500_000i64..500_000i64,
            delta in 0i64..500_000i64,
        ) {
            let n = narrative(half_life);
            let t1 = n.decay.last_reinforced + Duration::minutes(a);
            let t2 = t1 + Duration::minutes(delta);
            prop_assert!(decay_progress(&n, t1) <= decay_progress(&n, t2));
        }
    }
}
