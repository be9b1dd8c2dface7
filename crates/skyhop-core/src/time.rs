/// Simulation clock reading in milliseconds.
///
/// The session advances its clock by one fixed `dt` per step, so every
/// timestamp the physics compares against is on the same deterministic clock.
pub type Millis = f64;

/// Sentinel for "never happened". Any finite `now` minus `NEVER` is +inf,
/// so window checks against it always fail.
pub const NEVER: Millis = f64::NEG_INFINITY;

/// Milliseconds between `then` and `now`. NaN readings count as infinitely old.
pub fn elapsed_since(now: Millis, then: Millis) -> Millis {
    let dt = now - then;
    if dt.is_nan() { f64::INFINITY } else { dt }
}

/// Whether `then` happened no more than `window` ms before `now`. A `then`
/// later than `now` (a stamp from before a clock rewind) is outside.
pub fn within_window(now: Millis, then: Millis, window: Millis) -> bool {
    let elapsed = elapsed_since(now, then);
    (0.0..=window).contains(&elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_is_outside_every_window() {
        assert!(!within_window(0.0, NEVER, 1.0e12));
        assert!(!within_window(1_000_000.0, NEVER, f64::MAX));
    }

    #[test]
    fn window_is_inclusive() {
        assert!(within_window(200.0, 100.0, 100.0));
        assert!(!within_window(200.1, 100.0, 100.0));
    }

    #[test]
    fn stamp_from_the_future_is_outside() {
        assert!(!within_window(100.0, 1_000.0, 120.0));
        assert!(!within_window(0.0, 0.5, 120.0));
        assert!(within_window(0.5, 0.5, 120.0));
    }

    #[test]
    fn nan_counts_as_stale() {
        assert!(!within_window(f64::NAN, 0.0, 100.0));
        assert!(!within_window(10.0, f64::NAN, 100.0));
    }
}
