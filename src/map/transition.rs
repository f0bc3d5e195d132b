use crate::config::PinAnimation;
use std::time::Duration;

/// Cubic ease-in-out, the default easing for scene transitions
#[inline]
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// A scalar animated from `from` to `to`, starting `delay` after the scene is ready.
/// Fire-and-forget: the value is a pure function of elapsed time.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub from: f64,
    pub to: f64,
    pub delay: Duration,
    pub duration: Duration,
}

impl Transition {
    pub fn new(animation: &PinAnimation) -> Self {
        Self {
            from: animation.from,
            to: animation.to,
            delay: animation.delay,
            duration: animation.duration,
        }
    }

    /// Value at `elapsed` since the scene became ready
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        if elapsed < self.delay {
            return self.from;
        }
        let t = if self.duration.is_zero() {
            1.0
        } else {
            ((elapsed - self.delay).as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        self.from + (self.to - self.from) * ease_cubic_in_out(t)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.delay + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;

    fn pin() -> Transition {
        Transition::new(&MapConfig::default().pin)
    }

    #[test]
    fn test_zero_before_delay() {
        let t = pin();
        assert_eq!(t.value_at(Duration::ZERO), 0.0);
        assert_eq!(t.value_at(Duration::from_millis(399)), 0.0);
        assert_eq!(t.value_at(Duration::from_millis(400)), 0.0);
    }

    #[test]
    fn test_grows_during_transition() {
        let t = pin();
        let mid = t.value_at(Duration::from_millis(800));
        assert!((mid - 0.375).abs() < 1e-9);
        let early = t.value_at(Duration::from_millis(500));
        assert!(early > 0.0 && early < mid);
        assert!(!t.is_finished(Duration::from_millis(1199)));
    }

    #[test]
    fn test_settles_at_three_quarters() {
        let t = pin();
        assert_eq!(t.value_at(Duration::from_millis(1200)), 0.75);
        assert_eq!(t.value_at(Duration::from_secs(10)), 0.75);
        assert!(t.is_finished(Duration::from_millis(1200)));
    }

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
    }
}
