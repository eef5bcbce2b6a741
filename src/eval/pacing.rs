//! Courtesy delay between evaluation requests.

use std::time::Duration;

/// Delay inserted after each evaluated case.
///
/// The default waits one second after every case, including the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause after each case.
    pub delay: Duration,
    /// Whether the pause also follows the final case.
    pub after_last: bool,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            after_last: true,
        }
    }
}

impl Pacing {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// No pause at all.
    pub fn none() -> Self {
        Self {
            delay: Duration::ZERO,
            after_last: false,
        }
    }

    pub fn after_last(mut self, enabled: bool) -> Self {
        self.after_last = enabled;
        self
    }

    /// Whether to pause after the case at `index` out of `total`.
    pub fn should_pause(&self, index: usize, total: usize) -> bool {
        if self.delay.is_zero() {
            return false;
        }
        index + 1 < total || self.after_last
    }

    /// Pause after the case at `index` if the policy calls for it.
    pub async fn pause(&self, index: usize, total: usize) {
        if self.should_pause(index, total) {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pauses_after_every_case() {
        let pacing = Pacing::default();
        assert_eq!(pacing.delay, Duration::from_secs(1));
        assert!(pacing.should_pause(0, 3));
        assert!(pacing.should_pause(2, 3));
    }

    #[test]
    fn can_skip_trailing_pause() {
        let pacing = Pacing::default().after_last(false);
        assert!(pacing.should_pause(1, 3));
        assert!(!pacing.should_pause(2, 3));
    }

    #[test]
    fn none_never_pauses() {
        let pacing = Pacing::none();
        assert!(!pacing.should_pause(0, 5));
    }
}
