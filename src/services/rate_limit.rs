use std::time::{Duration, Instant};

use crate::models::Session;

/// Minimum spacing between accepted turns of a single session.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    cooldown: Duration,
}

impl RateLimiter {
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    /// Accepts the turn and stamps the session, or returns how long the caller
    /// still has to wait. A rejected turn leaves the session untouched.
    pub fn check(&self, session: &mut Session, now: Instant) -> Result<(), Duration> {
        if let Some(last) = session.last_turn {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.cooldown {
                return Err(self.cooldown - elapsed);
            }
        }
        session.last_turn = Some(now);
        Ok(())
    }
}

pub fn wait_reply(remaining: Duration) -> String {
    format!(
        "⏳ Please wait {:.1}s before sending another message.",
        remaining.as_secs_f64()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_turn_is_allowed_and_stamped() {
        let limiter = RateLimiter::new(Duration::from_secs(3));
        let mut session = Session::new("s".to_string());
        let now = Instant::now();
        assert!(limiter.check(&mut session, now).is_ok());
        assert_eq!(session.last_turn, Some(now));
    }

    #[test]
    fn test_rapid_turn_rejected_without_restamping() {
        let limiter = RateLimiter::new(Duration::from_secs(3));
        let mut session = Session::new("s".to_string());
        let t0 = Instant::now();
        limiter.check(&mut session, t0).unwrap();

        let remaining = limiter
            .check(&mut session, t0 + Duration::from_secs(1))
            .unwrap_err();
        assert_eq!(remaining, Duration::from_secs(2));
        assert_eq!(session.last_turn, Some(t0));

        assert!(limiter.check(&mut session, t0 + Duration::from_secs(3)).is_ok());
        assert_eq!(session.last_turn, Some(t0 + Duration::from_secs(3)));
    }

    #[test]
    fn test_wait_reply_rounds_to_tenths() {
        assert_eq!(
            wait_reply(Duration::from_millis(1960)),
            "⏳ Please wait 2.0s before sending another message."
        );
    }
}
