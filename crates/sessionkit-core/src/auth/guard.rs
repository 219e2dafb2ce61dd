use std::sync::Arc;

use tracing::debug;

use super::persistence::PersistenceBridge;
use super::session::SessionHandle;
use crate::config::Config;
use crate::navigation::Navigator;

/// Outcome of a guard evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Navigation denied; the navigator has been sent to this route.
    Redirect(String),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Check run before every navigation to a protected destination.
///
/// This is the one place where a persisted token is adopted into an empty
/// session. It never writes to the persistence bridge.
pub struct RouteGuard {
    session: SessionHandle,
    bridge: Arc<PersistenceBridge>,
    navigator: Arc<dyn Navigator>,
    config: Arc<Config>,
}

impl RouteGuard {
    pub fn new(
        config: Arc<Config>,
        session: SessionHandle,
        bridge: Arc<PersistenceBridge>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            session,
            bridge,
            navigator,
            config,
        }
    }

    pub fn evaluate(&self, destination: &str) -> GuardDecision {
        if self.config.is_public_route(destination) {
            return GuardDecision::Allow;
        }
        if self.session.is_authenticated() {
            return GuardDecision::Allow;
        }

        match self.bridge.read() {
            Some(token) => {
                self.session.adopt_token(token);
                debug!(destination, "Session restored from persisted token");
                GuardDecision::Allow
            }
            None => {
                debug!(destination, "No session, redirecting to login");
                self.navigator.navigate_to(&self.config.login_route);
                GuardDecision::Redirect(self.config.login_route.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::clock::ManualClock;
    use crate::auth::persistence::MemoryTokenSlot;
    use crate::models::User;
    use crate::navigation::HistoryNavigator;
    use chrono::Duration;
    use std::time::Duration as StdDuration;

    struct Fixture {
        guard: RouteGuard,
        session: SessionHandle,
        bridge: Arc<PersistenceBridge>,
        navigator: Arc<HistoryNavigator>,
        clock: Arc<ManualClock>,
    }

    fn fixture() -> Fixture {
        let session = SessionHandle::new();
        let clock = Arc::new(ManualClock::default());
        let bridge = Arc::new(PersistenceBridge::with_clock(
            Box::new(MemoryTokenSlot::new()),
            clock.clone(),
        ));
        let navigator = Arc::new(HistoryNavigator::new());
        let guard = RouteGuard::new(
            Arc::new(Config::default()),
            session.clone(),
            bridge.clone(),
            navigator.clone(),
        );
        Fixture {
            guard,
            session,
            bridge,
            navigator,
            clock,
        }
    }

    #[test]
    fn test_denies_when_nothing_is_held() {
        let f = fixture();
        let decision = f.guard.evaluate("/dashboard");
        assert_eq!(decision, GuardDecision::Redirect("/login".to_string()));
        assert_eq!(f.navigator.history(), vec!["/login"]);
        assert!(!f.session.is_authenticated());
    }

    #[test]
    fn test_adopts_persisted_token() {
        let f = fixture();
        f.bridge.write("T", StdDuration::from_secs(3600)).unwrap();

        assert!(f.guard.evaluate("/dashboard").is_allowed());
        assert_eq!(f.session.token().as_deref(), Some("T"));
        assert_eq!(f.session.user(), None);
        assert_eq!(f.navigator.count(), 0);
    }

    #[test]
    fn test_expired_persisted_token_is_ignored() {
        let f = fixture();
        f.bridge.write("T", StdDuration::from_secs(3600)).unwrap();
        f.clock.advance(Duration::hours(2));

        assert!(!f.guard.evaluate("/dashboard").is_allowed());
        assert_eq!(f.session.token(), None);
    }

    #[test]
    fn test_live_session_is_kept() {
        let f = fixture();
        f.session.establish("live".to_string(), User::default());
        f.bridge.write("other", StdDuration::from_secs(3600)).unwrap();

        assert!(f.guard.evaluate("/settings").is_allowed());
        assert_eq!(f.session.token().as_deref(), Some("live"));
    }

    #[test]
    fn test_public_routes_skip_the_check() {
        let f = fixture();
        assert!(f.guard.evaluate("/login").is_allowed());
        assert_eq!(f.navigator.count(), 0);
    }
}
