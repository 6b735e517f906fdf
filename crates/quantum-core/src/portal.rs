use std::fmt;

use serde::{Deserialize, Serialize};

use crate::host::Millis;

/// Default re-trigger window for portals.
pub const DEFAULT_PORTAL_COOLDOWN_MS: Millis = 1000;

/// What a portal does when the player passes through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "name")]
pub enum PortalTarget {
    AdvanceLevel,
    GoToScene(String),
    Restart,
    /// Resolved against handlers registered on the scene.
    Custom(String),
}

impl fmt::Display for PortalTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdvanceLevel => f.write_str("advance-level"),
            Self::GoToScene(name) => write!(f, "go-to-scene({name})"),
            Self::Restart => f.write_str("restart"),
            Self::Custom(id) => write!(f, "custom({id})"),
        }
    }
}

/// Observable guard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Inactive,
    Ready,
    Cooldown,
}

/// Outcome of presenting an overlap to the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Portal is switched off.
    Ignored,
    /// Still inside the window since the last trigger.
    CoolingDown,
    /// The activation ran and succeeded.
    Fired,
    /// The activation ran and failed. The cooldown was still committed.
    Failed(String),
}

/// Per-portal cooldown state machine.
///
/// `Ready -> Cooldown` on overlap, recording the timestamp before the
/// activation runs. `Cooldown -> Ready` is evaluated lazily on the next
/// overlap. `Inactive` ignores everything until `set_active(true)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalGuard {
    pub active: bool,
    pub target: PortalTarget,
    pub last_activated_at: Option<Millis>,
    pub cooldown_ms: Millis,
}

impl PortalGuard {
    pub fn new(target: PortalTarget, active: bool, cooldown_ms: Millis) -> Self {
        Self {
            active,
            target,
            last_activated_at: None,
            cooldown_ms,
        }
    }

    pub fn state(&self, now: Millis) -> GuardState {
        if !self.active {
            return GuardState::Inactive;
        }
        match self.last_activated_at {
            Some(at) if now.saturating_sub(at) < self.cooldown_ms => GuardState::Cooldown,
            _ => GuardState::Ready,
        }
    }

    /// Toggle the portal at runtime. Cooldown state is left untouched.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Present an overlap at time `now`.
    ///
    /// When ready, commits `last_activated_at = now` and only then invokes
    /// `activate`. An error from `activate` is logged and swallowed so a
    /// misbehaving target cannot crash the session or be retried every
    /// frame.
    pub fn try_activate<F, E>(&mut self, now: Millis, activate: F) -> Activation
    where
        F: FnOnce(&PortalTarget) -> Result<(), E>,
        E: fmt::Display,
    {
        match self.state(now) {
            GuardState::Inactive => Activation::Ignored,
            GuardState::Cooldown => Activation::CoolingDown,
            GuardState::Ready => {
                self.last_activated_at = Some(now);
                match activate(&self.target) {
                    Ok(()) => {
                        tracing::info!(portal = %self.target, "Portal activated");
                        Activation::Fired
                    },
                    Err(e) => {
                        tracing::warn!(portal = %self.target, "Portal activation failed: {e}");
                        Activation::Failed(e.to_string())
                    },
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_guard(active: bool) -> PortalGuard {
        PortalGuard::new(PortalTarget::AdvanceLevel, active, 1000)
    }

    #[test]
    fn overlaps_inside_window_fire_once() {
        let mut guard = counting_guard(true);
        let mut calls = 0;
        for now in [5000, 5500, 5999] {
            guard.try_activate(now, |_| {
                calls += 1;
                Ok::<(), String>(())
            });
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn overlaps_at_window_boundary_fire_twice() {
        let mut guard = counting_guard(true);
        let mut calls = 0;
        for now in [5000, 6000] {
            guard.try_activate(now, |_| {
                calls += 1;
                Ok::<(), String>(())
            });
        }
        assert_eq!(calls, 2);
    }

    #[test]
    fn inactive_portal_never_fires() {
        let mut guard = counting_guard(false);
        let mut calls = 0;
        for now in (0..20).map(|i| i * 700) {
            let outcome = guard.try_activate(now, |_| {
                calls += 1;
                Ok::<(), String>(())
            });
            assert_eq!(outcome, Activation::Ignored);
        }
        assert_eq!(calls, 0);
        assert_eq!(guard.last_activated_at, None);
    }

    #[test]
    fn failed_activation_still_commits_cooldown() {
        let mut guard = counting_guard(true);
        let outcome = guard.try_activate(100, |_| Err("boom"));
        assert_eq!(outcome, Activation::Failed("boom".to_string()));
        assert_eq!(guard.last_activated_at, Some(100));
        assert_eq!(guard.state(500), GuardState::Cooldown);
        assert_eq!(
            guard.try_activate(500, |_| Err("boom")),
            Activation::CoolingDown
        );
    }

    #[test]
    fn reactivation_preserves_cooldown() {
        let mut guard = counting_guard(true);
        guard.try_activate(0, |_| Ok::<(), String>(()));
        guard.set_active(false);
        assert_eq!(guard.state(10), GuardState::Inactive);
        guard.set_active(true);
        assert_eq!(guard.state(10), GuardState::Cooldown);
        assert_eq!(guard.state(1000), GuardState::Ready);
    }

    #[test]
    fn activation_sees_target() {
        let mut guard = PortalGuard::new(PortalTarget::GoToScene("menu".into()), true, 1000);
        let mut seen = None;
        guard.try_activate(0, |t| {
            seen = Some(t.clone());
            Ok::<(), String>(())
        });
        assert_eq!(seen, Some(PortalTarget::GoToScene("menu".into())));
    }
}
