use std::collections::HashMap;
use std::fmt;

use quantum_core::player::PlayerState;
use quantum_core::portal::PortalTarget;

/// Why a portal could not move the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    NoNextLevel { current: usize },
    UnknownLevel(usize),
    UnknownHandler(String),
    Handler(String),
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNextLevel { current } => write!(f, "level {current} is the last level"),
            Self::UnknownLevel(index) => write!(f, "no level at index {index}"),
            Self::UnknownHandler(id) => write!(f, "no portal handler registered for {id:?}"),
            Self::Handler(msg) => write!(f, "portal handler failed: {msg}"),
        }
    }
}

impl std::error::Error for TransitionError {}

/// Work a successful portal leaves for the end of the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Load(usize),
    Scene(String),
}

/// Game-defined behavior behind `PortalTarget::Custom`.
pub type PortalHandler = Box<dyn FnMut(&mut PlayerState) -> Result<(), TransitionError>>;

/// Turns portal targets into pending transitions.
#[derive(Default)]
pub struct PortalDirector {
    handlers: HashMap<String, PortalHandler>,
    pending: Option<Transition>,
}

impl PortalDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, handler: PortalHandler) {
        self.handlers.insert(id.into(), handler);
    }

    /// Resolve `target` from level `current` of `level_count`.
    ///
    /// Level loads and scene changes are queued rather than performed, so
    /// the level is never rebuilt while its overlaps are being walked.
    /// Custom handlers run immediately.
    pub fn dispatch(
        &mut self,
        target: &PortalTarget,
        current: usize,
        level_count: usize,
        player: &mut PlayerState,
    ) -> Result<(), TransitionError> {
        match target {
            PortalTarget::AdvanceLevel => {
                let next = current + 1;
                if next >= level_count {
                    return Err(TransitionError::NoNextLevel { current });
                }
                self.pending = Some(Transition::Load(next));
            },
            PortalTarget::Restart => self.pending = Some(Transition::Load(current)),
            PortalTarget::GoToScene(name) => self.pending = Some(Transition::Scene(name.clone())),
            PortalTarget::Custom(id) => {
                let handler = self
                    .handlers
                    .get_mut(id)
                    .ok_or_else(|| TransitionError::UnknownHandler(id.clone()))?;
                handler(player)?;
            },
        }
        Ok(())
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn take_pending(&mut self) -> Option<Transition> {
        self.pending.take()
    }
}

impl fmt::Debug for PortalDirector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalDirector")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("pending", &self.pending)
            .finish()
    }
}
