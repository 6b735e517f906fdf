pub mod builders;
pub mod config;
pub mod effects;
pub mod interactions;
pub mod level;
pub mod procgen;
pub mod scoring;
pub mod transition;

use serde::{Deserialize, Serialize};

use quantum_core::dimension::Dimension;
use quantum_core::entity::{EntityId, EntityKind};
use quantum_core::events::GameEvent;
use quantum_core::host::{HostEngine, Millis, OverlapGroup, Position};
use quantum_core::player::PlayerState;
use quantum_core::portal::Activation;

use builders::{PlayerBuilder, Spawner, portal_texture};
use config::JumperConfig;
use effects::{EffectOutcome, EffectState, PlayerModifiers};
use interactions::Interaction;
use level::{Level, LevelError, LevelLayout};
use transition::{PortalDirector, PortalHandler, Transition, TransitionError};

/// What the host observed during one frame.
#[derive(Debug, Clone)]
pub struct FrameReport<H> {
    /// Handles the player overlapped this frame, in delivery order.
    pub overlaps: Vec<H>,
    /// Where physics left the player, if it moved.
    pub player_position: Option<Position>,
    /// The player dropped below the world.
    pub fell_out: bool,
}

impl<H> Default for FrameReport<H> {
    fn default() -> Self {
        Self {
            overlaps: Vec::new(),
            player_position: None,
            fell_out: false,
        }
    }
}

impl<H> FrameReport<H> {
    pub fn overlapping(overlaps: Vec<H>) -> Self {
        Self {
            overlaps,
            ..Self::default()
        }
    }
}

/// Discrete player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputAction {
    SwitchDimension,
    SetDimension(Dimension),
    /// Reload the current level, or start a new run after game over.
    Restart,
}

/// The Quantum Jumper scene: owns the host, the loaded level and the
/// player, and drives create / input / update / teardown.
pub struct QuantumJumper<E: HostEngine> {
    host: E,
    config: JumperConfig,
    levels: Vec<LevelLayout>,
    level_index: usize,
    level: Option<Level<E::Handle>>,
    player: PlayerState,
    player_handle: Option<E::Handle>,
    effects: EffectState,
    director: PortalDirector,
    game_over: bool,
}

impl<E: HostEngine> QuantumJumper<E> {
    pub fn new(host: E, config: JumperConfig, levels: Vec<LevelLayout>) -> Self {
        let player = PlayerState::new(Position::default(), config.starting_lives);
        Self {
            host,
            config,
            levels,
            level_index: 0,
            level: None,
            player,
            player_handle: None,
            effects: EffectState::new(),
            director: PortalDirector::new(),
            game_over: false,
        }
    }

    /// A scene over the embedded campaign levels.
    pub fn with_campaign(host: E, config: JumperConfig) -> Result<Self, LevelError> {
        Ok(Self::new(host, config, LevelLayout::builtin_campaign()?))
    }

    pub fn host(&self) -> &E {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut E {
        &mut self.host
    }

    pub fn config(&self) -> &JumperConfig {
        &self.config
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn player_handle(&self) -> Option<E::Handle> {
        self.player_handle
    }

    pub fn modifiers(&self) -> &PlayerModifiers {
        &self.effects.modifiers
    }

    pub fn effects(&self) -> &EffectState {
        &self.effects
    }

    pub fn level(&self) -> Option<&Level<E::Handle>> {
        self.level.as_ref()
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn current_dimension(&self) -> Option<Dimension> {
        self.level.as_ref().map(|l| l.controller.current())
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Register the behavior behind `PortalTarget::Custom(id)`.
    pub fn register_portal_handler(&mut self, id: impl Into<String>, handler: PortalHandler) {
        self.director.register(id, handler);
    }

    /// Switch a portal of the loaded level on or off and swap its texture.
    /// Returns `false` if `id` is not a portal in the current level.
    pub fn set_portal_active(&mut self, id: EntityId, active: bool) -> bool {
        let Some(entity) = self.level.as_mut().and_then(|l| l.registry.get_mut(id)) else {
            return false;
        };
        let EntityKind::Portal(guard) = &mut entity.kind else {
            return false;
        };
        guard.set_active(active);
        self.host
            .set_texture(entity.handle, &portal_texture(active, entity.dimension));
        tracing::debug!(entity = id.0, active, "Portal toggled");
        true
    }

    /// Build level `index`, replacing whatever is loaded.
    ///
    /// The previous registry and controller are discarded; the new level
    /// starts in the configured initial dimension with the policy applied
    /// to every entity before this returns. The player is spawned on first
    /// create and moved to the level spawn afterwards.
    pub fn create(&mut self, index: usize) -> Result<Vec<GameEvent>, TransitionError> {
        if index >= self.levels.len() {
            return Err(TransitionError::UnknownLevel(index));
        }
        self.unload_level();

        let layout = &self.levels[index];
        let mut level = Level::new(
            layout.name.clone(),
            layout.spawn,
            self.config.initial_dimension,
        );
        {
            let mut spawner = Spawner::new(
                &mut self.host,
                &mut level,
                self.config.cell_size,
                self.config.portal_cooldown_ms,
            );
            layout.build(&mut spawner, self.config.default_coin_value);
        }
        level.controller.reapply(&level.registry, &mut self.host);

        let spawn = level.spawn.to_world(self.config.cell_size);
        match self.player_handle {
            Some(handle) => self.host.set_position(handle, spawn),
            None => {
                let (handle, state) = PlayerBuilder::new(self.config.starting_lives)
                    .at_position(spawn)
                    .spawn(&mut self.host);
                for group in [
                    OverlapGroup::Platforms,
                    OverlapGroup::Collectibles,
                    OverlapGroup::Powerups,
                    OverlapGroup::Portals,
                ] {
                    self.host.register_overlap(OverlapGroup::Player, group);
                }
                self.player_handle = Some(handle);
                self.player = state;
            },
        }
        self.player.position = spawn;
        self.level_index = index;

        tracing::info!(
            index,
            name = %level.name,
            entities = level.registry.len(),
            dimension = %level.controller.current(),
            "Level loaded"
        );
        let event = GameEvent::LevelLoaded {
            index,
            name: level.name.clone(),
        };
        self.level = Some(level);
        Ok(vec![event])
    }

    /// Handle a discrete input. Only `Restart` is accepted after game over.
    pub fn handle_input(&mut self, action: InputAction) -> Vec<GameEvent> {
        if action == InputAction::Restart {
            return self.restart();
        }
        if self.game_over {
            return Vec::new();
        }
        let Some(level) = self.level.as_mut() else {
            return Vec::new();
        };
        let event = match action {
            InputAction::SwitchDimension => {
                level.controller.switch_dimension(&level.registry, &mut self.host)
            },
            InputAction::SetDimension(d) => {
                level
                    .controller
                    .set_dimension(d, &level.registry, &mut self.host)
            },
            InputAction::Restart => return Vec::new(),
        };
        vec![event]
    }

    /// Per-frame hook.
    ///
    /// Order: expire timed effects, sync the player, resolve falling out,
    /// resolve overlaps, then run any transition a portal queued.
    pub fn update(&mut self, report: &FrameReport<E::Handle>) -> Vec<GameEvent> {
        let now = self.host.now();
        let mut events: Vec<GameEvent> = self
            .effects
            .expire_due(now)
            .into_iter()
            .map(|effect| GameEvent::EffectExpired { effect })
            .collect();

        if self.game_over || self.level.is_none() {
            return events;
        }
        if let Some(position) = report.player_position {
            self.player.position = position;
        }
        let below_world = report
            .player_position
            .is_some_and(|p| p.y > self.config.fall_out_y);
        if report.fell_out || below_world {
            self.player_fell(&mut events);
        }
        self.process_overlaps(&report.overlaps, now, &mut events);

        if let Some(transition) = self.director.take_pending() {
            self.apply_transition(transition, &mut events);
        }
        events
    }

    /// Destroy every host object this scene created.
    pub fn teardown(&mut self) {
        self.unload_level();
        if let Some(handle) = self.player_handle.take() {
            self.host.destroy_entity(handle);
        }
        self.effects.reset();
        self.director.take_pending();
    }

    fn unload_level(&mut self) {
        if let Some(mut level) = self.level.take() {
            for entity in level.registry.drain() {
                self.host.destroy_entity(entity.handle);
            }
        }
    }

    fn restart(&mut self) -> Vec<GameEvent> {
        let index = if self.game_over {
            self.game_over = false;
            self.effects.reset();
            self.player.lives = self.config.starting_lives;
            self.player.score = 0;
            0
        } else {
            self.level_index
        };
        match self.create(index) {
            Ok(mut events) => {
                events.push(GameEvent::LivesChanged {
                    lives: self.player.lives,
                });
                events
            },
            Err(e) => {
                tracing::warn!("Restart failed: {e}");
                Vec::new()
            },
        }
    }

    fn process_overlaps(&mut self, overlaps: &[E::Handle], now: Millis, events: &mut Vec<GameEvent>) {
        let Some(level) = self.level.as_mut() else {
            return;
        };
        let level_index = self.level_index;
        let level_count = self.levels.len();

        for &handle in overlaps {
            // A queued level change makes the rest of this frame's overlaps stale.
            if self.game_over || self.director.has_pending() {
                break;
            }
            let Some(id) = level.registry.id_for_handle(handle) else {
                continue;
            };
            let before = (self.player.score, self.player.lives);
            let director = &mut self.director;
            let player = &mut self.player;
            let interaction = interactions::resolve_overlap(
                level,
                &mut self.host,
                id,
                now,
                self.config.coin_bonus_rate,
                |target| director.dispatch(target, level_index, level_count, player),
            );

            match interaction {
                Some(Interaction::Coin { entity, award }) => {
                    self.player.add_score(award.total());
                    events.push(GameEvent::CoinCollected {
                        entity,
                        points: award.points,
                        bonus: award.bonus,
                    });
                    events.push(GameEvent::ScoreUpdate {
                        score: self.player.score,
                    });
                },
                Some(Interaction::Powerup { entity, effect }) => {
                    events.push(GameEvent::PowerupCollected { entity, effect });
                    let outcome = self
                        .effects
                        .apply(effect, &mut self.player, now, &self.config);
                    match outcome {
                        EffectOutcome::LifeGained { lives } => {
                            events.push(GameEvent::LivesChanged { lives });
                        },
                        EffectOutcome::LifeLost { lives } => {
                            events.push(GameEvent::LivesChanged { lives });
                            if lives == 0 {
                                self.game_over = true;
                                events.push(GameEvent::GameOver);
                            }
                        },
                        EffectOutcome::Applied
                        | EffectOutcome::Shrunk
                        | EffectOutcome::Blocked => {},
                    }
                },
                Some(Interaction::Portal {
                    entity,
                    target,
                    activation,
                }) => {
                    if activation == Activation::Fired {
                        events.push(GameEvent::PortalActivated { entity, target });
                    }
                    // Custom handlers may touch the player even when they fail.
                    if self.player.score != before.0 {
                        events.push(GameEvent::ScoreUpdate {
                            score: self.player.score,
                        });
                    }
                    if self.player.lives != before.1 {
                        events.push(GameEvent::LivesChanged {
                            lives: self.player.lives,
                        });
                        if self.player.lives == 0 {
                            self.game_over = true;
                            events.push(GameEvent::GameOver);
                        }
                    }
                },
                None => {},
            }
        }
        if self.game_over {
            tracing::info!(score = self.player.score, "Game over");
        }
    }

    /// Falling out of the world costs a life regardless of modifiers.
    fn player_fell(&mut self, events: &mut Vec<GameEvent>) {
        let lives = self.player.lose_life();
        self.effects.modifiers.grown = false;
        events.push(GameEvent::LivesChanged { lives });
        if lives == 0 {
            self.game_over = true;
            events.push(GameEvent::GameOver);
            tracing::info!(score = self.player.score, "Game over");
            return;
        }
        if let Some(level) = &self.level {
            let spawn = level.spawn.to_world(self.config.cell_size);
            self.player.position = spawn;
            if let Some(handle) = self.player_handle {
                self.host.set_position(handle, spawn);
            }
        }
    }

    fn apply_transition(&mut self, transition: Transition, events: &mut Vec<GameEvent>) {
        match transition {
            Transition::Load(index) => match self.create(index) {
                Ok(loaded) => events.extend(loaded),
                Err(e) => tracing::warn!("Level transition failed: {e}"),
            },
            Transition::Scene(name) => {
                tracing::info!(scene = %name, "Scene change requested");
                events.push(GameEvent::SceneRequested { name });
            },
        }
    }
}
