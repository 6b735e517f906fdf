use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use quantum_core::controller::DimensionController;
use quantum_core::dimension::{Dimension, DimensionTag};
use quantum_core::entity::EntityId;
use quantum_core::host::{GridCell, HostEngine};
use quantum_core::portal::PortalTarget;
use quantum_core::powerup::PowerupEffect;
use quantum_core::registry::EntityRegistry;

use crate::builders::{CoinBuilder, PlatformBuilder, PortalBuilder, PowerupBuilder, Spawner};

/// A loaded level: its entities and the dimension controller that filters
/// them. Both are discarded on level transition.
#[derive(Debug, Clone)]
pub struct Level<H> {
    pub name: String,
    pub spawn: GridCell,
    pub registry: EntityRegistry<H>,
    pub controller: DimensionController,
}

impl<H: Copy + Eq + Hash> Level<H> {
    pub fn new(name: impl Into<String>, spawn: GridCell, initial: Dimension) -> Self {
        Self {
            name: name.into(),
            spawn,
            registry: EntityRegistry::new(),
            controller: DimensionController::new(initial),
        }
    }
}

/// Errors while reading level authoring data.
#[derive(Debug)]
pub enum LevelError {
    Parse(toml::de::Error),
    UnknownBuiltin(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "invalid level layout: {e}"),
            Self::UnknownBuiltin(name) => write!(f, "no built-in level named {name:?}"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::UnknownBuiltin(_) => None,
        }
    }
}

impl From<toml::de::Error> for LevelError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

/// Horizontal run of platform cells starting at (`col`, `row`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformRun {
    pub col: i32,
    pub row: i32,
    #[serde(default = "one")]
    pub width: u32,
    #[serde(default)]
    pub dimension: Option<String>,
    #[serde(default = "yes")]
    pub solid: bool,
    #[serde(default)]
    pub breakable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSpec {
    pub col: i32,
    pub row: i32,
    #[serde(default)]
    pub dimension: Option<String>,
    /// Falls back to the configured default coin value.
    #[serde(default)]
    pub value: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerupSpec {
    pub col: i32,
    pub row: i32,
    #[serde(default)]
    pub dimension: Option<String>,
    #[serde(default)]
    pub effect: PowerupEffect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalSpec {
    pub col: i32,
    pub row: i32,
    #[serde(default)]
    pub dimension: Option<String>,
    #[serde(default = "yes")]
    pub active: bool,
    pub target: PortalTarget,
}

fn one() -> u32 {
    1
}

fn yes() -> bool {
    true
}

/// Static level authoring data.
///
/// Dimension tags are kept as raw strings here and resolved exactly once,
/// in [`LevelLayout::build`], where anything missing or unknown becomes
/// `Both`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub name: String,
    pub spawn: GridCell,
    #[serde(default)]
    pub platforms: Vec<PlatformRun>,
    #[serde(default)]
    pub coins: Vec<CoinSpec>,
    #[serde(default)]
    pub powerups: Vec<PowerupSpec>,
    #[serde(default)]
    pub portals: Vec<PortalSpec>,
}

const BUILTIN_LEVELS: &[(&str, &str)] = &[
    ("first-steps", include_str!("../levels/first_steps.toml")),
    ("shifting-bridges", include_str!("../levels/shifting_bridges.toml")),
    ("twilight-tower", include_str!("../levels/twilight_tower.toml")),
];

impl LevelLayout {
    pub fn from_toml(content: &str) -> Result<Self, LevelError> {
        Ok(toml::from_str(content)?)
    }

    /// Look up one of the embedded levels by key.
    pub fn builtin(key: &str) -> Result<Self, LevelError> {
        let (_, content) = BUILTIN_LEVELS
            .iter()
            .find(|(k, _)| *k == key)
            .ok_or_else(|| LevelError::UnknownBuiltin(key.to_string()))?;
        Self::from_toml(content)
    }

    /// Keys of the embedded levels, in play order.
    pub fn builtin_keys() -> impl Iterator<Item = &'static str> {
        BUILTIN_LEVELS.iter().map(|(k, _)| *k)
    }

    /// Every embedded level, in play order.
    pub fn builtin_campaign() -> Result<Vec<Self>, LevelError> {
        Self::builtin_keys().map(Self::builtin).collect()
    }

    /// Populate `spawner.level` by calling the builders in authoring order:
    /// platforms, coins, powerups, portals.
    pub fn build<E: HostEngine>(
        &self,
        spawner: &mut Spawner<'_, E>,
        default_coin_value: u32,
    ) -> Vec<EntityId> {
        let mut ids = Vec::new();
        for run in &self.platforms {
            let Ok(width) = i32::try_from(run.width) else {
                tracing::warn!(
                    level = %self.name,
                    col = run.col,
                    row = run.row,
                    width = run.width,
                    "Platform run too wide, skipped"
                );
                continue;
            };
            let tag = DimensionTag::resolve(run.dimension.as_deref());
            for dx in 0..width {
                ids.push(
                    PlatformBuilder::new()
                        .at(run.col + dx, run.row)
                        .dimension(tag)
                        .solid(run.solid)
                        .breakable(run.breakable)
                        .spawn(spawner),
                );
            }
        }
        for coin in &self.coins {
            ids.push(
                CoinBuilder::new(coin.value.unwrap_or(default_coin_value))
                    .at(coin.col, coin.row)
                    .dimension(DimensionTag::resolve(coin.dimension.as_deref()))
                    .spawn(spawner),
            );
        }
        for powerup in &self.powerups {
            ids.push(
                PowerupBuilder::new(powerup.effect)
                    .at(powerup.col, powerup.row)
                    .dimension(DimensionTag::resolve(powerup.dimension.as_deref()))
                    .spawn(spawner),
            );
        }
        for portal in &self.portals {
            ids.push(
                PortalBuilder::new(portal.target.clone())
                    .at(portal.col, portal.row)
                    .dimension(DimensionTag::resolve(portal.dimension.as_deref()))
                    .active(portal.active)
                    .spawn(spawner),
            );
        }
        tracing::debug!(level = %self.name, entities = ids.len(), "Level layout built");
        ids
    }
}
