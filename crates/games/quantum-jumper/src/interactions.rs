//! Overlap handlers for pickups and portals.
//!
//! The host only reports overlaps for enabled bodies, but its event queue
//! can lag a dimension switch by a frame. Every handler therefore asks the
//! controller again before granting anything; an entity that fails the
//! check is left untouched for a later, valid overlap.

use std::fmt;
use std::hash::Hash;

use quantum_core::entity::{Category, Entity, EntityId, EntityKind};
use quantum_core::host::{HostEngine, Millis};
use quantum_core::portal::{Activation, PortalTarget};
use quantum_core::powerup::PowerupEffect;

use crate::level::Level;
use crate::scoring::{CoinAward, coin_award};

/// Result of resolving one overlap.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Coin { entity: EntityId, award: CoinAward },
    Powerup { entity: EntityId, effect: PowerupEffect },
    Portal { entity: EntityId, target: PortalTarget, activation: Activation },
}

/// The entity behind `id`, if registered and live in the current dimension.
fn live_entity<H: Copy + Eq + Hash>(level: &Level<H>, id: EntityId) -> Option<&Entity<H>> {
    level
        .registry
        .get(id)
        .filter(|e| level.controller.is_active(e.dimension))
}

/// Remove a consumable from the registry and the host world in one step.
fn consume<E: HostEngine>(
    level: &mut Level<E::Handle>,
    host: &mut E,
    id: EntityId,
) -> Option<Entity<E::Handle>> {
    let entity = level.registry.remove(id)?;
    host.destroy_entity(entity.handle);
    Some(entity)
}

/// Collect a coin. `None` if it is gone, not a coin, or inactive.
pub fn collect_coin<E: HostEngine>(
    level: &mut Level<E::Handle>,
    host: &mut E,
    id: EntityId,
    bonus_rate: f32,
) -> Option<CoinAward> {
    let entity = live_entity(level, id)?;
    let EntityKind::Collectible { value } = entity.kind else {
        return None;
    };
    let award = coin_award(value, entity.dimension, level.controller.current(), bonus_rate);
    consume(level, host, id)?;
    tracing::debug!(
        entity = id.0,
        points = award.points,
        bonus = award.bonus,
        "Coin collected"
    );
    Some(award)
}

/// Collect a powerup, returning the effect for the caller to apply.
pub fn collect_powerup<E: HostEngine>(
    level: &mut Level<E::Handle>,
    host: &mut E,
    id: EntityId,
) -> Option<PowerupEffect> {
    let entity = live_entity(level, id)?;
    let EntityKind::Powerup { effect } = entity.kind else {
        return None;
    };
    consume(level, host, id)?;
    tracing::debug!(entity = id.0, effect = effect.as_str(), "Powerup collected");
    Some(effect)
}

/// Present an overlap to a portal's guard. `activate` runs only if the
/// portal is live, switched on, and out of cooldown.
pub fn touch_portal<H, F, X>(
    level: &mut Level<H>,
    id: EntityId,
    now: Millis,
    activate: F,
) -> Option<(PortalTarget, Activation)>
where
    H: Copy + Eq + Hash,
    F: FnOnce(&PortalTarget) -> Result<(), X>,
    X: fmt::Display,
{
    live_entity(level, id)?;
    let entity = level.registry.get_mut(id)?;
    let EntityKind::Portal(guard) = &mut entity.kind else {
        return None;
    };
    let activation = guard.try_activate(now, activate);
    Some((guard.target.clone(), activation))
}

/// Dispatch an overlap to the right handler by the entity's kind.
///
/// Portal activations are forwarded to `activate`; coins and powerups are
/// consumed here.
pub fn resolve_overlap<E, F, X>(
    level: &mut Level<E::Handle>,
    host: &mut E,
    id: EntityId,
    now: Millis,
    bonus_rate: f32,
    activate: F,
) -> Option<Interaction>
where
    E: HostEngine,
    F: FnOnce(&PortalTarget) -> Result<(), X>,
    X: fmt::Display,
{
    match level.registry.get(id)?.category() {
        Category::Collectible => collect_coin(level, host, id, bonus_rate)
            .map(|award| Interaction::Coin { entity: id, award }),
        Category::Powerup => collect_powerup(level, host, id)
            .map(|effect| Interaction::Powerup { entity: id, effect }),
        Category::Portal => {
            touch_portal(level, id, now, activate).map(|(target, activation)| {
                Interaction::Portal {
                    entity: id,
                    target,
                    activation,
                }
            })
        },
        Category::Platform => None,
    }
}
