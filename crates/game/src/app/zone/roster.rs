use engine::{EntityId, RenderableDesc, RenderableKind, SceneWorld, Transform, Vec2};

use crate::app::registry::{ActorId, ActorState, Cosmetics};

/// One actor as this zone currently holds it. `entity` stays `None` until the
/// next world sync materializes it.
#[derive(Debug, Clone)]
pub(crate) struct LocalActor {
    pub(crate) actor_id: ActorId,
    pub(crate) cosmetics: Cosmetics,
    pub(crate) position: Vec2,
    pub(crate) entity: Option<EntityId>,
}

/// The zone's presence set. Bus handlers write here while the zone itself may
/// be mid-update, so the entity changes are queued and applied to the
/// `SceneWorld` by `sync_into`.
#[derive(Debug, Default)]
pub(crate) struct ZoneRoster {
    present: Vec<LocalActor>,
    doomed: Vec<EntityId>,
}

impl ZoneRoster {
    pub(crate) fn is_present(&self, actor_id: ActorId) -> bool {
        self.present.iter().any(|actor| actor.actor_id == actor_id)
    }

    /// Returns false when the actor is already here; the arrival is dropped.
    pub(crate) fn arrive(&mut self, state: &ActorState) -> bool {
        if self.is_present(state.id) {
            return false;
        }
        self.present.push(LocalActor {
            actor_id: state.id,
            cosmetics: state.cosmetics,
            position: state.position,
            entity: None,
        });
        true
    }

    /// Returns false when the actor was not here.
    pub(crate) fn depart(&mut self, actor_id: ActorId) -> bool {
        let Some(index) = self
            .present
            .iter()
            .position(|actor| actor.actor_id == actor_id)
        else {
            return false;
        };
        let removed = self.present.remove(index);
        if let Some(entity) = removed.entity {
            self.doomed.push(entity);
        }
        true
    }

    #[cfg(test)]
    pub(crate) fn present(&self) -> &[LocalActor] {
        &self.present
    }

    pub(crate) fn present_mut(&mut self) -> &mut [LocalActor] {
        &mut self.present
    }

    pub(crate) fn len(&self) -> usize {
        self.present.len()
    }

    /// Empties the roster and despawns every entity it ever put in `world`.
    pub(crate) fn release(&mut self, world: &mut SceneWorld) {
        let live = self.present.drain(..).filter_map(|actor| actor.entity);
        for entity in self.doomed.drain(..).chain(live) {
            world.despawn(entity);
        }
        world.apply_pending();
    }

    /// Despawns departed actors and spawns entities for new arrivals.
    pub(crate) fn sync_into(&mut self, world: &mut SceneWorld) {
        for entity in self.doomed.drain(..) {
            world.despawn(entity);
        }
        for actor in self.present.iter_mut().filter(|actor| actor.entity.is_none()) {
            actor.entity = Some(world.spawn(
                Transform {
                    position: actor.position,
                },
                actor_renderable(actor.actor_id, actor.cosmetics),
            ));
        }
        world.apply_pending();
    }
}

fn actor_renderable(actor_id: ActorId, cosmetics: Cosmetics) -> RenderableDesc {
    RenderableDesc {
        kind: RenderableKind::Tinted {
            texture: cosmetics.texture,
            tint: cosmetics.tint,
        },
        debug_name: actor_id.as_str(),
        half_extents: cosmetics.half_extents,
    }
}
