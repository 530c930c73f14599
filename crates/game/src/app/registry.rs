use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use engine::Vec2;

use super::events::{PortalBus, PortalEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum ActorId {
    Player1,
    Player2,
}

impl ActorId {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ActorId::Player1 => "player1",
            ActorId::Player2 => "player2",
        }
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ZoneSide {
    A,
    B,
}

impl ZoneSide {
    pub(crate) fn other(self) -> Self {
        match self {
            ZoneSide::A => ZoneSide::B,
            ZoneSide::B => ZoneSide::A,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ZoneSide::A => "zoneA",
            ZoneSide::B => "zoneB",
        }
    }
}

impl fmt::Display for ZoneSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cosmetics {
    pub(crate) texture: &'static str,
    pub(crate) tint: u32,
    pub(crate) half_extents: Vec2,
}

impl Cosmetics {
    pub(crate) fn for_actor(actor_id: ActorId) -> Self {
        match actor_id {
            ActorId::Player1 => Self {
                texture: "star",
                tint: 0xffdd55,
                half_extents: Vec2::new(16.0, 16.0),
            },
            ActorId::Player2 => Self {
                texture: "logo",
                tint: 0x55ddff,
                half_extents: Vec2::new(16.0, 16.0),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ActorState {
    pub(crate) id: ActorId,
    pub(crate) side: ZoneSide,
    pub(crate) position: Vec2,
    pub(crate) cosmetics: Cosmetics,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SpawnRules {
    /// Distance of the arrival point from the shared edge.
    pub(crate) inset: f32,
    /// Vertical offset from the zone center; player1 above, player2 below.
    pub(crate) offset_y: f32,
}

impl Default for SpawnRules {
    fn default() -> Self {
        Self {
            inset: 80.0,
            offset_y: 60.0,
        }
    }
}

const INITIAL_SPREAD_X: f32 = 100.0;

/// The single source of truth for where each actor is.
///
/// Every method takes `&self`: zones call into the registry while the bus is
/// delivering, so no borrow of the actor table is ever held across a publish.
pub(crate) struct ActorRegistry {
    bus: Rc<PortalBus>,
    spawn: SpawnRules,
    actors: RefCell<Vec<ActorState>>,
    initialized: Cell<bool>,
}

impl ActorRegistry {
    pub(crate) fn new(bus: Rc<PortalBus>, spawn: SpawnRules) -> Self {
        Self {
            bus,
            spawn,
            actors: RefCell::new(Vec::new()),
            initialized: Cell::new(false),
        }
    }

    /// Seeds both actors on zone A. Only the first call has any effect.
    pub(crate) fn init(&self, zone_width: f32, zone_height: f32) {
        if self.initialized.replace(true) {
            return;
        }
        let center_x = zone_width * 0.5;
        let center_y = zone_height * 0.5;
        let mut actors = self.actors.borrow_mut();
        for (actor_id, dx) in [
            (ActorId::Player1, -INITIAL_SPREAD_X),
            (ActorId::Player2, INITIAL_SPREAD_X),
        ] {
            actors.push(ActorState {
                id: actor_id,
                side: ZoneSide::A,
                position: Vec2::new(center_x + dx, center_y),
                cosmetics: Cosmetics::for_actor(actor_id),
            });
        }
    }

    pub(crate) fn get(&self, actor_id: ActorId) -> Option<ActorState> {
        self.actors
            .borrow()
            .iter()
            .find(|actor| actor.id == actor_id)
            .cloned()
    }

    pub(crate) fn list_by_side(&self, side: ZoneSide) -> Vec<ActorState> {
        self.actors
            .borrow()
            .iter()
            .filter(|actor| actor.side == side)
            .cloned()
            .collect()
    }

    pub(crate) fn update_position(&self, actor_id: ActorId, x: f32, y: f32) {
        if let Some(actor) = self
            .actors
            .borrow_mut()
            .iter_mut()
            .find(|actor| actor.id == actor_id)
        {
            actor.position = Vec2::new(x, y);
        }
    }

    /// Moves the actor to the other zone: publishes depart, flips the side and
    /// places the actor beside the destination's shared edge, then publishes
    /// arrive with the new state.
    pub(crate) fn transfer(&self, actor_id: ActorId, zone_width: f32, zone_height: f32) {
        let Some(current) = self.get(actor_id) else {
            return;
        };
        let from = current.side;
        let to = from.other();
        let spawn = self.spawn_point(
            actor_id,
            to,
            current.cosmetics.half_extents,
            zone_width,
            zone_height,
        );

        self.bus.publish(&PortalEvent::Depart {
            actor_id,
            side: from,
        });

        let arrived = {
            let mut actors = self.actors.borrow_mut();
            let Some(actor) = actors.iter_mut().find(|actor| actor.id == actor_id) else {
                return;
            };
            actor.side = to;
            actor.position = spawn;
            actor.clone()
        };

        self.bus.publish(&PortalEvent::Arrive(arrived));
    }

    fn spawn_point(
        &self,
        actor_id: ActorId,
        destination: ZoneSide,
        half_extents: Vec2,
        zone_width: f32,
        zone_height: f32,
    ) -> Vec2 {
        let x = match destination {
            ZoneSide::B => self.spawn.inset,
            ZoneSide::A => zone_width - self.spawn.inset,
        };
        let offset = match actor_id {
            ActorId::Player1 => -self.spawn.offset_y,
            ActorId::Player2 => self.spawn.offset_y,
        };
        let y = zone_height * 0.5 + offset;
        Vec2::new(
            clamp_axis(x, half_extents.x, zone_width),
            clamp_axis(y, half_extents.y, zone_height),
        )
    }
}

/// Clamps a center coordinate so a shape of `half` extent stays inside
/// `[0, size]`. A zone smaller than the shape pins it to the middle.
pub(crate) fn clamp_axis(value: f32, half: f32, size: f32) -> f32 {
    let low = half;
    let high = size - half;
    if high < low {
        return size * 0.5;
    }
    value.clamp(low, high)
}
