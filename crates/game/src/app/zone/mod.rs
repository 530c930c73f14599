use std::cell::RefCell;
use std::rc::Rc;

use engine::{
    Aabb, EntityId, HandlerId, InputSnapshot, OwnerId, RenderableDesc, RenderableKind, Scene,
    SceneCommand, SceneWorld, Transform, Vec2,
};
use tracing::info;

use super::events::{PortalBus, PortalEvent, PortalTopic};
use super::registry::{ActorId, ActorRegistry, ZoneSide};

mod bindings;
mod motion;
mod roster;

pub(crate) use bindings::KeyBindings;
use motion::step_position;
use roster::ZoneRoster;

const PORTAL_OUTLINE_COLOR: u32 = 0xf0f0f0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ZoneTuning {
    pub(crate) move_speed: f32,
    pub(crate) portal_size: Vec2,
}

impl Default for ZoneTuning {
    fn default() -> Self {
        Self {
            move_speed: 200.0,
            portal_size: Vec2::new(40.0, 120.0),
        }
    }
}

/// One zone's simulation. Holds render objects for the actors the registry
/// places on its side and hands actors that touch its portal to the other zone.
pub(crate) struct ZoneScene {
    side: ZoneSide,
    zone_size: Vec2,
    tuning: ZoneTuning,
    bindings: KeyBindings,
    registry: Rc<ActorRegistry>,
    bus: Rc<PortalBus>,
    roster: Rc<RefCell<ZoneRoster>>,
    owner: Option<OwnerId>,
    subscriptions: Vec<(PortalTopic, HandlerId)>,
    portal_entity: Option<EntityId>,
}

impl ZoneScene {
    pub(crate) fn new(
        side: ZoneSide,
        zone_size: Vec2,
        tuning: ZoneTuning,
        bindings: KeyBindings,
        registry: Rc<ActorRegistry>,
        bus: Rc<PortalBus>,
    ) -> Self {
        Self {
            side,
            zone_size,
            tuning,
            bindings,
            registry,
            bus,
            roster: Rc::new(RefCell::new(ZoneRoster::default())),
            owner: None,
            subscriptions: Vec::new(),
            portal_entity: None,
        }
    }

    /// Vertically centered and flush against the edge shared with the other
    /// zone.
    pub(crate) fn portal_rect(&self) -> Aabb {
        let size = self.tuning.portal_size;
        let min_x = match self.side {
            ZoneSide::A => self.zone_size.x - size.x,
            ZoneSide::B => 0.0,
        };
        let min_y = (self.zone_size.y - size.y) * 0.5;
        Aabb::from_min_size(Vec2::new(min_x, min_y), size)
    }

    fn subscribe_handlers(&mut self, owner: OwnerId) {
        let side = self.side;

        let roster = Rc::clone(&self.roster);
        let depart = self
            .bus
            .subscribe(PortalTopic::PlayerDepart, owner, move |event| {
                if let PortalEvent::Depart {
                    actor_id,
                    side: from,
                } = event
                {
                    if *from == side {
                        roster.borrow_mut().depart(*actor_id);
                    }
                }
            });

        let roster = Rc::clone(&self.roster);
        let arrive = self
            .bus
            .subscribe(PortalTopic::PlayerArrive, owner, move |event| {
                if let PortalEvent::Arrive(state) = event {
                    if state.side == side {
                        roster.borrow_mut().arrive(state);
                    }
                }
            });

        self.subscriptions = vec![
            (PortalTopic::PlayerDepart, depart),
            (PortalTopic::PlayerArrive, arrive),
        ];
    }

    fn spawn_portal_marker(&self, world: &mut SceneWorld) -> EntityId {
        let rect = self.portal_rect();
        world.spawn(
            Transform {
                position: rect.center(),
            },
            RenderableDesc {
                kind: RenderableKind::Outline {
                    color: PORTAL_OUTLINE_COLOR,
                },
                debug_name: "portal",
                half_extents: rect.half_extents(),
            },
        )
    }

    /// Moves every present actor and returns those now touching the portal.
    /// The roster holds each actor once, so no actor is listed twice.
    fn integrate_motion(
        &self,
        dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> Vec<ActorId> {
        let portal = self.portal_rect();
        let mut crossing = Vec::new();
        let mut roster = self.roster.borrow_mut();
        for actor in roster.present_mut() {
            if let Some(keys) = self.bindings.lookup(actor.actor_id) {
                actor.position = step_position(
                    actor.position,
                    keys.axes(input),
                    self.tuning.move_speed,
                    dt_seconds,
                    actor.cosmetics.half_extents,
                    self.zone_size,
                );
            }
            if let Some(entity) = actor.entity.and_then(|id| world.find_entity_mut(id)) {
                entity.transform.position = actor.position;
            }
            self.registry.update_position(actor.actor_id, actor.position.x, actor.position.y);

            let bounds = Aabb::from_center(actor.position, actor.cosmetics.half_extents);
            if bounds.intersects(&portal) {
                crossing.push(actor.actor_id);
            }
        }
        crossing
    }

    fn send_through_portal(&self, actor_id: ActorId, world: &mut SceneWorld) {
        // Local removal first; the depart event that follows finds nothing here.
        {
            let mut roster = self.roster.borrow_mut();
            roster.depart(actor_id);
            roster.sync_into(world);
        }
        self.registry.transfer(actor_id, self.zone_size.x, self.zone_size.y);
        info!(
            actor = %actor_id,
            from = %self.side,
            to = %self.side.other(),
            "actor_transferred"
        );
    }
}

impl Scene for ZoneScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.registry.init(self.zone_size.x, self.zone_size.y);
        self.roster = Rc::new(RefCell::new(ZoneRoster::default()));

        let owner = self.bus.allocate_owner();
        self.owner = Some(owner);
        self.subscribe_handlers(owner);

        let actor_count = {
            let mut roster = self.roster.borrow_mut();
            for state in self.registry.list_by_side(self.side) {
                roster.arrive(&state);
            }
            roster.sync_into(world);
            roster.len()
        };
        let portal = self.spawn_portal_marker(world);
        world.apply_pending();
        self.portal_entity = Some(portal);

        info!(
            zone = %self.side,
            owner = owner.0,
            actor_count,
            portal_entity = portal.0,
            "zone_loaded"
        );
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        if input.reset_pressed() {
            return SceneCommand::HardResetAll;
        }

        self.roster.borrow_mut().sync_into(world);

        let crossing = self.integrate_motion(fixed_dt_seconds, input, world);
        for actor_id in crossing {
            self.send_through_portal(actor_id, world);
        }

        SceneCommand::None
    }

    fn after_tick(&mut self, world: &mut SceneWorld) {
        self.roster.borrow_mut().sync_into(world);
    }

    fn unload(&mut self, world: &mut SceneWorld) {
        // Handlers go before anything else so no event reaches a half torn-down zone.
        if let Some(owner) = self.owner.take() {
            for (topic, handler_id) in self.subscriptions.drain(..) {
                self.bus.unsubscribe(topic, handler_id, owner);
            }
        }
        self.roster.borrow_mut().release(world);
        if let Some(portal) = self.portal_entity.take() {
            world.despawn(portal);
            world.apply_pending();
        }
        info!(zone = %self.side, "zone_unloaded");
    }

    fn clear_color(&self) -> u32 {
        match self.side {
            ZoneSide::A => 0x113377,
            ZoneSide::B => 0x772211,
        }
    }

    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        Some(format!("{}: {}", self.side, self.roster.borrow().len()))
    }
}
