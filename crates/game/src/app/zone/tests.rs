    use engine::{InputAction, TopicEvent};

    use super::bindings::DirectionKeys;
    use super::*;
    use crate::app::registry::{ActorState, Cosmetics, SpawnRules};

    const ZONE_W: f32 = 640.0;
    const ZONE_H: f32 = 720.0;

    struct Harness {
        bus: Rc<PortalBus>,
        registry: Rc<ActorRegistry>,
        zone_a: ZoneScene,
        world_a: SceneWorld,
        zone_b: ZoneScene,
        world_b: SceneWorld,
        log: Rc<RefCell<Vec<PortalEvent>>>,
    }

    impl Harness {
        fn new() -> Self {
            Self::build(KeyBindings::standard(), SpawnRules::default())
        }

        fn with_bindings(bindings: KeyBindings) -> Self {
            Self::build(bindings, SpawnRules::default())
        }

        fn with_spawn(spawn: SpawnRules) -> Self {
            Self::build(KeyBindings::standard(), spawn)
        }

        fn build(bindings: KeyBindings, spawn: SpawnRules) -> Self {
            let bus = Rc::new(PortalBus::new());
            let registry = Rc::new(ActorRegistry::new(Rc::clone(&bus), spawn));
            let log = Rc::new(RefCell::new(Vec::new()));
            let recorder = bus.allocate_owner();
            for topic in [PortalTopic::PlayerDepart, PortalTopic::PlayerArrive] {
                let log = Rc::clone(&log);
                bus.subscribe(topic, recorder, move |event: &PortalEvent| {
                    log.borrow_mut().push(event.clone());
                });
            }

            let zone = |side| {
                ZoneScene::new(
                    side,
                    Vec2::new(ZONE_W, ZONE_H),
                    ZoneTuning::default(),
                    bindings.clone(),
                    Rc::clone(&registry),
                    Rc::clone(&bus),
                )
            };
            let mut harness = Self {
                zone_a: zone(ZoneSide::A),
                zone_b: zone(ZoneSide::B),
                world_a: SceneWorld::default(),
                world_b: SceneWorld::default(),
                bus,
                registry,
                log,
            };
            harness.zone_a.load(&mut harness.world_a);
            harness.world_a.apply_pending();
            harness.zone_b.load(&mut harness.world_b);
            harness.world_b.apply_pending();
            harness
        }

        /// One host tick the way `SceneMachine` runs it: both updates, then
        /// both `after_tick` hooks, each followed by `apply_pending`.
        fn tick(
            &mut self,
            dt: f32,
            input_a: &InputSnapshot,
            input_b: &InputSnapshot,
        ) -> (SceneCommand, SceneCommand) {
            let command_a = self.zone_a.update(dt, input_a, &mut self.world_a);
            self.world_a.apply_pending();
            let command_b = self.zone_b.update(dt, input_b, &mut self.world_b);
            self.world_b.apply_pending();
            self.zone_a.after_tick(&mut self.world_a);
            self.world_a.apply_pending();
            self.zone_b.after_tick(&mut self.world_b);
            self.world_b.apply_pending();
            (command_a, command_b)
        }

        fn reload(&mut self, side: ZoneSide) {
            let (zone, world) = match side {
                ZoneSide::A => (&mut self.zone_a, &mut self.world_a),
                ZoneSide::B => (&mut self.zone_b, &mut self.world_b),
            };
            zone.unload(world);
            zone.load(world);
            world.apply_pending();
        }

        fn state(&self, actor_id: ActorId) -> ActorState {
            self.registry.get(actor_id).expect("actor seeded")
        }
    }

    fn actors_in(world: &SceneWorld) -> Vec<(&'static str, Vec2)> {
        world
            .entities()
            .iter()
            .filter(|entity| entity.renderable.debug_name != "portal")
            .map(|entity| (entity.renderable.debug_name, entity.transform.position))
            .collect()
    }

    fn pressing(actions: &[InputAction]) -> InputSnapshot {
        let mut snapshot = InputSnapshot::empty();
        for action in actions {
            snapshot = snapshot.with_action_down(*action, true);
        }
        snapshot
    }

    fn assert_vec2_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual.x - expected.x).abs() <= 1e-3 && (actual.y - expected.y).abs() <= 1e-3,
            "{actual:?} vs {expected:?}"
        );
    }

    #[test]
    fn both_actors_start_in_zone_a() {
        let harness = Harness::new();

        let mut names: Vec<&str> = actors_in(&harness.world_a)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        names.sort_unstable();
        assert_eq!(names, vec!["player1", "player2"]);
        assert!(actors_in(&harness.world_b).is_empty());
        assert_eq!(
            harness.zone_a.debug_title(&harness.world_a).as_deref(),
            Some("zoneA: 2")
        );
        assert_eq!(
            harness.zone_b.debug_title(&harness.world_b).as_deref(),
            Some("zoneB: 0")
        );
    }

    #[test]
    fn player1_walking_into_zone_a_portal_is_handed_to_zone_b() {
        let mut harness = Harness::new();

        harness.tick(
            5.0,
            &pressing(&[InputAction::MoveRight]),
            &InputSnapshot::empty(),
        );

        let events = harness.log.borrow().clone();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            PortalEvent::Depart {
                actor_id: ActorId::Player1,
                side: ZoneSide::A,
            }
        );
        assert_eq!(events[1].topic(), PortalTopic::PlayerArrive);

        let player1 = harness.state(ActorId::Player1);
        assert_eq!(player1.side, ZoneSide::B);
        assert_vec2_close(player1.position, Vec2::new(80.0, ZONE_H * 0.5 - 60.0));

        let in_a = actors_in(&harness.world_a);
        assert_eq!(in_a.len(), 1);
        assert_eq!(in_a[0].0, "player2");
        let in_b = actors_in(&harness.world_b);
        assert_eq!(in_b.len(), 1);
        assert_eq!(in_b[0].0, "player1");
        assert_vec2_close(in_b[0].1, Vec2::new(80.0, ZONE_H * 0.5 - 60.0));
    }

    #[test]
    fn arrival_point_does_not_bounce_back_through_destination_portal() {
        let mut harness = Harness::new();
        harness.tick(
            5.0,
            &pressing(&[InputAction::MoveRight]),
            &InputSnapshot::empty(),
        );

        for _ in 0..10 {
            harness.tick(1.0 / 60.0, &InputSnapshot::empty(), &InputSnapshot::empty());
        }

        assert_eq!(harness.log.borrow().len(), 2);
        assert_eq!(harness.state(ActorId::Player1).side, ZoneSide::B);
    }

    #[test]
    fn smallest_accepted_spawn_inset_still_clears_the_portal() {
        // 40px portal plus a 16px half footprint.
        let mut harness = Harness::with_spawn(SpawnRules {
            inset: 56.0,
            offset_y: 60.0,
        });
        harness.tick(
            5.0,
            &pressing(&[InputAction::MoveRight]),
            &InputSnapshot::empty(),
        );
        assert_vec2_close(
            harness.state(ActorId::Player1).position,
            Vec2::new(56.0, ZONE_H * 0.5 - 60.0),
        );

        for _ in 0..10 {
            harness.tick(1.0 / 60.0, &InputSnapshot::empty(), &InputSnapshot::empty());
        }

        assert_eq!(harness.log.borrow().len(), 2);
        assert_eq!(harness.state(ActorId::Player1).side, ZoneSide::B);
        assert_eq!(actors_in(&harness.world_b).len(), 1);
    }

    #[test]
    fn actor_sent_back_from_zone_b_is_in_zone_a_world_by_end_of_tick() {
        let mut harness = Harness::new();
        harness.tick(
            5.0,
            &pressing(&[InputAction::MoveRight]),
            &InputSnapshot::empty(),
        );

        harness.tick(
            5.0,
            &InputSnapshot::empty(),
            &pressing(&[InputAction::MoveLeft]),
        );

        let player1 = actors_in(&harness.world_a)
            .into_iter()
            .find(|(name, _)| *name == "player1")
            .expect("player1 drawn in zone A");
        assert_vec2_close(player1.1, Vec2::new(ZONE_W - 80.0, ZONE_H * 0.5 - 60.0));
        assert!(actors_in(&harness.world_b).is_empty());
        assert_eq!(
            harness.zone_a.debug_title(&harness.world_a).as_deref(),
            Some("zoneA: 2")
        );
    }

    #[test]
    fn both_actors_crossing_in_one_tick_transfer_once_each() {
        let mut harness = Harness::new();

        harness.tick(
            5.0,
            &pressing(&[InputAction::MoveRight, InputAction::ArrowRight]),
            &InputSnapshot::empty(),
        );

        let events = harness.log.borrow().clone();
        assert_eq!(events.len(), 4);
        let departs = events
            .iter()
            .filter(|event| event.topic() == PortalTopic::PlayerDepart)
            .count();
        assert_eq!(departs, 2);
        assert_eq!(harness.state(ActorId::Player1).side, ZoneSide::B);
        assert_eq!(harness.state(ActorId::Player2).side, ZoneSide::B);
        assert!(actors_in(&harness.world_a).is_empty());
        assert_eq!(actors_in(&harness.world_b).len(), 2);
    }

    #[test]
    fn round_trip_returns_actor_beside_zone_a_portal() {
        let mut harness = Harness::new();
        harness.tick(
            5.0,
            &pressing(&[InputAction::MoveRight]),
            &InputSnapshot::empty(),
        );

        harness.tick(
            5.0,
            &InputSnapshot::empty(),
            &pressing(&[InputAction::MoveLeft]),
        );

        let player1 = harness.state(ActorId::Player1);
        assert_eq!(player1.side, ZoneSide::A);
        assert_vec2_close(player1.position, Vec2::new(ZONE_W - 80.0, ZONE_H * 0.5 - 60.0));
        assert!(actors_in(&harness.world_b).is_empty());
        assert_eq!(actors_in(&harness.world_a).len(), 2);
        assert_eq!(harness.log.borrow().len(), 4);
    }

    #[test]
    fn diagonal_input_moves_at_axial_speed() {
        let mut harness = Harness::new();
        let start = harness.state(ActorId::Player1).position;

        harness.tick(
            0.1,
            &pressing(&[InputAction::MoveUp, InputAction::MoveLeft]),
            &InputSnapshot::empty(),
        );

        let end = harness.state(ActorId::Player1).position;
        let travelled = ((end.x - start.x).powi(2) + (end.y - start.y).powi(2)).sqrt();
        assert!((travelled - 20.0).abs() < 1e-3, "travelled {travelled}");
        assert!(end.x < start.x && end.y < start.y);
    }

    #[test]
    fn actor_pushed_into_a_corner_stops_at_half_footprint() {
        let mut harness = Harness::new();

        harness.tick(
            100.0,
            &pressing(&[InputAction::MoveUp, InputAction::MoveLeft]),
            &InputSnapshot::empty(),
        );

        assert_eq!(harness.state(ActorId::Player1).position, Vec2::new(16.0, 16.0));
        let player1 = actors_in(&harness.world_a)
            .into_iter()
            .find(|(name, _)| *name == "player1")
            .expect("player1 entity");
        assert_eq!(player1.1, Vec2::new(16.0, 16.0));
    }

    #[test]
    fn each_actor_follows_only_its_own_keys() {
        let mut harness = Harness::new();
        let player1_start = harness.state(ActorId::Player1).position;
        let player2_start = harness.state(ActorId::Player2).position;

        harness.tick(
            0.1,
            &pressing(&[InputAction::ArrowDown]),
            &InputSnapshot::empty(),
        );

        assert_eq!(harness.state(ActorId::Player1).position, player1_start);
        assert_vec2_close(
            harness.state(ActorId::Player2).position,
            Vec2::new(player2_start.x, player2_start.y + 20.0),
        );
    }

    #[test]
    fn actor_without_binding_stays_put() {
        let bindings = KeyBindings::default().with(
            ActorId::Player1,
            DirectionKeys {
                up: InputAction::MoveUp,
                down: InputAction::MoveDown,
                left: InputAction::MoveLeft,
                right: InputAction::MoveRight,
            },
        );
        let mut harness = Harness::with_bindings(bindings);
        let player2_start = harness.state(ActorId::Player2).position;

        harness.tick(
            1.0,
            &pressing(&[InputAction::ArrowLeft, InputAction::ArrowUp]),
            &InputSnapshot::empty(),
        );

        assert_eq!(harness.state(ActorId::Player2).position, player2_start);
    }

    #[test]
    fn duplicate_arrival_creates_no_second_object() {
        let mut harness = Harness::new();
        let player2 = harness.state(ActorId::Player2);

        harness.bus.publish(&PortalEvent::Arrive(player2));
        harness.tick(1.0 / 60.0, &InputSnapshot::empty(), &InputSnapshot::empty());

        assert_eq!(actors_in(&harness.world_a).len(), 2);
        assert!(actors_in(&harness.world_b).is_empty());
    }

    #[test]
    fn departure_for_an_absent_actor_is_ignored() {
        let mut harness = Harness::new();

        harness.bus.publish(&PortalEvent::Depart {
            actor_id: ActorId::Player1,
            side: ZoneSide::B,
        });
        harness.tick(1.0 / 60.0, &InputSnapshot::empty(), &InputSnapshot::empty());

        assert_eq!(actors_in(&harness.world_a).len(), 2);
        assert!(actors_in(&harness.world_b).is_empty());
    }

    #[test]
    fn events_published_after_teardown_do_not_touch_the_zone() {
        let mut harness = Harness::new();
        assert_eq!(harness.bus.subscriber_count(PortalTopic::PlayerArrive), 3);

        harness.zone_b.unload(&mut harness.world_b);
        assert_eq!(harness.bus.subscriber_count(PortalTopic::PlayerArrive), 2);
        assert_eq!(harness.bus.subscriber_count(PortalTopic::PlayerDepart), 2);

        harness.bus.publish(&PortalEvent::Arrive(ActorState {
            id: ActorId::Player1,
            side: ZoneSide::B,
            position: Vec2::new(80.0, 300.0),
            cosmetics: Cosmetics::for_actor(ActorId::Player1),
        }));

        assert_eq!(
            harness.zone_b.debug_title(&harness.world_b).as_deref(),
            Some("zoneB: 0")
        );
        assert_eq!(harness.world_b.entity_count(), 0);
    }

    #[test]
    fn every_topic_republished_after_teardown_skips_the_torn_down_zone() {
        let mut harness = Harness::new();
        let player1 = harness.state(ActorId::Player1);

        harness.zone_a.unload(&mut harness.world_a);
        assert_eq!(harness.world_a.entity_count(), 0);

        // Only the recorder and zone B are left on the actor topics.
        let delivered_depart = harness.bus.publish(&PortalEvent::Depart {
            actor_id: ActorId::Player1,
            side: ZoneSide::A,
        });
        let delivered_arrive = harness.bus.publish(&PortalEvent::Arrive(player1));
        let delivered_count = harness.bus.publish(&PortalEvent::DisplayCount(5));
        harness.zone_a.after_tick(&mut harness.world_a);

        assert_eq!(delivered_depart, 2);
        assert_eq!(delivered_arrive, 2);
        assert_eq!(delivered_count, 0);
        assert_eq!(
            harness.zone_a.debug_title(&harness.world_a).as_deref(),
            Some("zoneA: 0")
        );
        assert_eq!(harness.world_a.entity_count(), 0);
        assert!(actors_in(&harness.world_b).is_empty());
        assert_eq!(harness.state(ActorId::Player1).side, ZoneSide::A);
    }

    #[test]
    fn unload_despawns_actors_and_portal_from_the_zone_world() {
        let mut harness = Harness::new();
        assert_eq!(harness.world_a.entity_count(), 3);
        assert_eq!(harness.world_b.entity_count(), 1);

        harness.zone_a.unload(&mut harness.world_a);
        harness.zone_b.unload(&mut harness.world_b);

        assert_eq!(harness.world_a.entity_count(), 0);
        assert_eq!(harness.world_b.entity_count(), 0);
        assert_eq!(harness.bus.subscriber_count(PortalTopic::PlayerDepart), 1);
        assert_eq!(harness.bus.subscriber_count(PortalTopic::PlayerArrive), 1);
    }

    #[test]
    fn reset_key_requests_hard_reset_of_both_zones() {
        let mut harness = Harness::new();
        let reset = InputSnapshot::empty().with_reset_pressed(true);

        let (command_a, command_b) = harness.tick(1.0 / 60.0, &reset, &reset);

        assert_eq!(command_a, SceneCommand::HardResetAll);
        assert_eq!(command_b, SceneCommand::HardResetAll);
    }

    #[test]
    fn recreated_zone_resubscribes_with_fresh_owner_and_keeps_registry_state() {
        let mut harness = Harness::new();
        harness.tick(
            5.0,
            &pressing(&[InputAction::MoveRight]),
            &InputSnapshot::empty(),
        );
        let first_owner_b = harness.zone_b.owner.expect("loaded");

        harness.reload(ZoneSide::A);
        harness.reload(ZoneSide::B);

        let second_owner_b = harness.zone_b.owner.expect("reloaded");
        assert_ne!(first_owner_b, second_owner_b);
        assert_eq!(harness.bus.subscriber_count(PortalTopic::PlayerDepart), 3);
        assert_eq!(harness.bus.subscriber_count(PortalTopic::PlayerArrive), 3);

        let in_b = actors_in(&harness.world_b);
        assert_eq!(in_b.len(), 1);
        assert_vec2_close(in_b[0].1, Vec2::new(80.0, ZONE_H * 0.5 - 60.0));
        assert_eq!(actors_in(&harness.world_a).len(), 1);

        // The recreated zone still hands actors over.
        harness.tick(
            5.0,
            &InputSnapshot::empty(),
            &pressing(&[InputAction::MoveLeft]),
        );
        assert_eq!(harness.state(ActorId::Player1).side, ZoneSide::A);
    }

    #[test]
    fn init_from_a_second_zone_does_not_reseed() {
        let mut harness = Harness::new();
        harness.tick(
            0.5,
            &pressing(&[InputAction::MoveDown]),
            &InputSnapshot::empty(),
        );
        let moved = harness.state(ActorId::Player1).position;

        harness.reload(ZoneSide::A);

        assert_eq!(harness.state(ActorId::Player1).position, moved);
    }

    #[test]
    fn portal_sits_flush_against_the_shared_edge() {
        let harness = Harness::new();

        let portal_a = harness.zone_a.portal_rect();
        assert_eq!(portal_a.min, Vec2::new(ZONE_W - 40.0, 300.0));
        assert_eq!(portal_a.max, Vec2::new(ZONE_W, 420.0));

        let portal_b = harness.zone_b.portal_rect();
        assert_eq!(portal_b.min, Vec2::new(0.0, 300.0));
        assert_eq!(portal_b.max, Vec2::new(40.0, 420.0));
    }

    #[test]
    fn each_zone_has_its_own_clear_color() {
        let harness = Harness::new();
        assert_eq!(harness.zone_a.clear_color(), 0x113377);
        assert_eq!(harness.zone_b.clear_color(), 0x772211);
    }
