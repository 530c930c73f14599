use serde::{Deserialize, Serialize};

use super::input::{ActionStates, InputAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SceneKey {
    A,
    B,
}

impl SceneKey {
    pub const ALL: [SceneKey; 2] = [SceneKey::A, SceneKey::B];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    HardResetAll,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    reset_pressed: bool,
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(quit_requested: bool, reset_pressed: bool, actions: ActionStates) -> Self {
        Self {
            quit_requested,
            reset_pressed,
            actions,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn reset_pressed(&self) -> bool {
        self.reset_pressed
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_reset_pressed(mut self, reset_pressed: bool) -> Self {
        self.reset_pressed = reset_pressed;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in scene-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: Vec2::new(center.x - half_extents.x, center.y - half_extents.y),
            max: Vec2::new(center.x + half_extents.x, center.y + half_extents.y),
        }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: Vec2::new(min.x + size.x, min.y + size.y),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(
            (self.max.x - self.min.x) * 0.5,
            (self.max.y - self.min.y) * 0.5,
        )
    }

    /// Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Transform {
    pub position: Vec2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderableKind {
    Placeholder,
    /// Solid rectangle in the given 0xRRGGBB tint. `texture` names the visual
    /// the actor would use once sprites are loaded.
    Tinted { texture: &'static str, tint: u32 },
    Outline { color: u32 },
}

#[derive(Debug, Clone)]
pub struct RenderableDesc {
    pub kind: RenderableKind,
    pub debug_name: &'static str,
    pub half_extents: Vec2,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub transform: Transform,
    pub renderable: RenderableDesc,
    applied_spawn_order: u64,
}

impl Entity {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.transform.position, self.renderable.half_extents)
    }
}

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// The local render objects of one scene. Spawns and despawns are queued and
/// take effect on the next `apply_pending`.
#[derive(Debug, Default)]
pub struct SceneWorld {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    pending_spawns: Vec<Entity>,
    pending_despawns: Vec<EntityId>,
    next_applied_spawn_order: u64,
}

impl SceneWorld {
    pub fn spawn(&mut self, transform: Transform, renderable: RenderableDesc) -> EntityId {
        let id = self.allocator.allocate();
        self.pending_spawns.push(Entity {
            id,
            transform,
            renderable,
            applied_spawn_order: 0,
        });
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> bool {
        let exists_now = self.entities.iter().any(|entity| entity.id == id);
        let pending_spawn = self.pending_spawns.iter().any(|entity| entity.id == id);
        if !exists_now && !pending_spawn {
            return false;
        }
        self.pending_despawns.push(id);
        true
    }

    pub fn apply_pending(&mut self) {
        if !self.pending_spawns.is_empty() {
            for mut entity in self.pending_spawns.drain(..) {
                entity.applied_spawn_order = self.next_applied_spawn_order;
                self.next_applied_spawn_order = self.next_applied_spawn_order.saturating_add(1);
                self.entities.push(entity);
            }
        }

        // Despawns run after spawns so a spawn and despawn queued in the same
        // step cancel out.
        if !self.pending_despawns.is_empty() {
            self.pending_despawns.sort_by_key(|id| id.0);
            self.pending_despawns.dedup();
            let pending = &self.pending_despawns;
            self.entities.retain(|entity| {
                pending
                    .binary_search_by_key(&entity.id.0, |id| id.0)
                    .is_err()
            });
            self.pending_despawns.clear();
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending_spawns.clear();
        self.pending_despawns.clear();
        self.next_applied_spawn_order = 0;
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    /// Entities in the order they were applied; later entries draw on top.
    pub fn draw_order(&self) -> Vec<&Entity> {
        let mut ordered: Vec<&Entity> = self.entities.iter().collect();
        ordered.sort_by_key(|entity| entity.applied_spawn_order);
        ordered
    }
}

/// Capability interface the host drives: `load` on creation, `update` once per
/// fixed tick, `unload` on teardown.
pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand;
    /// Runs once every scene has updated this tick, so a scene can pick up
    /// what another scene's update handed to it before the frame is drawn.
    fn after_tick(&mut self, _world: &mut SceneWorld) {}
    fn unload(&mut self, world: &mut SceneWorld);
    fn clear_color(&self) -> u32 {
        0x14161c
    }
    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        None
    }
}

struct SceneRuntime {
    scene: Box<dyn Scene>,
    world: SceneWorld,
    is_loaded: bool,
}

impl SceneRuntime {
    fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            world: SceneWorld::default(),
            is_loaded: false,
        }
    }

    fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        let (scene, world) = (&mut self.scene, &mut self.world);
        scene.load(world);
        self.is_loaded = true;
    }

    fn unload(&mut self) {
        if !self.is_loaded {
            return;
        }
        let (scene, world) = (&mut self.scene, &mut self.world);
        scene.unload(world);
        self.world.clear();
        self.is_loaded = false;
    }
}

/// Runs both scenes side by side. Every tick updates A then B, each followed by
/// its own `apply_pending`.
pub(crate) struct SceneMachine {
    scene_a: SceneRuntime,
    scene_b: SceneRuntime,
}

impl SceneMachine {
    pub(crate) fn new(scene_a: Box<dyn Scene>, scene_b: Box<dyn Scene>) -> Self {
        Self {
            scene_a: SceneRuntime::new(scene_a),
            scene_b: SceneRuntime::new(scene_b),
        }
    }

    pub(crate) fn load_all(&mut self) {
        for key in SceneKey::ALL {
            let runtime = self.runtime_mut(key);
            runtime.load();
            runtime.world.apply_pending();
        }
    }

    /// Returns the scenes that were torn down and recreated this tick.
    pub(crate) fn update_all(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
    ) -> Vec<SceneKey> {
        let mut reset_requested = false;
        for key in SceneKey::ALL {
            let runtime = self.runtime_mut(key);
            if !runtime.is_loaded {
                continue;
            }
            let command = {
                let (scene, world) = (&mut runtime.scene, &mut runtime.world);
                scene.update(fixed_dt_seconds, input, world)
            };
            runtime.world.apply_pending();
            reset_requested |= command == SceneCommand::HardResetAll;
        }

        for key in SceneKey::ALL {
            let runtime = self.runtime_mut(key);
            if !runtime.is_loaded {
                continue;
            }
            let (scene, world) = (&mut runtime.scene, &mut runtime.world);
            scene.after_tick(world);
            world.apply_pending();
        }

        if !reset_requested {
            return Vec::new();
        }
        for key in SceneKey::ALL {
            self.hard_reset(key);
        }
        SceneKey::ALL.to_vec()
    }

    /// Tears the scene down and loads it again in place.
    pub(crate) fn hard_reset(&mut self, key: SceneKey) {
        let runtime = self.runtime_mut(key);
        runtime.unload();
        runtime.load();
        runtime.world.apply_pending();
    }

    pub(crate) fn shutdown_all(&mut self) {
        for key in SceneKey::ALL {
            self.runtime_mut(key).unload();
        }
    }

    pub(crate) fn world(&self, key: SceneKey) -> &SceneWorld {
        &self.runtime_ref(key).world
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self, key: SceneKey) -> &mut SceneWorld {
        &mut self.runtime_mut(key).world
    }

    #[cfg(test)]
    pub(crate) fn is_loaded(&self, key: SceneKey) -> bool {
        self.runtime_ref(key).is_loaded
    }

    pub(crate) fn clear_color(&self, key: SceneKey) -> u32 {
        self.runtime_ref(key).scene.clear_color()
    }

    pub(crate) fn total_entity_count(&self) -> usize {
        SceneKey::ALL
            .iter()
            .map(|key| self.world(*key).entity_count())
            .sum()
    }

    pub(crate) fn debug_title(&self) -> Option<String> {
        let parts: Vec<String> = SceneKey::ALL
            .iter()
            .filter_map(|key| {
                let runtime = self.runtime_ref(*key);
                runtime.scene.debug_title(&runtime.world)
            })
            .collect();
        (!parts.is_empty()).then(|| parts.join(" | "))
    }

    fn runtime_mut(&mut self, key: SceneKey) -> &mut SceneRuntime {
        match key {
            SceneKey::A => &mut self.scene_a,
            SceneKey::B => &mut self.scene_b,
        }
    }

    fn runtime_ref(&self, key: SceneKey) -> &SceneRuntime {
        match key {
            SceneKey::A => &self.scene_a,
            SceneKey::B => &self.scene_b,
        }
    }
}
