use engine::{InputAction, InputSnapshot};

use crate::app::registry::ActorId;

/// Directional keys for one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DirectionKeys {
    pub(crate) up: InputAction,
    pub(crate) down: InputAction,
    pub(crate) left: InputAction,
    pub(crate) right: InputAction,
}

impl DirectionKeys {
    /// Unit-less axis input: x right-positive, y down-positive.
    pub(crate) fn axes(&self, input: &InputSnapshot) -> (f32, f32) {
        let axis = |negative: InputAction, positive: InputAction| {
            let mut value = 0.0;
            if input.is_down(negative) {
                value -= 1.0;
            }
            if input.is_down(positive) {
                value += 1.0;
            }
            value
        };
        (axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Actor-to-keys table shared by both zones.
#[derive(Debug, Clone, Default)]
pub(crate) struct KeyBindings {
    entries: Vec<(ActorId, DirectionKeys)>,
}

impl KeyBindings {
    pub(crate) fn standard() -> Self {
        Self::default()
            .with(
                ActorId::Player1,
                DirectionKeys {
                    up: InputAction::MoveUp,
                    down: InputAction::MoveDown,
                    left: InputAction::MoveLeft,
                    right: InputAction::MoveRight,
                },
            )
            .with(
                ActorId::Player2,
                DirectionKeys {
                    up: InputAction::ArrowUp,
                    down: InputAction::ArrowDown,
                    left: InputAction::ArrowLeft,
                    right: InputAction::ArrowRight,
                },
            )
    }

    pub(crate) fn with(mut self, actor_id: ActorId, keys: DirectionKeys) -> Self {
        self.entries.retain(|(id, _)| *id != actor_id);
        self.entries.push((actor_id, keys));
        self
    }

    pub(crate) fn lookup(&self, actor_id: ActorId) -> Option<&DirectionKeys> {
        self.entries
            .iter()
            .find(|(id, _)| *id == actor_id)
            .map(|(_, keys)| keys)
    }
}
