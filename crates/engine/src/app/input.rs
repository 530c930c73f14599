/// Raw key state the host samples every tick. WASD drive the `Move*` actions
/// and the arrow keys drive the `Arrow*` actions, in every scene alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Quit,
}

const ACTION_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::ArrowUp => 4,
            InputAction::ArrowDown => 5,
            InputAction::ArrowLeft => 6,
            InputAction::ArrowRight => 7,
            InputAction::Quit => 8,
        }
    }
}
