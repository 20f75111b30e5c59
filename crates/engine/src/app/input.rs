#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Interact,
    Observe,
    Retreat,
    ContinueDialogue,
    ToggleOverlay,
    Quit,
}

const ACTION_COUNT: usize = 10;

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
            InputAction::Interact => 4,
            InputAction::Observe => 5,
            InputAction::Retreat => 6,
            InputAction::ContinueDialogue => 7,
            InputAction::ToggleOverlay => 8,
            InputAction::Quit => 9,
        }
    }
}

/// Turns a held key into a single-tick press edge.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct EdgeLatch {
    is_down: bool,
    pressed_edge: bool,
}

impl EdgeLatch {
    pub(crate) fn set_down(&mut self, is_down: bool) {
        if is_down && !self.is_down {
            self.pressed_edge = true;
        }
        self.is_down = is_down;
    }

    pub(crate) fn take_pressed(&mut self) -> bool {
        let was_pressed = self.pressed_edge;
        self.pressed_edge = false;
        was_pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_indices_are_unique() {
        let all = [
            InputAction::MoveUp,
            InputAction::MoveDown,
            InputAction::MoveLeft,
            InputAction::MoveRight,
            InputAction::Interact,
            InputAction::Observe,
            InputAction::Retreat,
            InputAction::ContinueDialogue,
            InputAction::ToggleOverlay,
            InputAction::Quit,
        ];
        let mut seen = [false; ACTION_COUNT];
        for action in all {
            assert!(!seen[action.index()], "duplicate index for {action:?}");
            seen[action.index()] = true;
        }
        assert!(seen.iter().all(|flag| *flag));
    }

    #[test]
    fn latch_fires_once_per_press() {
        let mut latch = EdgeLatch::default();
        latch.set_down(true);
        assert!(latch.take_pressed());
        latch.set_down(true);
        assert!(!latch.take_pressed());
        latch.set_down(false);
        assert!(!latch.take_pressed());
        latch.set_down(true);
        assert!(latch.take_pressed());
    }
}
