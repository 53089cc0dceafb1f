#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusAction {
    FocusSearch,
    AlreadyFocused,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFocus {
    focused: bool,
}

impl SearchFocus {
    /// Shells report focus changes they make themselves (clicks, tabbing).
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn on_hotkey(&mut self) -> FocusAction {
        if self.focused {
            return FocusAction::AlreadyFocused;
        }
        self.focused = true;
        FocusAction::FocusSearch
    }

    pub fn on_escape(&mut self) -> bool {
        if self.focused {
            self.focused = false;
            return true;
        }
        false
    }
}
