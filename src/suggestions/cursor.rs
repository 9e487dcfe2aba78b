//! Keyboard selection over a suggestion list.

/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Selected index into a list of `len` entries. `None` means nothing is
/// selected (the text box itself has focus).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuggestionCursor {
    selected: Option<usize>,
}

impl SuggestionCursor {
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: None }
    }

    #[must_use]
    pub const fn selected(self) -> Option<usize> {
        self.selected
    }

    /// Selection as a signed index where -1 means none.
    #[must_use]
    pub fn as_index(self) -> isize {
        self.selected
            .and_then(|i| isize::try_from(i).ok())
            .unwrap_or(-1)
    }

    pub fn reset(&mut self) {
        self.selected = None;
    }

    /// Move within `len` entries, wrapping at both ends.
    pub fn step(&mut self, direction: Direction, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        let last = len - 1;
        self.selected = Some(match (direction, self.selected) {
            (Direction::Down, Some(i)) if i < last => i + 1,
            (Direction::Down, _) => 0,
            (Direction::Up, Some(i)) if i > 0 && i <= last => i - 1,
            (Direction::Up, _) => last,
        });
    }

    /// Keep the selection inside a list that just changed length.
    pub fn clamp(&mut self, len: usize) {
        if self.selected.is_some_and(|i| i >= len) {
            self.selected = None;
        }
    }
}
