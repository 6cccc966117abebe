//! Keyboard highlight over a result list

/// Highlighted index; arrows wrap around at both ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionCursor {
    active: Option<usize>,
}

impl SelectionCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Forget the highlight (new query or new results)
    pub fn reset(&mut self) {
        self.active = None;
    }

    pub fn down(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return self.active;
        }
        self.active = Some(match self.active {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        });
        self.active
    }

    pub fn up(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return self.active;
        }
        self.active = Some(match self.active {
            Some(i) if i > 0 && i < len => i - 1,
            _ => len - 1,
        });
        self.active
    }

    /// The highlighted entry, if it is still in range
    pub fn pick<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        self.active.and_then(|i| items.get(i))
    }
}
