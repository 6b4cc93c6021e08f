use shared::protocol::{StatusUpdate, NO_HANDS_LINE};

/// Combines the two debounced hand states into wire lines, suppressing
/// consecutive duplicates. The comparison is on the encoded string, so the
/// encoder's fixed field order is what makes suppression sound.
#[derive(Default)]
pub struct Aggregator {
    last_line: Option<String>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line to emit for this frame's state, or `None` when nothing changed.
    /// The no-hands sentinel is emitted once per transition into the
    /// no-hands state; at startup, before anything was emitted, the
    /// no-hands state is already current and produces nothing.
    pub fn push(&mut self, update: &StatusUpdate) -> Option<String> {
        let line = update.encode();

        if self.last_line.as_deref() == Some(line.as_str()) {
            return None;
        }
        if line == NO_HANDS_LINE && self.last_line.is_none() {
            self.last_line = Some(line);
            return None;
        }

        self.last_line = Some(line.clone());
        Some(line)
    }
}
