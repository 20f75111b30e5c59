use std::collections::VecDeque;

const MAX_QUEUED_LINES: usize = 8;

/// FIFO of narrative lines with at most one line on screen.
#[derive(Debug, Clone, Default)]
pub(crate) struct DialogueSequencer {
    current: Option<&'static str>,
    queue: VecDeque<&'static str>,
    shown_ticks: u32,
    auto_advance_ticks: Option<u32>,
}

impl DialogueSequencer {
    pub(crate) fn new(auto_advance_ticks: Option<u32>) -> Self {
        Self {
            auto_advance_ticks: auto_advance_ticks.filter(|ticks| *ticks > 0),
            ..Self::default()
        }
    }

    /// Ignores a line already on screen or waiting. A full queue drops its
    /// oldest line.
    pub(crate) fn push(&mut self, line: &'static str) {
        if self.current == Some(line) || self.queue.contains(&line) {
            return;
        }
        if self.current.is_none() {
            self.current = Some(line);
            self.shown_ticks = 0;
            return;
        }
        if self.queue.len() == MAX_QUEUED_LINES {
            self.queue.pop_front();
        }
        self.queue.push_back(line);
    }

    pub(crate) fn advance(&mut self) {
        self.current = self.queue.pop_front();
        self.shown_ticks = 0;
    }

    pub(crate) fn tick(&mut self, continue_pressed: bool) {
        if self.current.is_none() {
            return;
        }
        if continue_pressed {
            self.advance();
            return;
        }
        self.shown_ticks = self.shown_ticks.saturating_add(1);
        if let Some(limit) = self.auto_advance_ticks {
            if self.shown_ticks >= limit {
                self.advance();
            }
        }
    }

    pub(crate) fn current(&self) -> Option<&'static str> {
        self.current
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.queue.len()
    }
}
