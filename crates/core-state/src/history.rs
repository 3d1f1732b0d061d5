use tracing::trace;

use crate::command::{Command, EditCommand};

/// Default number of commands kept in the history.
pub const HISTORY_DEPTH_DEFAULT: usize = 200;

/// Stack of executed commands. Undo pops; nothing is kept for redo.
#[derive(Debug)]
pub struct CommandHistory {
    stack: Vec<EditCommand>,
    /// 0 keeps every command.
    max_depth: usize,
    /// Count of commands dropped from the bottom of the stack.
    trimmed: u64,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(HISTORY_DEPTH_DEFAULT)
    }
}

impl CommandHistory {
    pub fn new(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            max_depth,
            trimmed: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn trimmed(&self) -> u64 {
        self.trimmed
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
        self.trim();
    }

    pub fn push(&mut self, command: EditCommand) {
        let name = command.name();
        self.stack.push(command);
        trace!(target: "state.history", command = name, depth = self.stack.len(), "push");
        self.trim();
    }

    pub fn pop(&mut self) -> Option<EditCommand> {
        let command = self.stack.pop();
        if let Some(cmd) = &command {
            trace!(target: "state.history", command = cmd.name(), depth = self.stack.len(), "pop");
        }
        command
    }

    pub fn last(&self) -> Option<&EditCommand> {
        self.stack.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut EditCommand> {
        self.stack.last_mut()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    fn trim(&mut self) {
        if self.max_depth == 0 || self.stack.len() <= self.max_depth {
            return;
        }
        let excess = self.stack.len() - self.max_depth;
        self.stack.drain(..excess);
        self.trimmed += excess as u64;
        trace!(target: "state.history", excess, depth = self.stack.len(), "trimmed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{DeleteSingleChar, InsertString, NewLineAfter};

    #[test]
    fn push_pop_is_lifo() {
        let mut h = CommandHistory::default();
        assert!(h.is_empty());
        h.push(NewLineAfter::new(false).into());
        h.push(InsertString::new("x").into());
        assert_eq!(h.len(), 2);
        assert_eq!(h.last().map(|c| c.name()), Some("InsertString"));
        assert_eq!(h.pop().map(|c| c.name()), Some("InsertString"));
        assert_eq!(h.pop().map(|c| c.name()), Some("NewLineAfter"));
        assert!(h.pop().is_none());
    }

    #[test]
    fn oldest_entries_are_trimmed() {
        let mut h = CommandHistory::new(2);
        h.push(NewLineAfter::new(false).into());
        h.push(DeleteSingleChar::new().into());
        h.push(InsertString::new("x").into());
        assert_eq!(h.len(), 2);
        assert_eq!(h.trimmed(), 1);
        h.pop();
        assert_eq!(h.pop().map(|c| c.name()), Some("DeleteSingleChar"));
    }

    #[test]
    fn zero_depth_is_unbounded() {
        let mut h = CommandHistory::new(0);
        for _ in 0..500 {
            h.push(InsertString::new("x").into());
        }
        assert_eq!(h.len(), 500);
        h.set_max_depth(10);
        assert_eq!(h.len(), 10);
        assert_eq!(h.trimmed(), 490);
    }
}
