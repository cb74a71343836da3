//! Id input line view state

/// Which setting an id input edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdInputKind {
    Channel,
    Role,
}

impl IdInputKind {
    /// Input id; contains `channel` or `role` so validation picks the right rule.
    pub fn field_id(&self) -> &'static str {
        match self {
            IdInputKind::Channel => "log_channel_id",
            IdInputKind::Role => "mute_role_id",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IdInputKind::Channel => "Log channel ID",
            IdInputKind::Role => "Mute role ID",
        }
    }
}

/// An id being typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdInput {
    pub kind: IdInputKind,
    pub value: String,
    /// Result of the last debounced check, `None` before the first one
    pub valid: Option<bool>,
}

impl IdInput {
    pub fn new(kind: IdInputKind) -> Self {
        Self {
            kind,
            value: String::new(),
            valid: None,
        }
    }

    pub fn push(&mut self, ch: char) {
        self.value.push(ch);
        self.valid = None;
    }

    /// Insert pasted text without line breaks.
    pub fn paste(&mut self, text: &str) {
        self.value
            .extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
        self.valid = None;
    }

    pub fn backspace(&mut self) {
        self.value.pop();
        self.valid = None;
    }
}
