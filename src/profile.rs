/// Player name entry on the login screen.

/// Longest accepted name, in characters.
pub const MAX_NAME_LEN: usize = 6;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameEntry {
    name: String,
}

impl NameEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a typed character. Control characters and input past
    /// `MAX_NAME_LEN` are ignored; returns whether the name changed.
    pub fn push(&mut self, c: char) -> bool {
        if c.is_control() || self.name.chars().count() >= MAX_NAME_LEN {
            return false;
        }
        self.name.push(c);
        true
    }

    pub fn backspace(&mut self) {
        self.name.pop();
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// The finished name, or `None` while it is still empty.
    pub fn confirm(&self) -> Option<String> {
        (!self.name.is_empty()).then(|| self.name.clone())
    }
}
