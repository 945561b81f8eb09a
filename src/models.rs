#[derive(Debug, Clone)]
pub struct Contact {
    pub id: u32,
    pub name: String,
    pub avatar: String,
    pub status: ContactStatus,
    pub last_message: String,
    pub last_time: String,
    pub unread: u32,
}

impl Contact {
    /// Two-letter initials standing in for the avatar image in the terminal.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactStatus {
    Online,
    Offline,
    Away,
}

impl ContactStatus {
    /// Capitalized label for the chat header ("Online", "Offline", "Away").
    pub fn label(&self) -> &'static str {
        match self {
            ContactStatus::Online => "Online",
            ContactStatus::Offline => "Offline",
            ContactStatus::Away => "Away",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub direction: Direction,
    pub time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Authored by the local user.
    Sent,
    /// Authored by the remote peer (seeded or simulated).
    Received,
}

impl Message {
    pub fn sent(text: impl Into<String>, time: impl Into<String>) -> Self {
        Message {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            direction: Direction::Sent,
            time: time.into(),
        }
    }

    pub fn received(text: impl Into<String>, time: impl Into<String>) -> Self {
        Message {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            direction: Direction::Received,
            time: time.into(),
        }
    }

    pub fn is_sent(&self) -> bool {
        self.direction == Direction::Sent
    }
}
