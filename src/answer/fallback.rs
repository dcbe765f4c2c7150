//! Canned answers that skip the external service

use chrono::{DateTime, Local};

/// Reply produced by a fallback entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReply {
    /// Fixed text
    Text(String),
    /// Current local time, rendered when the entry is hit
    CurrentTime,
}

impl FallbackReply {
    fn render(&self, now: DateTime<Local>) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::CurrentTime => format!("The current time is {}", now.format("%I:%M %p")),
        }
    }
}

/// One trigger phrase and its reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackEntry {
    pub trigger: String,
    pub reply: FallbackReply,
}

impl FallbackEntry {
    fn text(trigger: &str, reply: &str) -> Self {
        Self {
            trigger: trigger.to_string(),
            reply: FallbackReply::Text(reply.to_string()),
        }
    }
}

/// Ordered fallback table; first trigger contained in the question wins
#[derive(Debug, Clone)]
pub struct FallbackTable {
    entries: Vec<FallbackEntry>,
}

impl Default for FallbackTable {
    fn default() -> Self {
        Self::new(vec![
            FallbackEntry::text("hello", "Hello! How can I help you today?"),
            FallbackEntry::text("hi", "Hi there! What can I do for you?"),
            FallbackEntry::text(
                "how are you",
                "I'm doing great! Thanks for asking. How can I assist you?",
            ),
            FallbackEntry::text("what is your name", "I am Jarvis, your AI voice assistant."),
            FallbackEntry::text("who are you", "I'm Jarvis, an AI assistant here to help you."),
            FallbackEntry::text("thank you", "You're welcome! Happy to help."),
            FallbackEntry::text("thanks", "You're welcome!"),
            FallbackEntry::text("bye", "Goodbye! Have a great day!"),
            FallbackEntry::text(
                "what can you do",
                "I can open websites, play music, fetch news, and answer questions.",
            ),
            FallbackEntry {
                trigger: "time".to_string(),
                reply: FallbackReply::CurrentTime,
            },
        ])
    }
}

impl FallbackTable {
    /// Create a table from entries in priority order
    #[must_use]
    pub const fn new(entries: Vec<FallbackEntry>) -> Self {
        Self { entries }
    }

    /// Find a canned answer for the question
    #[must_use]
    pub fn lookup(&self, question: &str) -> Option<String> {
        self.lookup_at(question, Local::now())
    }

    /// Same as [`Self::lookup`] with an explicit clock reading
    #[must_use]
    pub fn lookup_at(&self, question: &str, now: DateTime<Local>) -> Option<String> {
        let lowered = question.trim().to_lowercase();

        self.entries
            .iter()
            .find(|e| lowered.contains(e.trigger.as_str()))
            .map(|e| {
                tracing::debug!(trigger = %e.trigger, "fallback answer");
                e.reply.render(now)
            })
    }
}
