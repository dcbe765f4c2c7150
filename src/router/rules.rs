//! Intent rule table

use crate::news::{ALL_SOURCES, NewsMode, NewsRequest};

/// How a rule inspects the lowercased utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Matches when any of the phrases appears anywhere in the utterance
    Contains(Vec<String>),
    /// Matches when the utterance starts with the prefix
    Prefix(String),
}

impl Trigger {
    /// Build a `Contains` trigger from string literals
    #[must_use]
    pub fn contains(phrases: &[&str]) -> Self {
        Self::Contains(phrases.iter().map(|p| (*p).to_string()).collect())
    }

    /// Build a `Prefix` trigger
    #[must_use]
    pub fn prefix(prefix: &str) -> Self {
        Self::Prefix(prefix.to_string())
    }

    /// Check a lowercased utterance against this trigger
    #[must_use]
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Self::Contains(phrases) => phrases.iter().any(|p| lowered.contains(p.as_str())),
            Self::Prefix(prefix) => lowered.starts_with(prefix.as_str()),
        }
    }
}

/// What a matched rule asks the assistant to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// Open a website in the default browser
    OpenSite { name: String, url: String },
    /// Launch a desktop application through its shell handle
    OpenApp { name: String, handle: String },
    /// Look the second word up in the track library
    PlayTrack,
    /// Fetch headlines from the news desk
    FetchNews(NewsRequest),
}

/// A single routing rule: trigger plus action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRule {
    pub trigger: Trigger,
    pub action: RuleAction,
}

impl IntentRule {
    fn site(phrase: &str, name: &str, url: &str) -> Self {
        Self {
            trigger: Trigger::contains(&[phrase]),
            action: RuleAction::OpenSite {
                name: name.to_string(),
                url: url.to_string(),
            },
        }
    }

    fn app(phrase: &str, name: &str, handle: &str) -> Self {
        Self {
            trigger: Trigger::contains(&[phrase]),
            action: RuleAction::OpenApp {
                name: name.to_string(),
                handle: handle.to_string(),
            },
        }
    }

    fn news(phrases: &[&str], source: &str, limit: usize, mode: NewsMode) -> Self {
        Self {
            trigger: Trigger::contains(phrases),
            action: RuleAction::FetchNews(NewsRequest {
                source: source.to_string(),
                limit,
                mode,
            }),
        }
    }
}

/// Shell handle for the WhatsApp desktop app on Windows
const WHATSAPP_HANDLE: &str = "shell:AppsFolder\\5319275A.WhatsAppDesktop_cv1g1gvanyjgm!App";

/// Built-in rule table
///
/// Order matters: sites, apps, music, then news with specific sources ahead
/// of the generic "news"/"headlines" catch-all.
#[must_use]
pub fn default_rules() -> Vec<IntentRule> {
    vec![
        IntentRule::site("open google", "Google", "https://google.com"),
        IntentRule::site("open facebook", "Facebook", "https://facebook.com"),
        IntentRule::site("open instagram", "Instagram", "https://instagram.com"),
        IntentRule::site("open youtube", "YouTube", "https://youtube.com"),
        IntentRule::site("open linkedin", "LinkedIn", "https://linkedin.com"),
        IntentRule::app("open whatsapp", "WhatsApp", WHATSAPP_HANDLE),
        IntentRule::site("open snapchat", "Snapchat", "https://snapchat.com"),
        IntentRule {
            trigger: Trigger::prefix("play"),
            action: RuleAction::PlayTrack,
        },
        IntentRule::news(&["dawn news"], "dawn", 5, NewsMode::Headlines),
        IntentRule::news(
            &["express news", "tribune news"],
            "express",
            5,
            NewsMode::Headlines,
        ),
        IntentRule::news(&["geo news"], "geo", 5, NewsMode::Headlines),
        IntentRule::news(
            &["news summary", "quick news"],
            ALL_SOURCES,
            5,
            NewsMode::Summary,
        ),
        IntentRule::news(&["news", "headlines"], ALL_SOURCES, 6, NewsMode::Headlines),
    ]
}
