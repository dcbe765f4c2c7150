//! Intent routing
//!
//! Maps an utterance to exactly one [`Action`] by walking an ordered rule
//! table. Matching is case-insensitive and substring based; the first rule
//! that matches wins. Anything no rule claims comes back as
//! [`Action::Unmatched`] and goes to the answer pipeline.

mod music;
mod rules;

pub use music::TrackLibrary;
pub use rules::{IntentRule, RuleAction, Trigger, default_rules};

use crate::news::NewsRequest;

/// Routed outcome for one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open a website
    OpenSite { name: String, url: String },
    /// Launch an application
    OpenApp { name: String, handle: String },
    /// Play a track from the library
    PlayTrack { title: String, url: String },
    /// "play ..." without a known track
    TrackNotFound { requested: Option<String> },
    /// Read out news headlines
    FetchNews(NewsRequest),
    /// No rule matched; carries the original utterance untouched
    Unmatched(String),
}

/// Classifies utterances against an ordered rule table
#[derive(Debug, Clone)]
pub struct IntentRouter {
    rules: Vec<IntentRule>,
    tracks: TrackLibrary,
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new(default_rules(), TrackLibrary::builtin())
    }
}

impl IntentRouter {
    /// Create a router from explicit rules and a track library
    #[must_use]
    pub const fn new(rules: Vec<IntentRule>, tracks: TrackLibrary) -> Self {
        Self { rules, tracks }
    }

    /// Create a router with the built-in rules and the given tracks
    #[must_use]
    pub fn with_tracks(tracks: TrackLibrary) -> Self {
        Self::new(default_rules(), tracks)
    }

    /// Classify an utterance
    #[must_use]
    pub fn classify(&self, utterance: &str) -> Action {
        let lowered = utterance.to_lowercase();

        let Some(rule) = self.rules.iter().find(|r| r.trigger.matches(&lowered)) else {
            tracing::debug!(utterance, "no intent rule matched");
            return Action::Unmatched(utterance.to_string());
        };

        let action = match &rule.action {
            RuleAction::OpenSite { name, url } => Action::OpenSite {
                name: name.clone(),
                url: url.clone(),
            },
            RuleAction::OpenApp { name, handle } => Action::OpenApp {
                name: name.clone(),
                handle: handle.clone(),
            },
            RuleAction::PlayTrack => self.resolve_track(&lowered),
            RuleAction::FetchNews(request) => Action::FetchNews(request.clone()),
        };

        tracing::debug!(utterance, ?action, "intent matched");
        action
    }

    /// The track key is the second whitespace-delimited word
    fn resolve_track(&self, lowered: &str) -> Action {
        let requested = lowered.split_whitespace().nth(1);

        match requested.and_then(|key| self.tracks.get(key).map(|url| (key, url))) {
            Some((key, url)) => Action::PlayTrack {
                title: key.to_string(),
                url: url.to_string(),
            },
            None => Action::TrackNotFound {
                requested: requested.map(ToString::to_string),
            },
        }
    }
}
