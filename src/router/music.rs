//! Track library for the "play" rule

use std::collections::BTreeMap;

/// Maps a spoken track key (one word) to a playable URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackLibrary {
    tracks: BTreeMap<String, String>,
}

impl TrackLibrary {
    /// Create a library from `(key, url)` pairs; keys are lowercased
    pub fn new<I, K, V>(tracks: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            tracks: tracks
                .into_iter()
                .map(|(k, v)| (k.into().trim().to_lowercase(), v.into()))
                .collect(),
        }
    }

    /// Built-in tracks used when the config file has no `[music]` table
    #[must_use]
    pub fn builtin() -> Self {
        Self::new([
            ("faded", "https://www.youtube.com/watch?v=60ItHLz5WEA"),
            ("skyfall", "https://www.youtube.com/watch?v=DeumyOzKqgI"),
            ("believer", "https://www.youtube.com/watch?v=7wtfhZwyrcc"),
        ])
    }

    /// Look up a track by key (case-insensitive)
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tracks.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Number of tracks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the library is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
