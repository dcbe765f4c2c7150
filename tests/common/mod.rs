//! Shared test utilities

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use jarvis_assistant::answer::{AnswerBackend, QaError, QaRequest};
use jarvis_assistant::news::{FeedSource, NewsFeed};
use jarvis_assistant::voice::SpeechOutput;
use jarvis_assistant::{Error, Launcher, Result};

/// Backend that answers from a script and counts calls
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
    script: Arc<Mutex<VecDeque<std::result::Result<String, QaError>>>>,
}

impl ScriptedBackend {
    /// Backend whose every answer is "answer N"
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next call
    pub fn push(&self, response: std::result::Result<String, QaError>) {
        self.script.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerBackend for ScriptedBackend {
    async fn generate(&self, request: &QaRequest) -> std::result::Result<String, QaError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts.lock().unwrap().push(request.prompt());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("answer {n}")))
    }
}

/// Speech output that records everything said
#[derive(Clone, Default)]
pub struct RecordingSpeech {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl SpeechOutput for RecordingSpeech {
    async fn speak(&mut self, text: &str) -> Result<()> {
        self.lines.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Launcher that records targets instead of opening them
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    opened: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launcher that records and then refuses every target
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn open(&mut self, target: &str) -> Result<()> {
        self.opened.lock().unwrap().push(target.to_string());
        if self.fail {
            return Err(Error::Launch(format!("{target}: refused")));
        }
        Ok(())
    }
}

/// Feed source serving canned documents keyed by feed key
#[derive(Default)]
pub struct StaticFeeds {
    documents: HashMap<String, String>,
}

impl StaticFeeds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `count` items titled "<key> story N" for `key`
    #[must_use]
    pub fn with_items(mut self, key: &str, count: usize) -> Self {
        self.documents.insert(key.to_string(), rss_document(key, count));
        self
    }
}

#[async_trait]
impl FeedSource for StaticFeeds {
    async fn fetch(&self, feed: &NewsFeed) -> Result<String> {
        self.documents
            .get(&feed.key)
            .cloned()
            .ok_or_else(|| Error::News(format!("{} unreachable", feed.name)))
    }
}

/// Minimal RSS document with numbered items
pub fn rss_document(key: &str, count: usize) -> String {
    let items: String = (1..=count)
        .map(|i| {
            format!(
                "<item><title>{key} story {i}</title><link>https://{key}.example/{i}</link></item>"
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0"?><rss version="2.0"><channel><title>{key}</title>{items}</channel></rss>"#
    )
}
