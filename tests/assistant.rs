//! End-to-end turn handling with fake collaborators

use jarvis_assistant::assistant::{THINKING_MESSAGE, TRACK_NOT_FOUND_MESSAGE};
use jarvis_assistant::daemon::run_lines;
use jarvis_assistant::news::{NewsDesk, default_feeds};
use jarvis_assistant::router::{IntentRule, RuleAction, Trigger, default_rules};
use jarvis_assistant::{
    AnswerPipeline, Assistant, IntentRouter, NewsMode, NewsRequest, RateLimiter, TrackLibrary,
};

mod common;

use common::{RecordingLauncher, RecordingSpeech, ScriptedBackend, StaticFeeds};

struct Harness {
    assistant: Assistant<ScriptedBackend>,
    backend: ScriptedBackend,
    launcher: RecordingLauncher,
    speech: RecordingSpeech,
}

impl Harness {
    fn new(router: IntentRouter, feeds: StaticFeeds, launcher: RecordingLauncher) -> Self {
        let backend = ScriptedBackend::new();
        let assistant = Assistant::new(
            router,
            AnswerPipeline::new(backend.clone(), RateLimiter::default()),
            NewsDesk::new(default_feeds(), Box::new(feeds)),
            Box::new(launcher.clone()),
        );
        Self {
            assistant,
            backend,
            launcher,
            speech: RecordingSpeech::new(),
        }
    }

    fn standard() -> Self {
        Self::new(
            IntentRouter::default(),
            StaticFeeds::new()
                .with_items("dawn", 4)
                .with_items("express", 4)
                .with_items("geo", 4),
            RecordingLauncher::new(),
        )
    }

    async fn say(&mut self, utterance: &str) -> Vec<String> {
        let mut speech = self.speech.clone();
        let before = speech.lines().len();
        self.assistant.handle(utterance, &mut speech).await;
        speech.lines()[before..].to_vec()
    }
}

#[tokio::test]
async fn test_open_site_announces_and_launches() {
    let mut h = Harness::standard();

    let spoken = h.say("Open Google").await;

    assert_eq!(spoken, vec!["Opening Google"]);
    assert_eq!(h.launcher.opened(), vec!["https://google.com"]);
    assert_eq!(h.backend.calls(), 0);
}

#[tokio::test]
async fn test_launch_failure_does_not_end_turn() {
    let mut h = Harness::new(
        IntentRouter::default(),
        StaticFeeds::new(),
        RecordingLauncher::failing(),
    );

    assert_eq!(h.say("open youtube").await, vec!["Opening YouTube"]);
    assert_eq!(h.say("open facebook").await, vec!["Opening Facebook"]);
    assert_eq!(h.launcher.opened().len(), 2);
}

#[tokio::test]
async fn test_play_track() {
    let router = IntentRouter::with_tracks(TrackLibrary::new([(
        "faded",
        "https://example.com/faded",
    )]));
    let mut h = Harness::new(router, StaticFeeds::new(), RecordingLauncher::new());

    assert_eq!(h.say("play faded").await, vec!["Playing faded"]);
    assert_eq!(h.launcher.opened(), vec!["https://example.com/faded"]);

    assert_eq!(h.say("play unknownsong").await, vec![TRACK_NOT_FOUND_MESSAGE]);
    assert_eq!(h.launcher.opened().len(), 1);
}

#[tokio::test]
async fn test_unmatched_goes_to_backend() {
    let mut h = Harness::standard();

    let spoken = h.say("capital of France").await;

    assert_eq!(spoken, vec![THINKING_MESSAGE, "answer 1"]);
    assert_eq!(h.backend.calls(), 1);
    assert_eq!(h.assistant.answers().limiter().request_count(), 1);
}

#[tokio::test]
async fn test_answers_are_sanitized() {
    let mut h = Harness::standard();
    h.backend
        .push(Ok("**Paris** is the [capital](https://en.wikipedia.org/wiki/Paris).".to_string()));

    let spoken = h.say("capital of France").await;

    assert_eq!(spoken[1], "Paris is the capital.");
}

#[tokio::test]
async fn test_fallback_question_is_local() {
    let mut h = Harness::standard();

    let spoken = h.say("who are you").await;

    assert_eq!(spoken[0], THINKING_MESSAGE);
    assert_eq!(spoken.len(), 2);
    assert_eq!(h.backend.calls(), 0);
}

#[tokio::test]
async fn test_single_source_headlines() {
    let mut h = Harness::standard();

    let spoken = h.say("dawn news").await;

    assert_eq!(
        spoken,
        vec![
            "Here are the latest headlines from Dawn",
            "Headline 1. dawn story 1",
            "Headline 2. dawn story 2",
            "Headline 3. dawn story 3",
            "Headline 4. dawn story 4",
            "That's all for now",
        ]
    );
}

#[tokio::test]
async fn test_all_sources_take_two_per_feed() {
    let mut h = Harness::standard();

    let spoken = h.say("news").await;

    assert_eq!(spoken.len(), 8);
    assert_eq!(spoken[0], "Here are the latest headlines from Pakistan");
    assert_eq!(spoken[1], "Headline 1 from Dawn. dawn story 1");
    assert_eq!(spoken[3], "Headline 3 from Express Tribune. express story 1");
    assert_eq!(spoken[6], "Headline 6 from Geo News. geo story 2");
    assert_eq!(spoken[7], "That's all for now");
}

#[tokio::test]
async fn test_news_summary_speaks_one_line() {
    let mut h = Harness::standard();

    let spoken = h.say("news summary").await;

    assert_eq!(spoken, vec!["I've displayed 5 news headlines on screen"]);
}

#[tokio::test]
async fn test_failed_feeds_are_skipped() {
    let mut h = Harness::new(
        IntentRouter::default(),
        StaticFeeds::new().with_items("geo", 3),
        RecordingLauncher::new(),
    );

    let spoken = h.say("headlines").await;

    assert_eq!(
        spoken,
        vec![
            "Here are the latest headlines from Pakistan",
            "Headline 1 from Geo News. geo story 1",
            "Headline 2 from Geo News. geo story 2",
            "That's all for now",
        ]
    );
}

#[tokio::test]
async fn test_no_headlines() {
    let mut h = Harness::new(
        IntentRouter::default(),
        StaticFeeds::new(),
        RecordingLauncher::new(),
    );

    assert_eq!(h.say("geo news").await, vec!["Could not fetch news"]);
}

#[tokio::test]
async fn test_unknown_news_source() {
    let mut rules = vec![IntentRule {
        trigger: Trigger::contains(&["bbc news"]),
        action: RuleAction::FetchNews(NewsRequest {
            source: "bbc".to_string(),
            limit: 5,
            mode: NewsMode::Headlines,
        }),
    }];
    rules.extend(default_rules());
    let router = IntentRouter::new(rules, TrackLibrary::builtin());
    let mut h = Harness::new(router, StaticFeeds::new(), RecordingLauncher::new());

    assert_eq!(h.say("bbc news").await, vec!["Invalid news source"]);
}

#[tokio::test]
async fn test_blank_utterance_is_ignored() {
    let mut h = Harness::standard();

    assert!(h.say("   ").await.is_empty());
    assert!(h.launcher.opened().is_empty());
}

#[tokio::test]
async fn test_text_input_skips_invalid_utf8_line() {
    let mut h = Harness::standard();
    let mut speech = h.speech.clone();
    let input: &[u8] = b"open google\n\xff\xfe news\nopen youtube\r\nopen facebook";

    run_lines(&mut h.assistant, input, &mut speech).await.unwrap();

    assert_eq!(
        speech.lines(),
        vec!["Opening Google", "Opening YouTube", "Opening Facebook"]
    );
    assert_eq!(
        h.launcher.opened(),
        vec![
            "https://google.com",
            "https://youtube.com",
            "https://facebook.com"
        ]
    );
}

