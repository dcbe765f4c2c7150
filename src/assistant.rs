//! One conversational turn: route, act, answer, speak

use crate::answer::{AnswerBackend, AnswerPipeline};
use crate::launcher::Launcher;
use crate::news::{NewsDesk, NewsRequest, briefing, render_list};
use crate::router::{Action, IntentRouter};
use crate::voice::{SpeechOutput, sanitize};

/// Spoken when "play ..." names no known track
pub const TRACK_NOT_FOUND_MESSAGE: &str = "Song not found in library";

/// Spoken before a backend question
pub const THINKING_MESSAGE: &str = "Let me think about that";

/// Routes utterances and carries out the chosen action
pub struct Assistant<B> {
    router: IntentRouter,
    answers: AnswerPipeline<B>,
    news: NewsDesk,
    launcher: Box<dyn Launcher>,
}

impl<B: AnswerBackend> Assistant<B> {
    /// Assemble an assistant
    #[must_use]
    pub fn new(
        router: IntentRouter,
        answers: AnswerPipeline<B>,
        news: NewsDesk,
        launcher: Box<dyn Launcher>,
    ) -> Self {
        Self {
            router,
            answers,
            news,
            launcher,
        }
    }

    /// The answer pipeline
    #[must_use]
    pub const fn answers(&self) -> &AnswerPipeline<B> {
        &self.answers
    }

    /// Handle one utterance end to end
    ///
    /// Never fails: launch and speech errors are logged and the turn ends.
    #[allow(clippy::future_not_send)]
    pub async fn handle(&mut self, utterance: &str, speech: &mut dyn SpeechOutput) {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return;
        }

        let action = self.router.classify(utterance);
        tracing::info!(utterance, ?action, "handling command");

        match action {
            Action::OpenSite { name, url } => {
                say(speech, &format!("Opening {name}")).await;
                self.launch(&url);
            }
            Action::OpenApp { name, handle } => {
                say(speech, &format!("Opening {name}")).await;
                self.launch(&handle);
            }
            Action::PlayTrack { title, url } => {
                say(speech, &format!("Playing {title}")).await;
                self.launch(&url);
            }
            Action::TrackNotFound { requested } => {
                tracing::debug!(?requested, "track not in library");
                say(speech, TRACK_NOT_FOUND_MESSAGE).await;
            }
            Action::FetchNews(request) => self.read_news(&request, speech).await,
            Action::Unmatched(question) => {
                say(speech, THINKING_MESSAGE).await;
                let answer = self.answers.ask(&question).await;
                tracing::info!(answer = %answer, "answer ready");
                say(speech, &answer).await;
            }
        }
    }

    fn launch(&mut self, target: &str) {
        if let Err(e) = self.launcher.open(target) {
            tracing::warn!(error = %e, "failed to open target");
        }
    }

    #[allow(clippy::future_not_send)]
    async fn read_news(&self, request: &NewsRequest, speech: &mut dyn SpeechOutput) {
        let headlines = match self.news.gather(request).await {
            Ok(headlines) => headlines,
            Err(e) => {
                tracing::warn!(error = %e, "news unavailable");
                say(speech, e.user_message()).await;
                return;
            }
        };

        println!("{}", render_list(request.mode, &headlines));

        for line in briefing(request, &headlines) {
            say(speech, &line).await;
        }
    }
}

/// Sanitize and speak, logging failures
#[allow(clippy::future_not_send)]
pub async fn say(speech: &mut dyn SpeechOutput, text: &str) {
    let clean = sanitize(text);
    if let Err(e) = speech.speak(&clean).await {
        tracing::error!(error = %e, "speech output failed");
    }
}
