//! Prompt channel between the workflows and whatever front end gathers input.
//!
//! A prompt is one async call that resolves to the entered value, or `None`
//! when the user closes it without answering. Notices are fire-and-forget.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};

use crate::models::locale::{Locale, Message};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub message: String,
    /// Why the previous answer was rejected, if it was
    pub hint: Option<String>,
}

impl PromptRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: Option<String>) -> Self {
        self.hint = hint;
        self
    }
}

#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask for a value; `None` means cancelled
    async fn prompt(&self, request: PromptRequest) -> Option<String>;

    /// Show a non-fatal notice
    fn notice(&self, message: &str);
}

/// A prompt waiting for its answer
pub struct PendingPrompt {
    pub request: PromptRequest,
    pub reply: oneshot::Sender<Option<String>>,
}

pub enum PromptEvent {
    Ask(PendingPrompt),
    Notice(String),
}

/// Forwards prompts and notices over a channel to a UI task
pub struct ChannelPrompter {
    tx: mpsc::UnboundedSender<PromptEvent>,
}

impl ChannelPrompter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PromptEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Prompter for ChannelPrompter {
    async fn prompt(&self, request: PromptRequest) -> Option<String> {
        let (reply, response) = oneshot::channel();
        if self
            .tx
            .send(PromptEvent::Ask(PendingPrompt { request, reply }))
            .is_err()
        {
            log::debug!("Prompt channel closed, treating prompt as cancelled");
            return None;
        }
        // A dropped reply sender counts as a cancel
        response.await.ok().flatten()
    }

    fn notice(&self, message: &str) {
        let _ = self.tx.send(PromptEvent::Notice(message.to_string()));
    }
}

/// Answer prompts from stdin until the channel closes.
///
/// Empty input is rejected and asked again; end of input cancels the prompt.
pub async fn serve_terminal(mut rx: mpsc::UnboundedReceiver<PromptEvent>, locale: Locale) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(event) = rx.recv().await {
        let pending = match event {
            PromptEvent::Notice(message) => {
                eprintln!("{}", message);
                continue;
            }
            PromptEvent::Ask(pending) => pending,
        };

        let PendingPrompt { request, reply } = pending;
        if let Some(hint) = &request.hint {
            eprintln!("{}", hint);
        }
        let answer = loop {
            eprint!("{}: ", request.message);
            match lines.next_line().await {
                Ok(Some(line)) if !line.trim().is_empty() => break Some(line.trim().to_string()),
                Ok(Some(_)) => eprintln!("{}", Message::InputRequired.text(locale)),
                Ok(None) => break None,
                Err(e) => {
                    log::error!("Failed to read from stdin: {}", e);
                    break None;
                }
            }
        };
        let _ = reply.send(answer);
    }
}

/// Answers prompts from a fixed queue; records every request and notice.
#[derive(Default)]
pub struct PresetPrompter {
    answers: Mutex<VecDeque<Option<String>>>,
    requests: Mutex<Vec<PromptRequest>>,
    notices: Mutex<Vec<String>>,
}

impl PresetPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(|a| a.map(Into::into)).collect()),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<PromptRequest> {
        self.requests.lock().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().clone()
    }
}

#[async_trait]
impl Prompter for PresetPrompter {
    async fn prompt(&self, request: PromptRequest) -> Option<String> {
        self.requests.lock().push(request);
        // Running out of answers behaves like closing the prompt
        self.answers.lock().pop_front().flatten()
    }

    fn notice(&self, message: &str) {
        self.notices.lock().push(message.to_string());
    }
}
