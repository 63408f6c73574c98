//! Chat session: turns user input into relay calls.
//!
//! Every send appends the user's entry immediately and spawns one relay call.
//! Calls are independent: nothing is queued, cancelled or de-duplicated, and
//! replies are appended in the order they arrive, not the order they were
//! sent. A failed call is logged and leaves the transcript untouched; a call
//! that panics counts as failed.

use std::collections::HashMap;
use std::path::PathBuf;

use log::{debug, error};
use tokio::task::{Id, JoinSet};

use crate::client::RelayClient;
use crate::error::Result;
use crate::transcript::{ImageRef, Transcript, TranscriptEntry};

/// Sequence number of a user turn within a session, starting at 1.
pub type TurnId = u64;

/// `Idle` until a send, `AwaitingReply` while any call is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    AwaitingReply,
}

/// Result of one relay call, as applied to the transcript.
#[derive(Debug)]
pub struct TurnOutcome {
    pub turn: TurnId,
    /// The appended assistant entry, or the failure that was logged.
    pub result: Result<TranscriptEntry>,
}

pub struct ChatSession {
    client: RelayClient,
    transcript: Transcript,
    system_prompt: Option<String>,
    calls: JoinSet<Result<TranscriptEntry>>,
    turns: HashMap<Id, TurnId>,
    last_turn: TurnId,
}

impl ChatSession {
    pub fn new(client: RelayClient) -> Self {
        Self {
            client,
            transcript: Transcript::new(),
            system_prompt: None,
            calls: JoinSet::new(),
            turns: HashMap::new(),
            last_turn: 0,
        }
    }

    /// Leads every chat request with a system entry holding `prompt`.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> DispatchState {
        if self.calls.is_empty() {
            DispatchState::Idle
        } else {
            DispatchState::AwaitingReply
        }
    }

    /// Whether the "typing" indicator should be shown.
    pub fn is_typing(&self) -> bool {
        self.state() == DispatchState::AwaitingReply
    }

    /// Number of calls sent but not yet applied.
    pub fn outstanding(&self) -> usize {
        self.calls.len()
    }

    /// Appends a text turn and sends the full history to `/api/chat`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn send_text(&mut self, text: impl Into<String>) -> TurnId {
        self.transcript.push_user(text);
        let request = self
            .transcript
            .to_chat_request(self.system_prompt.as_deref());
        let client = self.client.clone();

        self.dispatch(async move {
            let reply = client.chat(&request).await?;
            Ok(TranscriptEntry::assistant(reply.reply))
        })
    }

    /// Appends an image turn and sends the file at `path` to `/api/upload`.
    ///
    /// The file is read by the spawned call; a missing file surfaces as a
    /// failed outcome. Must be called from within a tokio runtime.
    pub fn send_image(&mut self, path: impl Into<PathBuf>, text: Option<String>) -> TurnId {
        let path = path.into();
        let entry = TranscriptEntry::user(text.clone().unwrap_or_default())
            .with_image(ImageRef::Local(path.clone()));
        self.transcript.push(entry);
        let client = self.client.clone();

        self.dispatch(async move {
            let reply = client.upload(&path, text.as_deref()).await?;
            Ok(TranscriptEntry::assistant(reply.reply)
                .with_image(ImageRef::Remote(reply.image_url)))
        })
    }

    fn dispatch<F>(&mut self, call: F) -> TurnId
    where
        F: Future<Output = Result<TranscriptEntry>> + Send + 'static,
    {
        self.last_turn += 1;
        let turn = self.last_turn;
        let handle = self.calls.spawn(call);
        self.turns.insert(handle.id(), turn);
        debug!("turn {turn}: dispatched ({} outstanding)", self.calls.len());

        turn
    }

    /// Waits for the next call to finish and applies it to the transcript.
    ///
    /// Returns `None` when no call is outstanding.
    pub async fn next_completion(&mut self) -> Option<TurnOutcome> {
        let (id, result) = match self.calls.join_next_with_id().await? {
            Ok((id, result)) => (id, result),
            Err(e) => (e.id(), Err(e.into())),
        };
        let turn = self.turns.remove(&id).unwrap_or_default();

        match &result {
            Ok(entry) => {
                self.transcript.push(entry.clone());
                debug!("turn {turn}: reply appended");
            }
            Err(e) => error!("turn {turn}: relay call failed: {e}"),
        }

        Some(TurnOutcome { turn, result })
    }

    /// Waits until every outstanding call has been applied.
    pub async fn settle(&mut self) -> Vec<TurnOutcome> {
        let mut outcomes = Vec::with_capacity(self.calls.len());
        while let Some(outcome) = self.next_completion().await {
            outcomes.push(outcome);
        }
        outcomes
    }
}
