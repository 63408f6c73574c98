//! Ordered, session-local record of chat turns.

use std::path::PathBuf;

use relaychat_core::models::{ChatMessage, ChatRequest, Role};

/// First assistant entry of every new transcript.
pub const GREETING: &str = "Hello, I'm ChatGPT! Ask me anything!";

/// Image attached to a transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// File picked by the user.
    Local(PathBuf),
    /// Image generated upstream.
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub role: Role,
    pub text: String,
    pub image: Option<ImageRef>,
}

impl TranscriptEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            image: None,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }
}

/// Entries in insertion order. Lives as long as the session; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// A transcript holding only the assistant greeting.
    pub fn new() -> Self {
        Self {
            entries: vec![TranscriptEntry::assistant(GREETING)],
        }
    }

    /// Appends `entry` and returns its index.
    pub fn push(&mut self, entry: TranscriptEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> usize {
        self.push(TranscriptEntry::user(text))
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) -> usize {
        self.push(TranscriptEntry::assistant(text))
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The full history as a chat request, led by `system_prompt` when given.
    ///
    /// Entries without text (an image sent with no prompt) carry nothing the
    /// completion endpoint can use and are left out.
    pub fn to_chat_request(&self, system_prompt: Option<&str>) -> ChatRequest {
        let system = system_prompt.map(ChatMessage::system);
        let history = self
            .entries
            .iter()
            .filter(|e| !e.text.is_empty())
            .map(|e| ChatMessage::new(e.role, e.text.clone()));

        ChatRequest {
            messages: system.into_iter().chain(history).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transcript_starts_with_greeting() {
        let t = Transcript::new();
        assert_eq!(t.len(), 1);
        assert_eq!(t.entries()[0], TranscriptEntry::assistant(GREETING));
    }

    #[test]
    fn push_returns_index_in_insertion_order() {
        let mut t = Transcript::new();
        assert_eq!(t.push_user("a"), 1);
        assert_eq!(t.push_assistant("b"), 2);
        assert_eq!(t.entries()[1], TranscriptEntry::user("a"));
        assert_eq!(t.last().map(|e| e.text.as_str()), Some("b"));
    }

    #[test]
    fn chat_request_leads_with_system_prompt() {
        let mut t = Transcript::new();
        t.push_user("2+2?");

        let req = t.to_chat_request(Some("You are a calculator."));

        assert_eq!(
            req.messages,
            vec![
                ChatMessage::system("You are a calculator."),
                ChatMessage::assistant(GREETING),
                ChatMessage::user("2+2?"),
            ]
        );
    }

    #[test]
    fn chat_request_without_system_prompt() {
        let mut t = Transcript::new();
        t.push_user("hi");
        assert_eq!(
            t.to_chat_request(None).messages,
            vec![ChatMessage::assistant(GREETING), ChatMessage::user("hi")]
        );
    }

    #[test]
    fn image_only_entries_are_left_out_of_chat_requests() {
        let mut t = Transcript::new();
        t.push(TranscriptEntry::user("").with_image(ImageRef::Local("cat.png".into())));
        t.push(
            TranscriptEntry::assistant("Here is an image")
                .with_image(ImageRef::Remote("https://img/1.png".into())),
        );

        let req = t.to_chat_request(None);

        assert_eq!(
            req.messages,
            vec![
                ChatMessage::assistant(GREETING),
                ChatMessage::assistant("Here is an image"),
            ]
        );
    }
}
