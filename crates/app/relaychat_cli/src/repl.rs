//! Interactive chat loop.
//!
//! Input lines and relay replies are handled as they arrive. A new line may be
//! sent while earlier turns are still awaiting their reply.

use std::path::PathBuf;

use relaychat_client::{ChatSession, ImageRef, TranscriptEntry};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::Result;

const TYPING: &str = "… ChatGPT is typing";

#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Empty,
    Quit,
    Text(String),
    Image {
        path: PathBuf,
        prompt: Option<String>,
    },
    Usage(&'static str),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    match line.split_once(char::is_whitespace) {
        _ if line == "/quit" || line == "/exit" => Input::Quit,
        _ if line == "/image" => Input::Usage("usage: /image <path> [prompt]"),
        Some(("/image", rest)) => {
            let rest = rest.trim_start();
            let (path, prompt) = match rest.split_once(char::is_whitespace) {
                Some((path, prompt)) => (path, Some(prompt.trim().to_string())),
                None => (rest, None),
            };
            Input::Image {
                path: PathBuf::from(path),
                prompt: prompt.filter(|p| !p.is_empty()),
            }
        }
        _ if line.starts_with('/') => Input::Usage("commands: /image <path> [prompt], /quit"),
        _ => Input::Text(line.to_string()),
    }
}

pub fn render_entry(entry: &TranscriptEntry) -> String {
    let mut out = format!("{}> {}", entry.role, entry.text);
    match &entry.image {
        Some(ImageRef::Local(path)) => out.push_str(&format!(" [image: {}]", path.display())),
        Some(ImageRef::Remote(url)) => out.push_str(&format!(" [image: {url}]")),
        None => {}
    }
    out.trim_end().to_string()
}

pub async fn run(mut session: ChatSession) -> Result<()> {
    for entry in session.transcript().entries() {
        println!("{}", render_entry(entry));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;

    while input_open || session.is_typing() {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    continue;
                };
                match parse_input(&line) {
                    Input::Empty => {}
                    Input::Quit => input_open = false,
                    Input::Usage(usage) => println!("{usage}"),
                    Input::Text(text) => {
                        session.send_text(text);
                        println!("{TYPING}");
                    }
                    Input::Image { path, prompt } => {
                        session.send_image(path, prompt);
                        println!("{TYPING}");
                    }
                }
            }
            Some(outcome) = session.next_completion(), if session.is_typing() => {
                // Failures are logged by the session; the transcript is unchanged.
                if let Ok(entry) = outcome.result {
                    println!("{}", render_entry(&entry));
                }
            }
        }
    }

    Ok(())
}
