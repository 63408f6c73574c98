use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use relaychat_client::client::DEFAULT_RELAY_URL;

#[derive(Parser, Debug)]
#[command(name = "relaychat", version, about = "Chat with a generative-AI provider through a relaychat relay")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the version.
    Version,
    /// Start an interactive chat session.
    Chat(SessionArgs),
    /// Send one message (or image) and print the reply.
    Ask(AskArgs),
}

#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Base URL of the relay.
    #[arg(long, env = "RELAY_URL", default_value = DEFAULT_RELAY_URL)]
    pub relay_url: String,

    /// System entry leading every chat request. Empty sends none.
    #[arg(long, env = "SYSTEM_PROMPT", default_value = "")]
    pub system_prompt: String,
}

impl SessionArgs {
    pub fn system_prompt(&self) -> Option<&str> {
        Some(self.system_prompt.as_str()).filter(|p| !p.is_empty())
    }
}

#[derive(Args, Debug)]
pub struct AskArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Upload this image instead of sending a text chat.
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Message text (or image prompt).
    pub text: Vec<String>,
}
