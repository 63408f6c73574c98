// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{AskArgs, Cli, Commands, SessionArgs};
use relaychat_client::{ChatSession, RelayClient, Transcript};

mod cli;
mod logging;
mod repl;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let _logger = logging::init()?;

    let args = Cli::parse();

    match args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::Chat(session) => chat(session).await?,
        Commands::Ask(ask_args) => ask(ask_args).await?,
    }

    Ok(())
}

async fn chat(args: SessionArgs) -> Result<()> {
    let client = RelayClient::new(&args.relay_url)?;
    log::info!("relay: {}", client.base_url());

    let mut session = ChatSession::new(client);
    if let Some(prompt) = args.system_prompt() {
        session = session.with_system_prompt(prompt);
    }
    repl::run(session).await
}

/// One turn without a session: the reply goes to stdout, failures exit 1.
async fn ask(args: AskArgs) -> Result<()> {
    let client = RelayClient::new(&args.session.relay_url)?;
    let text = args.text.join(" ");

    let reply = match &args.image {
        Some(path) => {
            let prompt = Some(text.as_str()).filter(|t| !t.is_empty());
            let reply = client.upload(path, prompt).await?;
            format!("{}\n{}", reply.reply, reply.image_url)
        }
        None => {
            if text.is_empty() {
                return Err(Error::Custom("nothing to send: pass message text".into()));
            }
            let mut transcript = Transcript::new();
            transcript.push_user(text);
            let request = transcript.to_chat_request(args.session.system_prompt());
            client.chat(&request).await?.reply
        }
    };

    println!("{reply}");
    Ok(())
}
