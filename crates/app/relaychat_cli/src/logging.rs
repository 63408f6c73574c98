pub mod formats;

use flexi_logger::{Logger, LoggerHandle};

use crate::Error;

/// Logs go to stderr so stdout carries only the conversation.
pub fn init() -> Result<LoggerHandle, Error> {
    let handle = Logger::try_with_env_or_str("info")?
        .format(formats::cli_format)
        .log_to_stderr()
        .start()?;

    Ok(handle)
}
