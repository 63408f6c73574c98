use std::io::Write;

use flexi_logger::{DeferredNow, style};
use log::Record;

/// `LEVEL message`, with the level colored.
pub fn cli_format(
    w: &mut dyn Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let level = record.level();
    write!(w, "{} {}", style(level).paint(level.to_string()), record.args())
}
