//! Request-scoped temporary copies of uploaded files.
//!
//! A [`StagedUpload`] owns its file on disk. The file is removed when the
//! value is dropped, so every exit path of an upload handler releases it.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

const FILE_PREFIX: &str = "upload-";
const MAX_EXTENSION_LEN: usize = 8;

/// An uploaded file staged in the relay's upload directory.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    original_name: Option<String>,
    len: u64,
}

impl StagedUpload {
    /// Writes `bytes` to a fresh uniquely named file in `dir`.
    ///
    /// `dir` is created if it does not exist. The extension of
    /// `original_name` is kept when it is short and alphanumeric.
    pub fn stage(dir: &Path, original_name: Option<&str>, bytes: &[u8]) -> io::Result<Self> {
        fs::create_dir_all(dir)?;

        let suffix = original_name
            .and_then(safe_extension)
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix(FILE_PREFIX)
            .suffix(&suffix)
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        Ok(Self {
            file,
            original_name: original_name.map(str::to_owned),
            len: bytes.len() as u64,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// File name as sent by the client, if any.
    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Deletes the staged file now, reporting any I/O error.
    pub fn discard(self) -> io::Result<()> {
        self.file.close()
    }
}

fn safe_extension(name: &str) -> Option<&str> {
    let ext = Path::new(name).extension()?.to_str()?;
    let ok = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    ok.then_some(ext)
}
