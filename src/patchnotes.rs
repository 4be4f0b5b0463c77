use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

const PATCHNOTE_EXTENSION: &str = ".md";

#[derive(Debug)]
pub struct Patchnote {
    pub file: String,
    pub content: String,
}

impl Patchnote {
    /// Reads a patchnote as text. Invalid UTF-8 sequences are replaced with
    /// U+FFFD rather than rejected.
    pub fn read(dir: &Path, file: &str) -> io::Result<Self> {
        let bytes = std::fs::read(dir.join(file))?;

        Ok(Self {
            file: file.to_string(),
            content: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    pub fn message(&self) -> String {
        format!("**New Patchnote**: {}\n\n{}", self.file, self.content)
    }
}

/// Lists the markdown files directly inside `dir`, sorted by name.
///
/// Only the name is checked, so a directory called `foo.md` is listed too and
/// will fail later when it is read.
pub fn list_patchnotes(dir: &Path) -> io::Result<Vec<String>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let name = entry?.file_name();

        let Some(name) = name.to_str() else {
            warn!("Skipping patchnote with non UTF-8 name: {:?}", PathBuf::from(&name));
            continue;
        };

        if name.ends_with(PATCHNOTE_EXTENSION) {
            files.push(name.to_string());
        }
    }

    files.sort();

    Ok(files)
}

/// Like [`list_patchnotes`], but an unreadable directory just means there is
/// nothing to send.
pub fn find_patchnotes(dir: &Path) -> Vec<String> {
    match list_patchnotes(dir) {
        Ok(files) => files,
        Err(e) => {
            error!("Failed to read patchnotes directory {}: {}", dir.display(), e);
            Vec::new()
        }
    }
}
