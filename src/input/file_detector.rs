//! File type detection by extension

use crate::error::{Result, ResumatchError};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(FileType::Pdf),
            "txt" | "text" => Some(FileType::Text),
            "md" | "markdown" => Some(FileType::Markdown),
            _ => None,
        }
    }

    pub fn detect(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|ext| ext.to_str()).ok_or_else(|| {
            ResumatchError::UnsupportedFormat(format!("File has no extension: {}", path.display()))
        })?;

        Self::from_extension(extension).ok_or_else(|| {
            ResumatchError::UnsupportedFormat(format!(
                ".{} ({}); expected .pdf, .txt or .md",
                extension,
                path.display()
            ))
        })
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Pdf => "PDF",
            FileType::Text => "plain text",
            FileType::Markdown => "Markdown",
        };
        f.write_str(name)
    }
}
