//! Routes document paths to the matching extractor, caching extracted text

use crate::error::{Result, ResumatchError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(ResumatchError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let key = path.canonicalize()?;
        if self.enable_cache {
            if let Some(cached) = self.cache.get(&key) {
                debug!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        let file_type = FileType::detect(path)?;
        info!("Extracting {} text from {}", file_type, path.display());

        let text = match file_type {
            FileType::Pdf => PdfExtractor.extract(path).await?,
            FileType::Text => PlainTextExtractor.extract(path).await?,
            FileType::Markdown => MarkdownExtractor.extract(path).await?,
        };
        debug!("Extracted {} characters", text.chars().count());

        if self.enable_cache {
            self.cache.insert(key, text.clone());
        }

        Ok(text)
    }

    /// Extract a résumé and a job description together
    pub async fn extract_pair(&mut self, resume: &Path, job: &Path) -> Result<(String, String)> {
        let resume_text = self.extract_text(resume).await?;
        let job_text = self.extract_text(job).await?;
        Ok((resume_text, job_text))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
