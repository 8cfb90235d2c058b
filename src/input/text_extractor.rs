//! Text extraction from the supported document formats

use crate::error::{Result, ResumatchError};
use pulldown_cmark::{Event, Options, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        let display = path.display().to_string();

        // pdf-extract is CPU bound and synchronous
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| ResumatchError::PdfExtraction(format!("Extraction task failed: {}", e)))?
            .map_err(|e| {
                ResumatchError::PdfExtraction(format!(
                    "Failed to extract text from PDF '{}': {}",
                    display, e
                ))
            })?;

        Ok(normalize_lines(&text))
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content
            .trim_start_matches('\u{feff}')
            .replace("\r\n", "\n"))
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&content))
    }
}

/// Plain text of a Markdown document, one block per line
pub fn markdown_to_text(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let mut out = String::with_capacity(markdown.len());

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak | Event::Rule => out.push('\n'),
            Event::End(Tag::TableCell) => out.push(' '),
            Event::End(
                Tag::Paragraph
                | Tag::Heading(..)
                | Tag::Item
                | Tag::CodeBlock(_)
                | Tag::TableHead
                | Tag::TableRow,
            ) => out.push('\n'),
            _ => {}
        }
    }

    normalize_lines(&out)
}

/// Trim every line and drop blank ones
fn normalize_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_markdown_to_text() {
        let markdown = "# Jane Doe\n\nSenior **Rust** engineer.\n\n- Built `tokio` services\n- Led a team of 4\n\n---\n\n<div>hidden</div>\n";
        let text = markdown_to_text(markdown);

        assert_eq!(
            text,
            "Jane Doe\nSenior Rust engineer.\nBuilt tokio services\nLed a team of 4"
        );
    }

    #[test]
    fn test_markdown_table() {
        let text = markdown_to_text("| Skill | Years |\n|---|---|\n| Go | 3 |\n");
        assert_eq!(text, "Skill Years\nGo 3");
    }

    #[tokio::test]
    async fn test_plain_text_normalizes_line_endings() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all("\u{feff}Python developer\r\nAWS\r\n".as_bytes()).unwrap();

        let text = PlainTextExtractor.extract(file.path()).await.unwrap();
        assert_eq!(text, "Python developer\nAWS\n");
    }

    #[tokio::test]
    async fn test_invalid_pdf() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a pdf").unwrap();

        let result = PdfExtractor.extract(file.path()).await;
        assert!(matches!(result, Err(ResumatchError::PdfExtraction(_))));
    }
}
