//! Document ingestion: résumés and job descriptions from PDF, text or Markdown files

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use file_detector::FileType;
pub use manager::InputManager;
