//! Local text-matching engine

pub mod pipeline;
pub mod similarity;
pub mod taxonomy;
pub mod tokenizer;
pub mod vectorizer;

pub use pipeline::{AnalysisRecord, MatchingPipeline};
pub use similarity::cosine_similarity;
pub use taxonomy::{SkillCategory, SkillTaxonomy};
pub use tokenizer::{tokenize, Tokenizer};
pub use vectorizer::TermFrequency;
