//! AI collaborator integration
//!
//! The engine cannot judge missing skills, write suggestions or grade an
//! interview answer on its own; those come from a generative model behind the
//! [`AiCollaborator`] trait. [`gemini::GeminiClient`] is the production
//! implementation and tests substitute their own.

pub mod gemini;
pub mod prompts;
pub mod types;

use crate::error::Result;
use std::future::Future;
use types::{AtsReport, CollaboratorAnalysis, InterviewFeedback};

pub trait AiCollaborator {
    /// Gap analysis of a résumé against a job description
    fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> impl Future<Output = Result<CollaboratorAnalysis>> + Send;

    /// One tailored interview question; may be empty if the model said nothing
    fn interview_question(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Grade an answer to `question` in the context of the role
    fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        job_description: &str,
    ) -> impl Future<Output = Result<InterviewFeedback>> + Send;

    /// ATS compatibility audit of a résumé
    fn ats_audit(&self, resume_text: &str) -> impl Future<Output = Result<AtsReport>> + Send;
}
