//! Résumé-vs-posting analysis: local score and skills plus the collaborator's read

use crate::error::{Result, ResumatchError};
use crate::llm::types::{AtsReport, CollaboratorAnalysis};
use crate::llm::AiCollaborator;
use crate::processing::similarity::cosine_similarity;
use crate::processing::taxonomy::{SkillCategory, SkillTaxonomy};
use crate::storage::{History, HistoryEntry};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

const JOB_TITLE_MAX_CHARS: usize = 40;

/// One completed analysis, as stored in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    /// Cosine similarity, 0-100
    pub score: f64,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub extra_skills: Vec<String>,
    #[serde(default)]
    pub grouped_skills: Vec<SkillCategory>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub job_title: String,
}

impl HistoryEntry for AnalysisRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Reject empty or whitespace-only documents
pub fn validate_inputs(resume_text: &str, job_description: &str) -> Result<()> {
    if resume_text.trim().is_empty() {
        return Err(ResumatchError::Validation("Resume text is empty".to_string()));
    }
    if job_description.trim().is_empty() {
        return Err(ResumatchError::Validation(
            "Job description is empty".to_string(),
        ));
    }
    Ok(())
}

/// First line of the posting as written, at most 40 characters
pub fn job_title(job_description: &str) -> String {
    let first_line = job_description.split('\n').next().unwrap_or_default();
    first_line
        .strip_suffix('\r')
        .unwrap_or(first_line)
        .graphemes(true)
        .take(JOB_TITLE_MAX_CHARS)
        .collect()
}

/// Combine the local score and skill matches with a collaborator analysis.
///
/// `matchedSkills` is computed locally; every other qualitative field is taken
/// from `analysis` as returned.
pub fn build_record(
    taxonomy: &SkillTaxonomy,
    resume_text: &str,
    job_description: &str,
    analysis: CollaboratorAnalysis,
) -> Result<AnalysisRecord> {
    validate_inputs(resume_text, job_description)?;

    let score = cosine_similarity(resume_text, job_description);
    let matched_skills = taxonomy.matched_skills(resume_text, job_description);
    debug!(
        "Local match: score {:.1}, {} matched skills",
        score,
        matched_skills.len()
    );

    Ok(AnalysisRecord {
        id: uuid::Uuid::new_v4().to_string(),
        timestamp: chrono::Utc::now().timestamp_millis(),
        score,
        matched_skills,
        missing_skills: analysis.missing_skills,
        extra_skills: analysis.extra_skills,
        grouped_skills: analysis.grouped_skills,
        suggestions: analysis.suggestions,
        summary: analysis.summary,
        job_title: job_title(job_description),
    })
}

/// Coordinates the local engine with an [`AiCollaborator`]
pub struct MatchingPipeline<C> {
    collaborator: C,
    taxonomy: Arc<SkillTaxonomy>,
}

impl<C: AiCollaborator> MatchingPipeline<C> {
    pub fn new(collaborator: C, taxonomy: Arc<SkillTaxonomy>) -> Self {
        Self {
            collaborator,
            taxonomy,
        }
    }

    pub fn collaborator(&self) -> &C {
        &self.collaborator
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        &self.taxonomy
    }

    /// Validate, make one collaborator call, then build the record.
    ///
    /// Invalid input never reaches the collaborator.
    pub async fn analyze(&self, resume_text: &str, job_description: &str) -> Result<AnalysisRecord> {
        validate_inputs(resume_text, job_description)?;

        let analysis = self
            .collaborator
            .analyze(resume_text, job_description)
            .await?;

        build_record(&self.taxonomy, resume_text, job_description, analysis)
    }

    /// [`analyze`](Self::analyze) and prepend the result to the analysis history.
    /// Nothing is written when the analysis fails.
    pub async fn analyze_and_store(
        &self,
        resume_text: &str,
        job_description: &str,
        history: &History,
    ) -> Result<AnalysisRecord> {
        let record = self.analyze(resume_text, job_description).await?;
        history.analyses.append(record.clone())?;
        info!("Analysis {} stored (score {:.1})", record.id, record.score);
        Ok(record)
    }
}

/// ATS audit of a résumé on its own; an empty résumé is rejected without a call
pub async fn audit_resume<C: AiCollaborator>(collaborator: &C, resume_text: &str) -> Result<AtsReport> {
    if resume_text.trim().is_empty() {
        return Err(ResumatchError::Validation("Resume text is empty".to_string()));
    }
    let report = collaborator.ats_audit(resume_text).await?.clamped();
    debug!("ATS audit total {:.0}", report.total);
    Ok(report)
}
