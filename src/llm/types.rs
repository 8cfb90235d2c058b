//! Typed collaborator responses
//!
//! Every field defaults when the model omits it or sends `null`, so a
//! partial JSON object still deserializes into a usable value.

use crate::processing::taxonomy::SkillCategory;
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Qualitative résumé-vs-posting analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollaboratorAnalysis {
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub grouped_skills: Vec<SkillCategory>,
    #[serde(deserialize_with = "null_as_default")]
    pub missing_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub extra_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub suggestions: Vec<String>,
}

/// Evaluation of one interview answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewFeedback {
    /// 0-100
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub feedback: String,
    #[serde(deserialize_with = "null_as_default")]
    pub strengths: Vec<String>,
}

impl InterviewFeedback {
    /// Feedback used when the model returned no content at all
    pub fn unavailable() -> Self {
        Self {
            score: 0.0,
            feedback: "Evaluation unavailable".to_string(),
            strengths: Vec::new(),
        }
    }

    pub(crate) fn clamped(mut self) -> Self {
        self.score = clamp_score(self.score);
        self
    }
}

/// Applicant-tracking-system audit of a résumé on its own
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtsReport {
    #[serde(deserialize_with = "null_as_default")]
    pub total: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub formatting: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub readability: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub findings: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub improvements: Vec<String>,
}

impl AtsReport {
    pub(crate) fn clamped(mut self) -> Self {
        self.total = clamp_score(self.total);
        self.formatting = clamp_score(self.formatting);
        self.keywords = clamp_score(self.keywords);
        self.readability = clamp_score(self.readability);
        self
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_missing_fields_default() {
        let parsed: CollaboratorAnalysis =
            serde_json::from_str(r#"{"summary": "Strong fit", "missingSkills": ["Kafka"]}"#)
                .unwrap();

        assert_eq!(parsed.summary, "Strong fit");
        assert_eq!(parsed.missing_skills, vec!["Kafka"]);
        assert!(parsed.extra_skills.is_empty());
        assert!(parsed.grouped_skills.is_empty());
        assert!(parsed.suggestions.is_empty());
    }

    #[test]
    fn test_null_fields_default() {
        let parsed: CollaboratorAnalysis = serde_json::from_str(
            r#"{"summary": "ok", "missingSkills": null, "groupedSkills": [{"category": "Tools", "skills": null}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.summary, "ok");
        assert!(parsed.missing_skills.is_empty());
        assert!(parsed.grouped_skills[0].skills.is_empty());

        let feedback: InterviewFeedback =
            serde_json::from_str(r#"{"score": null, "feedback": null, "strengths": null}"#).unwrap();
        assert_eq!(feedback, InterviewFeedback::default());

        let report: AtsReport =
            serde_json::from_str(r#"{"total": 70, "findings": null, "keywords": null}"#).unwrap();
        assert_eq!(report.total, 70.0);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_analysis_empty_object() {
        let parsed: CollaboratorAnalysis = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, CollaboratorAnalysis::default());
    }

    #[test]
    fn test_grouped_skills_shape() {
        let parsed: CollaboratorAnalysis = serde_json::from_str(
            r#"{"groupedSkills": [{"category": "Programming", "skills": ["Rust"]}, {"category": "Tools"}]}"#,
        )
        .unwrap();

        assert_eq!(parsed.grouped_skills.len(), 2);
        assert_eq!(parsed.grouped_skills[0].skills, vec!["Rust"]);
        assert!(parsed.grouped_skills[1].skills.is_empty());
    }

    #[test]
    fn test_feedback_clamped() {
        let feedback: InterviewFeedback =
            serde_json::from_str(r#"{"score": 140, "feedback": "ok"}"#).unwrap();
        assert_eq!(feedback.clamped().score, 100.0);

        let feedback = InterviewFeedback {
            score: -3.0,
            ..Default::default()
        };
        assert_eq!(feedback.clamped().score, 0.0);
    }

    #[test]
    fn test_ats_report_clamped() {
        let report: AtsReport =
            serde_json::from_str(r#"{"total": 82.5, "formatting": 120, "findings": ["Uses tables"]}"#)
                .unwrap();
        let report = report.clamped();

        assert_eq!(report.total, 82.5);
        assert_eq!(report.formatting, 100.0);
        assert_eq!(report.keywords, 0.0);
        assert_eq!(report.findings, vec!["Uses tables"]);
    }
}
