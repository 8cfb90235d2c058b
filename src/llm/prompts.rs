//! Prompt templates for the AI collaborator

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub analysis: String,
    pub ats_audit: String,
    pub interview_question: String,
    pub answer_evaluation: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            analysis: ANALYSIS_TEMPLATE.to_string(),
            ats_audit: ATS_AUDIT_TEMPLATE.to_string(),
            interview_question: INTERVIEW_QUESTION_TEMPLATE.to_string(),
            answer_evaluation: ANSWER_EVALUATION_TEMPLATE.to_string(),
        }
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptParams {
    pub resume_content: String,
    pub job_content: String,
    pub question: String,
    pub answer: String,
}

impl PromptParams {
    pub fn for_documents(resume: &str, job: &str) -> Self {
        Self {
            resume_content: resume.to_string(),
            job_content: job.to_string(),
            ..Default::default()
        }
    }
}

impl PromptTemplates {
    pub fn render_analysis(&self, params: &PromptParams) -> String {
        Self::render(&self.analysis, params)
    }

    pub fn render_ats_audit(&self, params: &PromptParams) -> String {
        Self::render(&self.ats_audit, params)
    }

    pub fn render_interview_question(&self, params: &PromptParams) -> String {
        Self::render(&self.interview_question, params)
    }

    pub fn render_answer_evaluation(&self, params: &PromptParams) -> String {
        Self::render(&self.answer_evaluation, params)
    }

    // Single pass, so a résumé containing "{job}" is left alone
    fn render(template: &str, params: &PromptParams) -> String {
        let mut out = String::with_capacity(template.len() + params.resume_content.len() + params.job_content.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            let (value, consumed) = if tail.starts_with("{resume}") {
                (params.resume_content.as_str(), "{resume}".len())
            } else if tail.starts_with("{job}") {
                (params.job_content.as_str(), "{job}".len())
            } else if tail.starts_with("{question}") {
                (params.question.as_str(), "{question}".len())
            } else if tail.starts_with("{answer}") {
                (params.answer.as_str(), "{answer}".len())
            } else {
                ("{", 1)
            };
            out.push_str(value);
            rest = &tail[consumed..];
        }
        out.push_str(rest);
        out
    }
}

const ANALYSIS_TEMPLATE: &str = r#"Analyze the following Resume against the Job Description.
1. Extract skills and group them into these categories: Programming, Frameworks, Databases, Tools, AI/ML.
2. Identify skills present in the Job Description but missing in the Resume.
3. Identify extra skills in the Resume not required by the Job Description.
4. Provide a 2-sentence summary of the candidate's fitness.
5. Provide 3 specific, actionable suggestions for improving the resume for this specific role.

Resume: {resume}
Job Description: {job}"#;

const ATS_AUDIT_TEMPLATE: &str = r#"Perform a deep ATS (Applicant Tracking System) audit on this resume.
Check for:
- Formatting (is it parseable?)
- Keyword density (generic business/tech terms)
- Readability (structure, dates, bullet points)

Resume: {resume}"#;

const INTERVIEW_QUESTION_TEMPLATE: &str = r#"Based on the following resume and job description, generate one specific and challenging interview question for this candidate.
Reply with the question only.

Resume: {resume}
Job Description: {job}"#;

const ANSWER_EVALUATION_TEMPLATE: &str = r#"Evaluate the candidate's response to the interview question within the context of the role requirements.

Question: {question}
Answer: {answer}
Job Description: {job}"#;
