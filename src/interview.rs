//! Interview practice: question generation, answer grading and session bookkeeping

use crate::error::{Result, ResumatchError};
use crate::llm::types::InterviewFeedback;
use crate::llm::AiCollaborator;
use crate::storage::HistoryEntry;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Behavioural questions offered besides the tailored ones
pub const COMMON_QUESTIONS: [&str; 6] = [
    "Tell me about yourself and your background.",
    "Why are you interested in this specific role and company?",
    "Describe a time you faced a significant technical challenge.",
    "What are your greatest professional strengths and weaknesses?",
    "How do you handle conflict within a team environment?",
    "Where do you see your career heading in the next 5 years?",
];

pub const EMPTY_QUESTION_FALLBACK: &str =
    "Could you describe a technical challenge you recently solved?";
pub const FAILED_QUESTION_FALLBACK: &str =
    "Could you elaborate on your relevant experience for this position?";

const DEFAULT_SESSION_TITLE: &str = "Role Practice";

/// One answered question and its grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeTurn {
    pub question: String,
    pub answer: String,
    pub feedback: InterviewFeedback,
    /// Epoch milliseconds
    pub timestamp: i64,
}

/// A finished practice session, as stored in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    pub id: String,
    pub timestamp: i64,
    pub job_title: String,
    pub turns: Vec<PracticeTurn>,
    /// Rounded mean of the turn scores
    pub overall_score: u32,
}

impl HistoryEntry for InterviewSession {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct InterviewCoach<C> {
    collaborator: C,
}

impl<C: AiCollaborator> InterviewCoach<C> {
    pub fn new(collaborator: C) -> Self {
        Self { collaborator }
    }

    /// A tailored question; never fails.
    ///
    /// Falls back to a generic question when the collaborator is silent or
    /// unreachable.
    pub async fn next_question(&self, resume_text: &str, job_description: &str) -> String {
        match self
            .collaborator
            .interview_question(resume_text, job_description)
            .await
        {
            Ok(question) if question.trim().is_empty() => EMPTY_QUESTION_FALLBACK.to_string(),
            Ok(question) => question.trim().to_string(),
            Err(e) => {
                warn!("Question generation failed, using fallback: {}", e);
                FAILED_QUESTION_FALLBACK.to_string()
            }
        }
    }

    /// Grade `answer` and wrap it up as a turn
    pub async fn evaluate(
        &self,
        question: &str,
        answer: &str,
        job_description: &str,
    ) -> Result<PracticeTurn> {
        if question.trim().is_empty() {
            return Err(ResumatchError::Validation("Question is empty".to_string()));
        }
        if answer.trim().is_empty() {
            return Err(ResumatchError::Validation("Answer is empty".to_string()));
        }

        let feedback = self
            .collaborator
            .evaluate_answer(question, answer, job_description)
            .await?
            .clamped();
        debug!("Answer scored {:.0}", feedback.score);

        Ok(PracticeTurn {
            question: question.to_string(),
            answer: answer.to_string(),
            feedback,
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }
}

/// Turns collected so far in a running session
#[derive(Debug, Clone)]
pub struct PracticeSession {
    job_title: String,
    turns: Vec<PracticeTurn>,
}

impl PracticeSession {
    pub fn new(job_title: impl Into<String>) -> Self {
        let job_title = job_title.into();
        let job_title = if job_title.trim().is_empty() {
            DEFAULT_SESSION_TITLE.to_string()
        } else {
            job_title
        };
        Self {
            job_title,
            turns: Vec::new(),
        }
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn turns(&self) -> &[PracticeTurn] {
        &self.turns
    }

    pub fn record(&mut self, turn: PracticeTurn) {
        self.turns.push(turn);
    }

    /// Close the session; `None` if nothing was answered
    pub fn finish(self) -> Option<InterviewSession> {
        if self.turns.is_empty() {
            return None;
        }

        let total: f64 = self.turns.iter().map(|t| t.feedback.score).sum();
        let mean = total / self.turns.len() as f64;

        Some(InterviewSession {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            job_title: self.job_title,
            turns: self.turns,
            overall_score: mean.round().clamp(0.0, 100.0) as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::{AtsReport, CollaboratorAnalysis};

    enum Reply {
        Text(&'static str),
        Fail,
    }

    struct StubCollaborator {
        question: Reply,
        score: f64,
    }

    impl AiCollaborator for StubCollaborator {
        async fn analyze(&self, _resume: &str, _job: &str) -> Result<CollaboratorAnalysis> {
            Ok(CollaboratorAnalysis::default())
        }

        async fn interview_question(&self, _resume: &str, _job: &str) -> Result<String> {
            match self.question {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Fail => Err(ResumatchError::Collaborator("timeout".to_string())),
            }
        }

        async fn evaluate_answer(
            &self,
            _question: &str,
            answer: &str,
            _job: &str,
        ) -> Result<InterviewFeedback> {
            if answer == "boom" {
                return Err(ResumatchError::Collaborator("HTTP 500".to_string()));
            }
            Ok(InterviewFeedback {
                score: self.score,
                feedback: "Clear and concrete".to_string(),
                strengths: vec!["Structure".to_string()],
            })
        }

        async fn ats_audit(&self, _resume: &str) -> Result<AtsReport> {
            Ok(AtsReport::default())
        }
    }

    fn coach(question: Reply, score: f64) -> InterviewCoach<StubCollaborator> {
        InterviewCoach::new(StubCollaborator { question, score })
    }

    fn turn(score: f64) -> PracticeTurn {
        PracticeTurn {
            question: "Q".to_string(),
            answer: "A".to_string(),
            feedback: InterviewFeedback {
                score,
                ..Default::default()
            },
            timestamp: 0,
        }
    }

    #[tokio::test]
    async fn test_tailored_question_trimmed() {
        let coach = coach(Reply::Text("  How would you shard Postgres?\n"), 0.0);
        assert_eq!(
            coach.next_question("resume", "job").await,
            "How would you shard Postgres?"
        );
    }

    #[tokio::test]
    async fn test_question_fallbacks() {
        let coach_empty = coach(Reply::Text("   "), 0.0);
        assert_eq!(
            coach_empty.next_question("resume", "job").await,
            EMPTY_QUESTION_FALLBACK
        );

        let coach_failed = coach(Reply::Fail, 0.0);
        assert_eq!(
            coach_failed.next_question("resume", "job").await,
            FAILED_QUESTION_FALLBACK
        );
    }

    #[tokio::test]
    async fn test_evaluate_builds_turn() {
        let coach = coach(Reply::Text(""), 150.0);
        let turn = coach.evaluate("Why Rust?", "Ownership.", "job").await.unwrap();

        assert_eq!(turn.question, "Why Rust?");
        assert_eq!(turn.answer, "Ownership.");
        assert_eq!(turn.feedback.score, 100.0);
        assert_eq!(turn.feedback.strengths, vec!["Structure"]);
        assert!(turn.timestamp > 0);
    }

    #[tokio::test]
    async fn test_evaluate_rejects_empty() {
        let coach = coach(Reply::Text(""), 50.0);
        assert!(coach.evaluate("Q", "  ", "job").await.unwrap_err().is_validation());
        assert!(coach.evaluate("", "answer", "job").await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_evaluate_propagates_collaborator_error() {
        let coach = coach(Reply::Text(""), 50.0);
        let result = coach.evaluate("Q", "boom", "job").await;
        assert!(matches!(result, Err(ResumatchError::Collaborator(_))));
    }

    #[test]
    fn test_session_title_default() {
        assert_eq!(PracticeSession::new("").job_title(), "Role Practice");
        assert_eq!(PracticeSession::new("Backend Engineer").job_title(), "Backend Engineer");
    }

    #[test]
    fn test_empty_session_not_finalized() {
        assert!(PracticeSession::new("Backend").finish().is_none());
    }

    #[test]
    fn test_overall_score_is_rounded_mean() {
        let mut session = PracticeSession::new("Backend");
        session.record(turn(70.0));
        session.record(turn(85.0));
        session.record(turn(90.0));

        let finished = session.finish().unwrap();
        // 245 / 3 = 81.67
        assert_eq!(finished.overall_score, 82);
        assert_eq!(finished.turns.len(), 3);
        assert_eq!(finished.job_title, "Backend");
    }

    #[test]
    fn test_session_json_keys() {
        let mut session = PracticeSession::new("Backend");
        session.record(turn(60.0));
        let json = serde_json::to_value(session.finish().unwrap()).unwrap();

        assert!(json.get("jobTitle").is_some());
        assert!(json.get("overallScore").is_some());
        assert_eq!(json["turns"][0]["feedback"]["score"], 60.0);
    }
}
