use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Feedback stored for a blank answer; the oracle is never consulted for it.
pub const NO_ANSWER_FEEDBACK: &str = "No answer provided.";

// ────────────────────────────────────────────────────────────────────────────
// Candidate intake
// ────────────────────────────────────────────────────────────────────────────

/// The raw candidate intake form, as typed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub experience_years: u32,
    pub desired_position: String,
    pub location: String,
    /// Comma-separated, e.g. "Python, Django, React".
    pub tech_stack: String,
}

/// Candidate profile. Built once at submission; immutable for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub experience_years: u32,
    pub desired_position: String,
    pub location: String,
    pub tech_stack: Vec<String>,
}

/// Splits the comma-separated tech stack, trimming items and dropping blanks.
pub fn parse_tech_stack(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

impl ProfileForm {
    /// Validates required fields (full name, email, tech stack, desired position).
    ///
    /// Returns `None` when any of them is blank.
    pub fn into_profile(self) -> Option<CandidateProfile> {
        let tech_stack = parse_tech_stack(&self.tech_stack);
        let full_name = self.full_name.trim().to_string();
        let email = self.email.trim().to_string();
        let desired_position = self.desired_position.trim().to_string();

        if full_name.is_empty()
            || email.is_empty()
            || tech_stack.is_empty()
            || desired_position.is_empty()
        {
            return None;
        }

        Some(CandidateProfile {
            full_name,
            email,
            phone: self.phone.trim().to_string(),
            experience_years: self.experience_years,
            desired_position,
            location: self.location.trim().to_string(),
            tech_stack,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Session aggregate
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Greeting,
    QuestionAnswering,
}

/// One answer slot, parallel to `InterviewSession::questions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_index: usize,
    /// Empty means "no answer provided".
    pub answer_text: String,
    /// 0..=10
    pub score: u8,
    pub feedback: String,
}

impl AnswerRecord {
    pub fn empty(question_index: usize) -> Self {
        Self {
            question_index,
            answer_text: String::new(),
            score: 0,
            feedback: String::new(),
        }
    }
}

/// The downloadable PDF artifact of a completed interview.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewReport {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Everything one connected client's interview holds. Reset to `default()` on exit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewSession {
    pub profile: Option<CandidateProfile>,
    pub questions: Vec<String>,
    pub answers: Vec<AnswerRecord>,
    pub stage: Stage,
    pub form_submitted: bool,
    /// Every question shown in this session; excluded when regenerating.
    pub seen_questions: Vec<String>,
    /// True once answers have been scored and results can be shown.
    pub evaluated: bool,
    pub report: Option<InterviewReport>,
    pub report_error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

impl InterviewSession {
    /// Replaces the question list and resets every answer slot to empty.
    pub fn load_questions(&mut self, questions: Vec<String>) {
        for q in &questions {
            if !self.seen_questions.contains(q) {
                self.seen_questions.push(q.clone());
            }
        }
        self.answers = (0..questions.len()).map(AnswerRecord::empty).collect();
        self.questions = questions;
        self.evaluated = false;
        self.report = None;
        self.report_error = None;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Presentation
// ────────────────────────────────────────────────────────────────────────────

/// Visual severity of a score. Purely presentational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Acceptable,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 8 {
            ScoreBand::Excellent
        } else if score >= 5 {
            ScoreBand::Acceptable
        } else {
            ScoreBand::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-visible message produced by a session transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Messages collected while a transition runs, in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Notices(Vec<Notice>);

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.0.push(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Notice> {
        self.0.iter().filter(|n| n.level == NoticeLevel::Error)
    }

    pub fn as_slice(&self) -> &[Notice] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProfileForm {
        ProfileForm {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+1 234".to_string(),
            experience_years: 3,
            desired_position: "Backend Engineer".to_string(),
            location: "Bengaluru".to_string(),
            tech_stack: "Python, Django, , React ".to_string(),
        }
    }

    #[test]
    fn test_parse_tech_stack_trims_and_drops_blanks() {
        assert_eq!(
            parse_tech_stack(" Python, Django, , React "),
            vec!["Python", "Django", "React"]
        );
        assert!(parse_tech_stack(" , ,").is_empty());
    }

    #[test]
    fn test_into_profile_valid() {
        let profile = form().into_profile().unwrap();
        assert_eq!(profile.full_name, "Jane Doe");
        assert_eq!(profile.tech_stack.len(), 3);
        assert_eq!(profile.experience_years, 3);
    }

    #[test]
    fn test_into_profile_rejects_missing_required_fields() {
        let mut f = form();
        f.email = String::new();
        assert!(f.into_profile().is_none());

        let mut f = form();
        f.tech_stack = " , ".to_string();
        assert!(f.into_profile().is_none());

        let mut f = form();
        f.desired_position = "   ".to_string();
        assert!(f.into_profile().is_none());
    }

    #[test]
    fn test_optional_fields_may_be_blank() {
        let mut f = form();
        f.phone = String::new();
        f.location = String::new();
        assert!(f.into_profile().is_some());
    }

    #[test]
    fn test_score_band_thresholds() {
        assert_eq!(ScoreBand::from_score(10), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(8), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(7), ScoreBand::Acceptable);
        assert_eq!(ScoreBand::from_score(5), ScoreBand::Acceptable);
        assert_eq!(ScoreBand::from_score(4), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Poor);
    }

    #[test]
    fn test_load_questions_keeps_answers_parallel() {
        let mut session = InterviewSession::default();
        session.load_questions(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(session.answers.len(), session.questions.len());
        assert_eq!(session.answers[1].question_index, 1);

        session.load_questions(vec!["c".to_string(), "a".to_string()]);
        assert_eq!(session.seen_questions, vec!["a", "b", "c"]);
    }
}
