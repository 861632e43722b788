use serde::{Deserialize, Serialize};

/// One original text and two candidate summaries, in prompt order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgmentRequest {
    pub id: String,
    pub original_text: String,
    /// Candidate listed first ("1. "); receives the first score.
    pub candidate_a: String,
    /// Candidate listed second ("2. "); receives the second score.
    pub candidate_b: String,
}

/// Judge scores for a request, positionally matched to the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JudgmentResult {
    pub score_a: i64,
    pub score_b: i64,
}

impl JudgmentResult {
    pub fn new(score_a: i64, score_b: i64) -> Self {
        Self { score_a, score_b }
    }

    /// First two scores, if there are at least two.
    pub fn from_scores(scores: &[i64]) -> Option<Self> {
        match scores {
            [a, b, ..] => Some(Self::new(*a, *b)),
            _ => None,
        }
    }

    pub fn first_wins(&self) -> bool {
        self.score_a > self.score_b
    }

    pub fn is_tie(&self) -> bool {
        self.score_a == self.score_b
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Ordered chat turns; serialized as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(pub Vec<Turn>);

impl Transcript {
    /// System prompt, instruction-prefixed user prompt, assistant reply.
    pub fn summarization(original_text: &str, assistant: &str) -> Self {
        Self(vec![
            Turn::new(Role::System, crate::prompts::SYSTEM_MSG),
            Turn::new(
                Role::User,
                format!("{}{}", crate::prompts::USER_PROMPT_PREFIX, original_text),
            ),
            Turn::new(Role::Assistant, assistant),
        ])
    }

    pub fn turns(&self) -> &[Turn] {
        &self.0
    }

    /// Content of the last assistant turn.
    pub fn assistant(&self) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|t| t.role == Role::Assistant)
            .map(|t| t.content.as_str())
    }
}

/// A DPO training pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub id: String,
    pub chosen: Transcript,
    pub rejected: Transcript,
}

/// Win rate of the first-listed candidate over one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRateReport {
    pub filename: String,
    /// `None` when no request was judged.
    pub win_rate: Option<f64>,
    pub wins: u64,
    pub valid_judgments: u64,
}

impl WinRateReport {
    pub fn from_counts(filename: impl Into<String>, wins: u64, valid_judgments: u64) -> Self {
        let win_rate = if valid_judgments > 0 {
            Some(wins as f64 / valid_judgments as f64)
        } else {
            None
        };
        Self {
            filename: filename.into(),
            win_rate,
            wins,
            valid_judgments,
        }
    }
}

/// Per-file line accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStats {
    /// Non-empty lines read.
    pub lines: u64,
    /// Lines that received a judgment.
    pub judged: u64,
    /// Lines dropped because the judge gave no usable scores.
    pub judge_failures: u64,
    /// Lines dropped because they could not be decomposed.
    pub malformed: u64,
}

impl LineStats {
    pub fn skipped(&self) -> u64 {
        self.judge_failures + self.malformed
    }

    pub fn merge(&mut self, other: &LineStats) {
        self.lines += other.lines;
        self.judged += other.judged;
        self.judge_failures += other.judge_failures;
        self.malformed += other.malformed;
    }
}
