use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::judge::RetryingJudge;
use crate::model::{JudgmentRequest, JudgmentResult, PreferenceRecord, Transcript};
use crate::prompts::judge_prompt_for;

/// Which candidate is chosen when both scores are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Choose the candidate listed first.
    PreferFirst,
    /// Choose the candidate listed second (historical behavior).
    #[default]
    PreferSecond,
}

/// Which candidate ended up chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

impl TieBreak {
    pub fn chosen_side(self, result: &JudgmentResult) -> Side {
        if result.score_a > result.score_b {
            Side::First
        } else if result.score_b > result.score_a {
            Side::Second
        } else {
            match self {
                TieBreak::PreferFirst => Side::First,
                TieBreak::PreferSecond => Side::Second,
            }
        }
    }
}

/// Chosen/rejected pair for scored candidates. Pure; no judge call.
pub fn preference_from_scores(
    request: &JudgmentRequest,
    result: &JudgmentResult,
    tie_break: TieBreak,
) -> PreferenceRecord {
    let (chosen, rejected) = match tie_break.chosen_side(result) {
        Side::First => (&request.candidate_a, &request.candidate_b),
        Side::Second => (&request.candidate_b, &request.candidate_a),
    };
    PreferenceRecord {
        id: request.id.clone(),
        chosen: Transcript::summarization(&request.original_text, chosen),
        rejected: Transcript::summarization(&request.original_text, rejected),
    }
}

/// Turns judged candidate pairs into DPO preference records.
#[derive(Clone)]
pub struct PreferenceBuilder {
    judge: RetryingJudge,
    tie_break: TieBreak,
}

impl PreferenceBuilder {
    pub fn new(judge: RetryingJudge, tie_break: TieBreak) -> Self {
        Self { judge, tie_break }
    }

    /// `None` when the judge produced no usable scores; the caller skips the record.
    pub async fn build(&self, request: &JudgmentRequest) -> Option<PreferenceRecord> {
        let prompt = judge_prompt_for(request);
        let result = self.judge.judge_with_retry(&prompt).await?;
        debug!(
            id = %request.id,
            score_a = result.score_a,
            score_b = result.score_b,
            tie = result.is_tie(),
            "building preference"
        );
        Some(preference_from_scores(request, &result, self.tie_break))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::model::Role;
    use crate::providers::fake::FakeJudgeClient;
    use std::sync::Arc;
    use std::time::Duration;

    fn request() -> JudgmentRequest {
        JudgmentRequest {
            id: "r1".into(),
            original_text: "Some long article.".into(),
            candidate_a: "Good summary".into(),
            candidate_b: "Bad summary".into(),
        }
    }

    fn builder(reply: &str, tie_break: TieBreak) -> PreferenceBuilder {
        let client = Arc::new(FakeJudgeClient::new().with_response(reply));
        PreferenceBuilder::new(
            RetryingJudge::new(client, RetryPolicy::new(3, Duration::ZERO)),
            tie_break,
        )
    }

    #[tokio::test]
    async fn higher_score_is_chosen() {
        let rec = builder("summary1: [[8]], summary2: [[2]]", TieBreak::default())
            .build(&request())
            .await
            .unwrap();
        assert_eq!(rec.id, "r1");
        assert_eq!(rec.chosen.assistant(), Some("Good summary"));
        assert_eq!(rec.rejected.assistant(), Some("Bad summary"));
    }

    #[tokio::test]
    async fn second_candidate_wins_when_scored_higher() {
        let rec = builder("[[1]] [[9]]", TieBreak::PreferFirst)
            .build(&request())
            .await
            .unwrap();
        assert_eq!(rec.chosen.assistant(), Some("Bad summary"));
        assert_eq!(rec.rejected.assistant(), Some("Good summary"));
    }

    #[tokio::test]
    async fn tie_defaults_to_second_candidate_every_run() {
        for _ in 0..5 {
            let rec = builder("[[5]] [[5]]", TieBreak::default())
                .build(&request())
                .await
                .unwrap();
            assert_eq!(rec.chosen.assistant(), Some("Bad summary"));
            assert_eq!(rec.rejected.assistant(), Some("Good summary"));
        }
    }

    #[tokio::test]
    async fn tie_break_is_overridable() {
        let rec = builder("[[5]] [[5]]", TieBreak::PreferFirst)
            .build(&request())
            .await
            .unwrap();
        assert_eq!(rec.chosen.assistant(), Some("Good summary"));
    }

    #[tokio::test]
    async fn judge_failure_yields_none() {
        let rec = builder("no scores here", TieBreak::default())
            .build(&request())
            .await;
        assert!(rec.is_none());
    }

    #[test]
    fn transcripts_differ_only_in_assistant_turn() {
        let rec = preference_from_scores(
            &request(),
            &JudgmentResult::new(8, 2),
            TieBreak::default(),
        );
        let chosen = rec.chosen.turns();
        let rejected = rec.rejected.turns();
        assert_eq!(chosen.len(), 3);
        assert_eq!(chosen[..2], rejected[..2]);
        assert_eq!(chosen[0].role, Role::System);
        assert_eq!(chosen[0].content, crate::prompts::SYSTEM_MSG);
        assert_eq!(
            chosen[1].content,
            format!("{}Some long article.", crate::prompts::USER_PROMPT_PREFIX)
        );
        assert_ne!(chosen[2].content, rejected[2].content);
    }

    #[test]
    fn cjk_record_round_trips() {
        let req = JudgmentRequest {
            id: "zh-1".into(),
            original_text: "英國政府的專家顧問說，這個變種病毒更容易傳播。".into(),
            candidate_a: "專家稱變種病毒傳播更快".into(),
            candidate_b: "英國天氣很好".into(),
        };
        let rec = preference_from_scores(&req, &JudgmentResult::new(9, 1), TieBreak::default());
        let line = serde_json::to_string(&rec).unwrap();
        assert!(line.contains("專家稱變種病毒傳播更快"), "non-ASCII must not be escaped");
        let back: PreferenceRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn tie_break_serde_names() {
        assert_eq!(
            serde_json::to_string(&TieBreak::PreferSecond).unwrap(),
            "\"prefer_second\""
        );
    }
}
