//! Fixed prompt text shared by the pipeline and the dataset formats.

use crate::model::JudgmentRequest;

pub const SYSTEM_MSG: &str = "You are an expert in summarization tasks. You are good at summarizing long texts into concise and accurate summarizations. The text you summarize needs to meet the following three requirements:
1. Your summarization must be concise and accurately express the meaning of the original text
2. The language of the summarization must be consistent with the original text
3. You only need to output the summary, without various polite words and other useless words";

pub const USER_PROMPT_PREFIX: &str = "Summarize the following text: \n";

// Slicing delimiters; `judge_prompt` must keep producing them.
pub const ORIGINAL_TEXT_MARKER: &str = "original text:\n";
pub const CANDIDATES_HEADER: &str = "\ncandidate summaries:";
pub const FIRST_CANDIDATE_MARKER: &str = "candidate summaries:\n1. ";
pub const SECOND_CANDIDATE_MARKER: &str = "\n2. ";

const JUDGE_INSTRUCTIONS: &str = "You are an expert in summarization. I will give you the original text and two candidate summaries. Please help me score these summaries.
The scoring criteria are:
1. Whether the summarization concisely and accurately expresses the meaning of the original text
2. Whether the language of the summarization is consistent with the original text.
3. The score needs to be between 0-10

Output format:
1. summary1: [[4]], summary2: [[5]]
2. do not output any explanation and other text
";

/// Render the judge prompt for two candidates.
pub fn judge_prompt(original_text: &str, candidate_a: &str, candidate_b: &str) -> String {
    format!(
        "{JUDGE_INSTRUCTIONS}\n{ORIGINAL_TEXT_MARKER}{original_text}\n\ncandidate summaries:\n1. {candidate_a}{SECOND_CANDIDATE_MARKER}{candidate_b}\n"
    )
}

pub fn judge_prompt_for(request: &JudgmentRequest) -> String {
    judge_prompt(
        &request.original_text,
        &request.candidate_a,
        &request.candidate_b,
    )
}
