//! XL-Sum records to chat-completion records for supervised fine-tuning.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{convert_lines, ConversionStats};
use crate::error::PipelineResult;
use crate::model::Transcript;

/// Language subdirectories visited by [`convert_tree`].
pub const LANGUAGES: [&str; 4] = ["chinese_traditional", "english", "japanese", "korean"];
/// Split files visited inside each language directory.
pub const SPLITS: [&str; 3] = ["train", "validation", "test"];

/// One line of an XL-Sum split.
#[derive(Debug, Clone, Deserialize)]
pub struct XlsumRecord {
    pub id: String,
    pub url: String,
    pub title: String,
    pub text: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SftRecord {
    pub id: String,
    pub url: String,
    pub title: String,
    pub article: String,
    pub summary: String,
    /// Reference summary as the assistant turn.
    pub messages: Transcript,
}

impl From<XlsumRecord> for SftRecord {
    fn from(r: XlsumRecord) -> Self {
        let messages = Transcript::summarization(&r.text, &r.summary);
        Self {
            id: r.id,
            url: r.url,
            title: r.title,
            article: r.text,
            summary: r.summary,
            messages,
        }
    }
}

pub async fn convert_file(input: &Path, output: &Path) -> PipelineResult<ConversionStats> {
    convert_lines(input, output, |r: XlsumRecord| SftRecord::from(r)).await
}

/// Result of walking a dataset root.
#[derive(Debug, Default)]
pub struct TreeConversion {
    /// Output file and counts, per converted split.
    pub converted: Vec<(PathBuf, ConversionStats)>,
    /// Expected split files that were not present.
    pub missing: Vec<PathBuf>,
}

/// `<root>/<lang>/<split>.jsonl` -> `<root>/<lang>/transformed_<split>.jsonl`
pub async fn convert_tree(root: &Path) -> PipelineResult<TreeConversion> {
    let mut tree = TreeConversion::default();
    for lang in LANGUAGES {
        for split in SPLITS {
            let input = root.join(lang).join(format!("{split}.jsonl"));
            if !input.is_file() {
                warn!(file = %input.display(), "split not found");
                tree.missing.push(input);
                continue;
            }
            let output = root.join(lang).join(format!("transformed_{split}.jsonl"));
            info!(input = %input.display(), output = %output.display(), "converting");
            let stats = convert_file(&input, &output).await?;
            tree.converted.push((output, stats));
        }
    }
    Ok(tree)
}
