use anyhow::Context;
use prefjudge_core::{build_client, PipelineConfig, RetryingJudge, TieBreak};
use tracing::info;

use super::super::args::BatchArgs;

/// Config file (or defaults), then environment, then flags.
pub(crate) fn resolve_config(
    args: &BatchArgs,
    tie_break: Option<TieBreak>,
) -> anyhow::Result<PipelineConfig> {
    let mut cfg = PipelineConfig::load(args.config.as_deref()).context("failed to load config")?;
    apply_flags(&mut cfg, args, tie_break)?;
    cfg.validate()?;
    Ok(cfg)
}

fn apply_flags(
    cfg: &mut PipelineConfig,
    args: &BatchArgs,
    tie_break: Option<TieBreak>,
) -> anyhow::Result<()> {
    let judge = &args.judge;
    if let Some(provider) = &judge.judge {
        cfg.judge.provider = provider.parse()?;
    }
    if let Some(url) = &judge.judge_url {
        cfg.judge.base_url = url.clone();
    }
    if let Some(model) = &judge.judge_model {
        cfg.judge.model = Some(model.clone());
    }
    if let Some(key) = judge.judge_api_key.as_ref().filter(|k| !k.is_empty()) {
        cfg.judge.api_key = Some(key.clone());
    }
    if let Some(secs) = judge.judge_timeout_secs {
        cfg.judge.timeout_secs = Some(secs);
    }
    if let Some(text) = &judge.fake_response {
        cfg.judge.fake_response = Some(text.clone());
    }

    if let Some(n) = args.max_attempts {
        cfg.retry.max_attempts = n;
    }
    if let Some(ms) = args.backoff_ms {
        cfg.retry.backoff_ms = ms;
    }
    if let Some(n) = args.concurrency {
        cfg.batch.concurrency = n;
    }
    if let Some(t) = tie_break {
        cfg.tie_break = t;
    }
    Ok(())
}

pub(crate) fn build_judge(cfg: &PipelineConfig) -> anyhow::Result<RetryingJudge> {
    let client = build_client(&cfg.judge)?;
    info!(
        provider = client.provider_name(),
        model = cfg.judge.model.as_deref().unwrap_or("-"),
        max_attempts = cfg.retry.attempts(),
        concurrency = cfg.batch.concurrency,
        "judge ready"
    );
    Ok(RetryingJudge::new(client, cfg.retry.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::JudgeArgs;
    use prefjudge_core::JudgeProvider;

    #[test]
    fn flags_override_file_values() {
        let mut cfg = PipelineConfig::from_yaml_str(
            "judge:\n  provider: openai\n  model: file-model\nretry:\n  max_attempts: 7\nbatch:\n  concurrency: 8\n",
        )
        .unwrap();
        let args = BatchArgs {
            max_attempts: Some(2),
            judge: JudgeArgs {
                judge: Some("fake".into()),
                fake_response: Some("[[1]] [[0]]".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        apply_flags(&mut cfg, &args, Some(TieBreak::PreferFirst)).unwrap();

        assert_eq!(cfg.judge.provider, JudgeProvider::Fake);
        assert_eq!(cfg.judge.model.as_deref(), Some("file-model"));
        assert_eq!(cfg.retry.max_attempts, 2);
        assert_eq!(cfg.batch.concurrency, 8);
        assert_eq!(cfg.tie_break, TieBreak::PreferFirst);
        assert_eq!(cfg.judge.fake_response.as_deref(), Some("[[1]] [[0]]"));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let mut cfg = PipelineConfig::default();
        let args = BatchArgs {
            judge: JudgeArgs {
                judge: Some("anthropic".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = apply_flags(&mut cfg, &args, None).unwrap_err();
        assert!(err.to_string().contains("unknown judge provider"));
    }

    #[test]
    fn fake_judge_needs_no_model() {
        let mut cfg = PipelineConfig::default();
        let args = BatchArgs {
            judge: JudgeArgs {
                judge: Some("fake".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        apply_flags(&mut cfg, &args, None).unwrap();
        cfg.validate().unwrap();
        assert!(build_judge(&cfg).is_ok());
    }
}
