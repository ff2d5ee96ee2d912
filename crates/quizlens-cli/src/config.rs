//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizlens_core::AnalysisOptions;

/// Top-level quizlens configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizlensConfig {
    /// Options passed to every analysis run.
    #[serde(default)]
    pub analysis: AnalysisOptions,
    /// Max concurrent classification tasks.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Questions per classification task.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Wall-clock budget for loading and segmentation, in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Where report files are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_parallelism() -> usize {
    4
}
fn default_chunk_size() -> usize {
    64
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizlens-reports")
}

impl Default for QuizlensConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisOptions::default(),
            parallelism: default_parallelism(),
            chunk_size: default_chunk_size(),
            timeout_secs: None,
            output_dir: default_output_dir(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizlens.toml` in the current directory
/// 2. `~/.config/quizlens/config.toml`
///
/// Environment variable overrides: `QUIZLENS_PARALLELISM`, `QUIZLENS_TIMEOUT_SECS`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizlensConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizlens.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            parse_config(&path)?
        }
        None => QuizlensConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    Ok(config)
}

fn parse_config(path: &Path) -> Result<QuizlensConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<QuizlensConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

/// Apply `QUIZLENS_*` overrides, reading variables through `lookup`.
fn apply_env_overrides(
    config: &mut QuizlensConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(value) = lookup("QUIZLENS_PARALLELISM") {
        config.parallelism = value
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZLENS_PARALLELISM: '{value}'"))?;
    }
    if let Some(value) = lookup("QUIZLENS_TIMEOUT_SECS") {
        config.timeout_secs = Some(
            value
                .trim()
                .parse()
                .with_context(|| format!("invalid QUIZLENS_TIMEOUT_SECS: '{value}'"))?,
        );
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizlens"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizlens_core::model::BloomLevel;

    #[test]
    fn default_config() {
        let config = QuizlensConfig::default();
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.chunk_size, 64);
        assert_eq!(config.timeout_secs, None);
        assert_eq!(config.analysis, AnalysisOptions::default());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
parallelism = 8
chunk_size = 16
timeout_secs = 5
output_dir = "out"

[analysis]
clarity_word_ceiling = 30
bloom_default_level = "remember"

[analysis.difficulty_thresholds]
easy_max = 25
medium_max = 70
"#;
        let config: QuizlensConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.parallelism, 8);
        assert_eq!(config.chunk_size, 16);
        assert_eq!(config.timeout_secs, Some(5));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.analysis.clarity_word_ceiling, 30);
        assert_eq!(config.analysis.bloom_default_level, BloomLevel::Remember);
        assert_eq!(config.analysis.difficulty_thresholds.easy_max, 25);
        assert_eq!(config.analysis.difficulty_thresholds.medium_max, 70);
        assert_eq!(config.analysis.difficulty_token_ceiling, 30);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: QuizlensConfig = toml::from_str("").unwrap();
        assert_eq!(config, QuizlensConfig::default());
    }

    #[test]
    fn explicit_missing_path_is_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/quizlens.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "chunk_size = 3\n").unwrap();
        let config = parse_config(&path).unwrap();
        assert_eq!(config.chunk_size, 3);
    }

    #[test]
    fn env_overrides() {
        let mut config = QuizlensConfig::default();
        apply_env_overrides(&mut config, |name| match name {
            "QUIZLENS_PARALLELISM" => Some("2".into()),
            "QUIZLENS_TIMEOUT_SECS" => Some(" 9 ".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.parallelism, 2);
        assert_eq!(config.timeout_secs, Some(9));
    }

    #[test]
    fn invalid_env_override_is_error() {
        let mut config = QuizlensConfig::default();
        let err = apply_env_overrides(&mut config, |name| {
            (name == "QUIZLENS_PARALLELISM").then(|| "many".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("QUIZLENS_PARALLELISM"));
    }
}
