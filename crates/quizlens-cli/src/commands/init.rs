//! The `quizlens init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizlens.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("questions").context("failed to create questions/")?;
    write_if_missing(Path::new("questions/sample.txt"), SAMPLE_QUESTIONS)?;

    println!("\nNext steps:");
    println!("  1. Adjust thresholds in quizlens.toml if needed");
    println!("  2. Run: quizlens segment --input questions/sample.txt");
    println!("  3. Run: quizlens analyze --input questions/sample.txt");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizlens configuration

parallelism = 4
chunk_size = 64
# timeout_secs = 10
output_dir = "./quizlens-reports"

[analysis]
clarity_word_ceiling = 40
bloom_default_level = "understand"
difficulty_token_ceiling = 30

[analysis.difficulty_thresholds]
easy_max = 33
medium_max = 66
"#;

const SAMPLE_QUESTIONS: &str = "\
1. Define photosynthesis.
2. List the three states of matter.
3. Explain how the heart pumps blood through the body.
4. Calculate the speed of a car that travels 150 km in 2 hours.
5. Compare mitosis and meiosis.
6. Critically evaluate the economic impact of renewable energy policy and justify your conclusion.
7. Design an experiment to test how light intensity affects plant growth.
8. Why do some of them dissolve faster
";
