//! Chat command handler.

use clap::Args;

use campus_core::{AppConfig, AppError, AppResult};

/// Ask the assistant a question
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<std::path::PathBuf>,

    /// Output the structured answer as JSON
    #[arg(long)]
    pub json: bool,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let question = self
            .question()
            .ok_or_else(|| AppError::Input("No question provided".to_string()))?;

        let pipeline = super::pipeline_from(config).await?;
        let answer = pipeline.query(&question, &[]).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&answer)?);
            return Ok(());
        }

        println!("{}", answer.answer);

        if !answer.sources.is_empty() {
            println!("\nSources:");
            for source in &answer.sources {
                println!("  [{}] {}: {}", source.category, source.title, source.snippet);
            }
        }

        if !answer.suggestions.is_empty() {
            println!("\nYou could also ask:");
            for suggestion in &answer.suggestions {
                println!("  {} {}", suggestion.label, suggestion.prompt);
            }
        }

        if let Some(follow_up) = &answer.follow_up {
            println!("\n{}", follow_up);
        }

        Ok(())
    }

    fn question(&self) -> Option<String> {
        self.question.clone().or_else(|| {
            self.file.as_ref().and_then(|path| {
                std::fs::read_to_string(path)
                    .map_err(|e| tracing::error!("Failed to read question file: {}", e))
                    .ok()
            })
        })
    }
}
