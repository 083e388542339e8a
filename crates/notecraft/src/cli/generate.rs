//! One-shot command handlers.

use super::commands::{Commands, OutputFormat};
use super::print;
use notecraft::{ImageParams, JsonError, NoteGenerator, NoteRequest, write_json};
use serde::Serialize;
use std::error::Error;
use std::path::Path;

type CommandResult = Result<(), Box<dyn Error>>;

async fn export<T: Serialize + ?Sized>(path: Option<&Path>, value: &T) -> CommandResult {
    if let Some(path) = path {
        write_json(path, value).await?;
        println!("\nSaved to {}", path.display());
    }
    Ok(())
}

/// Runs a one-shot generation or listing command.
///
/// `interactive`, `web` and `config` are dispatched by the caller.
pub async fn handle_command(cmd: Commands, generator: &NoteGenerator) -> CommandResult {
    match cmd {
        Commands::Topic {
            category,
            count,
            provider,
            output,
        } => {
            let topics = generator
                .generate_topics(category.as_deref(), count, provider.as_deref())
                .await?;
            println!("{}", print::topics(&topics));
            export(output.as_deref(), &topics).await
        }

        Commands::Content {
            topic,
            category,
            style,
            provider,
            output,
        } => {
            let content = generator
                .generate_content(&topic, category.as_deref(), style.as_deref(), provider.as_deref())
                .await?;
            println!("{}", print::content(&content));
            export(output.as_deref(), &content).await
        }

        Commands::Image {
            prompt,
            provider,
            width,
            height,
            count,
        } => {
            let params = ImageParams::new(width, height);
            let batch = generator
                .generate_images(&prompt, provider.as_deref(), &params, count)
                .await?;
            print!("{}", print::images(batch.images()));
            if *batch.failures() > 0 {
                eprintln!("{} of {} image(s) failed", batch.failures(), count);
            }
            if count > 0 && batch.images().is_empty() {
                return Err(format!("No images were generated for '{}'", prompt).into());
            }
            Ok(())
        }

        Commands::TopicContent {
            category,
            count,
            style,
            provider,
            output,
        } => {
            let report = generator
                .generate_topic_contents(
                    category.as_deref(),
                    count,
                    style.as_deref(),
                    provider.as_deref(),
                )
                .await?;
            print!("{}", print::contents(&report));
            export(output.as_deref(), &report).await
        }

        Commands::Note {
            topic,
            image_prompts,
            note,
        } => {
            let request = NoteRequest {
                image_prompts: Some(image_prompts).filter(|p| !p.is_empty()),
                ..note.request(topic)
            };
            let saved = generator.generate_note(&request).await?;
            println!("{}", print::note(&saved));
            export(note.output.as_deref(), &saved).await
        }

        Commands::Batch { count, note } => {
            let count = count.unwrap_or(generator.defaults().default_topic_count);
            let report = generator
                .batch_generate_notes(count, &note.request(None))
                .await?;
            print!("{}", print::batch(&report));
            export(note.output.as_deref(), &report).await?;
            match report.topic_error() {
                Some(e) => Err(format!("Batch produced no notes: {}", e).into()),
                None => Ok(()),
            }
        }

        Commands::History { limit, format } => {
            let mut notes = generator.notes().list().await?;
            notes.truncate(limit);
            match format {
                OutputFormat::Human => print!("{}", print::history(&notes)),
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&notes)
                        .map_err(|e| JsonError::new(e.to_string()))?;
                    println!("{}", json);
                }
            }
            Ok(())
        }

        Commands::Interactive | Commands::Web | Commands::Config(_) => {
            Err(format!("{:?} is not a one-shot command", cmd).into())
        }
    }
}
