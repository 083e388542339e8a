//! Menu-driven interactive session.

use super::print;
use notecraft::{ImageParams, NoteGenerator, NoteRequest, NotecraftResult};
use std::io::{self, Write};
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::info;

const MENU: &str = "
Choose an action:
  1. Generate topics
  2. Write content for a topic
  3. Generate images
  4. Generate a note
  5. Batch generate notes
  6. Show saved notes
  0. Exit";

/// Notes shown by the history action.
const HISTORY_LIMIT: usize = 10;

/// Runs the menu loop until `0`, `exit` or end of input.
///
/// Generation failures are printed and the menu is shown again.
pub async fn run<R, W>(generator: &NoteGenerator, input: R, out: &mut W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    info!("Starting interactive session");
    let mut session = Session {
        generator,
        lines: input.lines(),
        out,
    };
    match session.menu().await {
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(()),
        other => other,
    }
}

struct Session<'a, R, W> {
    generator: &'a NoteGenerator,
    lines: Lines<R>,
    out: &'a mut W,
}

impl<R, W> Session<'_, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    async fn menu(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.out, "{}", MENU)?;
            let choice = self.ask("Option (0-6)").await?;
            let result = match choice.to_lowercase().as_str() {
                "0" | "exit" | "quit" => {
                    writeln!(self.out, "Bye!")?;
                    return Ok(());
                }
                "1" => self.topics().await?,
                "2" => self.content().await?,
                "3" => self.images().await?,
                "4" => self.note().await?,
                "5" => self.batch().await?,
                "6" => self.history().await,
                _ => {
                    writeln!(self.out, "Unknown option '{}'", choice)?;
                    continue;
                }
            };
            match result {
                Ok(text) => writeln!(self.out, "\n{}", text)?,
                Err(e) => writeln!(self.out, "\nFailed: {}", e)?,
            }
        }
    }

    /// Next trimmed input line; end of input is `UnexpectedEof`.
    async fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.out, "{}: ", prompt)?;
        self.out.flush()?;
        match self.lines.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(io::Error::from(io::ErrorKind::UnexpectedEof)),
        }
    }

    /// `None` when the answer is blank.
    async fn ask_optional(&mut self, prompt: &str, default: &str) -> io::Result<Option<String>> {
        let answer = if default.is_empty() {
            self.ask(prompt).await?
        } else {
            self.ask(&format!("{} [{}]", prompt, default)).await?
        };
        Ok(Some(answer).filter(|a| !a.is_empty()))
    }

    /// `None` when the answer is blank or not a number.
    async fn ask_number<T>(&mut self, prompt: &str, default: T) -> io::Result<Option<T>>
    where
        T: FromStr + std::fmt::Display,
    {
        let answer = self.ask(&format!("{} [{}]", prompt, default)).await?;
        if answer.is_empty() {
            return Ok(None);
        }
        match answer.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                writeln!(self.out, "'{}' is not a number, using {}", answer, default)?;
                Ok(None)
            }
        }
    }

    async fn topics(&mut self) -> io::Result<NotecraftResult<String>> {
        let generator = self.generator;
        let defaults = generator.defaults();
        let category = self.ask_optional("Category", &defaults.default_category).await?;
        let count = self.ask_number("Count", defaults.default_topic_count).await?;

        Ok(generator
            .generate_topics(category.as_deref(), count, None)
            .await
            .map(|topics| print::topics(&topics)))
    }

    async fn content(&mut self) -> io::Result<NotecraftResult<String>> {
        let topic = self.ask("Topic").await?;
        if topic.is_empty() {
            return Ok(Ok("A topic is required.".to_string()));
        }
        let generator = self.generator;
        let defaults = generator.defaults();
        let style = self.ask_optional("Style", &defaults.default_style).await?;
        let provider = self.ask_optional("Text provider", &defaults.content_provider).await?;

        Ok(generator
            .generate_content(&topic, None, style.as_deref(), provider.as_deref())
            .await
            .map(|content| print::content(&content)))
    }

    async fn images(&mut self) -> io::Result<NotecraftResult<String>> {
        let prompt = self.ask("Prompt").await?;
        if prompt.is_empty() {
            return Ok(Ok("A prompt is required.".to_string()));
        }
        let default_provider = self.generator.defaults().image_provider.clone();
        let provider = self.ask_optional("Image provider", &default_provider).await?;
        let count = self.ask_number("Count", 1).await?.unwrap_or(1);
        let provider = provider.unwrap_or(default_provider);

        Ok(self
            .generator
            .generate_images(&prompt, Some(&provider), &ImageParams::default(), count)
            .await
            .map(|batch| {
                let mut text = print::images(batch.images());
                if *batch.failures() > 0 {
                    text.push_str(&format!("{} image(s) failed\n", batch.failures()));
                }
                text
            }))
    }

    async fn note_request(&mut self, topic: Option<String>) -> io::Result<NoteRequest> {
        let defaults = self.generator.defaults().clone();
        Ok(NoteRequest {
            topic,
            category: self.ask_optional("Category", &defaults.default_category).await?,
            style: self.ask_optional("Style", &defaults.default_style).await?,
            content_provider: self
                .ask_optional("Text provider", &defaults.content_provider)
                .await?,
            image_provider: self
                .ask_optional("Image provider", &defaults.image_provider)
                .await?,
            image_count: self
                .ask_number("Images per note", defaults.default_image_count)
                .await?,
            image_prompts: None,
        })
    }

    async fn note(&mut self) -> io::Result<NotecraftResult<String>> {
        let topic = self.ask_optional("Topic (blank to generate one)", "").await?;
        let mut request = self.note_request(topic).await?;
        request.image_prompts = self
            .ask_optional("Image prompts, separated by '|' (blank to derive from the post)", "")
            .await?
            .map(|answer| answer.split('|').map(str::to_string).collect());

        Ok(self
            .generator
            .generate_note(&request)
            .await
            .map(|note| print::note(&note)))
    }

    async fn batch(&mut self) -> io::Result<NotecraftResult<String>> {
        let default_count = self.generator.defaults().default_topic_count;
        let count = self
            .ask_number("Number of notes", default_count)
            .await?
            .unwrap_or(default_count);
        let request = self.note_request(None).await?;

        Ok(self
            .generator
            .batch_generate_notes(count, &request)
            .await
            .map(|report| print::batch(&report)))
    }

    async fn history(&mut self) -> NotecraftResult<String> {
        let mut notes = self.generator.notes().list().await?;
        notes.truncate(HISTORY_LIMIT);
        Ok(print::history(&notes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notecraft::NotecraftConfig;
    use tempfile::TempDir;

    /// Runs a session over `input` against the bundled configuration,
    /// which carries no API keys.
    async fn session(input: &str) -> anyhow::Result<String> {
        let temp = TempDir::new()?;
        let mut config = NotecraftConfig::bundled()?;
        config.output.content_dir = temp.path().join("content");
        config.output.image_dir = temp.path().join("images");
        let generator = NoteGenerator::from_config(&config)?;

        let mut out = Vec::new();
        run(&generator, input.as_bytes(), &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[tokio::test]
    async fn test_exit_ends_session() -> anyhow::Result<()> {
        let out = session("0\n1\n").await?;
        assert!(out.contains("1. Generate topics"));
        assert!(out.trim_end().ends_with("Bye!"));
        Ok(())
    }

    #[tokio::test]
    async fn test_end_of_input_ends_session() -> anyhow::Result<()> {
        let out = session("").await?;
        assert!(out.contains("Option (0-6)"));
        assert!(!out.contains("Bye!"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_option_shows_menu_again() -> anyhow::Result<()> {
        let out = session("9\nexit\n").await?;
        assert!(out.contains("Unknown option '9'"));
        assert_eq!(out.matches("Choose an action").count(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_generation_failure_is_reported() -> anyhow::Result<()> {
        let out = session("1\n美食\nthree\n0\n").await?;
        assert!(out.contains("Category [生活方式]"));
        assert!(out.contains("'three' is not a number, using 5"));
        assert!(out.contains("Failed:"));
        assert!(out.contains("api_key"));
        assert!(out.trim_end().ends_with("Bye!"));
        Ok(())
    }

    #[tokio::test]
    async fn test_content_requires_topic() -> anyhow::Result<()> {
        let out = session("2\n\n0\n").await?;
        assert!(out.contains("A topic is required."));
        Ok(())
    }

    #[tokio::test]
    async fn test_history_when_empty() -> anyhow::Result<()> {
        let out = session("6\n0\n").await?;
        assert!(out.contains("No saved notes."));
        Ok(())
    }
}
