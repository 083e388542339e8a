//! CLI command definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use notecraft::NoteRequest;
use std::path::PathBuf;

/// notecraft - generate social-media notes with LLM and image APIs
#[derive(Parser, Debug)]
#[command(name = "notecraft")]
#[command(about = "Generate social-media notes with LLM and image-generation APIs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute; without one, `--mode cli` starts the interactive menu
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Run mode
    #[arg(short, long, value_enum, default_value = "cli", global = true)]
    pub mode: Mode,

    /// Configuration file layered over the defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Web interface port (overrides `[web].port`)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log filter, e.g. `debug` or `warn,notecraft_models=trace`
    #[arg(short = 'l', long, global = true)]
    pub log_level: Option<String>,

    /// Log file (defaults to daily files under `[output].log_dir`)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

/// Run modes
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Command line
    Cli,
    /// Browser form interface
    Web,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate topics for a category
    Topic {
        /// Topic category
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Number of topics
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Text provider
        #[arg(long)]
        provider: Option<String>,

        /// Save the topics as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write post content for a topic
    Content {
        /// Topic title
        #[arg(short, long)]
        topic: String,

        /// Topic category
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Writing style
        #[arg(short, long)]
        style: Option<String>,

        /// Text provider
        #[arg(long)]
        provider: Option<String>,

        /// Save the content as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate images from a prompt
    Image {
        /// Image prompt, sent as is
        #[arg(long)]
        prompt: String,

        /// Image provider
        #[arg(long)]
        provider: Option<String>,

        /// Width in pixels
        #[arg(long, default_value = "1080")]
        width: u32,

        /// Height in pixels
        #[arg(long, default_value = "1920")]
        height: u32,

        /// Number of images
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Generate topics, then content for each
    TopicContent {
        /// Topic category
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Number of topics
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Writing style
        #[arg(short, long)]
        style: Option<String>,

        /// Text provider
        #[arg(long)]
        provider: Option<String>,

        /// Save topics and content as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate and save one complete note
    Note {
        /// Topic title; generated from the category when absent
        #[arg(short, long)]
        topic: Option<String>,

        /// Image prompt used as is, one image each (repeatable)
        #[arg(long = "image-prompt", value_name = "PROMPT")]
        image_prompts: Vec<String>,

        #[command(flatten)]
        note: NoteArgs,
    },

    /// Generate and save several notes
    Batch {
        /// Number of notes
        #[arg(short = 'n', long)]
        count: Option<usize>,

        #[command(flatten)]
        note: NoteArgs,
    },

    /// List saved notes, newest first
    History {
        /// Maximum number of notes to show
        #[arg(long, default_value = "20")]
        limit: usize,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Menu-driven interactive session
    Interactive,

    /// Start the browser form interface
    Web,

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Options shared by `note` and `batch`
#[derive(Args, Debug, Clone, Default)]
pub struct NoteArgs {
    /// Topic category
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// Writing style
    #[arg(short, long)]
    pub style: Option<String>,

    /// Text provider for topics and content
    #[arg(long)]
    pub content_provider: Option<String>,

    /// Image provider
    #[arg(long)]
    pub image_provider: Option<String>,

    /// Images per note
    #[arg(long)]
    pub image_count: Option<usize>,

    /// Also write the result as JSON to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl NoteArgs {
    /// The generation request these options describe.
    pub fn request(&self, topic: Option<String>) -> NoteRequest {
        NoteRequest {
            topic,
            category: self.category.clone(),
            style: self.style.clone(),
            content_provider: self.content_provider.clone(),
            image_provider: self.image_provider.clone(),
            image_count: self.image_count,
            image_prompts: None,
        }
    }
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration with keys masked
    Show,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_cli_mode_without_command() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["notecraft"])?;
        assert_eq!(cli.mode, Mode::Cli);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        Ok(())
    }

    #[test]
    fn test_global_flags_after_subcommand() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from([
            "notecraft", "topic", "-C", "美食", "-n", "3", "--verbose", "--log-level", "debug",
        ])?;
        assert!(cli.verbose);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Some(Commands::Topic {
                category, count, ..
            }) => {
                assert_eq!(category.as_deref(), Some("美食"));
                assert_eq!(count, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_web_mode_with_port() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["notecraft", "--mode", "web", "--port", "9000"])?;
        assert_eq!(cli.mode, Mode::Web);
        assert_eq!(cli.port, Some(9000));
        Ok(())
    }

    #[test]
    fn test_content_requires_topic() {
        assert!(Cli::try_parse_from(["notecraft", "content", "--style", "干货"]).is_err());
    }

    #[test]
    fn test_image_defaults() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["notecraft", "image", "--prompt", "海边日落"])?;
        match cli.command {
            Some(Commands::Image {
                width,
                height,
                count,
                provider,
                ..
            }) => {
                assert_eq!((width, height, count), (1080, 1920, 1));
                assert!(provider.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_batch_note_options() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from([
            "notecraft",
            "batch",
            "-n",
            "4",
            "--content-provider",
            "doubao",
            "--image-provider",
            "tongyi",
            "--image-count",
            "0",
        ])?;
        match cli.command {
            Some(Commands::Batch { count, note }) => {
                assert_eq!(count, Some(4));
                assert_eq!(note.content_provider.as_deref(), Some("doubao"));
                assert_eq!(note.image_provider.as_deref(), Some("tongyi"));
                assert_eq!(note.image_count, Some(0));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_note_image_prompts_repeat() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from([
            "notecraft",
            "note",
            "-t",
            "露营",
            "--image-prompt",
            "帐篷 星空",
            "--image-prompt",
            "篝火 晚餐",
            "--image-count",
            "2",
        ])?;
        match cli.command {
            Some(Commands::Note {
                topic,
                image_prompts,
                note,
            }) => {
                assert_eq!(topic.as_deref(), Some("露营"));
                assert_eq!(image_prompts, ["帐篷 星空", "篝火 晚餐"]);
                assert_eq!(note.request(topic).image_prompts, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_history_json_format() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["notecraft", "history", "--limit", "5", "--format", "json"])?;
        match cli.command {
            Some(Commands::History { limit, format }) => {
                assert_eq!(limit, 5);
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        Ok(())
    }
}
