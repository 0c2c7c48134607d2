//! Command line surface of rss-notes.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::config::{DEFAULT_INTERVAL_MINUTES, DEFAULT_ROOT_FOLDER, DEFAULT_TIMEOUT_SECS};
use crate::core::importer::ImportFormat;

/// Keeps a folder of markdown notes in sync with RSS/Atom feeds
#[derive(Parser, Debug)]
#[command(name = "rss-notes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Vault directory holding the notes
    #[arg(long, global = true, env = "RSS_NOTES_VAULT", default_value = ".")]
    pub vault: PathBuf,

    /// Top-level vault folder for index notes and feed folders
    #[arg(long, global = true, env = "RSS_NOTES_ROOT", default_value = DEFAULT_ROOT_FOLDER)]
    pub root_folder: String,

    /// Minutes between passes in watch mode
    #[arg(long, global = true, env = "RSS_NOTES_INTERVAL_MINUTES", default_value_t = DEFAULT_INTERVAL_MINUTES)]
    pub interval_minutes: u64,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, env = "RSS_NOTES_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Debug-level logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter, e.g. `info` or `rss_notes_lib=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Update all feeds once
    #[command(visible_alias = "update")]
    Sync,

    /// Update all feeds now and then on every interval until interrupted
    Watch,

    /// Register a feed by writing its index note, then sync it
    Subscribe {
        /// Feed URL
        url: String,
    },

    /// Subscribe to every feed listed in an OPML file or a URL list
    Import {
        /// File to read
        file: PathBuf,

        /// Input format (inferred from the file extension when omitted)
        #[arg(long, value_enum)]
        format: Option<ImportFormat>,
    },

    /// Show the registered feeds
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "rss-notes",
            "sync",
            "--vault",
            "/tmp/vault",
            "--root-folder",
            "Feeds",
            "-v",
        ])
        .expect("arguments should parse");

        assert!(matches!(cli.command, Commands::Sync));
        assert_eq!(cli.vault, PathBuf::from("/tmp/vault"));
        assert_eq!(cli.root_folder, "Feeds");
        assert!(cli.verbose);
    }

    #[test]
    fn update_is_an_alias_for_sync() {
        let cli = Cli::try_parse_from(["rss-notes", "update"]).expect("alias should parse");
        assert!(matches!(cli.command, Commands::Sync));
    }

    #[test]
    fn import_accepts_explicit_format() {
        let cli = Cli::try_parse_from(["rss-notes", "import", "feeds.txt", "--format", "opml"])
            .expect("arguments should parse");
        match cli.command {
            Commands::Import { file, format } => {
                assert_eq!(file, PathBuf::from("feeds.txt"));
                assert_eq!(format, Some(ImportFormat::Opml));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn verifies_command_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
