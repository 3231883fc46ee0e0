//! CLI Commands
//!
//! Argument model of the `stache` CLI and the code that runs one command
//! against a daemon.

use clap::{builder::NonEmptyStringValueParser, Parser, Subcommand};

use super::render::{render_entries, render_set_ack, render_value};
use super::{CacheClient, ClientError, DEFAULT_ADDR};
use crate::cache::TEXT_MIME;

/// Stache CLI
#[derive(Parser, Debug)]
#[command(name = "stache")]
#[command(about = "CLI for the stache in-memory cache")]
#[command(version)]
pub struct Args {
    /// Daemon base URL
    #[arg(short, long, global = true, default_value = DEFAULT_ADDR)]
    pub addr: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set the value for a key
    Set {
        /// The key to set
        key: String,

        /// The value to store
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        value: String,

        /// MIME content type
        #[arg(short = 't', long = "content-type", default_value = TEXT_MIME)]
        content_type: String,

        /// TTL in seconds (0 = no expiry)
        #[arg(short = 'l', long = "ttl", default_value_t = 0, allow_negative_numbers = true)]
        ttl: i64,
    },

    /// Get the value for a key
    Get {
        /// The key to get
        key: String,

        /// Fail unless the value has this MIME content type
        #[arg(short = 't', long = "content-type")]
        content_type: Option<String>,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// List all entries
    List,
}

impl Commands {
    /// Operation name used to prefix failure messages.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Set { .. } => "Set",
            Commands::Get { .. } => "Get",
            Commands::Del { .. } => "Delete",
            Commands::List => "List",
        }
    }
}

/// Result of one CLI invocation: the text to print and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Printed to stdout, exit 0
    Printed(String),
    /// Printed to stderr, exit 1
    Failed(String),
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Printed(_) => 0,
            Outcome::Failed(_) => 1,
        }
    }
}

/// Runs one command and returns what to print on success.
pub async fn execute(client: &CacheClient, command: Commands) -> Result<String, ClientError> {
    match command {
        Commands::Set {
            key,
            value,
            content_type,
            ttl,
        } => {
            client
                .set(&key, value.as_bytes(), &content_type, ttl)
                .await?;
            Ok(render_set_ack(&key, &content_type, ttl))
        }
        Commands::Get { key, content_type } => {
            let response = client.get(&key, content_type.as_deref()).await?;
            Ok(render_value(&response.content_type, &response.value))
        }
        Commands::Del { key } => {
            let deleted = client.delete(&key).await?;
            Ok(if deleted { "deleted" } else { "not found" }.to_string())
        }
        Commands::List => {
            let entries = client.list_entries().await?;
            Ok(render_entries(&entries))
        }
    }
}

/// Runs a parsed invocation end to end, folding every failure into an outcome.
pub async fn run(args: Args) -> Outcome {
    let client = match CacheClient::new(args.addr) {
        Ok(client) => client,
        Err(err) => return Outcome::Failed(format!("error: {err}")),
    };

    let op = args.command.name();
    match execute(&client, args.command).await {
        Ok(output) => Outcome::Printed(output),
        Err(err) => Outcome::Failed(format!("{op} error: {err}")),
    }
}
