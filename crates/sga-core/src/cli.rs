use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct PreprocessedArgs {
    pub cleaned_args: Vec<OsString>,
    pub rc_overrides: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sga",
    version,
    about = "SGA: sample-tracking workflow client",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "sgarc", global = true)]
    pub sgarc: Option<PathBuf>,

    /// Answer yes to confirmation prompts.
    #[arg(short = 'y', long = "yes", global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move a process to another workflow status.
    Status { pk: u64, status: String },

    /// Set the carrier tracking code of a process.
    Tracking { pk: u64, code: String },

    /// Append a comment to a process.
    Comment {
        pk: u64,
        text: String,
        /// Forward the process to management review.
        #[arg(long)]
        forward: bool,
    },

    /// Take responsibility for a process.
    Assign { pk: u64 },

    /// Cancel a process.
    Cancel { pk: u64 },

    /// Reactivate a cancelled process.
    Reactivate { pk: u64 },

    /// Look up an address by CEP.
    Cep { cep: String },

    /// Ask for shipping quotes for a process.
    Quote { pk: u64 },

    /// Poll the carrier for new tracking events.
    RefreshTracking { pk: u64 },

    /// Search clients by name.
    Clients { term: String },

    /// Update a client record.
    EditClient {
        id: u64,
        #[arg(
            long = "field",
            value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
            action = ArgAction::Append
        )]
        fields: Vec<KeyVal>,
    },

    /// Register a new client.
    NewClient {
        #[arg(
            long = "field",
            value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
            action = ArgAction::Append
        )]
        fields: Vec<KeyVal>,
    },

    /// List the workflow statuses.
    Statuses,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// Pulls positional `rc.key=value` (or `rc.key:value`) overrides out of
/// the argument list before clap sees it.
#[tracing::instrument(skip_all)]
pub fn preprocess_args(raw: &[OsString]) -> anyhow::Result<PreprocessedArgs> {
    let mut cleaned = Vec::with_capacity(raw.len());
    let mut overrides: Vec<(String, String)> = Vec::new();

    let mut iter = raw.iter().cloned();
    if let Some(bin) = iter.next() {
        cleaned.push(bin);
    }

    for arg in iter {
        let s = arg.to_string_lossy();
        if let Some(rest) = s.strip_prefix("rc.") {
            let parsed = if let Some((k, v)) = rest.split_once('=') {
                Some((format!("rc.{k}"), v.to_string()))
            } else {
                rest.split_once(':')
                    .map(|(k, v)| (format!("rc.{k}"), v.to_string()))
            };

            if let Some((k, v)) = parsed {
                debug!(key = %k, "captured positional rc override");
                overrides.push((k, v));
                continue;
            }
        }

        cleaned.push(arg);
    }

    Ok(PreprocessedArgs {
        cleaned_args: cleaned,
        rc_overrides: overrides,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn positional_rc_overrides_are_stripped() {
        let pre = preprocess_args(&os(&[
            "sga",
            "rc.server.url=https://sga.example",
            "status",
            "42",
            "rc.confirm:off",
            "pendente",
        ]))
        .expect("preprocess");

        assert_eq!(pre.cleaned_args, os(&["sga", "status", "42", "pendente"]));
        assert_eq!(
            pre.rc_overrides,
            vec![
                (
                    "rc.server.url".to_string(),
                    "https://sga.example".to_string()
                ),
                ("rc.confirm".to_string(), "off".to_string()),
            ]
        );
    }

    #[test]
    fn edit_client_collects_repeated_fields() {
        let cli = GlobalCli::try_parse_from([
            "sga",
            "edit-client",
            "9",
            "--field",
            "nome=Lab Central",
            "--field",
            "numero = 100",
            "--yes",
        ])
        .expect("parse");

        assert!(cli.yes);
        let Command::EditClient { id, fields } = cli.command else {
            panic!("expected edit-client");
        };
        assert_eq!(id, 9);
        assert_eq!(
            fields[1],
            KeyVal {
                key: "numero".to_string(),
                value: "100".to_string()
            }
        );
    }

    #[test]
    fn comment_forward_flag_defaults_off() {
        let cli = GlobalCli::try_parse_from(["sga", "comment", "3", "aguardando NF"])
            .expect("parse");
        assert_eq!(
            cli.command,
            Command::Comment {
                pk: 3,
                text: "aguardando NF".to_string(),
                forward: false
            }
        );
    }
}
