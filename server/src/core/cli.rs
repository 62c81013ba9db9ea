use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_DATA_DIR, ENV_DEBUG, ENV_HOST, ENV_PORT};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(version, about = "Permissioned task board server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug mode (verbose request logging)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Data directory (database, signing key)
    #[arg(long, global = true, env = ENV_DATA_DIR)]
    pub data_dir: Option<PathBuf>,

    /// Lifetime of issued session tokens in hours
    #[arg(long, global = true)]
    pub token_ttl_hours: Option<u32>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// System maintenance commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum SystemCommands {
    /// Delete local data directory (database and signing key). Requires confirmation.
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub token_ttl_hours: Option<u32>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        debug: cli.debug,
        config: cli.config,
        data_dir: cli.data_dir,
        token_ttl_hours: cli.token_ttl_hours,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "taskboard",
            "start",
            "--port",
            "8080",
            "--token-ttl-hours",
            "2",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Start)));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.token_ttl_hours, Some(2));
    }

    #[test]
    fn test_parse_prune_yes() {
        let cli = Cli::try_parse_from(["taskboard", "system", "prune", "--yes"]).unwrap();
        match cli.command {
            Some(Commands::System {
                command: SystemCommands::Prune { yes },
            }) => assert!(yes),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
