/*
[INPUT]:  Process arguments
[OUTPUT]: Parsed global flags and subcommand
[POS]:    CLI layer - argument definitions
[UPDATE]: When adding subcommands or flags
*/

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "moonium", version, about = "Moonium admin and session client")]
pub struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn", global = true)]
    pub log_level: String,
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sign in as a project admin and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored admin session
    Logout,
    /// Refresh the stored session and print the admin identity
    Whoami,
    /// Print the persisted wallet session
    Wallet,
    /// Fetch a project with its contracts
    Project {
        #[arg(long)]
        slug: Option<String>,
    },
    /// List the NFTs a wallet owns in a project
    Nfts {
        /// Multichain wallet id, e.g. ETHEREUM:0xabc
        #[arg(long)]
        wallet: String,
        #[arg(long)]
        slug: Option<String>,
    },
    /// Export NFT owners of the admin's project as CSV
    Export {
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
}
