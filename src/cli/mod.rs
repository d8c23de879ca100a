//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the stackapi binary.

use clap::{Parser, Subcommand};

/// Stack management API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "stackapi", about = "Stack management API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Work with stacks.
    #[command(subcommand)]
    Stacks(StacksCommand),

    /// List the actions recorded for a stack.
    Actions {
        /// Stack uid.
        stack: String,

        /// Only actions started with this reference.
        #[arg(long)]
        user_reference: Option<String>,
    },

    /// List the settings of a stack.
    Settings {
        /// Stack uid.
        stack: String,
    },

    /// Change a stack setting.
    Set {
        /// Stack uid.
        stack: String,

        /// Setting key (for example `db.host`).
        key: String,

        /// New value.
        value: String,
    },

    /// List the environment variables of a stack.
    EnvVars {
        /// Stack uid.
        stack: String,

        /// Print the variables rendered in this format (for example `dotenv`).
        #[arg(long)]
        format: Option<String>,
    },

    /// List the managed backups of a stack.
    Backups {
        /// Stack uid.
        stack: String,
    },

    /// Open a temporary firewall lease.
    Lease {
        /// Stack uid.
        stack: String,

        /// Source address; defaults to the caller's address.
        #[arg(long)]
        from_ip: Option<String>,

        /// Lease lifetime in minutes.
        #[arg(long)]
        ttl: Option<u32>,

        /// Port to open.
        #[arg(long)]
        port: Option<u16>,

        /// Limit the lease to one server.
        #[arg(long)]
        server: Option<String>,

        /// Wait until the lease is in place.
        #[arg(long, default_value = "false")]
        wait: bool,
    },

    /// Redeploy a stack.
    Redeploy {
        /// Stack uid.
        stack: String,

        /// Git ref to deploy.
        #[arg(long, default_value = "")]
        git_ref: String,

        /// Deployment strategy.
        #[arg(long, default_value = "")]
        deploy_strategy: String,

        /// Deployment profile name.
        #[arg(long, default_value = "")]
        deployment_profile: String,

        /// Rollout strategy.
        #[arg(long)]
        rollout_strategy: Option<String>,

        /// Canary percentage for canary rollouts.
        #[arg(long)]
        canary_percentage: Option<u8>,

        /// Only deploy these services (repeatable).
        #[arg(long = "service")]
        services: Vec<String>,

        /// Reference recorded with the deployment action.
        #[arg(long)]
        user_reference: Option<String>,
    },
}

/// Stack subcommands.
#[derive(Subcommand, Debug)]
pub enum StacksCommand {
    /// List stacks, optionally filtered by the server.
    List {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        environment: Option<String>,

        #[arg(long)]
        git_repo: Option<String>,

        #[arg(long)]
        git_branch: Option<String>,
    },

    /// Show a stack by name.
    Show {
        /// Stack name (case-insensitive).
        name: String,

        /// Environment to disambiguate stacks sharing a name.
        #[arg(long, default_value = "")]
        environment: String,
    },
}
