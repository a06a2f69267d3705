//! Clap derive structures for the `bizdesk` CLI.
//!
//! Defines the command tree, global flags, and the argument shapes shared
//! by every entity command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bizdesk -- manage clients, staff, catalogue, sales, and job cards
#[derive(Debug, Parser)]
#[command(
    name = "bizdesk",
    version,
    about = "Business dashboard for the command line",
    long_about = "Browse and edit the records of a bizdesk backend: clients and their\n\
        integrations, employees, products and categories, sales, and job cards.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "BIZDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, env = "BIZDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BIZDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "BIZDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (no timeout unless set)
    #[arg(long, env = "BIZDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session for this profile
    Login(LoginArgs),

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Request a password reset email
    ForgotPassword {
        /// Account email
        email: String,
    },

    /// Change the password of the signed-in user
    ChangePassword,

    /// Manage client companies
    #[command(alias = "cl")]
    Clients(EntityArgs),

    /// Manage employees
    #[command(alias = "emp")]
    Employees(EntityArgs),

    /// Manage products
    #[command(alias = "prod")]
    Products(EntityArgs),

    /// Manage product categories
    #[command(alias = "cat")]
    Categories(EntityArgs),

    /// Manage sales
    Sales(EntityArgs),

    /// Manage job cards
    #[command(alias = "jobs")]
    JobCards(EntityArgs),

    /// Manage a client's integrations
    #[command(alias = "int")]
    Integrations(IntegrationsArgs),

    /// List employee roles
    Roles,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (defaults to the profile's email)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Log in again even if a session is active
    #[arg(long, short = 'f')]
    pub force: bool,
}

// ── Entity commands ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EntityArgs {
    #[command(subcommand)]
    pub command: EntityCommand,
}

#[derive(Debug, Subcommand)]
pub enum EntityCommand {
    /// List one page of records
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one record
    Get {
        /// Record ID
        id: String,
    },

    /// Create a record from a JSON payload
    Create(PayloadArgs),

    /// Update a record with a partial JSON payload
    Update {
        /// Record ID
        id: String,

        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record ID
        id: String,
    },
}

/// Pagination and local search for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Rows per page (overrides profile page_size)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Case-insensitive filter applied to the fetched page
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

/// Where a create/update body comes from.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct PayloadArgs {
    /// Inline JSON object
    #[arg(long, short = 'd')]
    pub data: Option<String>,

    /// Path to a JSON file
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct IntegrationsArgs {
    /// Client whose integrations to work on
    #[arg(long, short = 'c', global = true)]
    pub client: Option<String>,

    #[command(subcommand)]
    pub command: EntityCommand,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a profile with guided setup
    Init,

    /// Display the configuration (secrets masked)
    Show,

    /// Set a profile value
    Set {
        /// Key: api_url, email, password_env, ca_cert, insecure, timeout, page_size
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store the profile password in the system keyring
    SetPassword,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
