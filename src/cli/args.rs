//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Machine-readable output

use clap::{Parser, Subcommand, ValueEnum};

/// abaplink - work with a remote ABAP repository through its local bridge
#[derive(Parser, Debug)]
#[command(name = "abap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check bridge and remote-system connectivity
    #[command(
        name = "check",
        long_about = "Check bridge and remote-system connectivity.\n\n\
            Probes the configured bridge URL (if any) and the auto-discovery \
            candidates, then fetches the repository's discovery document through \
            the first endpoint that answers. Reports which endpoint was used.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Verify everything is wired up
    abap check

    # Pin a bridge explicitly for this invocation
    BRIDGE_URL=http://172.28.0.1:19456 abap check"
    )]
    Check,

    /// Search the repository for objects
    #[command(
        name = "search",
        long_about = "Search the repository for objects by name pattern.\n\n\
            Runs a quick search against the repository information system. \
            Patterns support '*' wildcards. Results can be narrowed by object \
            type code and by package.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Find everything starting with ZCL_
    abap search 'ZCL_*'

    # Only classes, at most 10 hits
    abap search 'Z*' --object-type CLAS --max-results 10

    # Everything in one package
    abap search '*' --package ZDEMO"
    )]
    Search {
        /// Name pattern, '*' wildcards allowed
        query: String,

        /// Maximum number of hits
        #[arg(long, default_value_t = 50)]
        max_results: u32,

        /// Repository type code filter (e.g. CLAS, PROG, FUGR)
        #[arg(long)]
        object_type: Option<String>,

        /// Restrict hits to one package
        #[arg(long)]
        package: Option<String>,
    },

    /// Read the main source of an object
    #[command(
        name = "source",
        long_about = "Read the main source of a repository object.\n\n\
            Prints the object's main source include to stdout. Tables have no \
            source include; for them the structure definition is printed \
            instead. Function modules need their housing group via --group.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Read a class
    abap source class ZCL_DEMO

    # Read a function module (group required)
    abap source function-module Z_GET_DATA --group ZGROUP

    # Table structure definition
    abap source table MARA"
    )]
    Source {
        /// Object kind (class, interface, program, function-module, table)
        kind: String,

        /// Object name
        name: String,

        /// Housing function group (function modules only)
        #[arg(long)]
        group: Option<String>,
    },

    /// Show package metadata and contents
    #[command(name = "package")]
    Package {
        /// Package name
        name: String,
    },

    /// Show metadata of an object by URI
    #[command(name = "info")]
    Info {
        /// Object URI, e.g. /sap/bc/adt/oo/classes/zcl_demo
        uri: String,
    },

    /// Create or update a class
    #[command(
        name = "class",
        long_about = "Create or update a global class.\n\n\
            Creation is optimistic: the class is created directly, and when the \
            repository reports it already exists the command switches to \
            updating it. With --file or --source the main source is replaced \
            under an exclusive lock and the class is activated.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Create an empty active class in $TMP
    abap class ZCL_DEMO --description 'Demo class'

    # Create or update with source from a file
    abap class ZCL_DEMO --file zcl_demo.abap

    # Target a transportable package
    abap class ZCL_DEMO --file zcl_demo.abap --package ZDEV --transport DEVK900042"
    )]
    Class {
        /// Class name (normalized into the customer namespace)
        name: String,

        #[command(flatten)]
        upsert: UpsertArgs,
    },

    /// Create or update a program
    #[command(name = "program")]
    Program {
        /// Program name (normalized into the customer namespace)
        name: String,

        #[command(flatten)]
        upsert: UpsertArgs,
    },

    /// Create or update a function module (and its group)
    #[command(
        name = "function",
        long_about = "Create or update a function module.\n\n\
            The housing function group is ensured first: created when missing, \
            reused when present. Without --group a group name is derived from \
            the module name."
    )]
    Function {
        /// Function module name (normalized into the customer namespace)
        name: String,

        /// Housing function group; derived from the module name when omitted
        #[arg(long)]
        group: Option<String>,

        #[command(flatten)]
        upsert: UpsertArgs,
    },

    /// Get, set, or list configuration values
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
INSTALLATION:
    # Bash
    abap completion bash > ~/.local/share/bash-completion/completions/abap

    # Zsh
    abap completion zsh > ~/.zfunc/_abap

    # Fish
    abap completion fish > ~/.config/fish/completions/abap.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Shared arguments of the create-or-update commands.
#[derive(clap::Args, Debug, Default)]
pub struct UpsertArgs {
    /// Short description for a newly created object
    #[arg(long)]
    pub description: Option<String>,

    /// Housing package (defaults to the configured default package)
    #[arg(long)]
    pub package: Option<String>,

    /// Transport request number
    #[arg(long)]
    pub transport: Option<String>,

    /// Read the main source from a file
    #[arg(long, conflicts_with = "source")]
    pub file: Option<std::path::PathBuf>,

    /// Main source passed inline
    #[arg(long)]
    pub source: Option<String>,
}

/// Config subcommand actions.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Key to read
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Key to write
        key: String,
        /// New value
        value: String,
    },
    /// List all configuration values
    List,
}

/// Supported completion shells.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
