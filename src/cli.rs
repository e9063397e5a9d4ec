use clap::{Parser, Subcommand, ValueEnum};
use modlist::engine::SortMode;
use modlist::settings::DEFAULT_SETTINGS_FILE;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "modlist",
    about = "Module list builder - classify installed and catalog modules and surface pending updates",
    version,
    author
)]
pub struct Cli {
    /// Path to the settings file holding exclusion rules and display flags
    #[arg(short, long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the ordered module list with categories and actions
    List {
        /// Snapshot JSON with installed modules, catalog records and notifications
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Only show modules matching this search text
        #[arg(short, long)]
        query: Option<String>,

        /// Ordering used for catalog modules
        #[arg(long, value_enum, default_value_t = SortArg::Update)]
        sort: SortArg,
    },

    /// Summarise pending updates without printing the whole list
    Check {
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,
    },

    /// Hide updates for a module, entirely or for specific versions
    Exclude {
        #[arg(value_name = "MODULE_ID")]
        module_id: String,

        /// Version spec: N (exactly N), ^N (N and newer) or N$ (N and older)
        #[arg(long = "version", value_name = "SPEC")]
        version: Option<String>,
    },

    /// Remove every exclusion stored for a module
    Include {
        #[arg(value_name = "MODULE_ID")]
        module_id: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortArg {
    Update,
    Alpha,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Update => SortMode::Update,
            SortArg::Alpha => SortMode::Alpha,
        }
    }
}
