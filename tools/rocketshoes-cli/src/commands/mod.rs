//! CLI command implementations.

pub mod cart;
pub mod config;

use clap::{Args, Subcommand};
use rocketshoes_commerce::ProductId;

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product id.
    pub id: ProductId,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Product id.
    pub id: ProductId,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Product id.
    pub id: ProductId,

    /// New amount. Zero or below leaves the cart unchanged.
    #[arg(allow_negative_numbers = true)]
    pub amount: i64,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
