// CLI command definitions

use super::instance::{DeployCommand, ListCommand, ShowCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "astartectl",
    version,
    about = "Deploy and inspect Astarte instances on Kubernetes",
    long_about = "A CLI tool for deploying Astarte clusters through the Astarte Operator and inspecting their status"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Deploy a new Astarte instance (creates the namespace if needed)
    Deploy(DeployCommand),

    /// Show the status of an Astarte instance
    Show(ShowCommand),

    /// List all Astarte instances
    List(ListCommand),
}
