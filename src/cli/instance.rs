//! Astarte instance commands

use crate::cli::display::TableRenderer;
use crate::cli::prompt::{NonInteractivePrompter, TerminalPrompter};
use crate::domain::cluster::{ClusterObject, InstanceStatus, StatusLookup, StatusResolver};
use crate::domain::config::AstartectlConf;
use crate::domain::descriptor::DeployFlags;
use crate::domain::flow::{DeployFlow, DeployOutcome, DeployPhase, DeployState};
use crate::domain::profile::ProfileCatalogue;
use crate::domain::prompt::Prompter;
use crate::infrastructure::constants::DEFAULT_NAMESPACE;
use crate::infrastructure::kubernetes::{AstarteKubeClient, AstarteKubeClientImpl};
use crate::infrastructure::releases::GitHubReleaseLister;
use clap::{Args, Parser};
use colored::Colorize;
use std::io::Write;
use tracing::{debug, warn};

/// Cluster connection options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ClusterArgs {
    /// Path to kubeconfig file
    /// If not specified, uses default kubeconfig resolution (KUBECONFIG env or ~/.kube/config)
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Kubernetes context to use
    /// If not specified, uses current context from kubeconfig
    #[arg(long)]
    pub context: Option<String>,

    /// Path to astartectl configuration file (astartectl.toml)
    /// If not provided, reads ASTARTECTL_CONF_FILE, then falls back to defaults
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<String>,
}

impl ClusterArgs {
    fn load_conf(&self) -> anyhow::Result<AstartectlConf> {
        AstartectlConf::load(self.config_file.as_deref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
    }

    async fn connect(&self, conf: &AstartectlConf) -> anyhow::Result<AstarteKubeClientImpl> {
        AstarteKubeClientImpl::new_with_config(
            conf.kubeconfig(self.kubeconfig.as_ref()),
            conf.context(self.context.as_ref()),
        )
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Kubernetes client: {}", e))
    }
}

#[derive(Parser, Debug, Clone)]
pub struct DeployCommand {
    /// Name of the Astarte instance (must be a valid Kubernetes name)
    #[arg(long)]
    pub name: Option<String>,

    /// Kubernetes namespace, created if it does not exist
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Astarte version to deploy. Defaults to the latest stable release
    #[arg(long)]
    pub version: Option<String>,

    /// Deployment profile (basic, burst, external-cassandra)
    #[arg(long)]
    pub profile: Option<String>,

    /// Public host of the Astarte API
    #[arg(long)]
    pub api_host: Option<String>,

    /// Public host of the MQTT broker
    #[arg(long)]
    pub broker_host: Option<String>,

    /// Comma-separated list of external Cassandra nodes (host:port)
    #[arg(long)]
    pub cassandra_nodes: Option<String>,

    /// Cassandra volume size (e.g., "30Gi")
    #[arg(long)]
    pub cassandra_volume_size: Option<String>,

    /// CFSSL volume size
    #[arg(long)]
    pub cfssl_volume_size: Option<String>,

    /// CFSSL database driver
    #[arg(long)]
    pub cfssl_db_driver: Option<String>,

    /// CFSSL database data source, required unless the driver is sqlite3
    #[arg(long)]
    pub cfssl_db_datasource: Option<String>,

    /// RabbitMQ volume size
    #[arg(long)]
    pub rabbitmq_volume_size: Option<String>,

    /// VerneMQ volume size
    #[arg(long)]
    pub vernemq_volume_size: Option<String>,

    /// Storage class for every volume
    #[arg(long)]
    pub storage_class_name: Option<String>,

    /// Disable SSL on the API and on the broker listener
    #[arg(long)]
    pub no_ssl: bool,

    /// Never prompt: take defaults and skip the confirmation
    #[arg(long, short = 'y')]
    pub non_interactive: bool,

    #[command(flatten)]
    pub cluster: ClusterArgs,
}

impl DeployCommand {
    pub fn flags(&self) -> DeployFlags {
        DeployFlags {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            version: self.version.clone(),
            profile: self.profile.clone(),
            api_host: self.api_host.clone(),
            broker_host: self.broker_host.clone(),
            cassandra_nodes: self.cassandra_nodes.clone(),
            cassandra_volume_size: self.cassandra_volume_size.clone(),
            cfssl_volume_size: self.cfssl_volume_size.clone(),
            cfssl_db_driver: self.cfssl_db_driver.clone(),
            cfssl_db_datasource: self.cfssl_db_datasource.clone(),
            rabbitmq_volume_size: self.rabbitmq_volume_size.clone(),
            vernemq_volume_size: self.vernemq_volume_size.clone(),
            storage_class_name: self.storage_class_name.clone(),
            no_ssl: self.no_ssl,
        }
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let conf = self.cluster.load_conf()?;
        let client = self.cluster.connect(&conf).await?;
        let releases = GitHubReleaseLister::new(Some(conf.releases.url.clone()));
        let catalogue = ProfileCatalogue::builtin();
        let prompter: Box<dyn Prompter> = if self.non_interactive {
            Box::new(NonInteractivePrompter)
        } else {
            Box::new(TerminalPrompter::new())
        };

        let mut flow = DeployFlow::new(&releases, &catalogue, prompter.as_ref(), &client)
            .with_identity_defaults(conf.deploy.name.clone(), conf.deploy.namespace.clone());
        let mut stdout = std::io::stdout();
        let state = flow
            .run(&self.flags(), self.non_interactive, &mut stdout)
            .await;
        debug!(history = ?flow.history(), "deploy flow finished");

        match state {
            DeployState::Failed {
                phase: DeployPhase::Applying,
                error,
            } => Err(anyhow::anyhow!(
                "Error while deploying Astarte Resource: {}",
                error
            )),
            DeployState::Failed { error, .. } => Err(anyhow::anyhow!("{}", error)),
            terminal => match terminal.into_result()? {
                DeployOutcome::Deployed(report) => {
                    debug!(
                        name = %report.name,
                        namespace = %report.namespace,
                        namespace_created = report.namespace_created,
                        "Astarte resource created"
                    );
                    println!(
                        "{}",
                        "Your Astarte instance has been successfully deployed. \
                         Please allow a few minutes for the Cluster to start. \
                         You can monitor the progress with astartectl show."
                            .green()
                    );
                    Ok(())
                }
                DeployOutcome::Aborted => {
                    println!("Aborting.");
                    Ok(())
                }
            },
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// Name of the Astarte instance
    pub name: String,

    /// Kubernetes namespace of the instance
    #[arg(long, short = 'n', default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    #[command(flatten)]
    pub cluster: ClusterArgs,
}

impl ShowCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let conf = self.cluster.load_conf()?;
        let client = self.cluster.connect(&conf).await?;
        self.run(&client, &mut std::io::stdout()).await
    }

    pub async fn run(
        &self,
        client: &dyn AstarteKubeClient,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let objects = match fetch_instances(client).await {
            Some(objects) => objects,
            None => {
                writeln!(out, "No Managed Astarte installations found.")?;
                return Ok(());
            }
        };

        let namespace = if self.namespace.is_empty() {
            DEFAULT_NAMESPACE
        } else {
            self.namespace.as_str()
        };

        match StatusResolver::resolve(&objects, &self.name, namespace) {
            StatusLookup::Found(status) => {
                writeln!(out, "{}", TableRenderer::new().render_instance_status(&status))?;
            }
            StatusLookup::NotFound { name, namespace } => {
                writeln!(out, "Could not find resource {} in namespace {}.", name, namespace)?;
            }
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Only show instances in this namespace
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    #[command(flatten)]
    pub cluster: ClusterArgs,
}

impl ListCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let conf = self.cluster.load_conf()?;
        let client = self.cluster.connect(&conf).await?;
        self.run(&client, &mut std::io::stdout()).await
    }

    pub async fn run(
        &self,
        client: &dyn AstarteKubeClient,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let instances: Vec<InstanceStatus> = fetch_instances(client)
            .await
            .unwrap_or_default()
            .iter()
            .filter(|o| match self.namespace.as_deref() {
                Some(ns) => o.namespace() == Some(ns),
                None => true,
            })
            .map(InstanceStatus::from_object)
            .collect();

        writeln!(out, "{}", TableRenderer::new().render_instances_list(&instances))?;
        Ok(())
    }
}

/// Every Astarte resource in the cluster. A failed or empty listing is
/// reported as `None`.
async fn fetch_instances(client: &dyn AstarteKubeClient) -> Option<Vec<ClusterObject>> {
    match client.list_astartes().await {
        Ok(list) if !list.is_empty() => Some(list.into_iter().map(ClusterObject::from).collect()),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "Failed to list Astarte resources");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_flags_from_args() {
        let cmd = DeployCommand::try_parse_from([
            "deploy",
            "--name",
            "prod",
            "-n",
            "astarte-prod",
            "--version",
            "1.0.0",
            "--api-host",
            "api.example.com",
            "--no-ssl",
            "-y",
        ])
        .unwrap();

        let flags = cmd.flags();
        assert_eq!(flags.name.as_deref(), Some("prod"));
        assert_eq!(flags.namespace.as_deref(), Some("astarte-prod"));
        assert_eq!(flags.version.as_deref(), Some("1.0.0"));
        assert_eq!(flags.for_path("api.host"), Some("api.example.com"));
        assert!(flags.no_ssl);
        assert!(cmd.non_interactive);
        assert_eq!(flags.profile, None);
    }

    #[test]
    fn test_show_defaults_namespace() {
        let cmd = ShowCommand::try_parse_from(["show", "astarte"]).unwrap();
        assert_eq!(cmd.name, "astarte");
        assert_eq!(cmd.namespace, "astarte");
        assert_eq!(cmd.cluster.kubeconfig, None);
    }
}
