// Provisioner CLI Client
//
// Command-line interface for the prototype provisioner API.

mod client;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use provisioner_core::{ProvisionRequest, TemplateKeys};
use provisioner_shared_types::{Overrides, ResourceKind};

use client::{ApiClient, CliError};

#[derive(Parser)]
#[command(name = "provisioner-cli")]
#[command(version = "0.1.0")]
#[command(about = "Prototype provisioner CLI - provision resource sets from templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8080", env = "PROVISIONER_API_URL")]
    server: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision a VM with its network and storage from a template
    Provision {
        /// VM template key (e.g. aws-standard)
        #[arg(short, long)]
        template_key: String,

        /// Provider tag sent with the request
        #[arg(short, long)]
        provider: String,

        /// Display name for the VM
        #[arg(short, long)]
        name: Option<String>,

        /// VM field override (KEY=VALUE, can be repeated)
        #[arg(long = "set", value_parser = parse_override)]
        overrides: Vec<(String, Value)>,

        /// Network field override (KEY=VALUE, can be repeated)
        #[arg(long = "net-set", value_parser = parse_override)]
        network_overrides: Vec<(String, Value)>,

        /// Storage field override (KEY=VALUE, can be repeated)
        #[arg(long = "store-set", value_parser = parse_override)]
        storage_overrides: Vec<(String, Value)>,
    },

    /// List provisioned resources
    List,

    /// List registered template keys
    Templates {
        /// Only show one kind (vm, network, storage)
        #[arg(long)]
        kind: Option<ResourceKind>,
    },
}

/// Parse `KEY=VALUE`. The value is read as JSON when possible, otherwise as a string.
fn parse_override(s: &str) -> std::result::Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid format '{}', expected KEY=VALUE", s))?;
    if key.is_empty() {
        return Err(format!("Invalid format '{}', empty key", s));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn to_overrides(pairs: Vec<(String, Value)>) -> Option<Overrides> {
    if pairs.is_empty() {
        return None;
    }
    Some(pairs.into_iter().collect())
}

fn filter_keys(keys: TemplateKeys, kind: Option<ResourceKind>) -> TemplateKeys {
    match kind {
        None => keys,
        Some(ResourceKind::Vm) => TemplateKeys {
            vms: keys.vms,
            ..TemplateKeys::default()
        },
        Some(ResourceKind::Network) => TemplateKeys {
            networks: keys.networks,
            ..TemplateKeys::default()
        },
        Some(ResourceKind::Storage) => TemplateKeys {
            storages: keys.storages,
            ..TemplateKeys::default()
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.server);

    match cli.command {
        Commands::Provision {
            template_key,
            provider,
            name,
            overrides,
            network_overrides,
            storage_overrides,
        } => {
            let request = ProvisionRequest {
                provider,
                template_key,
                name,
                overrides: to_overrides(overrides),
                network_overrides: to_overrides(network_overrides),
                storage_overrides: to_overrides(storage_overrides),
            };
            handle_provision(&client, &request, cli.output).await?;
        }
        Commands::List => {
            let snapshot = client.list_provisioned().await?;
            match cli.output {
                OutputFormat::Json => output::print_json(&snapshot)?,
                OutputFormat::Table => output::print_snapshot(&snapshot),
            }
        }
        Commands::Templates { kind } => {
            let keys = filter_keys(client.list_templates().await?, kind);
            match cli.output {
                OutputFormat::Json => output::print_json(&keys)?,
                OutputFormat::Table => output::print_template_keys(&keys),
            }
        }
    }

    Ok(())
}

async fn handle_provision(client: &ApiClient, request: &ProvisionRequest, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Table {
        output::info(&format!("Provisioning from template '{}'...", request.template_key));
    }

    let response = match client.provision(request).await {
        Ok(response) => response,
        Err(CliError::Api { status, detail }) => {
            anyhow::bail!("Provisioning failed ({}): {}", status.as_u16(), detail)
        }
        Err(err) => return Err(err.into()),
    };

    match format {
        OutputFormat::Json => output::print_json(&response)?,
        OutputFormat::Table => {
            output::success(&format!("Resource set {}", response.status));
            output::print_provisioned_set(&response);
        }
    }
    Ok(())
}
