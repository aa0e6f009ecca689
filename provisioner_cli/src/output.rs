//! Terminal output helpers.

use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use provisioner_core::{ProvisionResponse, ProvisionedSnapshot, TemplateKeys};
use provisioner_shared_types::{NetworkTemplate, StorageTemplate, VmTemplate};

#[derive(Tabled)]
struct VmRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "vCPUs")]
    vcpus: String,
    #[tabled(rename = "Memory (GB)")]
    memory_gb: String,
    #[tabled(rename = "Disk (GB)")]
    disk_gb: String,
}

impl From<&VmTemplate> for VmRow {
    fn from(vm: &VmTemplate) -> Self {
        Self {
            id: vm.id.clone(),
            provider: vm.provider.clone(),
            name: vm.name.clone(),
            vcpus: vm.vcpus.to_string(),
            memory_gb: vm.memory_gb.to_string(),
            disk_gb: vm.disk_gb.to_string(),
        }
    }
}

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Public IP")]
    public_ip: bool,
    #[tabled(rename = "Firewall")]
    firewall_rules: String,
}

impl From<&NetworkTemplate> for NetworkRow {
    fn from(net: &NetworkTemplate) -> Self {
        Self {
            id: net.id.clone(),
            provider: net.provider.clone(),
            region: net.region.clone(),
            public_ip: net.public_ip,
            firewall_rules: dash_if_empty(net.firewall_rules.join(", ")),
        }
    }
}

#[derive(Tabled)]
struct StorageRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Size (GB)")]
    size_gb: String,
    #[tabled(rename = "IOPS")]
    iops: String,
    #[tabled(rename = "Encrypted")]
    encrypted: bool,
}

impl From<&StorageTemplate> for StorageRow {
    fn from(storage: &StorageTemplate) -> Self {
        Self {
            id: storage.id.clone(),
            provider: storage.provider.clone(),
            size_gb: storage.size_gb.to_string(),
            iops: storage.iops.as_ref().map_or_else(|| "-".to_string(), |iops| iops.to_string()),
            encrypted: storage.encrypted,
        }
    }
}

fn dash_if_empty(value: String) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value
    }
}

fn table<R: Tabled>(rows: Vec<R>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn info(message: &str) {
    println!("{} {}", "•".blue(), message);
}

pub fn section(title: &str) {
    println!("\n{}", title.bold().underline());
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_provisioned_set(response: &ProvisionResponse) {
    section("VM");
    println!("{}", table(vec![VmRow::from(&response.vm)]));
    section("Network");
    println!("{}", table(vec![NetworkRow::from(&response.network)]));
    section("Storage");
    println!("{}", table(vec![StorageRow::from(&response.storage)]));
}

pub fn print_snapshot(snapshot: &ProvisionedSnapshot) {
    section(&format!("VMs ({})", snapshot.vms.len()));
    println!("{}", table(snapshot.vms.iter().map(VmRow::from).collect()));
    section(&format!("Networks ({})", snapshot.networks.len()));
    println!("{}", table(snapshot.networks.iter().map(NetworkRow::from).collect()));
    section(&format!("Storages ({})", snapshot.storages.len()));
    println!("{}", table(snapshot.storages.iter().map(StorageRow::from).collect()));
}

pub fn print_template_keys(keys: &TemplateKeys) {
    for (title, list) in [("VM templates", &keys.vms), ("Network templates", &keys.networks), ("Storage templates", &keys.storages)] {
        section(title);
        if list.is_empty() {
            println!("  -");
        }
        for key in list {
            println!("  {key}");
        }
    }
}
