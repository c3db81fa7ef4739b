//! ls command - List containers and items
//!
//! Lists containers when given a profile only, or items when given a
//! container path. An extra path segment narrows the item listing to
//! names starting with that prefix.

use clap::Args;
use serde::Serialize;

use depot_core::{Container, Item, Location, StorePath};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};
use crate::store;

/// List containers or items
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Path to list (profile, profile/container, or profile/container/prefix)
    pub path: String,

    /// Summarize output (show totals)
    #[arg(long)]
    pub summarize: bool,
}

/// Output structure for container listings (JSON format)
#[derive(Debug, Serialize)]
struct ContainersOutput {
    containers: Vec<ContainerEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ContainerSummary>,
}

#[derive(Debug, Serialize)]
struct ContainerEntry {
    id: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct ContainerSummary {
    total_containers: usize,
}

/// Output structure for item listings (JSON format)
#[derive(Debug, Serialize)]
struct ItemsOutput {
    items: Vec<ItemEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ItemSummary>,
}

#[derive(Debug, Serialize)]
struct ItemEntry {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_human: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    etag: Option<String>,
}

#[derive(Debug, Serialize)]
struct ItemSummary {
    total_items: usize,
    total_size_bytes: u64,
    total_size_human: String,
}

fn item_entry(item: &dyn Item) -> ItemEntry {
    let meta = item.meta();
    ItemEntry {
        name: item.name().to_string(),
        size_bytes: meta.size,
        size_human: meta.size.map(|s| humansize::format_size(s, humansize::BINARY)),
        last_modified: meta.last_modified.map(|t| t.to_string()),
        etag: meta.etag.clone(),
    }
}

/// Execute the ls command
pub async fn execute(args: LsArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let path = match StorePath::parse(&args.path) {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };

    let location = match store::open_profile(&path.profile).await {
        Ok(l) => l,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    match &path.container {
        None => list_containers(location.as_ref(), &args, &formatter).await,
        Some(container) => {
            let prefix = path.key.clone().unwrap_or_default();
            list_items(location.as_ref(), container, &prefix, &args, &formatter).await
        }
    }
}

async fn list_containers(location: &dyn Location, args: &LsArgs, formatter: &Formatter) -> ExitCode {
    let mut containers: Vec<Box<dyn Container>> = Vec::new();
    let mut cursor: Option<String> = None;

    // Walk every page from the start to the end token
    loop {
        let page = match location.containers("", cursor.as_deref()).await {
            Ok(p) => p,
            Err(e) => {
                formatter.error(&format!("Failed to list containers: {e}"));
                return ExitCode::from_error(&e);
            }
        };
        containers.extend(page.entries);
        cursor = page.cursor;
        if cursor.is_none() {
            break;
        }
    }

    if formatter.is_json() {
        let output = ContainersOutput {
            containers: containers
                .iter()
                .map(|c| ContainerEntry {
                    id: c.id().to_string(),
                    name: c.name().to_string(),
                })
                .collect(),
            summary: args.summarize.then(|| ContainerSummary {
                total_containers: containers.len(),
            }),
        };
        formatter.json(&output);
    } else {
        for container in &containers {
            formatter.println(&format!("{}/", container.name()));
        }
        if args.summarize {
            formatter.println(&format!("\nTotal: {} containers", containers.len()));
        }
    }

    ExitCode::Success
}

async fn list_items(
    location: &dyn Location,
    container_name: &str,
    prefix: &str,
    args: &LsArgs,
    formatter: &Formatter,
) -> ExitCode {
    let container = match location.container(container_name).await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let mut items: Vec<Box<dyn Item>> = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = match container.items(prefix, cursor.as_deref()).await {
            Ok(p) => p,
            Err(e) => {
                formatter.error(&format!("Failed to list items: {e}"));
                return ExitCode::from_error(&e);
            }
        };
        items.extend(page.entries);
        cursor = page.cursor;
        if cursor.is_none() {
            break;
        }
    }

    let total_items = items.len();
    let total_size: u64 = items.iter().filter_map(|i| i.meta().size).sum();

    if formatter.is_json() {
        let output = ItemsOutput {
            items: items.iter().map(|i| item_entry(i.as_ref())).collect(),
            summary: args.summarize.then(|| ItemSummary {
                total_items,
                total_size_bytes: total_size,
                total_size_human: humansize::format_size(total_size, humansize::BINARY),
            }),
        };
        formatter.json(&output);
    } else {
        for item in &items {
            let meta = item.meta();
            let date = meta
                .last_modified
                .map(|t| t.strftime("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "                   ".to_string());
            let size = meta
                .size
                .map(|s| humansize::format_size(s, humansize::BINARY))
                .unwrap_or_else(|| "-".to_string());
            formatter.println(&format!("[{date}] {size:>10} {}", item.name()));
        }

        if args.summarize {
            formatter.println(&format!(
                "\nTotal: {} items, {}",
                total_items,
                humansize::format_size(total_size, humansize::BINARY)
            ));
        }
    }

    ExitCode::Success
}
