//! stat command - Show item metadata
//!
//! Displays detailed metadata information about an item, including the
//! URL that round-trips back to it.

use clap::Args;
use serde::Serialize;

use depot_core::{Container, Item, Location, StorePath};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};
use crate::store;

/// Show item metadata
#[derive(Args, Debug)]
pub struct StatArgs {
    /// Item path (profile/container/key)
    pub path: String,
}

#[derive(Debug, Serialize)]
struct StatOutput {
    name: String,
    id: String,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_human: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_class: Option<String>,
}

/// Execute the stat command
pub async fn execute(args: StatArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let path = match StorePath::parse(&args.path) {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };
    let (container_name, key) = match (path.require_container(), path.require_key()) {
        (Ok(c), Ok(k)) => (c, k),
        (Err(e), _) | (_, Err(e)) => {
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

    let container = match location.container(container_name).await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    match container.item(key).await {
        Ok(item) => {
            let meta = item.meta();
            if formatter.is_json() {
                let output = StatOutput {
                    name: item.name().to_string(),
                    id: item.id().to_string(),
                    url: item.url().to_string(),
                    size_bytes: meta.size,
                    size_human: meta.size.map(|s| humansize::format_size(s, humansize::BINARY)),
                    last_modified: meta.last_modified.map(|t| t.to_string()),
                    etag: meta.etag.clone(),
                    storage_class: meta.storage_class.clone(),
                };
                formatter.json(&output);
            } else {
                formatter.println(&format!("Name      : {}", item.name()));
                if item.id() != item.name() {
                    formatter.println(&format!("ID        : {}", item.id()));
                }
                formatter.println(&format!("URL       : {}", item.url()));
                if let Some(modified) = meta.last_modified {
                    formatter.println(&format!(
                        "Date      : {}",
                        modified.strftime("%Y-%m-%d %H:%M:%S UTC")
                    ));
                }
                if let Some(size) = meta.size {
                    formatter.println(&format!(
                        "Size      : {size} bytes ({})",
                        humansize::format_size(size, humansize::BINARY)
                    ));
                }
                if let Some(etag) = &meta.etag {
                    formatter.println(&format!("ETag      : {etag}"));
                }
                if let Some(sc) = &meta.storage_class {
                    formatter.println(&format!("Class     : {sc}"));
                }
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}
