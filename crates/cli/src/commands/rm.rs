//! rm command - Remove items
//!
//! Removes one or more items. Paths may span profiles; removal continues
//! past individual failures and the worst failure decides the exit code.

use clap::Args;
use serde::Serialize;

use depot_core::{Container, Location, StorePath};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};
use crate::store;

/// Remove items
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Item path(s) to remove (profile/container/key)
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    status: &'static str,
    removed: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed: Vec<String>,
    total: usize,
}

/// Execute the rm command
pub async fn execute(args: RmArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let mut removed = Vec::new();
    let mut failed = Vec::new();
    let mut worst = ExitCode::Success;

    for path_str in &args.paths {
        match remove_one(path_str, &formatter).await {
            Ok(()) => {
                removed.push(path_str.clone());
                if !formatter.is_json() {
                    formatter.println(&format!("Removed {path_str}"));
                }
            }
            Err(code) => {
                failed.push(path_str.clone());
                if code.as_i32() > worst.as_i32() {
                    worst = code;
                }
            }
        }
    }

    if formatter.is_json() {
        let total = removed.len();
        let output = RmOutput {
            status: if failed.is_empty() { "success" } else { "partial" },
            removed,
            failed,
            total,
        };
        formatter.json(&output);
    }

    worst
}

/// Remove a single item, reporting the failure before mapping it
async fn remove_one(path_str: &str, formatter: &Formatter) -> Result<(), ExitCode> {
    let path = StorePath::parse(path_str).map_err(|e| {
        formatter.error(&e.to_string());
        ExitCode::UsageError
    })?;
    let container_name = path.require_container().map_err(|e| {
        formatter.error(&e.to_string());
        ExitCode::UsageError
    })?;
    let key = path.require_key().map_err(|e| {
        formatter.error(&e.to_string());
        ExitCode::UsageError
    })?;

    let location = store::open_profile(&path.profile).await.map_err(|e| {
        formatter.error(&e.to_string());
        ExitCode::from_error(&e)
    })?;

    let container = location.container(container_name).await.map_err(|e| {
        formatter.error(&e.to_string());
        ExitCode::from_error(&e)
    })?;

    container.remove_item(key).await.map_err(|e| {
        formatter.error(&format!("Failed to remove '{path_str}': {e}"));
        ExitCode::from_error(&e)
    })
}
