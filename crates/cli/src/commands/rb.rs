//! rb command - Remove container
//!
//! Removes a container from the profile's location. With --force the
//! container's items are removed first, so non-empty containers can be
//! dropped on backends that refuse that.

use clap::Args;
use serde::Serialize;

use depot_core::{Container, Item, Location, Result, StorePath};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};
use crate::store;

/// Remove a container
#[derive(Args, Debug)]
pub struct RbArgs {
    /// Target path (profile/container)
    pub target: String,

    /// Remove all items in the container first
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct RbOutput {
    status: &'static str,
    container: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    removed_items: Option<usize>,
}

/// Execute the rb command
pub async fn execute(args: RbArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let path = match StorePath::parse(&args.target) {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };
    let name = match path.require_container() {
        Ok(n) => n.to_string(),
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };
    if path.key.is_some() {
        formatter.error(&format!(
            "Invalid path '{}'. Expected: profile/container",
            args.target
        ));
        return ExitCode::UsageError;
    }

    let location = match store::open_profile(&path.profile).await {
        Ok(l) => l,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let mut removed_items = None;
    if args.force {
        match location.container(&name).await {
            Ok(container) => match drain_container(container.as_ref()).await {
                Ok(count) => removed_items = Some(count),
                Err(e) => {
                    formatter.error(&format!("Failed to empty container: {e}"));
                    return ExitCode::from_error(&e);
                }
            },
            // Nothing to empty; let remove_container apply its own policy
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                formatter.error(&e.to_string());
                return ExitCode::from_error(&e);
            }
        }
    }

    match location.remove_container(&name).await {
        Ok(()) => {
            if formatter.is_json() {
                let output = RbOutput {
                    status: "success",
                    container: name,
                    removed_items,
                };
                formatter.json(&output);
            } else {
                formatter.success(&format!("Container '{}' removed successfully.", args.target));
            }
            ExitCode::Success
        }
        Err(e) => {
            let code = ExitCode::from_error(&e);
            if code == ExitCode::Conflict && !args.force {
                formatter.error(&format!(
                    "Container '{}' is not empty. Use --force to remove its items first.",
                    args.target
                ));
            } else {
                formatter.error(&e.to_string());
            }
            code
        }
    }
}

/// Remove every item in the container, returning how many went away
async fn drain_container(container: &dyn Container) -> Result<usize> {
    let mut removed = 0;
    loop {
        // Deleting invalidates cursors, so restart from the front each round
        let page = container.items("", None).await?;
        if page.entries.is_empty() {
            return Ok(removed);
        }
        for item in &page.entries {
            container.remove_item(item.id()).await?;
            removed += 1;
        }
        if page.cursor.is_none() {
            return Ok(removed);
        }
    }
}
