//! cat command - Write item contents to stdout
//!
//! Streams the entire content of an item to stdout.

use clap::Args;
use tokio::io::AsyncWriteExt;

use depot_core::{Container, Item, Location, StorePath};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};
use crate::store;

/// Write item contents to stdout
#[derive(Args, Debug)]
pub struct CatArgs {
    /// Item path (profile/container/key)
    pub path: String,
}

/// Execute the cat command
pub async fn execute(args: CatArgs, output_config: OutputConfig) -> ExitCode {
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

    let item = match container.item(key).await {
        Ok(i) => i,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let mut content = match item.open().await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    // Stream directly to stdout to preserve binary data
    let mut stdout = tokio::io::stdout();
    if let Err(e) = tokio::io::copy(&mut content, &mut stdout).await {
        formatter.error(&format!("Failed to write to stdout: {e}"));
        return ExitCode::GeneralError;
    }
    if let Err(e) = stdout.flush().await {
        formatter.error(&format!("Failed to write to stdout: {e}"));
        return ExitCode::GeneralError;
    }

    ExitCode::Success
}
