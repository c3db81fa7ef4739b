//! get command - Download an item to a local file
//!
//! Streams an item's content into a local file with a byte progress bar
//! sized from the item's metadata.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use depot_core::{Container, Content, Item, Location, StorePath};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar};
use crate::store;

const COPY_BUF_SIZE: usize = 8192;

/// Download an item to a local file
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Item path (profile/container/key)
    pub source: String,

    /// Local destination; defaults to the item's file name, and a
    /// directory destination keeps that name inside it
    pub target: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetOutput {
    status: &'static str,
    source: String,
    target: String,
    size_bytes: u64,
    size_human: String,
}

/// Execute the get command
pub async fn execute(args: GetArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config.clone());

    let path = match StorePath::parse(&args.source) {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };
    let (container_name, key) = match (path.require_container(), path.require_key()) {
        (Ok(c), Ok(k)) => (c.to_string(), k.to_string()),
        (Err(e), _) | (_, Err(e)) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };

    let target = derive_target(args.target.as_deref(), &key);
    if target.as_os_str().is_empty() {
        formatter.error(&format!("Cannot derive a file name from '{key}'"));
        return ExitCode::UsageError;
    }

    let location = match store::open_profile(&path.profile).await {
        Ok(l) => l,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let container = match location.container(&container_name).await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let item = match container.item(&key).await {
        Ok(i) => i,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    if tokio::fs::try_exists(&target).await.unwrap_or(false) {
        formatter.warning(&format!("Overwriting {}", target.display()));
    }

    let mut content = match item.open().await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let file = match tokio::fs::File::create(&target).await {
        Ok(f) => f,
        Err(e) => {
            formatter.error(&format!("Cannot create '{}': {e}", target.display()));
            return ExitCode::GeneralError;
        }
    };

    let bar = ProgressBar::new(&output_config, item.meta().size.unwrap_or(0));
    let result = copy_to_file(&mut content, file, &bar).await;
    bar.finish_and_clear();

    let written = match result {
        Ok(w) => w,
        Err(e) => {
            remove_partial(&target).await;
            formatter.error(&format!("Failed to download '{}': {e}", args.source));
            return ExitCode::GeneralError;
        }
    };

    if formatter.is_json() {
        let output = GetOutput {
            status: "success",
            source: args.source,
            target: target.display().to_string(),
            size_bytes: written,
            size_human: humansize::format_size(written, humansize::BINARY),
        };
        formatter.json(&output);
    } else {
        formatter.println(&format!(
            "{} -> {} ({})",
            args.source,
            target.display(),
            humansize::format_size(written, humansize::BINARY)
        ));
    }
    ExitCode::Success
}

async fn copy_to_file(
    content: &mut Content,
    mut file: tokio::fs::File,
    bar: &ProgressBar,
) -> std::io::Result<u64> {
    let mut written: u64 = 0;
    let mut buf = [0u8; COPY_BUF_SIZE];
    loop {
        let n = content.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).await?;
        written += n as u64;
        bar.inc(n as u64);
    }
    file.flush().await?;
    Ok(written)
}

/// Pick the local destination for a downloaded key
fn derive_target(target: Option<&str>, key: &str) -> PathBuf {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    match target {
        None => PathBuf::from(file_name),
        Some(t) => {
            let path = Path::new(t);
            if path.is_dir() {
                path.join(file_name)
            } else {
                path.to_path_buf()
            }
        }
    }
}

async fn remove_partial(target: &Path) {
    // Leave no truncated download behind
    let _ = tokio::fs::remove_file(target).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_target_default() {
        assert_eq!(
            derive_target(None, "docs/report.pdf"),
            PathBuf::from("report.pdf")
        );
    }

    #[test]
    fn test_derive_target_plain_key() {
        assert_eq!(derive_target(None, "report.pdf"), PathBuf::from("report.pdf"));
    }

    #[test]
    fn test_derive_target_explicit_file() {
        assert_eq!(
            derive_target(Some("/tmp/out.pdf"), "docs/report.pdf"),
            PathBuf::from("/tmp/out.pdf")
        );
    }

    #[test]
    fn test_derive_target_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = derive_target(Some(dir.path().to_str().unwrap()), "docs/report.pdf");
        assert_eq!(target, dir.path().join("report.pdf"));
    }
}
