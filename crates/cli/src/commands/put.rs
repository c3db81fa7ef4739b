//! put command - Upload a local file as an item
//!
//! Streams a local file into a container. The declared size comes from
//! the file's metadata, so a file that changes size mid-upload fails the
//! write instead of storing a truncated item.

use std::path::Path;

use clap::Args;
use serde::Serialize;

use depot_core::{Container, Content, Item, Location, StorePath};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar};
use crate::store;

/// Upload a local file as an item
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local file to upload
    pub source: String,

    /// Target path (profile/container[/key]); a missing or trailing-slash
    /// key takes the source file name
    pub target: String,
}

#[derive(Debug, Serialize)]
struct PutOutput {
    status: &'static str,
    source: String,
    target: String,
    size_bytes: u64,
    size_human: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    etag: Option<String>,
}

/// Execute the put command
pub async fn execute(args: PutArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config.clone());

    let path = match StorePath::parse(&args.target) {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };
    let container_name = match path.require_container() {
        Ok(c) => c.to_string(),
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };
    let key = match derive_key(path.key.as_deref(), Path::new(&args.source)) {
        Ok(k) => k,
        Err(e) => {
            formatter.error(&e);
            return ExitCode::UsageError;
        }
    };

    let metadata = match tokio::fs::metadata(&args.source).await {
        Ok(m) => m,
        Err(e) => {
            formatter.error(&format!("Cannot read '{}': {e}", args.source));
            return ExitCode::NotFound;
        }
    };
    if !metadata.is_file() {
        formatter.error(&format!("'{}' is not a regular file", args.source));
        return ExitCode::UsageError;
    }
    let size = metadata.len();

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

    let file = match tokio::fs::File::open(&args.source).await {
        Ok(f) => f,
        Err(e) => {
            formatter.error(&format!("Cannot read '{}': {e}", args.source));
            return ExitCode::GeneralError;
        }
    };

    let spinner = ProgressBar::spinner(&output_config, &format!("Uploading {key}"));
    let result = container.put(&key, Content::new(file), size).await;
    spinner.finish_and_clear();

    match result {
        Ok(item) => {
            let target_display = format!("{}/{}/{}", path.profile, container_name, key);
            if formatter.is_json() {
                let output = PutOutput {
                    status: "success",
                    source: args.source,
                    target: target_display,
                    size_bytes: size,
                    size_human: humansize::format_size(size, humansize::BINARY),
                    etag: item.meta().etag.clone(),
                };
                formatter.json(&output);
            } else {
                formatter.println(&format!(
                    "{} -> {} ({})",
                    args.source,
                    target_display,
                    humansize::format_size(size, humansize::BINARY)
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to upload '{}': {e}", args.source));
            ExitCode::from_error(&e)
        }
    }
}

/// Pick the item name for a target key and source path
fn derive_key(key: Option<&str>, source: &Path) -> Result<String, String> {
    let filename = || {
        source
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .ok_or_else(|| format!("Cannot derive an item name from '{}'", source.display()))
    };

    match key {
        None => filename(),
        Some(k) if k.ends_with('/') => Ok(format!("{k}{}", filename()?)),
        Some(k) => Ok(k.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_explicit() {
        let key = derive_key(Some("docs/report.pdf"), Path::new("/tmp/a.pdf")).unwrap();
        assert_eq!(key, "docs/report.pdf");
    }

    #[test]
    fn test_derive_key_from_filename() {
        let key = derive_key(None, Path::new("/tmp/report.pdf")).unwrap();
        assert_eq!(key, "report.pdf");
    }

    #[test]
    fn test_derive_key_directory_style() {
        let key = derive_key(Some("docs/"), Path::new("/tmp/report.pdf")).unwrap();
        assert_eq!(key, "docs/report.pdf");
    }

    #[test]
    fn test_derive_key_no_filename() {
        assert!(derive_key(None, Path::new("/")).is_err());
    }
}
