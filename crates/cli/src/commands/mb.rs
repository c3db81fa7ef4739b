//! mb command - Make container
//!
//! Creates a new container at the profile's location.

use clap::Args;
use serde::Serialize;

use depot_core::{Container, Error, Location, StorePath};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};
use crate::store;

/// Create a container
#[derive(Args, Debug)]
pub struct MbArgs {
    /// Target path (profile/container)
    pub target: String,

    /// Ignore error if container already exists
    #[arg(short = 'p', long)]
    pub ignore_existing: bool,
}

#[derive(Debug, Serialize)]
struct MbOutput {
    status: &'static str,
    container: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Execute the mb command
pub async fn execute(args: MbArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (path, name) = match parse_mb_path(&args.target) {
        Ok(parsed) => parsed,
        Err(e) => {
            formatter.error(&e);
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

    match location.create_container(&name).await {
        Ok(container) => {
            if formatter.is_json() {
                let output = MbOutput {
                    status: "success",
                    container: container.name().to_string(),
                    message: None,
                };
                formatter.json(&output);
            } else {
                formatter.success(&format!("Container '{}' created successfully.", args.target));
            }
            ExitCode::Success
        }
        Err(Error::AlreadyExists(_)) if args.ignore_existing => {
            if formatter.is_json() {
                let output = MbOutput {
                    status: "success",
                    container: name,
                    message: Some("Container already exists".to_string()),
                };
                formatter.json(&output);
            } else {
                formatter.success(&format!("Container '{}' already exists.", args.target));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}

/// Parse an mb target into its store path and container name
fn parse_mb_path(target: &str) -> Result<(StorePath, String), String> {
    let path = StorePath::parse(target).map_err(|e| e.to_string())?;
    let name = path.require_container().map_err(|e| e.to_string())?.to_string();
    if path.key.is_some() {
        return Err(format!(
            "Invalid path '{target}'. Expected: profile/container"
        ));
    }
    Ok((path, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mb_path_valid() {
        let (path, name) = parse_mb_path("minio/archive").unwrap();
        assert_eq!(path.profile, "minio");
        assert_eq!(name, "archive");
    }

    #[test]
    fn test_parse_mb_path_trailing_slash() {
        let (_, name) = parse_mb_path("minio/archive/").unwrap();
        assert_eq!(name, "archive");
    }

    #[test]
    fn test_parse_mb_path_no_container() {
        assert!(parse_mb_path("minio").is_err());
    }

    #[test]
    fn test_parse_mb_path_with_key() {
        assert!(parse_mb_path("minio/archive/file.txt").is_err());
    }

    #[test]
    fn test_parse_mb_path_empty() {
        assert!(parse_mb_path("").is_err());
    }
}
