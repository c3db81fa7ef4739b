//! Profile management commands
//!
//! Profiles are named storage endpoints: which backend to use, where it
//! lives, and how to authenticate against it. Every other command takes
//! a `profile/...` path that starts with one of these names.

use clap::Subcommand;
use serde::Serialize;

use depot_core::{BackendKind, Profile, ProfileManager, path::is_valid_profile_name};

use crate::exit_code::ExitCode;

/// Profile subcommands for managing storage endpoints
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or update a profile
    Set(SetArgs),

    /// List all configured profiles
    List(ListArgs),

    /// Remove a profile
    Remove(RemoveArgs),
}

/// Arguments for the `profile set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Profile name (e.g., "local", "minio", "prod")
    pub name: String,

    /// Backend target: a root directory for fs, an endpoint URL for s3
    pub target: String,

    /// Backend kind: fs or s3
    #[arg(long, default_value = "s3")]
    pub backend: String,

    /// Access key ID (s3 only)
    #[arg(long)]
    pub access_key: Option<String>,

    /// Secret access key (s3 only)
    #[arg(long)]
    pub secret_key: Option<String>,

    /// AWS region (s3 only, default: us-east-1)
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Bucket addressing style: path or virtual (s3 only)
    #[arg(long, default_value = "path")]
    pub addressing: String,

    /// Entries per listing page
    #[arg(long, default_value_t = depot_core::DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

/// Arguments for the `profile list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show full details including targets
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `profile remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the profile to remove
    pub name: String,
}

/// JSON output for profile list
#[derive(Serialize)]
struct ProfileListOutput {
    profiles: Vec<ProfileInfo>,
}

/// Profile information for JSON output (without credentials)
#[derive(Serialize)]
struct ProfileInfo {
    name: String,
    backend: String,
    target: String,
    region: String,
    page_size: usize,
}

impl From<&Profile> for ProfileInfo {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            backend: profile.backend.to_string(),
            target: profile.target.clone().unwrap_or_default(),
            region: profile.region.clone(),
            page_size: profile.page_size,
        }
    }
}

/// JSON output for profile set/remove operations
#[derive(Serialize)]
struct ProfileOperationOutput {
    success: bool,
    profile: String,
    message: String,
}

fn print_error(message: &str, json_output: bool) {
    if json_output {
        eprintln!("{}", serde_json::json!({"error": message}));
    } else {
        eprintln!("Error: {message}");
    }
}

/// Execute a profile subcommand
pub async fn execute(cmd: ProfileCommands, json_output: bool) -> ExitCode {
    let manager = match ProfileManager::new() {
        Ok(m) => m,
        Err(e) => {
            print_error(&e.to_string(), json_output);
            return ExitCode::GeneralError;
        }
    };

    match cmd {
        ProfileCommands::Set(args) => execute_set(args, &manager, json_output),
        ProfileCommands::List(args) => execute_list(args, &manager, json_output),
        ProfileCommands::Remove(args) => execute_remove(args, &manager, json_output),
    }
}

fn execute_set(args: SetArgs, manager: &ProfileManager, json_output: bool) -> ExitCode {
    let profile = match build_profile(args) {
        Ok(p) => p,
        Err(msg) => {
            print_error(&msg, json_output);
            return ExitCode::UsageError;
        }
    };

    let name = profile.name.clone();
    match manager.set(profile) {
        Ok(()) => {
            if json_output {
                let output = ProfileOperationOutput {
                    success: true,
                    profile: name.clone(),
                    message: format!("Profile '{name}' configured successfully"),
                };
                println!("{}", serde_json::to_string_pretty(&output).unwrap());
            } else {
                println!("Profile '{name}' configured successfully.");
            }
            ExitCode::Success
        }
        Err(e) => {
            print_error(&e.to_string(), json_output);
            ExitCode::from_error(&e)
        }
    }
}

/// Turn validated arguments into a profile, or explain what is wrong
fn build_profile(args: SetArgs) -> Result<Profile, String> {
    if !is_valid_profile_name(&args.name) {
        return Err(format!(
            "Profile name '{}' is invalid (letters, digits, '-' and '_' only)",
            args.name
        ));
    }

    if args.target.is_empty() {
        return Err("Target cannot be empty".to_string());
    }

    let backend: BackendKind = args
        .backend
        .parse()
        .map_err(|e: depot_core::Error| e.to_string())?;

    let force_path_style = match args.addressing.as_str() {
        "path" => true,
        "virtual" => false,
        _ => return Err("Addressing must be 'path' or 'virtual'".to_string()),
    };

    if args.page_size == 0 {
        return Err("Page size must be at least 1".to_string());
    }

    if backend == BackendKind::S3 && (args.access_key.is_none() || args.secret_key.is_none()) {
        return Err("S3 profiles require --access-key and --secret-key".to_string());
    }

    Ok(Profile {
        name: args.name,
        backend,
        target: Some(args.target),
        access_key: args.access_key,
        secret_key: args.secret_key,
        region: args.region,
        force_path_style,
        page_size: args.page_size,
    })
}

fn execute_list(args: ListArgs, manager: &ProfileManager, json_output: bool) -> ExitCode {
    match manager.list() {
        Ok(profiles) => {
            if json_output {
                let output = ProfileListOutput {
                    profiles: profiles.iter().map(ProfileInfo::from).collect(),
                };
                println!("{}", serde_json::to_string_pretty(&output).unwrap());
            } else if profiles.is_empty() {
                println!("No profiles configured.");
            } else if args.long {
                for profile in &profiles {
                    println!(
                        "{:<12} {:<4} {} (region: {}, page size: {})",
                        profile.name,
                        profile.backend,
                        profile.target.as_deref().unwrap_or("-"),
                        profile.region,
                        profile.page_size
                    );
                }
            } else {
                for profile in &profiles {
                    println!(
                        "{:<12} {:<4} {}",
                        profile.name,
                        profile.backend,
                        profile.target.as_deref().unwrap_or("-")
                    );
                }
            }
            ExitCode::Success
        }
        Err(e) => {
            print_error(&e.to_string(), json_output);
            ExitCode::GeneralError
        }
    }
}

fn execute_remove(args: RemoveArgs, manager: &ProfileManager, json_output: bool) -> ExitCode {
    match manager.remove(&args.name) {
        Ok(()) => {
            if json_output {
                let output = ProfileOperationOutput {
                    success: true,
                    profile: args.name.clone(),
                    message: format!("Profile '{}' removed successfully", args.name),
                };
                println!("{}", serde_json::to_string_pretty(&output).unwrap());
            } else {
                println!("Profile '{}' removed successfully.", args.name);
            }
            ExitCode::Success
        }
        Err(e) => {
            print_error(&e.to_string(), json_output);
            ExitCode::from_error(&e)
        }
    }
}
