//! Backend selection
//!
//! Every command goes through here to turn a profile into a live
//! location handle. This is the only place in the CLI that knows which
//! concrete adapters exist.

use depot_core::{BackendKind, Location, Profile, ProfileManager, Result};
use depot_fs::FsLocation;
use depot_s3::S3Location;

/// Open the location a profile points at
pub async fn open_location(profile: &Profile) -> Result<Box<dyn Location>> {
    match profile.backend {
        BackendKind::Fs => Ok(Box::new(FsLocation::open(profile).await?)),
        BackendKind::S3 => Ok(Box::new(S3Location::open(profile).await?)),
    }
}

/// Load a profile by name and open its location
pub async fn open_profile(name: &str) -> Result<Box<dyn Location>> {
    let manager = ProfileManager::new()?;
    let profile = manager.get(name)?;
    open_location(&profile).await
}
