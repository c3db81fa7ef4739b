//! S3-backed location
//!
//! A location is one S3-compatible endpoint reached with one set of
//! static credentials. Containers are buckets; bucket listings have no
//! native pagination on the wire, so they are materialized and paginated
//! client-side like the filesystem adapter does.

use async_trait::async_trait;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use percent_encoding::percent_decode_str;
use tracing::debug;
use url::Url;

use depot_core::{
    BackendKind, Container, Error, Item, Location, Page, Profile, Result, cursor,
};

use crate::container::S3Container;
use crate::item::service_error_message;

/// A location backed by an S3-compatible endpoint
#[derive(Debug)]
pub struct S3Location {
    client: aws_sdk_s3::Client,
    region: String,
    page_size: usize,
}

impl S3Location {
    /// Open a location for an s3 profile
    ///
    /// The profile must carry a target endpoint URL and static
    /// credentials. No request is sent here; the first operation does
    /// that.
    pub async fn open(profile: &Profile) -> Result<Self> {
        if profile.backend != BackendKind::S3 {
            return Err(Error::Config(format!(
                "profile '{}' is not an s3 profile",
                profile.name
            )));
        }
        let page_size = profile.validated_page_size()?;
        let endpoint = profile.target()?;
        let (access_key, secret_key) = profile.credentials()?;

        let credentials = aws_credential_types::Credentials::new(
            access_key,
            secret_key,
            None, // session token
            None, // expiry
            "depot-static-credentials",
        );

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(profile.region.clone()))
            .endpoint_url(endpoint)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(profile.force_path_style)
            .build();

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            region: profile.region.clone(),
            page_size,
        })
    }

    fn make_container(&self, name: &str) -> S3Container {
        S3Container::new(self.client.clone(), name, self.page_size)
    }
}

#[async_trait]
impl Location for S3Location {
    fn page_size(&self) -> usize {
        self.page_size
    }

    async fn create_container(&self, name: &str) -> Result<Box<dyn Container>> {
        let mut request = self.client.create_bucket().bucket(name);
        // us-east-1 is the one region the service refuses as an explicit
        // location constraint.
        if self.region != "us-east-1" {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        request.send().await.map_err(|e| {
            let service = e.into_service_error();
            if service.is_bucket_already_exists() || service.is_bucket_already_owned_by_you() {
                Error::AlreadyExists(format!("container '{name}'"))
            } else {
                Error::Backend(service_error_message(&service))
            }
        })?;
        Ok(Box::new(self.make_container(name)))
    }

    async fn container(&self, id: &str) -> Result<Box<dyn Container>> {
        self.client
            .head_bucket()
            .bucket(id)
            .send()
            .await
            .map_err(|e| {
                let service = e.into_service_error();
                if service.is_not_found() {
                    Error::NotFound(format!("container '{id}'"))
                } else {
                    Error::Backend(service_error_message(&service))
                }
            })?;
        Ok(Box::new(self.make_container(id)))
    }

    async fn containers(
        &self,
        prefix: &str,
        cursor_token: Option<&str>,
    ) -> Result<Page<Box<dyn Container>>> {
        let resp = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| Error::Backend(service_error_message(&e.into_service_error())))?;

        let mut entries: Vec<Box<dyn Container>> = Vec::new();
        for bucket in resp.buckets() {
            let Some(name) = bucket.name() else { continue };
            if !name.starts_with(prefix) {
                continue;
            }
            entries.push(Box::new(self.make_container(name)));
        }
        debug!(total = entries.len(), "materialized bucket listing");

        cursor::take_page(entries, cursor_token, self.page_size, |c| c.id())
    }

    /// Relays DeleteBucket: a missing bucket is [`Error::NotFound`] and a
    /// non-empty one is a backend error.
    async fn remove_container(&self, id: &str) -> Result<()> {
        use aws_sdk_s3::error::ProvideErrorMetadata;

        self.client
            .delete_bucket()
            .bucket(id)
            .send()
            .await
            .map_err(|e| {
                let service = e.into_service_error();
                if service.code() == Some("NoSuchBucket") {
                    Error::NotFound(format!("container '{id}'"))
                } else {
                    Error::Backend(service_error_message(&service))
                }
            })?;
        Ok(())
    }

    async fn item_by_url(&self, url: &Url) -> Result<Box<dyn Item>> {
        if url.scheme() != "s3" {
            return Err(Error::InvalidPath(format!(
                "expected an s3:// URL, got '{url}'"
            )));
        }
        let bucket = match url.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => {
                return Err(Error::InvalidPath(format!("'{url}' has no bucket")));
            }
        };
        let key = percent_decode_str(url.path())
            .decode_utf8()
            .map_err(|_| Error::InvalidPath(format!("'{url}' has a non-UTF-8 key")))?;
        let key = key.trim_start_matches('/');
        if key.is_empty() {
            return Err(Error::InvalidPath(format!(
                "'{url}' addresses a container, not an item"
            )));
        }

        // One HeadObject resolves existence and metadata in a single
        // round trip; a missing bucket also reports 404 here.
        self.make_container(bucket).item(key).await
    }
}
