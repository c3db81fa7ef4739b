//! S3-backed items
//!
//! An item is one object in a bucket. Identifier and name are both the
//! object key; the flat keyspace has no separate notion of a path.

use async_trait::async_trait;
use url::Url;

use depot_core::{Content, Error, Item, ItemMeta, Result};

/// An item backed by an S3 object
#[derive(Debug)]
pub struct S3Item {
    client: aws_sdk_s3::Client,
    bucket: String,
    key: String,
    meta: ItemMeta,
}

impl S3Item {
    pub(crate) fn new(
        client: aws_sdk_s3::Client,
        bucket: impl Into<String>,
        key: impl Into<String>,
        meta: ItemMeta,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            key: key.into(),
            meta,
        }
    }
}

#[async_trait]
impl Item for S3Item {
    fn id(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        &self.key
    }

    fn meta(&self) -> &ItemMeta {
        &self.meta
    }

    fn url(&self) -> Url {
        object_url(&self.bucket, &self.key)
    }

    async fn open(&self) -> Result<Content> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await
            .map_err(|e| {
                let service = e.into_service_error();
                if service.is_no_such_key() {
                    Error::NotFound(format!("item '{}'", self.key))
                } else {
                    Error::Backend(service_error_message(&service))
                }
            })?;
        Ok(Content::new(resp.body.into_async_read()))
    }
}

/// Build the `s3://bucket/key` URL for an object
///
/// `set_path` percent-encodes key characters that are not URL-safe, and
/// the reverse decode happens in `item_by_url`.
pub(crate) fn object_url(bucket: &str, key: &str) -> Url {
    let mut url =
        Url::parse(&format!("s3://{bucket}")).expect("bucket names form valid URL hosts");
    url.set_path(key);
    url
}

/// Convert an SDK timestamp, truncated to whole seconds
///
/// Listing and head responses carry different sub-second precision, so
/// truncating both keeps the reported metadata identical between them.
pub(crate) fn timestamp_from(dt: &aws_smithy_types::DateTime) -> Option<jiff::Timestamp> {
    jiff::Timestamp::from_second(dt.secs()).ok()
}

/// ETags arrive wrapped in quotes; store them bare
pub(crate) fn trim_etag(etag: &str) -> String {
    etag.trim_matches('"').to_string()
}

/// Render a service error with its code up front
///
/// Unmodeled errors display as "unhandled error" without their code;
/// callers match on codes like AccessDenied in the rendered text.
pub(crate) fn service_error_message<E>(err: &E) -> String
where
    E: aws_sdk_s3::error::ProvideErrorMetadata + std::fmt::Display,
{
    match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (Some(code), None) => code.to_string(),
        _ => err.to_string(),
    }
}
