//! S3-backed containers
//!
//! A container is a bucket. Item listings ride the service's native
//! pagination: `max_keys` bounds each page and the service's continuation
//! token is passed through as the opaque cursor.

use async_trait::async_trait;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::ByteStream;
use tokio::io::AsyncReadExt;
use tracing::debug;

use depot_core::{Container, Content, Error, Item, ItemMeta, Page, Result};

use crate::item::{S3Item, service_error_message, timestamp_from, trim_etag};

/// A container backed by a bucket
#[derive(Debug)]
pub struct S3Container {
    client: aws_sdk_s3::Client,
    name: String,
    page_size: usize,
}

impl S3Container {
    pub(crate) fn new(
        client: aws_sdk_s3::Client,
        name: impl Into<String>,
        page_size: usize,
    ) -> Self {
        Self {
            client,
            name: name.into(),
            page_size,
        }
    }
}

#[async_trait]
impl Container for S3Container {
    fn id(&self) -> &str {
        &self.name
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn item(&self, id: &str) -> Result<Box<dyn Item>> {
        let resp = self
            .client
            .head_object()
            .bucket(&self.name)
            .key(id)
            .send()
            .await
            .map_err(|e| {
                let service = e.into_service_error();
                if service.is_not_found() {
                    Error::NotFound(format!("item '{id}'"))
                } else {
                    Error::Backend(service_error_message(&service))
                }
            })?;

        let meta = ItemMeta {
            size: resp.content_length().and_then(|v| u64::try_from(v).ok()),
            last_modified: resp.last_modified().and_then(timestamp_from),
            etag: resp.e_tag().map(trim_etag),
            storage_class: resp.storage_class().map(|sc| sc.as_str().to_string()),
        };
        Ok(Box::new(S3Item::new(
            self.client.clone(),
            &self.name,
            id,
            meta,
        )))
    }

    async fn items(&self, prefix: &str, cursor_token: Option<&str>) -> Result<Page<Box<dyn Item>>> {
        let mut request = self
            .client
            .list_objects_v2()
            .bucket(&self.name)
            .max_keys(i32::try_from(self.page_size).unwrap_or(i32::MAX));
        if !prefix.is_empty() {
            request = request.prefix(prefix);
        }
        if let Some(token) = cursor_token {
            request = request.continuation_token(token);
        }

        let resp = match request.send().await {
            Ok(resp) => resp,
            Err(e) => {
                let service = e.into_service_error();
                if service.is_no_such_bucket() {
                    return Err(Error::NotFound(format!("container '{}'", self.name)));
                }
                // The service rejects continuation tokens it did not mint
                // with InvalidArgument.
                if let (Some(token), Some("InvalidArgument")) = (cursor_token, service.code()) {
                    return Err(Error::BadCursor(token.to_string()));
                }
                return Err(Error::Backend(service_error_message(&service)));
            }
        };

        let mut entries: Vec<Box<dyn Item>> = Vec::new();
        for object in resp.contents() {
            let Some(key) = object.key() else { continue };
            let meta = ItemMeta {
                size: object.size().and_then(|v| u64::try_from(v).ok()),
                last_modified: object.last_modified().and_then(timestamp_from),
                etag: object.e_tag().map(trim_etag),
                storage_class: object.storage_class().map(|sc| sc.as_str().to_string()),
            };
            entries.push(Box::new(S3Item::new(
                self.client.clone(),
                &self.name,
                key,
                meta,
            )));
        }
        debug!(
            container = %self.name,
            returned = entries.len(),
            truncated = resp.is_truncated().unwrap_or(false),
            "listed objects"
        );

        let cursor = if resp.is_truncated().unwrap_or(false) {
            resp.next_continuation_token().map(str::to_string)
        } else {
            None
        };
        Ok(Page { entries, cursor })
    }

    async fn put(&self, name: &str, content: Content, size: u64) -> Result<Box<dyn Item>> {
        if name.is_empty() {
            return Err(Error::InvalidPath("item name cannot be empty".into()));
        }

        // Drain the stream before talking to the service; the declared
        // size must hold or nothing is sent.
        let mut limited = content.take(size.saturating_add(1));
        let mut buf = Vec::new();
        limited.read_to_end(&mut buf).await?;
        let actual = buf.len() as u64;
        if actual != size {
            return Err(Error::SizeMismatch {
                declared: size,
                actual,
            });
        }

        let mut request = self
            .client
            .put_object()
            .bucket(&self.name)
            .key(name)
            .content_length(size as i64)
            .body(ByteStream::from(buf));
        if let Some(mime) = mime_guess::from_path(name).first() {
            request = request.content_type(mime.essence_str());
        }

        let resp = request.send().await.map_err(|e| {
            let service = e.into_service_error();
            if service.code() == Some("NoSuchBucket") {
                Error::NotFound(format!("container '{}'", self.name))
            } else {
                Error::Backend(service_error_message(&service))
            }
        })?;

        // Only report what the service confirmed; a follow-up head fills
        // in the rest when callers need it.
        let meta = ItemMeta {
            size: Some(size),
            last_modified: None,
            etag: resp.e_tag().map(trim_etag),
            storage_class: None,
        };
        Ok(Box::new(S3Item::new(
            self.client.clone(),
            &self.name,
            name,
            meta,
        )))
    }

    /// Relays DeleteObject, which succeeds for keys that do not exist.
    async fn remove_item(&self, id: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.name)
            .key(id)
            .send()
            .await
            .map_err(|e| {
                let service = e.into_service_error();
                if service.code() == Some("NoSuchBucket") {
                    Error::NotFound(format!("container '{}'", self.name))
                } else {
                    Error::Backend(service_error_message(&service))
                }
            })?;
        Ok(())
    }
}
