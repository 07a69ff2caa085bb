/// S3 blob storage for staged email content
use crate::constants::FALLBACK_CONTENT_TYPE;
use crate::error::MaildropError;
use crate::models::MaildropConfig;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use base64::Engine as _;
use md5::{Digest as _, Md5};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes `data` under `key`, replacing any existing object
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), MaildropError>;
}

/// S3 storage implementation bound to a single bucket
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3BlobStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Acquires the configured bucket
    ///
    /// Fails with `MissingCredentials` before any network call when the access
    /// key pair is incomplete, then checks the bucket is reachable.
    pub async fn connect(config: &MaildropConfig) -> Result<Self, MaildropError> {
        let storage = &config.storage;
        let (access_key_id, secret_access_key) = storage.credentials()?;

        let credentials = Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "maildrop-config",
        );

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).credentials_provider(credentials);
        if let Some(region) = &storage.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &storage.endpoint_url {
            s3_config = s3_config.endpoint_url(endpoint).force_path_style(true);
        }

        let store = Self::new(
            aws_sdk_s3::Client::from_conf(s3_config.build()),
            storage.bucket.clone(),
        );
        store.verify_bucket().await?;

        Ok(store)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn verify_bucket(&self) -> Result<(), MaildropError> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| {
                MaildropError::Storage(format!(
                    "Bucket {} is not accessible: {}",
                    self.bucket,
                    DisplayErrorContext(e)
                ))
            })?;

        tracing::debug!(bucket = %self.bucket, "Acquired S3 bucket");
        Ok(())
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), MaildropError> {
        let size = data.len();
        let content_md5 = base64::engine::general_purpose::STANDARD.encode(Md5::digest(&data));

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .content_md5(content_md5)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                MaildropError::Storage(format!(
                    "S3 upload to s3://{}/{} failed: {}",
                    self.bucket,
                    key,
                    DisplayErrorContext(e)
                ))
            })?;

        tracing::debug!("Uploaded {} bytes to s3://{}/{}", size, self.bucket, key);
        Ok(())
    }
}

/// Uploads text content; a no-op returning `None` when content is absent or empty
pub async fn upload_string(
    store: &dyn BlobStore,
    key: &str,
    content: Option<&str>,
    content_type: &str,
) -> Result<Option<String>, MaildropError> {
    match content.filter(|c| !c.is_empty()) {
        Some(text) => {
            store
                .put_object(key, text.as_bytes().to_vec(), content_type)
                .await?;
            Ok(Some(key.to_string()))
        }
        None => Ok(None),
    }
}

/// Uploads raw bytes; a no-op returning `None` when content is empty
pub async fn upload_bytes(
    store: &dyn BlobStore,
    key: &str,
    content: Vec<u8>,
    content_type: &str,
) -> Result<Option<String>, MaildropError> {
    if content.is_empty() {
        return Ok(None);
    }

    store.put_object(key, content, content_type).await?;
    Ok(Some(key.to_string()))
}

/// Uploads the bytes of a local file; a no-op returning `None` when `path` is empty
pub async fn upload_file(
    store: &dyn BlobStore,
    key: &str,
    path: &str,
) -> Result<Option<String>, MaildropError> {
    if path.is_empty() {
        return Ok(None);
    }

    let data = tokio::fs::read(path).await?;
    store.put_object(key, data, FALLBACK_CONTENT_TYPE).await?;
    Ok(Some(key.to_string()))
}

/// Normalizes a declared content type, falling back to `application/octet-stream`
pub fn resolve_content_type(declared: &str) -> String {
    declared
        .trim()
        .parse::<mime::Mime>()
        .map(|m| m.to_string())
        .unwrap_or_else(|_| FALLBACK_CONTENT_TYPE.to_string())
}
