use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use super::{AssetStorage, StorageError};
use crate::config::LiveBackend;

/// S3 / MinIO asset storage. Returned URLs are `public_url/<key>`.
#[derive(Clone)]
pub struct S3AssetStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url: String,
}

impl S3AssetStorage {
    pub async fn from_config(backend: &LiveBackend) -> Self {
        Self {
            client: build_s3_client(backend).await,
            bucket: backend.s3_bucket.clone(),
            public_url: backend.s3_public_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AssetStorage for S3AssetStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        if bytes.is_empty() {
            return Err(StorageError::Empty(path.to_string()));
        }

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(ByteStream::from(bytes));
        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }
        request
            .send()
            .await
            .map_err(|e| StorageError::Upload(format!("S3 upload failed: {e}")))?;

        info!("Uploaded asset to s3://{}/{}", self.bucket, path);
        Ok(format!("{}/{}", self.public_url, path))
    }
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(backend: &LiveBackend) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &backend.aws_access_key_id,
        &backend.aws_secret_access_key,
        None,
        None,
        "portfolio-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&backend.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
