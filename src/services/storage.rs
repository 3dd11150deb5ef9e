/// Object storage for uploaded posters
///
/// Uploads only talk to the PosterStorage trait; the S3 implementation is
/// backed by `object_store`.
use axum::body::Bytes;
use object_store::{
    aws::{AmazonS3, AmazonS3Builder},
    path::Path as ObjectPath,
    Attribute, Attributes, ObjectStore, PutOptions, PutPayload,
};

use crate::{
    config::Config,
    error::{AppError, AppResult},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterStorage: Send + Sync {
    /// Store `body` under `key`, replacing any existing object
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> AppResult<()>;

    /// Public URL an object is served from
    fn public_url(&self, key: &str) -> String;
}

pub struct S3PosterStorage {
    store: AmazonS3,
    bucket: String,
}

impl S3PosterStorage {
    /// Credentials are read from the standard `AWS_*` environment variables.
    pub fn new(bucket: &str, region: &str) -> AppResult<Self> {
        let bucket = bucket.trim();
        if bucket.is_empty() {
            return Err(AppError::InvalidInput(
                "S3 bucket name cannot be empty".to_string(),
            ));
        }

        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(region)
            .build()?;

        Ok(Self {
            store,
            bucket: bucket.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(&config.s3_bucket_name, &config.aws_region)
    }
}

#[async_trait::async_trait]
impl PosterStorage for S3PosterStorage {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> AppResult<()> {
        let size = body.len();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&ObjectPath::from(key), PutPayload::from(body), options)
            .await?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            bytes = size,
            "Stored object"
        );

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://{}.s3.amazonaws.com/{}", self.bucket, key)
    }
}
