//! S3兼容客户端
//!
//! 端点、签名区域和寻址方式全部来自解析结果，本模块只负责调用 rust-s3。

use std::path::Path;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::Region;

use super::config::S3ClientConfig;
use crate::provider::{resolve_request, ProviderId, ResolveRequest, ResolvedEndpointConfig};
use crate::storage::{
    check_presign_expiry, object_key_for, ObjectEntry, ObjectStorage, PresignMethod, DEFAULT_PRESIGN_EXPIRY,
};

/// S3兼容客户端
#[derive(Debug, Clone)]
pub struct S3CompatibleClient {
    provider: ProviderId,
    endpoint: ResolvedEndpointConfig,
    credentials: Credentials,
    /// 预签名URL默认有效期（秒）
    presign_expiry: u32,
}

impl S3CompatibleClient {
    /// 根据配置创建客户端（凭证为空时读取环境变量）
    pub fn from_config(config: &S3ClientConfig) -> Result<Self> {
        let config = config.clone().with_env_credentials();
        let mut client = Self::new(
            &config.resolve_request(),
            &config.access_key_id,
            &config.secret_access_key,
            Some(config.session_token.as_str()).filter(|t| !t.is_empty()),
        )?;
        client.presign_expiry = config.presign_expire_secs;
        Ok(client)
    }

    /// 解析端点并创建客户端
    pub fn new(
        request: &ResolveRequest,
        access_key: &str,
        secret_key: &str,
        session_token: Option<&str>,
    ) -> Result<Self> {
        let provider: ProviderId = request.provider.parse()?;
        let endpoint = resolve_request(request)?;

        let credentials = Credentials::new(Some(access_key), Some(secret_key), session_token, None, None)
            .map_err(|e| anyhow!("创建S3凭证失败: {}", e))?;

        tracing::info!(
            "S3 client created: provider={}, endpoint={}, region={}, path_style={}",
            provider, endpoint.base_url, endpoint.signing_region, endpoint.path_style_required
        );

        Ok(Self {
            provider,
            endpoint,
            credentials,
            presign_expiry: DEFAULT_PRESIGN_EXPIRY,
        })
    }

    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    /// 解析后的端点配置
    pub fn endpoint(&self) -> &ResolvedEndpointConfig {
        &self.endpoint
    }

    /// CreateBucket 的 LocationConstraint，仅 AWS 的非 us-east-1 区域需要
    fn location_constraint(&self) -> Option<&str> {
        let region = self.endpoint.signing_region.as_str();
        (self.provider == ProviderId::Aws && region != "us-east-1").then_some(region)
    }

    fn region(&self) -> Region {
        Region::Custom {
            region: self.endpoint.signing_region.clone(),
            endpoint: self.endpoint.base_url.clone(),
        }
    }

    /// 创建 Bucket 句柄
    fn bucket(&self, name: &str) -> Result<Box<Bucket>> {
        let bucket = Bucket::new(name, self.region(), self.credentials.clone())
            .map_err(|e| anyhow!("创建S3 Bucket失败: {}", e))?;

        let bucket = if self.endpoint.path_style_required {
            bucket.with_path_style()
        } else {
            bucket
        };

        Ok(bucket)
    }
}

#[async_trait]
impl ObjectStorage for S3CompatibleClient {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        let response = Bucket::list_buckets(self.region(), self.credentials.clone())
            .await
            .map_err(|e| anyhow!("列出存储桶失败: {}", e))?;

        let names: Vec<String> = response.bucket_names().collect();
        tracing::debug!("S3 ListBuckets: provider={}, count={}", self.provider, names.len());
        Ok(names)
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        // Bucket::create attaches a LocationConstraint for any Region::Custom,
        // so the PUT on the bucket root is issued directly.
        let body = match self.location_constraint() {
            Some(region) => format!(
                "<CreateBucketConfiguration xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
                 <LocationConstraint>{}</LocationConstraint></CreateBucketConfiguration>",
                region
            ),
            None => String::new(),
        };

        let response = self
            .bucket(bucket)?
            .put_object_with_content_type("/", body.as_bytes(), "application/xml")
            .await
            .map_err(|e| anyhow!("创建存储桶失败: {}", e))?;

        if !(200..300).contains(&response.status_code()) {
            return Err(anyhow!("创建存储桶失败: bucket={}, code={}", bucket, response.status_code()));
        }

        tracing::debug!("S3 CreateBucket: bucket={}, region={}", bucket, self.endpoint.signing_region);
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        let code = self
            .bucket(bucket)?
            .delete()
            .await
            .map_err(|e| anyhow!("删除存储桶失败: {}", e))?;

        if !(200..300).contains(&code) {
            return Err(anyhow!("删除存储桶失败: bucket={}, code={}", bucket, code));
        }
        tracing::debug!("S3 DeleteBucket: bucket={}", bucket);
        Ok(())
    }

    async fn upload_file(&self, file_path: &Path, bucket: &str, object_key: Option<&str>) -> Result<String> {
        let key = object_key_for(file_path, object_key)?;
        let mut file = tokio::fs::File::open(file_path)
            .await
            .map_err(|e| anyhow!("打开本地文件失败: {:?}: {}", file_path, e))?;

        self.bucket(bucket)?
            .put_object_stream(&mut file, &key)
            .await
            .map_err(|e| anyhow!("上传文件失败: {}", e))?;

        tracing::debug!("S3 upload: file={:?}, bucket={}, key={}", file_path, bucket, key);
        Ok(key)
    }

    async fn download_file(&self, bucket: &str, object_key: &str, file_path: &Path) -> Result<()> {
        let mut file = tokio::fs::File::create(file_path)
            .await
            .map_err(|e| anyhow!("创建本地文件失败: {:?}: {}", file_path, e))?;

        let code = self
            .bucket(bucket)?
            .get_object_to_writer(object_key, &mut file)
            .await
            .map_err(|e| anyhow!("下载文件失败: {}", e))?;

        if !(200..300).contains(&code) {
            return Err(anyhow!("下载文件失败: key={}, code={}", object_key, code));
        }
        tracing::debug!("S3 download: bucket={}, key={}, file={:?}", bucket, object_key, file_path);
        Ok(())
    }

    async fn list_objects(&self, bucket: &str, prefix: &str, max_keys: usize) -> Result<Vec<ObjectEntry>> {
        let (result, code) = self
            .bucket(bucket)?
            .list_page(prefix.to_string(), None, None, None, Some(max_keys))
            .await
            .map_err(|e| anyhow!("列出S3对象失败: {}", e))?;

        if !(200..300).contains(&code) {
            return Err(anyhow!("列出S3对象失败: bucket={}, code={}", bucket, code));
        }

        let entries = result
            .contents
            .into_iter()
            .map(|obj| ObjectEntry {
                key: obj.key,
                size: obj.size,
                last_modified: obj.last_modified,
                e_tag: obj.e_tag,
                storage_class: obj.storage_class,
            })
            .collect::<Vec<_>>();

        tracing::debug!("S3 ListObjects: bucket={}, prefix={}, count={}", bucket, prefix, entries.len());
        Ok(entries)
    }

    async fn delete_object(&self, bucket: &str, object_key: &str) -> Result<()> {
        let response = self
            .bucket(bucket)?
            .delete_object(object_key)
            .await
            .map_err(|e| anyhow!("删除S3对象失败: {}", e))?;

        // 204 No Content is the usual success reply
        if !(200..300).contains(&response.status_code()) {
            return Err(anyhow!("删除S3对象失败: key={}, code={}", object_key, response.status_code()));
        }
        tracing::debug!("S3 DeleteObject: bucket={}, key={}", bucket, object_key);
        Ok(())
    }

    async fn get_object(&self, bucket: &str, object_key: &str) -> Result<Bytes> {
        let response = self
            .bucket(bucket)?
            .get_object(object_key)
            .await
            .map_err(|e| anyhow!("获取S3对象失败: {}", e))?;

        if response.status_code() != 200 {
            return Err(anyhow!("获取S3对象失败: key={}, code={}", object_key, response.status_code()));
        }
        Ok(response.bytes().clone())
    }

    async fn put_object(&self, bucket: &str, object_key: &str, data: Bytes) -> Result<()> {
        let response = self
            .bucket(bucket)?
            .put_object(object_key, &data)
            .await
            .map_err(|e| anyhow!("写入S3对象失败: {}", e))?;

        if response.status_code() != 200 {
            return Err(anyhow!("写入S3对象失败: key={}, code={}", object_key, response.status_code()));
        }
        tracing::debug!("S3 PutObject: bucket={}, key={}, size={}", bucket, object_key, data.len());
        Ok(())
    }

    async fn presigned_url(
        &self,
        bucket: &str,
        object_key: &str,
        expires_in: Option<u32>,
        method: PresignMethod,
    ) -> Result<String> {
        let expires_in = expires_in.unwrap_or(self.presign_expiry);
        check_presign_expiry(expires_in)?;
        let bucket = self.bucket(bucket)?;

        let url = match method {
            PresignMethod::Get => bucket.presign_get(object_key, expires_in, None).await,
            PresignMethod::Put => bucket.presign_put(object_key, expires_in, None, None).await,
            PresignMethod::Delete => bucket.presign_delete(object_key, expires_in).await,
        }
        .map_err(|e| anyhow!("生成预签名URL失败: {}", e))?;

        Ok(url)
    }
}
