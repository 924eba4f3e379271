use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Default page size for object listing / 默认列举数量
pub const DEFAULT_MAX_KEYS: usize = 1000;

/// Default presigned URL lifetime (seconds) / 预签名URL默认有效期
pub const DEFAULT_PRESIGN_EXPIRY: u32 = 3600;

/// Longest lifetime SigV4 allows for a presigned URL (7 days)
pub const MAX_PRESIGN_EXPIRY: u32 = 7 * 24 * 3600;

/// Object entry information / 对象条目信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub key: String,
    pub size: u64,
    pub last_modified: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

/// Operation a presigned URL grants / 预签名URL对应的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresignMethod {
    #[default]
    Get,
    Put,
    Delete,
}

impl FromStr for PresignMethod {
    type Err = anyhow::Error;

    /// Accepts `get`/`put`/`delete` and the `*_object` operation names
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" | "get_object" => Ok(PresignMethod::Get),
            "put" | "put_object" => Ok(PresignMethod::Put),
            "delete" | "delete_object" => Ok(PresignMethod::Delete),
            other => Err(anyhow!("Unsupported presign method: {}", other)),
        }
    }
}

/// Object key for an uploaded file: explicit key, else the file name
pub fn object_key_for(file_path: &Path, object_key: Option<&str>) -> Result<String> {
    if let Some(key) = object_key.filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }
    file_path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
        .ok_or_else(|| anyhow!("Cannot derive object key from path: {:?}", file_path))
}

/// Check a presigned URL lifetime / 校验预签名有效期
pub fn check_presign_expiry(expires_in: u32) -> Result<()> {
    if expires_in == 0 || expires_in > MAX_PRESIGN_EXPIRY {
        return Err(anyhow!(
            "Presign expiry must be between 1 and {} seconds, got {}",
            MAX_PRESIGN_EXPIRY,
            expires_in
        ));
    }
    Ok(())
}

/// Object storage interface (pass-through operations) / 对象存储接口
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// List bucket names / 列出存储桶
    async fn list_buckets(&self) -> Result<Vec<String>>;

    /// Create bucket / 创建存储桶
    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// Delete bucket / 删除存储桶
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// Upload a local file, returns the object key used / 上传本地文件
    async fn upload_file(&self, file_path: &Path, bucket: &str, object_key: Option<&str>) -> Result<String>;

    /// Download an object into a local file / 下载对象到本地文件
    async fn download_file(&self, bucket: &str, object_key: &str, file_path: &Path) -> Result<()>;

    /// List objects under a prefix / 列出对象
    async fn list_objects(&self, bucket: &str, prefix: &str, max_keys: usize) -> Result<Vec<ObjectEntry>>;

    /// Delete object / 删除对象
    async fn delete_object(&self, bucket: &str, object_key: &str) -> Result<()>;

    /// Get object content / 获取对象内容
    async fn get_object(&self, bucket: &str, object_key: &str) -> Result<Bytes>;

    /// Put object content / 写入对象内容
    async fn put_object(&self, bucket: &str, object_key: &str, data: Bytes) -> Result<()>;

    /// Generate a presigned URL / 生成预签名URL
    /// `expires_in` of None uses the client's configured lifetime
    async fn presigned_url(
        &self,
        bucket: &str,
        object_key: &str,
        expires_in: Option<u32>,
        method: PresignMethod,
    ) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_presign_method_from_str() {
        assert_eq!("get_object".parse::<PresignMethod>().unwrap(), PresignMethod::Get);
        assert_eq!("PUT".parse::<PresignMethod>().unwrap(), PresignMethod::Put);
        assert_eq!("delete_object".parse::<PresignMethod>().unwrap(), PresignMethod::Delete);
        assert!("head_object".parse::<PresignMethod>().is_err());
    }

    #[test]
    fn test_object_key_for() {
        let path = PathBuf::from("/tmp/reports/q1.csv");
        assert_eq!(object_key_for(&path, None).unwrap(), "q1.csv");
        assert_eq!(object_key_for(&path, Some("2024/q1.csv")).unwrap(), "2024/q1.csv");
        assert_eq!(object_key_for(&path, Some("")).unwrap(), "q1.csv");
        assert!(object_key_for(Path::new("/"), None).is_err());
    }

    #[test]
    fn test_check_presign_expiry() {
        assert!(check_presign_expiry(DEFAULT_PRESIGN_EXPIRY).is_ok());
        assert!(check_presign_expiry(MAX_PRESIGN_EXPIRY).is_ok());
        assert!(check_presign_expiry(0).is_err());
        assert!(check_presign_expiry(MAX_PRESIGN_EXPIRY + 1).is_err());
    }
}
