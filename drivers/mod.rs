// Storage client package / 存储客户端包
pub mod s3;

use crate::storage::ObjectStorage;

/// Create an object storage client from config / 根据配置创建存储客户端
pub fn create_storage(config: &s3::S3ClientConfig) -> anyhow::Result<Box<dyn ObjectStorage>> {
    Ok(Box::new(s3::S3CompatibleClient::from_config(config)?))
}
