//! S3兼容对象存储客户端
//!
//! 支持 AWS S3、Wasabi、Backblaze B2、DigitalOcean Spaces、Krutrim

pub mod config;
pub mod driver;
pub mod factory;

pub use config::S3ClientConfig;
pub use driver::S3CompatibleClient;
pub use factory::S3ProviderFactory;
