pub mod config;
pub mod error;
pub mod provider;
pub mod storage;

// Client modules (point to project root drivers via path attribute) / 客户端模块
#[path = "../drivers/mod.rs"]
pub mod drivers;

pub use drivers::s3::{S3ClientConfig, S3CompatibleClient, S3ProviderFactory};
pub use error::ResolveError;
pub use provider::{resolve, resolve_request, ResolveRequest, ResolvedEndpointConfig};
