//! Endpoint resolution errors / 端点解析错误

use thiserror::Error;

use crate::provider::ProviderId;

/// Errors raised while resolving a provider endpoint.
/// All of them are configuration mistakes and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Provider identifier is not registered / 不支持的服务商
    #[error("Unsupported provider: {provider}. Supported providers: {supported}")]
    UnknownProvider { provider: String, supported: String },

    /// Region conflicts with a fixed-region provider / 固定区域服务商不支持该区域
    #[error("Provider {provider} only supports region {supported}, got {requested}")]
    RegionNotSupported {
        provider: ProviderId,
        requested: String,
        supported: &'static str,
    },

    /// Location is required but was not given / 缺少数据中心位置
    #[error("Provider {provider} requires a location (for example {example})")]
    MissingLocation {
        provider: ProviderId,
        example: &'static str,
    },

    /// Custom endpoint URL could not be used / 自定义端点无效
    #[error("Invalid endpoint URL {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
}
