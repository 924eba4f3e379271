//! S3客户端配置 / S3 client configuration

use serde::{Deserialize, Serialize};

use crate::provider::{AddressingStyle, ProviderId, ResolveRequest};
use crate::storage::DEFAULT_PRESIGN_EXPIRY;

/// S3客户端配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3ClientConfig {
    /// 服务商: aws / wasabi / backblaze / digitalocean / krutrim
    #[serde(default = "default_provider")]
    pub provider: String,
    /// 区域（为空时使用服务商默认区域）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// 数据中心位置（Krutrim 必填，如 blr1）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// 自定义端点（覆盖服务商模板）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// 签名区域覆盖
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_region: Option<String>,
    /// 寻址方式（默认路径风格）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addressing_style: Option<AddressingStyle>,
    /// us-east-1 使用全局端点（s3.amazonaws.com / s3.wasabisys.com）
    #[serde(default)]
    pub use_global_endpoint: bool,
    /// Access Key ID（为空时读取环境变量）
    #[serde(default)]
    pub access_key_id: String,
    /// Secret Access Key（为空时读取环境变量）
    #[serde(default)]
    pub secret_access_key: String,
    /// Session Token（用于临时凭证）
    #[serde(default)]
    pub session_token: String,
    /// 预签名URL过期时间（秒）
    #[serde(default = "default_presign_expire")]
    pub presign_expire_secs: u32,
}

fn default_provider() -> String {
    ProviderId::Aws.as_str().to_string()
}

fn default_presign_expire() -> u32 {
    DEFAULT_PRESIGN_EXPIRY
}

impl Default for S3ClientConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            region: None,
            location: None,
            endpoint_url: None,
            signing_region: None,
            addressing_style: None,
            use_global_endpoint: false,
            access_key_id: String::new(),
            secret_access_key: String::new(),
            session_token: String::new(),
            presign_expire_secs: default_presign_expire(),
        }
    }
}

impl S3ClientConfig {
    /// Endpoint resolution input for this config / 转换为端点解析请求
    pub fn resolve_request(&self) -> ResolveRequest {
        ResolveRequest {
            provider: self.provider.clone(),
            region: self.region.clone(),
            location: self.location.clone(),
            signing_region: self.signing_region.clone(),
            addressing_style: self.addressing_style,
            use_global_endpoint: self.use_global_endpoint,
            endpoint_url: self.endpoint_url.clone(),
        }
    }

    /// Fill empty credentials from the provider's environment variables
    /// 凭证为空时从环境变量读取
    pub fn with_env_credentials(mut self) -> Self {
        let Ok(provider) = self.provider.parse::<ProviderId>() else {
            return self;
        };
        let (key_var, secret_var) = credential_env_vars(provider);
        if self.access_key_id.is_empty() {
            if let Ok(val) = std::env::var(key_var) {
                self.access_key_id = val;
            }
        }
        if self.secret_access_key.is_empty() {
            if let Ok(val) = std::env::var(secret_var) {
                self.secret_access_key = val;
            }
        }
        if self.session_token.is_empty() && provider == ProviderId::Aws {
            if let Ok(val) = std::env::var("AWS_SESSION_TOKEN") {
                self.session_token = val;
            }
        }
        self
    }

    /// Whether both key and secret are set / 是否已配置凭证
    pub fn has_credentials(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }
}

/// Conventional credential variables per provider / 各服务商凭证环境变量
pub fn credential_env_vars(provider: ProviderId) -> (&'static str, &'static str) {
    match provider {
        ProviderId::Aws => ("AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"),
        ProviderId::Wasabi => ("WASABI_ACCESS_KEY", "WASABI_SECRET_KEY"),
        ProviderId::Backblaze => ("B2_ACCESS_KEY", "B2_SECRET_KEY"),
        ProviderId::DigitalOcean => ("DO_ACCESS_KEY", "DO_SECRET_KEY"),
        ProviderId::Krutrim => ("KRUTRIM_ACCESS_KEY", "KRUTRIM_SECRET_KEY"),
    }
}
