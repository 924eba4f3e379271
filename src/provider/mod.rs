//! S3-compatible provider model / S3兼容服务商模型
//!
//! Each provider is described by a [`ProviderDescriptor`] held in the
//! [`registry`]. The [`resolver`] turns a descriptor plus caller input into a
//! [`ResolvedEndpointConfig`] that configures the storage SDK.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

pub mod registry;
pub mod resolver;

pub use registry::{descriptor, get_descriptor, list_supported_providers};
pub use resolver::{resolve, resolve_request, ResolveRequest, ResolvedEndpointConfig};

/// Provider identifier / 服务商标识
///
/// Discriminants index the registry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Aws = 0,
    Wasabi = 1,
    Backblaze = 2,
    DigitalOcean = 3,
    Krutrim = 4,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Aws => "aws",
            ProviderId::Wasabi => "wasabi",
            ProviderId::Backblaze => "backblaze",
            ProviderId::DigitalOcean => "digitalocean",
            ProviderId::Krutrim => "krutrim",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        registry::lookup(s)
    }
}

/// Where the region token goes in the endpoint host / 区域在域名中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionPosition {
    /// `{token}.{domain}` (DigitalOcean, Krutrim)
    Prefix,
    /// `s3.{token}.{domain}` (AWS, Wasabi, Backblaze)
    SubdomainAfterService,
    /// `s3.{domain}`, no token (global/legacy endpoint)
    None,
}

impl RegionPosition {
    /// Render the endpoint host for a base domain and token
    pub fn host(&self, domain: &str, token: &str) -> String {
        match self {
            RegionPosition::Prefix => format!("{}.{}", token, domain),
            RegionPosition::SubdomainAfterService => format!("s3.{}.{}", token, domain),
            RegionPosition::None => format!("s3.{}", domain),
        }
    }
}

/// Which caller value is substituted into the endpoint / 端点中替换的参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointToken {
    Region,
    /// Datacenter code, independent of the signing region (Krutrim)
    Location,
}

impl EndpointToken {
    pub fn placeholder(&self) -> &'static str {
        match self {
            EndpointToken::Region => "{region}",
            EndpointToken::Location => "{location}",
        }
    }
}

/// How the request-signing region is chosen / 签名区域策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningRegionPolicy {
    EchoUserRegion,
    Fixed(&'static str),
}

/// Addressing styles a provider accepts / 服务商支持的寻址方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    VirtualHostedOrPath,
    PathOnly,
}

/// Addressing style requested by the caller / 调用方请求的寻址方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressingStyle {
    #[default]
    Path,
    VirtualHosted,
}

/// Immutable description of one provider / 服务商描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub id: ProviderId,
    pub display_name: &'static str,
    /// Domain the endpoint host is built on, e.g. `wasabisys.com`
    pub base_domain: &'static str,
    pub region_position: RegionPosition,
    pub endpoint_token: EndpointToken,
    /// Region used when the caller gives none. For fixed-region providers
    /// this is the only accepted region.
    pub default_region: &'static str,
    pub signing_region_policy: SigningRegionPolicy,
    pub addressing_mode: AddressingMode,
    pub supports_region_override: bool,
    /// Region served by the token-less `s3.{domain}` endpoint, if any
    pub global_endpoint_region: Option<&'static str>,
    /// Known region (or location) codes. Discovery only, never validated against.
    pub known_regions: &'static [&'static str],
}

impl ProviderDescriptor {
    /// Endpoint template with its placeholder, e.g. `https://s3.{region}.wasabisys.com`
    pub fn endpoint_template(&self) -> String {
        format!(
            "https://{}",
            self.region_position
                .host(self.base_domain, self.endpoint_token.placeholder())
        )
    }

    /// Whether the endpoint needs a caller-supplied location
    pub fn requires_location(&self) -> bool {
        self.endpoint_token == EndpointToken::Location
    }
}
