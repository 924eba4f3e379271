//! Provider registry / 服务商注册表
//!
//! Fixed table of S3-compatible providers. Populated at compile time and
//! never mutated.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{
    AddressingMode, EndpointToken, ProviderDescriptor, ProviderId, RegionPosition,
    SigningRegionPolicy,
};
use crate::error::ResolveError;

/// Registered providers, in registration order / 已注册的服务商（注册顺序）
static PROVIDERS: [ProviderDescriptor; 5] = [
    ProviderDescriptor {
        id: ProviderId::Aws,
        display_name: "Amazon S3",
        base_domain: "amazonaws.com",
        region_position: RegionPosition::SubdomainAfterService,
        endpoint_token: EndpointToken::Region,
        default_region: "us-east-1",
        signing_region_policy: SigningRegionPolicy::EchoUserRegion,
        addressing_mode: AddressingMode::VirtualHostedOrPath,
        supports_region_override: true,
        global_endpoint_region: Some("us-east-1"),
        known_regions: &[
            "us-east-1", "us-east-2", "us-west-1", "us-west-2", "ca-central-1",
            "eu-west-1", "eu-west-2", "eu-central-1", "ap-south-1",
            "ap-southeast-1", "ap-southeast-2", "ap-northeast-1", "sa-east-1",
        ],
    },
    ProviderDescriptor {
        id: ProviderId::Wasabi,
        display_name: "Wasabi",
        base_domain: "wasabisys.com",
        region_position: RegionPosition::SubdomainAfterService,
        endpoint_token: EndpointToken::Region,
        default_region: "us-east-1",
        signing_region_policy: SigningRegionPolicy::Fixed("us-east-1"),
        addressing_mode: AddressingMode::PathOnly,
        supports_region_override: true,
        global_endpoint_region: Some("us-east-1"),
        known_regions: &[
            "us-east-1", "us-east-2", "us-west-1", "eu-central-1", "ap-northeast-1",
        ],
    },
    ProviderDescriptor {
        id: ProviderId::Backblaze,
        display_name: "Backblaze B2",
        base_domain: "backblazeb2.com",
        region_position: RegionPosition::SubdomainAfterService,
        endpoint_token: EndpointToken::Region,
        default_region: "us-west-004",
        signing_region_policy: SigningRegionPolicy::EchoUserRegion,
        addressing_mode: AddressingMode::PathOnly,
        supports_region_override: true,
        global_endpoint_region: None,
        known_regions: &[
            "us-west-000", "us-west-001", "us-west-002", "us-west-004",
            "us-east-005", "eu-central-003",
        ],
    },
    ProviderDescriptor {
        id: ProviderId::DigitalOcean,
        display_name: "DigitalOcean Spaces",
        base_domain: "digitaloceanspaces.com",
        region_position: RegionPosition::Prefix,
        endpoint_token: EndpointToken::Region,
        default_region: "nyc3",
        signing_region_policy: SigningRegionPolicy::Fixed("us-east-1"),
        addressing_mode: AddressingMode::PathOnly,
        supports_region_override: true,
        global_endpoint_region: None,
        known_regions: &[
            "nyc3", "sfo2", "sfo3", "ams3", "sgp1", "fra1", "lon1", "blr1", "syd1", "tor1",
        ],
    },
    ProviderDescriptor {
        id: ProviderId::Krutrim,
        display_name: "Krutrim Object Storage",
        base_domain: "kos.olakrutrimsvc.com",
        region_position: RegionPosition::Prefix,
        endpoint_token: EndpointToken::Location,
        default_region: "ap-south-1",
        signing_region_policy: SigningRegionPolicy::Fixed("ap-south-1"),
        addressing_mode: AddressingMode::PathOnly,
        supports_region_override: false,
        global_endpoint_region: None,
        known_regions: &["blr1"],
    },
];

/// Name and alias index / 名称与别名索引
static NAME_INDEX: Lazy<HashMap<&'static str, ProviderId>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for descriptor in PROVIDERS.iter() {
        index.insert(descriptor.id.as_str(), descriptor.id);
    }
    // Aliases / 别名
    index.insert("s3", ProviderId::Aws);
    index.insert("b2", ProviderId::Backblaze);
    index.insert("do", ProviderId::DigitalOcean);
    index.insert("spaces", ProviderId::DigitalOcean);
    index.insert("kos", ProviderId::Krutrim);
    index
});

/// Look up a provider identifier by name or alias (case-insensitive)
pub fn lookup(name: &str) -> Result<ProviderId, ResolveError> {
    let key = name.trim().to_ascii_lowercase();
    NAME_INDEX
        .get(key.as_str())
        .copied()
        .ok_or_else(|| ResolveError::UnknownProvider {
            provider: name.to_string(),
            supported: list_supported_providers()
                .iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Get the descriptor for a provider name / 获取服务商描述
pub fn get_descriptor(name: &str) -> Result<&'static ProviderDescriptor, ResolveError> {
    lookup(name).map(descriptor)
}

/// Get the descriptor for a known identifier
pub fn descriptor(id: ProviderId) -> &'static ProviderDescriptor {
    // The table holds one entry per variant in declaration order
    &PROVIDERS[id as usize]
}

/// All registered providers in registration order / 列出所有服务商
pub fn list_supported_providers() -> Vec<ProviderId> {
    PROVIDERS.iter().map(|d| d.id).collect()
}

/// All registered descriptors in registration order
pub fn descriptors() -> &'static [ProviderDescriptor] {
    &PROVIDERS
}
