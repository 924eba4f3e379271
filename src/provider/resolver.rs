//! Endpoint resolver / 端点解析
//!
//! Pure function of its input: no I/O, no shared state, no caching.

use serde::Serialize;

use super::{
    registry, AddressingMode, AddressingStyle, EndpointToken, ProviderDescriptor,
    RegionPosition, SigningRegionPolicy,
};
use crate::error::ResolveError;

/// Endpoint configuration handed to the storage SDK / 解析后的端点配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEndpointConfig {
    pub base_url: String,
    pub signing_region: String,
    pub path_style_required: bool,
}

/// Resolution input / 解析请求
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveRequest {
    pub provider: String,
    pub region: Option<String>,
    /// Datacenter code for providers whose endpoint is keyed by location
    pub location: Option<String>,
    pub signing_region: Option<String>,
    pub addressing_style: Option<AddressingStyle>,
    /// Use the token-less `s3.{domain}` endpoint when the region allows it
    pub use_global_endpoint: bool,
    /// Custom endpoint replacing the provider template
    pub endpoint_url: Option<String>,
}

impl ResolveRequest {
    pub fn new(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            ..Default::default()
        }
    }

    pub fn region(mut self, val: &str) -> Self {
        self.region = Some(val.to_string());
        self
    }

    pub fn location(mut self, val: &str) -> Self {
        self.location = Some(val.to_string());
        self
    }

    pub fn signing_region(mut self, val: &str) -> Self {
        self.signing_region = Some(val.to_string());
        self
    }

    pub fn addressing_style(mut self, val: AddressingStyle) -> Self {
        self.addressing_style = Some(val);
        self
    }

    pub fn global_endpoint(mut self) -> Self {
        self.use_global_endpoint = true;
        self
    }

    pub fn endpoint_url(mut self, val: &str) -> Self {
        self.endpoint_url = Some(val.to_string());
        self
    }
}

/// Resolve a provider endpoint / 解析服务商端点
pub fn resolve(
    provider: &str,
    region: Option<&str>,
    addressing_style: Option<AddressingStyle>,
) -> Result<ResolvedEndpointConfig, ResolveError> {
    resolve_request(&ResolveRequest {
        provider: provider.to_string(),
        region: region.map(str::to_string),
        addressing_style,
        ..Default::default()
    })
}

/// Resolve a full request / 解析完整请求
pub fn resolve_request(req: &ResolveRequest) -> Result<ResolvedEndpointConfig, ResolveError> {
    let descriptor = registry::get_descriptor(&req.provider)?;
    let region = effective_region(descriptor, non_empty(req.region.as_deref()))?;

    let base_url = match non_empty(req.endpoint_url.as_deref()) {
        Some(url) => custom_endpoint(url)?,
        None => template_endpoint(descriptor, region, req)?,
    };
    let signing_region = signing_region(descriptor, region, non_empty(req.signing_region.as_deref()))?;
    let path_style_required = path_style_required(descriptor, req.addressing_style);

    tracing::debug!(
        "Resolved endpoint: provider={}, base_url={}, signing_region={}, path_style={}",
        descriptor.id, base_url, signing_region, path_style_required
    );

    Ok(ResolvedEndpointConfig {
        base_url,
        signing_region,
        path_style_required,
    })
}

/// Whitespace-only counts as absent; anything else is kept verbatim
fn non_empty(val: Option<&str>) -> Option<&str> {
    val.filter(|s| !s.trim().is_empty())
}

/// Region after defaulting; unknown codes pass through unchanged
fn effective_region<'a>(
    descriptor: &'static ProviderDescriptor,
    requested: Option<&'a str>,
) -> Result<&'a str, ResolveError> {
    match requested {
        None => Ok(descriptor.default_region),
        Some(region) if !descriptor.supports_region_override && region != descriptor.default_region => {
            Err(ResolveError::RegionNotSupported {
                provider: descriptor.id,
                requested: region.to_string(),
                supported: descriptor.default_region,
            })
        }
        Some(region) => Ok(region),
    }
}

fn template_endpoint(
    descriptor: &'static ProviderDescriptor,
    region: &str,
    req: &ResolveRequest,
) -> Result<String, ResolveError> {
    let token = match descriptor.endpoint_token {
        EndpointToken::Region => region,
        EndpointToken::Location => non_empty(req.location.as_deref()).ok_or(
            ResolveError::MissingLocation {
                provider: descriptor.id,
                example: descriptor.known_regions.first().copied().unwrap_or("blr1"),
            },
        )?,
    };

    let position = if req.use_global_endpoint && descriptor.global_endpoint_region == Some(region) {
        RegionPosition::None
    } else {
        if req.use_global_endpoint {
            tracing::debug!(
                "Global endpoint not available for {} in region {}, using regional endpoint",
                descriptor.id, region
            );
        }
        descriptor.region_position
    };

    Ok(format!("https://{}", position.host(descriptor.base_domain, token)))
}

fn custom_endpoint(url: &str) -> Result<String, ResolveError> {
    let invalid = |reason: &str| ResolveError::InvalidEndpoint {
        url: url.to_string(),
        reason: reason.to_string(),
    };
    let url = url.trim();
    let parsed = url::Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host"));
    }
    Ok(url.trim_end_matches('/').to_string())
}

fn signing_region(
    descriptor: &'static ProviderDescriptor,
    region: &str,
    requested: Option<&str>,
) -> Result<String, ResolveError> {
    if let Some(requested) = requested {
        if !descriptor.supports_region_override && requested != descriptor.default_region {
            return Err(ResolveError::RegionNotSupported {
                provider: descriptor.id,
                requested: requested.to_string(),
                supported: descriptor.default_region,
            });
        }
        return Ok(requested.to_string());
    }
    Ok(match descriptor.signing_region_policy {
        SigningRegionPolicy::EchoUserRegion => region.to_string(),
        SigningRegionPolicy::Fixed(fixed) => fixed.to_string(),
    })
}

fn path_style_required(
    descriptor: &'static ProviderDescriptor,
    requested: Option<AddressingStyle>,
) -> bool {
    match (descriptor.addressing_mode, requested) {
        (AddressingMode::VirtualHostedOrPath, Some(AddressingStyle::VirtualHosted)) => false,
        (AddressingMode::PathOnly, Some(AddressingStyle::VirtualHosted)) => {
            tracing::warn!(
                "{} only supports path-style addressing, ignoring virtual-hosted request",
                descriptor.display_name
            );
            true
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{list_supported_providers, ProviderId};

    fn expected(base_url: &str, signing_region: &str, path_style_required: bool) -> ResolvedEndpointConfig {
        ResolvedEndpointConfig {
            base_url: base_url.to_string(),
            signing_region: signing_region.to_string(),
            path_style_required,
        }
    }

    #[test]
    fn test_defaults_contain_default_token() {
        for id in list_supported_providers() {
            let d = registry::descriptor(id);
            if d.requires_location() {
                continue;
            }
            let resolved = resolve(id.as_str(), None, None).unwrap();
            assert!(
                resolved.base_url.contains(d.default_region),
                "{} -> {}",
                id,
                resolved.base_url
            );
        }
        let krutrim = resolve_request(&ResolveRequest::new("krutrim").location("blr1")).unwrap();
        assert!(krutrim.base_url.contains("blr1"));
    }

    #[test]
    fn test_aws_region() {
        assert_eq!(
            resolve("aws", Some("us-west-2"), None).unwrap(),
            expected("https://s3.us-west-2.amazonaws.com", "us-west-2", true)
        );
    }

    #[test]
    fn test_aws_virtual_hosted_opt_in() {
        let resolved = resolve("aws", Some("eu-west-1"), Some(AddressingStyle::VirtualHosted)).unwrap();
        assert!(!resolved.path_style_required);
        let resolved = resolve("aws", Some("eu-west-1"), Some(AddressingStyle::Path)).unwrap();
        assert!(resolved.path_style_required);
    }

    #[test]
    fn test_aws_global_endpoint() {
        let resolved = resolve_request(&ResolveRequest::new("aws").global_endpoint()).unwrap();
        assert_eq!(resolved, expected("https://s3.amazonaws.com", "us-east-1", true));

        // Only us-east-1 maps to the global endpoint
        let resolved =
            resolve_request(&ResolveRequest::new("aws").region("us-west-2").global_endpoint()).unwrap();
        assert_eq!(resolved.base_url, "https://s3.us-west-2.amazonaws.com");
    }

    #[test]
    fn test_wasabi() {
        assert_eq!(
            resolve("wasabi", Some("eu-central-1"), None).unwrap(),
            expected("https://s3.eu-central-1.wasabisys.com", "us-east-1", true)
        );
        assert_eq!(
            resolve("wasabi", None, None).unwrap().base_url,
            "https://s3.us-east-1.wasabisys.com"
        );
        let global = resolve_request(&ResolveRequest::new("wasabi").global_endpoint()).unwrap();
        assert_eq!(global.base_url, "https://s3.wasabisys.com");
    }

    #[test]
    fn test_wasabi_signing_override() {
        let resolved = resolve_request(
            &ResolveRequest::new("wasabi").region("eu-central-1").signing_region("eu-central-1"),
        )
        .unwrap();
        assert_eq!(resolved.signing_region, "eu-central-1");
    }

    #[test]
    fn test_backblaze() {
        assert_eq!(
            resolve("backblaze", None, None).unwrap(),
            expected("https://s3.us-west-004.backblazeb2.com", "us-west-004", true)
        );
        assert_eq!(
            resolve("b2", Some("eu-central-003"), None).unwrap(),
            expected("https://s3.eu-central-003.backblazeb2.com", "eu-central-003", true)
        );
    }

    #[test]
    fn test_digitalocean() {
        assert_eq!(
            resolve("digitalocean", Some("fra1"), None).unwrap(),
            expected("https://fra1.digitaloceanspaces.com", "us-east-1", true)
        );
        assert_eq!(
            resolve("digitalocean", None, None).unwrap().base_url,
            "https://nyc3.digitaloceanspaces.com"
        );
    }

    #[test]
    fn test_path_only_ignores_virtual_hosted() {
        let resolved = resolve("digitalocean", Some("fra1"), Some(AddressingStyle::VirtualHosted)).unwrap();
        assert!(resolved.path_style_required);
    }

    #[test]
    fn test_krutrim_fixed_region() {
        let err = resolve_request(&ResolveRequest::new("krutrim").region("eu-west-1").location("blr1"))
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::RegionNotSupported {
                provider: ProviderId::Krutrim,
                requested: "eu-west-1".to_string(),
                supported: "ap-south-1",
            }
        );

        let resolved =
            resolve_request(&ResolveRequest::new("krutrim").region("ap-south-1").location("blr1")).unwrap();
        assert_eq!(resolved, expected("https://blr1.kos.olakrutrimsvc.com", "ap-south-1", true));
    }

    #[test]
    fn test_krutrim_region_checked_before_location() {
        assert!(matches!(
            resolve("krutrim", Some("eu-west-1"), None),
            Err(ResolveError::RegionNotSupported { .. })
        ));
    }

    #[test]
    fn test_krutrim_missing_location() {
        assert!(matches!(
            resolve("krutrim", None, None),
            Err(ResolveError::MissingLocation { provider: ProviderId::Krutrim, .. })
        ));
        assert!(matches!(
            resolve_request(&ResolveRequest::new("krutrim").location("  ")),
            Err(ResolveError::MissingLocation { .. })
        ));
    }

    #[test]
    fn test_krutrim_signing_override_conflict() {
        let err = resolve_request(
            &ResolveRequest::new("krutrim").location("blr1").signing_region("us-east-1"),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::RegionNotSupported { .. }));
    }

    #[test]
    fn test_unknown_provider() {
        for region in [None, Some("us-east-1")] {
            assert!(matches!(
                resolve("minio", region, None),
                Err(ResolveError::UnknownProvider { .. })
            ));
        }
    }

    #[test]
    fn test_empty_region_uses_default() {
        assert_eq!(
            resolve("aws", Some(""), None).unwrap(),
            resolve("aws", None, None).unwrap()
        );
        assert_eq!(
            resolve("backblaze", Some("   "), None).unwrap().signing_region,
            "us-west-004"
        );
    }

    #[test]
    fn test_region_kept_verbatim() {
        let resolved = resolve("backblaze", Some(" us-west-002"), None).unwrap();
        assert_eq!(resolved.base_url, "https://s3. us-west-002.backblazeb2.com");
        assert_eq!(resolved.signing_region, " us-west-002");

        let resolved = resolve_request(&ResolveRequest::new("krutrim").location("blr1 ")).unwrap();
        assert_eq!(resolved.base_url, "https://blr1 .kos.olakrutrimsvc.com");
    }

    #[test]
    fn test_unknown_regions_pass_through() {
        let region = "zz-nowhere-9";
        for id in list_supported_providers() {
            let d = registry::descriptor(id);
            if !d.supports_region_override {
                continue;
            }
            let resolved = resolve(id.as_str(), Some(region), None).unwrap();
            assert!(resolved.base_url.contains(region), "{}", resolved.base_url);
        }
    }

    #[test]
    fn test_idempotent() {
        let req = ResolveRequest::new("wasabi").region("ap-northeast-1");
        assert_eq!(resolve_request(&req).unwrap(), resolve_request(&req).unwrap());
    }

    #[test]
    fn test_custom_endpoint() {
        let resolved = resolve_request(
            &ResolveRequest::new("aws").region("us-west-2").endpoint_url("http://localhost:9000/"),
        )
        .unwrap();
        assert_eq!(resolved, expected("http://localhost:9000", "us-west-2", true));

        // A custom endpoint makes the location unnecessary
        let resolved = resolve_request(
            &ResolveRequest::new("krutrim").endpoint_url("https://kos.example.com"),
        )
        .unwrap();
        assert_eq!(resolved.signing_region, "ap-south-1");
    }

    #[test]
    fn test_invalid_custom_endpoint() {
        for url in ["not a url", "ftp://example.com", "file:///tmp/x"] {
            assert!(
                matches!(
                    resolve_request(&ResolveRequest::new("aws").endpoint_url(url)),
                    Err(ResolveError::InvalidEndpoint { .. })
                ),
                "{}",
                url
            );
        }
    }
}
