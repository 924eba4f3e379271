//! S3客户端工厂 / Per-provider client constructors

use anyhow::Result;

use super::driver::S3CompatibleClient;
use crate::provider::{ProviderId, ResolveRequest};

/// 各服务商客户端工厂
pub struct S3ProviderFactory;

impl S3ProviderFactory {
    /// AWS S3（region 为空时使用 us-east-1）
    pub fn create_aws_client(access_key: &str, secret_key: &str, region: Option<&str>) -> Result<S3CompatibleClient> {
        Self::create_regional_client(ProviderId::Aws, access_key, secret_key, region)
    }

    /// Wasabi（签名区域固定为 us-east-1）
    pub fn create_wasabi_client(access_key: &str, secret_key: &str, region: Option<&str>) -> Result<S3CompatibleClient> {
        Self::create_regional_client(ProviderId::Wasabi, access_key, secret_key, region)
    }

    /// Backblaze B2（region 为空时使用 us-west-004）
    pub fn create_backblaze_client(access_key: &str, secret_key: &str, region: Option<&str>) -> Result<S3CompatibleClient> {
        Self::create_regional_client(ProviderId::Backblaze, access_key, secret_key, region)
    }

    /// DigitalOcean Spaces（region 如 nyc3、sfo2、sgp1）
    pub fn create_digitalocean_client(access_key: &str, secret_key: &str, region: Option<&str>) -> Result<S3CompatibleClient> {
        Self::create_regional_client(ProviderId::DigitalOcean, access_key, secret_key, region)
    }

    /// Krutrim（区域固定 ap-south-1，location 必填，如 blr1）
    pub fn create_krutrim_client(access_key: &str, secret_key: &str, location: &str) -> Result<S3CompatibleClient> {
        let request = ResolveRequest::new(ProviderId::Krutrim.as_str()).location(location);
        S3CompatibleClient::new(&request, access_key, secret_key, None)
    }

    fn create_regional_client(
        provider: ProviderId,
        access_key: &str,
        secret_key: &str,
        region: Option<&str>,
    ) -> Result<S3CompatibleClient> {
        let mut request = ResolveRequest::new(provider.as_str());
        request.region = region.map(str::to_string);
        S3CompatibleClient::new(&request, access_key, secret_key, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_defaults() {
        let aws = S3ProviderFactory::create_aws_client("k", "s", None).unwrap();
        assert_eq!(aws.endpoint().base_url, "https://s3.us-east-1.amazonaws.com");

        let b2 = S3ProviderFactory::create_backblaze_client("k", "s", None).unwrap();
        assert_eq!(b2.endpoint().signing_region, "us-west-004");

        let spaces = S3ProviderFactory::create_digitalocean_client("k", "s", Some("sfo2")).unwrap();
        assert_eq!(spaces.endpoint().base_url, "https://sfo2.digitaloceanspaces.com");
    }

    #[test]
    fn test_factory_wasabi_region() {
        let client = S3ProviderFactory::create_wasabi_client("k", "s", Some("ap-northeast-1")).unwrap();
        assert_eq!(client.provider(), ProviderId::Wasabi);
        assert_eq!(client.endpoint().base_url, "https://s3.ap-northeast-1.wasabisys.com");
        assert_eq!(client.endpoint().signing_region, "us-east-1");
    }

    #[test]
    fn test_factory_krutrim() {
        let client = S3ProviderFactory::create_krutrim_client("k", "s", "blr1").unwrap();
        assert_eq!(client.endpoint().base_url, "https://blr1.kos.olakrutrimsvc.com");
        assert!(S3ProviderFactory::create_krutrim_client("k", "s", "").is_err());
    }
}
