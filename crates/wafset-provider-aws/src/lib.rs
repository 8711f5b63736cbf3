// # AWS WAFv2 IP Set Provider
//
// This crate provides the AWS WAFv2 implementation of `IpSetProvider`.
//
// ## Implementation Status
//
// - ✅ One API call per trait method (GetIPSet, UpdateIPSet)
// - ✅ Lock token from the read is passed through unchanged to the write
// - ✅ Service error codes mapped to specific errors (not found, conflict, auth)
// - ✅ Credentials resolved from a named shared-config profile
// - ❌ NO retry logic on conflicts (a stale token is reported to the caller)
// - ❌ NO caching of IP set contents between calls
//
// ## API Reference
//
// - GetIPSet: returns `IPSet.Addresses` and `LockToken`
// - UpdateIPSet: replaces `Addresses`, requires the `LockToken` of the last read
//   and fails with `WAFOptimisticLockException` when it is stale

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_wafv2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_wafv2::types::Scope as WafScope;
use wafset_core::{Error, IpSetInfo, IpSetProvider, IpSetSnapshot, LockToken, Result, Scope};

/// Provider name used in errors and logs
const PROVIDER_NAME: &str = "aws-wafv2";

/// AWS WAFv2 IP set provider
///
/// # Trust Level: Untrusted
///
/// Isolated, stateless and single-shot. Deciding whether to write, and with
/// which token, is owned by `IpSetSync`.
pub struct AwsWafProvider {
    /// WAFv2 API client
    client: aws_sdk_wafv2::Client,

    /// Shared config profile the credentials came from
    profile: String,

    /// Region the client targets
    region: String,
}

// Custom Debug implementation that never reaches into the credentials chain
impl std::fmt::Debug for AwsWafProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsWafProvider")
            .field("profile", &self.profile)
            .field("region", &self.region)
            .field("credentials", &"<REDACTED>")
            .finish()
    }
}

impl AwsWafProvider {
    /// Build a provider from a shared-config profile and a region
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the profile or region is empty.
    pub async fn connect(profile: &str, region: &str) -> Result<Self> {
        if profile.trim().is_empty() || region.trim().is_empty() {
            return Err(Error::config("AWS profile and region are required"));
        }

        tracing::debug!("Loading AWS config for profile [{}] in [{}]", profile, region);

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(profile)
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Ok(Self::from_client(
            aws_sdk_wafv2::Client::new(&sdk_config),
            profile,
            region,
        ))
    }

    /// Wrap an already configured client
    pub fn from_client(
        client: aws_sdk_wafv2::Client,
        profile: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            client,
            profile: profile.into(),
            region: region.into(),
        }
    }
}

#[async_trait]
impl IpSetProvider for AwsWafProvider {
    /// Read the address list and lock token
    ///
    /// ```text
    /// GetIPSet { Name, Id, Scope } -> { IPSet: { Addresses, ... }, LockToken }
    /// ```
    async fn get_ip_set(&self, ip_set: &IpSetInfo) -> Result<IpSetSnapshot> {
        tracing::debug!("GetIPSet {}", ip_set);

        let output = self
            .client
            .get_ip_set()
            .name(&ip_set.name)
            .id(&ip_set.id)
            .scope(waf_scope(ip_set.scope))
            .send()
            .await
            .map_err(|e| sdk_error("GetIPSet", ip_set, e))?;

        let addresses = output
            .ip_set()
            .map(|set| set.addresses().to_vec())
            .ok_or_else(|| {
                Error::provider(PROVIDER_NAME, "Invalid response format: IPSet is missing")
            })?;

        let lock_token = output.lock_token().map(LockToken::new).ok_or_else(|| {
            Error::provider(PROVIDER_NAME, "Invalid response format: LockToken is missing")
        })?;

        tracing::debug!("IP set {} holds {} address(es)", ip_set, addresses.len());

        Ok(IpSetSnapshot {
            addresses,
            lock_token,
        })
    }

    /// Replace the address list
    ///
    /// ```text
    /// UpdateIPSet { Name, Id, Scope, Addresses, LockToken } -> { NextLockToken }
    /// ```
    async fn update_ip_set(
        &self,
        ip_set: &IpSetInfo,
        addresses: &[String],
        lock_token: &LockToken,
    ) -> Result<()> {
        tracing::debug!(
            "UpdateIPSet {} with {} address(es)",
            ip_set,
            addresses.len()
        );

        self.client
            .update_ip_set()
            .name(&ip_set.name)
            .id(&ip_set.id)
            .scope(waf_scope(ip_set.scope))
            .set_addresses(Some(addresses.to_vec()))
            .lock_token(lock_token.as_str())
            .send()
            .await
            .map_err(|e| sdk_error("UpdateIPSet", ip_set, e))?;

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

fn waf_scope(scope: Scope) -> WafScope {
    match scope {
        Scope::Cloudfront => WafScope::Cloudfront,
        Scope::Regional => WafScope::Regional,
    }
}

/// Convert an SDK failure into a wafset error
fn sdk_error<E>(operation: &str, ip_set: &IpSetInfo, err: SdkError<E>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let detail = DisplayErrorContext(&err).to_string();
    classify(operation, ip_set, err.code(), &detail)
}

/// Map a WAFv2 service error code to an error kind
///
/// A missing code means the request never produced a service response
/// (credentials, DNS, timeout).
fn classify(operation: &str, ip_set: &IpSetInfo, code: Option<&str>, detail: &str) -> Error {
    match code {
        Some("WAFNonexistentItemException") => Error::not_found(ip_set.to_string()),
        Some("WAFOptimisticLockException") => Error::conflict(format!(
            "IP set {} changed since it was read: {}",
            ip_set, detail
        )),
        Some(
            "AccessDeniedException"
            | "UnrecognizedClientException"
            | "InvalidSignatureException"
            | "ExpiredTokenException",
        ) => Error::auth(format!("{} on IP set {}: {}", operation, ip_set, detail)),
        Some("WAFInvalidParameterException") => {
            Error::invalid_input(format!("{} on IP set {}: {}", operation, ip_set, detail))
        }
        Some(code) => Error::provider(
            PROVIDER_NAME,
            format!("{} failed ({}): {}", operation, code, detail),
        ),
        None => Error::provider(
            PROVIDER_NAME,
            format!("{} request failed: {}", operation, detail),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip_set() -> IpSetInfo {
        IpSetInfo::new("blocklist", "abc-123", Scope::Regional)
    }

    #[test]
    fn test_scope_mapping() {
        assert_eq!(waf_scope(Scope::Cloudfront), WafScope::Cloudfront);
        assert_eq!(waf_scope(Scope::Regional), WafScope::Regional);
        assert_eq!(waf_scope(Scope::Cloudfront).as_str(), Scope::Cloudfront.as_str());
        assert_eq!(waf_scope(Scope::Regional).as_str(), Scope::Regional.as_str());
    }

    #[test]
    fn test_optimistic_lock_is_conflict() {
        let err = classify(
            "UpdateIPSet",
            &ip_set(),
            Some("WAFOptimisticLockException"),
            "stale",
        );
        assert!(err.is_conflict());
    }

    #[test]
    fn test_nonexistent_item_is_not_found() {
        let err = classify("GetIPSet", &ip_set(), Some("WAFNonexistentItemException"), "");
        assert!(matches!(err, Error::NotFound(ref msg) if msg.contains("abc-123")));
    }

    #[test]
    fn test_credential_failures_are_auth() {
        for code in [
            "AccessDeniedException",
            "UnrecognizedClientException",
            "ExpiredTokenException",
        ] {
            let err = classify("GetIPSet", &ip_set(), Some(code), "denied");
            assert!(matches!(err, Error::Authentication(_)), "{} should be auth", code);
        }
    }

    #[test]
    fn test_invalid_parameter_is_invalid_input() {
        let code = Some("WAFInvalidParameterException");
        let err = classify("UpdateIPSet", &ip_set(), code, "bad cidr");
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_unknown_and_transport_errors_are_provider_errors() {
        let err = classify("UpdateIPSet", &ip_set(), Some("WAFInternalErrorException"), "boom");
        assert!(matches!(err, Error::Provider { ref provider, .. } if provider == PROVIDER_NAME));

        let err = classify("GetIPSet", &ip_set(), None, "dispatch failure");
        assert!(matches!(err, Error::Provider { .. }));
        assert!(err.to_string().contains("dispatch failure"));
    }

    #[test]
    fn test_debug_hides_credentials() {
        let config = aws_sdk_wafv2::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        let provider = AwsWafProvider::from_client(
            aws_sdk_wafv2::Client::from_conf(config),
            "prod",
            "us-east-1",
        );

        let debug_str = format!("{:?}", provider);
        assert!(debug_str.contains("AwsWafProvider"));
        assert!(debug_str.contains("<REDACTED>"));
        assert_eq!(provider.provider_name(), "aws-wafv2");
    }
}
