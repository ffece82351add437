use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Settings shared by every command, taken from global flags.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Region override. When None, the SDK's default provider chain decides.
    pub region: Option<String>,
    /// Shared-config profile override.
    pub profile: Option<String>,
    /// Whether diagnostics (document contents, tallies) are logged.
    pub verbose: bool,
}

impl Config {
    /// Load AWS configuration, applying region and profile overrides on top
    /// of the default provider chain.
    pub async fn load_sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        tracing::debug!(
            region = ?self.region,
            profile = ?self.profile,
            "loading AWS configuration"
        );

        loader.load().await
    }
}
