use envconfig::Envconfig;
use eyre::{Result, WrapErr};
use tracing::info;

pub const DEFAULT_BUCKET: &str = "default-bucket";

/// Raw process environment. Secrets only matter for their presence, see `ServiceConfig`.
#[derive(Envconfig, Clone)]
pub struct Config {
    #[envconfig(default = "0.0.0.0")]
    pub host: String,

    #[envconfig(default = "5000")]
    pub port: u16,

    #[envconfig(default = "1.0.0")]
    pub version: String,

    pub jwt_secret: Option<String>,
    pub image_service_token: Option<String>,
    pub s3_access_key: Option<String>,
    pub s3_secret_key: Option<String>,
    pub s3_bucket: Option<String>,

    #[envconfig(default = "us-east-1")]
    pub s3_region: String,
}

/// Read-only view of the configuration shared by every handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    pub jwt_secret_present: bool,
    pub service_token_present: bool,
    pub s3_access_key_present: bool,
    pub s3_secret_key_present: bool,
    pub s3_bucket: Option<String>,
    pub s3_region: String,
    pub version: String,
    pub host: String,
    pub port: u16,
}

// Unset and empty are the same thing for env secrets.
fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

impl From<Config> for ServiceConfig {
    fn from(config: Config) -> Self {
        Self {
            jwt_secret_present: present(&config.jwt_secret),
            service_token_present: present(&config.image_service_token),
            s3_access_key_present: present(&config.s3_access_key),
            s3_secret_key_present: present(&config.s3_secret_key),
            s3_bucket: config.s3_bucket.filter(|bucket| !bucket.is_empty()),
            s3_region: config.s3_region,
            version: config.version,
            host: config.host,
            port: config.port,
        }
    }
}

/// Read the process environment once, at startup.
pub fn load() -> Result<ServiceConfig> {
    load_from(Config::init_from_env())
}

fn load_from(config: Result<Config, envconfig::Error>) -> Result<ServiceConfig> {
    let config = config.wrap_err("failed to load configuration from env")?;
    Ok(config.into())
}

impl ServiceConfig {
    /// Both the service token and the S3 access key are needed to serve real traffic.
    /// The bucket name is not part of this, it falls back to `DEFAULT_BUCKET`.
    pub fn has_required_secrets(&self) -> bool {
        self.service_token_present && self.s3_access_key_present
    }

    pub fn bucket(&self) -> &str {
        self.s3_bucket.as_deref().unwrap_or(DEFAULT_BUCKET)
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn log_summary(&self) {
        info!(
            jwt_secret = self.jwt_secret_present,
            service_token = self.service_token_present,
            s3_credentials = self.s3_access_key_present,
            s3_secret_key = self.s3_secret_key_present,
            bucket = self.bucket(),
            region = %self.s3_region,
            "image-service configuration"
        );
    }
}
