use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Credentials and addressing for the remote object store. All fields
/// except the region are required at startup.
#[derive(Debug, Clone)]
pub struct OssConfig {
    pub endpoint: String,
    pub bucket_name: String,
    pub access_key_id: String,
    pub access_key_secret: String,
    pub region: String,
}

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: String,
    pub database_url: String,
    pub oss: OssConfig,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Object-storage gateway and catalog API")]
pub struct Args {
    /// Host to bind to (overrides OSS_GATEWAY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides OSS_GATEWAY_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory where uploaded files are stored (overrides OSS_GATEWAY_UPLOAD_DIR)
    #[arg(long)]
    pub upload_dir: Option<String>,

    /// Database URL (overrides OSS_GATEWAY_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

/// Read a required environment variable, failing with a message that
/// names the variable instead of a bare crash.
fn require_env(name: &str, what: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} must be set to {what}"))
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("OSS_GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("OSS_GATEWAY_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing OSS_GATEWAY_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading OSS_GATEWAY_PORT"),
        };
        let env_upload =
            env::var("OSS_GATEWAY_UPLOAD_DIR").unwrap_or_else(|_| "./upload".into());
        let env_db = env::var("OSS_GATEWAY_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/oss_gateway.db".into());

        // --- Remote store: all required, absence is a startup error ---
        let oss = OssConfig {
            endpoint: require_env("OSS_ENDPOINT", "the object-store endpoint host")?,
            bucket_name: require_env("OSS_BUCKET_NAME", "the bucket name")?,
            access_key_id: require_env("OSS_ACCESS_KEY_ID", "the account access key id")?,
            access_key_secret: require_env("OSS_ACCESS_KEY_SECRET", "the account access key secret")?,
            region: env::var("OSS_REGION").unwrap_or_else(|_| "cn-hangzhou".into()),
        };

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            upload_dir: args.upload_dir.unwrap_or(env_upload),
            database_url: args.database_url.unwrap_or(env_db),
            oss,
        };

        Ok((cfg, args.migrate))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
