//! Speakerbot relay entry point
//!
//! Runs the offline-capable proxy in front of the TTS backend. Every
//! argument can also come from the environment or a `.env` file.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use shared::{component_info, logging, Component};
use url::Url;

use relay::config::{
    DEFAULT_API_PREFIX, DEFAULT_CACHE_VERSION, DEFAULT_LANGUAGE, DEFAULT_MONITOR_ENDPOINT, DEFAULT_POLL_INTERVAL_MS,
};
use relay::{RelayConfig, RelayResult, RelayServer};

#[derive(Parser, Debug)]
#[command(name = "speakerbot-relay")]
#[command(about = "Offline-capable caching relay and file monitor for the Speakerbot TTS client")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "RELAY_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port for browser connections
    #[arg(long, env = "RELAY_PORT", default_value = "8080")]
    port: u16,

    /// Base URL of the TTS backend
    #[arg(long, env = "SPEAKERBOT_UPSTREAM", default_value = "http://127.0.0.1:8000/")]
    upstream: Url,

    /// Name of the current cache bucket
    #[arg(long, env = "RELAY_CACHE_VERSION", default_value = DEFAULT_CACHE_VERSION)]
    cache_version: String,

    /// Path prefix of backend API calls
    #[arg(long, env = "RELAY_API_PREFIX", default_value = DEFAULT_API_PREFIX)]
    api_prefix: String,

    /// Endpoint polled for new lines of the watched file
    #[arg(long, env = "RELAY_MONITOR_ENDPOINT", default_value = DEFAULT_MONITOR_ENDPOINT)]
    monitor_endpoint: String,

    /// Timer granularity of the monitor loop, in milliseconds
    #[arg(long, env = "RELAY_TICK_MS", default_value = "250")]
    tick_ms: u64,

    /// Poll interval used when a start command gives none, in milliseconds
    #[arg(long, env = "RELAY_POLL_INTERVAL_MS", default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    poll_interval_ms: u64,

    /// Language used when a start command gives none
    #[arg(long, env = "RELAY_LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Assets precached at install, comma separated
    #[arg(
        long,
        env = "RELAY_PRECACHE",
        value_delimiter = ',',
        default_value = "/manifest.json,/service-worker.js"
    )]
    precache: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RELAY_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> RelayResult<RelayConfig> {
        let config = RelayConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            upstream: self.upstream,
            cache_version: self.cache_version,
            api_prefix: self.api_prefix,
            monitor_endpoint: self.monitor_endpoint,
            tick_period: Duration::from_millis(self.tick_ms),
            default_interval_ms: self.poll_interval_ms,
            default_language: self.language,
            precache_assets: self.precache.into_iter().filter(|asset| !asset.is_empty()).collect(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> RelayResult<()> {
    // Missing .env is fine
    let _ = dotenv::dotenv();

    let args = Args::parse();
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = args.into_config()?;
    component_info!(
        Component::Server,
        "🎙️ Speakerbot relay starting (cache {}, upstream {})",
        config.cache_version,
        config.upstream
    );

    let server = RelayServer::new(config)?;
    server.run().await?;

    component_info!(Component::Server, "✅ Relay stopped gracefully");
    Ok(())
}
