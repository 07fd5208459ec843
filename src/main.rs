use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use epgwatch::PluginConfig;
use epgwatch_sdk::Output;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mackerel-plugin-epgstation")]
#[command(about = "Mackerel agent plugin reporting EPGStation recorder metrics")]
struct Args {
    /// Metric key prefix [default: EPGStation]
    #[arg(long)]
    metric_key_prefix: Option<String>,

    /// Temp file name used to keep the previous values (empty selects the default location)
    #[arg(long)]
    tempfile: Option<String>,

    /// EPGStation hostname [default: 127.0.0.1]
    #[arg(long)]
    host: Option<String>,

    /// EPGStation port [default: 8888]
    #[arg(long)]
    port: Option<String>,

    /// Optional TOML file with the same settings (overridden by flags)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    /// Apply the flags that were given on top of the loaded configuration.
    fn apply(self, mut config: PluginConfig) -> PluginConfig {
        if let Some(prefix) = self.metric_key_prefix {
            config.metric_key_prefix = prefix;
        }
        if let Some(tempfile) = self.tempfile {
            config.tempfile = Some(PathBuf::from(tempfile));
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config.normalize()
    }
}

fn main() -> ExitCode {
    // stdout belongs to the plugin protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = PluginConfig::load(args.config.as_deref())?;
    let config = args.apply(config);
    tracing::debug!(target_addr = %config.target(), prefix = %config.metric_key_prefix, "Starting");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(epgwatch::run(config, Output::Stdout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_parse() {
        let args = Args::parse_from([
            "mackerel-plugin-epgstation",
            "--metric-key-prefix",
            "recorder",
            "--host",
            "192.168.1.20",
            "--port",
            "8889",
            "--tempfile",
            "/tmp/epg",
        ]);

        let config = args.apply(PluginConfig::default());
        assert_eq!(config.metric_key_prefix, "recorder");
        assert_eq!(config.target(), "192.168.1.20:8889");
        assert_eq!(config.tempfile, Some(PathBuf::from("/tmp/epg")));
    }

    #[test]
    fn test_flags_default_to_config() {
        let args = Args::parse_from(["mackerel-plugin-epgstation"]);
        let config = args.apply(PluginConfig::default());
        assert_eq!(config, PluginConfig::default());
    }

    #[test]
    fn test_empty_flags_fall_back_to_defaults() {
        let args = Args::parse_from([
            "mackerel-plugin-epgstation",
            "--metric-key-prefix",
            "",
            "--tempfile",
            "",
        ]);
        let config = args.apply(PluginConfig::default());
        assert_eq!(config.metric_key_prefix, "EPGStation");
        assert_eq!(config.tempfile, None);
    }
}
