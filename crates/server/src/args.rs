use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::warn;

use pingsweep_common::DEFAULT_CONCURRENCY;
use pingsweep_target_resolver::parse_subnet;

pub const DEFAULT_SUBNET: &str = "192.168.1.0/24";

#[derive(Parser, Debug)]
#[command(name = "pingsweep")]
#[command(version)]
#[command(about = "Web-served LAN liveness scanner", long_about = None)]
pub struct Cli {
    /// TCP port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Subnet prefilled in the web form (not enforced on /scan)
    #[arg(long, env = "DEFAULT_SUBNET", default_value = DEFAULT_SUBNET)]
    pub default_subnet: String,

    /// Path to a favicon served at /favicon.ico
    #[arg(long, env = "ICON")]
    pub icon: Option<String>,

    /// Max probes in flight per scan
    #[arg(short, long, env = "SCAN_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY, value_parser = parse_concurrency)]
    pub concurrency: usize,

    /// Largest number of hosts a single scan may cover (unlimited when unset)
    #[arg(long, env = "MAX_SCAN_HOSTS")]
    pub max_hosts: Option<u64>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("concurrency must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Settings the HTTP layer runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub default_subnet: String,
    pub icon: Option<PathBuf>,
    pub concurrency: usize,
    pub max_hosts: Option<u64>,
}

impl Cli {
    /// Normalise into a [`ServerConfig`]. Empty values fall back to defaults.
    pub fn into_config(self) -> ServerConfig {
        let default_subnet = match self.default_subnet.trim() {
            "" => DEFAULT_SUBNET.to_string(),
            s => s.to_string(),
        };
        if let Err(e) = parse_subnet(&default_subnet) {
            warn!("DEFAULT_SUBNET {:?} does not parse: {}", default_subnet, e);
        }

        let icon = self
            .icon
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        ServerConfig {
            listen: SocketAddr::new(self.bind, self.port),
            default_subnet,
            icon,
            concurrency: self.concurrency,
            max_hosts: self.max_hosts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pingsweep").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--port",
            "9000",
            "--bind",
            "127.0.0.1",
            "--default-subnet",
            "10.0.0.0/24",
            "--icon",
            "/tmp/icon.ico",
            "--concurrency",
            "8",
            "--max-hosts",
            "1024",
        ])
        .into_config();

        assert_eq!(config.listen, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.default_subnet, "10.0.0.0/24");
        assert_eq!(config.icon, Some(PathBuf::from("/tmp/icon.ico")));
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.max_hosts, Some(1024));
    }

    #[test]
    fn host_cap_is_off_by_default() {
        assert_eq!(parse(&[]).into_config().max_hosts, None);
    }

    #[test]
    fn empty_values_fall_back() {
        let cli = Cli {
            default_subnet: " ".to_string(),
            icon: Some(String::new()),
            ..parse(&[])
        };
        let config = cli.into_config();
        assert_eq!(config.default_subnet, DEFAULT_SUBNET);
        assert_eq!(config.icon, None);
    }

    #[test]
    fn zero_concurrency_rejected() {
        assert!(Cli::try_parse_from(["pingsweep", "--concurrency", "0"]).is_err());
        assert!(Cli::try_parse_from(["pingsweep", "--concurrency", "many"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        assert_eq!(parse(&["-vv"]).verbose, 2);
    }
}
