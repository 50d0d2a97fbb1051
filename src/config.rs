//! Runtime configuration
//!
//! Parsed once in `main` from command line flags, each of which can also be
//! set through an environment variable. Every field has a default, so the hub
//! runs without any configuration.

use clap::builder::RangedU64ValueParser;
use clap::Parser;

/// Port used when neither an address nor `PORT` is given
pub const DEFAULT_PORT: u16 = 3000;

/// Hub configuration
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "broadcast_hub")]
#[command(about = "Real-time broadcast chat hub over WebSocket", long_about = None)]
pub struct Config {
    /// Address to bind to, e.g. 0.0.0.0:3000 (overrides --port)
    #[arg(env = "HUB_ADDR")]
    pub addr: Option<String>,

    /// Port to bind to on 127.0.0.1 when no address is given
    #[arg(short = 'p', long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Text of the welcome event sent on connect
    #[arg(long = "welcome", env = "HUB_WELCOME", default_value = "Welcome to the broadcast hub")]
    pub welcome_message: String,

    /// Longest accepted username, in characters
    #[arg(
        long = "max-username",
        env = "HUB_MAX_USERNAME",
        default_value_t = 32,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_username_chars: usize,

    /// Outbound queue size per connection
    #[arg(
        long,
        env = "HUB_CLIENT_BUFFER",
        default_value_t = 64,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub client_buffer: usize,

    /// Command queue size of the server actor
    #[arg(
        long,
        env = "HUB_COMMAND_BUFFER",
        default_value_t = 256,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub command_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: None,
            port: DEFAULT_PORT,
            welcome_message: "Welcome to the broadcast hub".to_string(),
            max_username_chars: 32,
            client_buffer: 64,
            command_buffer: 256,
        }
    }
}

impl Config {
    /// Address the WebSocket listener binds to
    pub fn bind_addr(&self) -> String {
        match &self.addr {
            Some(addr) => addr.clone(),
            None => format!("127.0.0.1:{}", self.port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        Config::try_parse_from(std::iter::once("broadcast_hub").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.max_username_chars, 32);
    }

    #[test]
    fn test_addr_precedence() {
        let config = parse(&["0.0.0.0:9000", "--port", "9002"]).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");

        let config = parse(&["-p", "9002"]).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9002");
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            "--welcome",
            "hello",
            "--max-username",
            "8",
            "--client-buffer",
            "4",
            "--command-buffer",
            "16",
        ])
        .unwrap();

        assert_eq!(config.welcome_message, "hello");
        assert_eq!(config.max_username_chars, 8);
        assert_eq!(config.client_buffer, 4);
        assert_eq!(config.command_buffer, 16);
    }

    #[test]
    fn test_invalid_values() {
        assert!(parse(&["--port", "http"]).is_err());
        assert!(parse(&["--client-buffer", "0"]).is_err());
        assert!(parse(&["--command-buffer", "0"]).is_err());
        assert!(parse(&["--max-username", "0"]).is_err());
    }
}
