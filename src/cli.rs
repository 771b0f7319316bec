use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None, propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory).
    #[clap(long, short, env = "CLIMASCOPE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level.
    #[clap(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Look up climate data and risk for a place name or "lat, lon".
    Lookup {
        /// Place name or coordinate pair; multiple words are joined with spaces.
        /// Put a negative latitude after `--`.
        #[clap(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Print the result as JSON.
        #[clap(long)]
        json: bool,
    },

    /// Serve the JSON API and the map dashboard.
    Serve {
        /// Port to listen on; overrides `server.port`.
        #[clap(long, short)]
        port: Option<u16>,
    },
}

impl Command {
    /// Joined query words of a lookup
    #[must_use]
    pub fn query_text(query: &[String]) -> String {
        query.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup_with_coordinates() {
        let cli =
            Cli::try_parse_from(["climascope", "lookup", "--json", "--", "-33.86,", "151.2"])
                .unwrap();
        let Command::Lookup { query, json } = cli.command else {
            panic!("expected lookup");
        };
        assert!(json);
        assert_eq!(Command::query_text(&query), "-33.86, 151.2");
    }

    #[test]
    fn test_parse_serve_with_global_flags() {
        let cli =
            Cli::try_parse_from(["climascope", "serve", "--port", "9000", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Serve { port: Some(9000) }));
    }

    #[test]
    fn test_lookup_requires_query() {
        assert!(Cli::try_parse_from(["climascope", "lookup"]).is_err());
    }
}
