use std::path::PathBuf;
use structopt::StructOpt;

/// Structure for app configuration.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "cella",
    author = "ikanago",
    about = "Posts daily todos to an HTTP service backed by an embedded store."
)]
pub struct Config {
    /// Log responses seen by the client and writes done by the server.
    #[structopt(short, long, help = "Log client responses and server writes")]
    pub verbose: bool,

    /// Port number server listens to. 0 lets the OS pick a free one.
    #[structopt(
        short,
        long,
        default_value = "0",
        help = "Port number server listens to"
    )]
    pub port: u16,

    /// Directory to create the scratch store in.
    /// Defaults to the system's temporary directory.
    #[structopt(
        short,
        long,
        parse(from_os_str),
        help = "Directory to create the scratch store in"
    )]
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Default `env_logger` filter for this configuration.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            port: 0,
            directory: None,
        }
    }
}
