//! Command-line interface definitions.
//!
//! Every option can also be supplied through the environment (a `.env` file
//! in the working directory is loaded first). Database variables keep the
//! `MYSQL_ADDON_*` names used by the hosting add-on.

use crate::store::MySqlSettings;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Scrape headline articles from news sites into MySQL and serve them.
///
/// # Examples
///
/// ```sh
/// # Serve the HTTP API (default)
/// headline_scraper --listen 0.0.0.0:3000 serve
///
/// # One scrape pass, summary printed as JSON
/// headline_scraper scrape
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(long, env = "MYSQL_ADDON_HOST", default_value = "localhost")]
    pub mysql_host: String,

    #[arg(long, env = "MYSQL_ADDON_USER", default_value = "root")]
    pub mysql_user: String,

    #[arg(long, env = "MYSQL_ADDON_PASSWORD", default_value = "", hide_env_values = true)]
    pub mysql_password: String,

    #[arg(long, env = "MYSQL_ADDON_DB", default_value = "news")]
    pub mysql_db: String,

    #[arg(long, env = "MYSQL_ADDON_PORT", default_value_t = 3306)]
    pub mysql_port: u16,

    /// Upper bound on pooled database connections
    #[arg(long, env = "MYSQL_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Seconds to wait for a page's DOM before giving up on that site
    #[arg(long, env = "PAGE_LOAD_TIMEOUT_SECS", default_value_t = 30)]
    pub page_timeout_secs: u64,

    /// Chrome/Chromium binary; auto-detected when omitted
    #[arg(long, env = "CHROME_PATH")]
    pub chrome_executable: Option<PathBuf>,

    /// Address the HTTP API binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the HTTP API
    Serve,
    /// Run one scrape pass and print the summary
    Scrape,
    /// Print stored articles, newest first
    Articles,
}

impl Cli {
    pub fn mysql_settings(&self) -> MySqlSettings {
        MySqlSettings {
            host: self.mysql_host.clone(),
            user: self.mysql_user.clone(),
            password: self.mysql_password.clone(),
            database: self.mysql_db.clone(),
            port: self.mysql_port,
            max_connections: self.max_connections,
        }
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    /// The subcommand to run; serving is the default.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
