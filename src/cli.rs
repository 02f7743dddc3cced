use clap::{Parser, ValueEnum};
use std::env;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    File,
    Sqlite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FileIdSeed {
    /// Seed the id counter with the number of loaded items (historical
    /// behavior; can reuse ids after deletions).
    Count,
    /// Seed the id counter with the largest loaded id.
    MaxId,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A small todo CRUD service with swappable file or SQLite persistence"
)]
pub struct Cli {
    #[arg(
        long,
        env = "TODO_BACKEND",
        value_enum,
        default_value = "sqlite",
        help = "Storage backend for todo items"
    )]
    pub backend: Backend,

    #[arg(
        long,
        env = "TODO_DATA_DIR",
        default_value = ".todos/",
        value_name = "DIR",
        help = "Directory to store persistent data"
    )]
    pub data_dir: String,

    #[arg(
        long = "api-listen",
        env = "TODO_API_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:8000",
        help = "REST API listen address (host:port)"
    )]
    pub api_listen: std::net::SocketAddr,

    #[arg(
        long = "file-id-seed",
        env = "TODO_FILE_ID_SEED",
        value_enum,
        default_value = "count",
        help = "How the file backend reseeds its id counter on load"
    )]
    pub file_id_seed: FileIdSeed,

    #[arg(
        long,
        default_value_t = false,
        help = "Reset all persisted state (delete the todo store) before starting"
    )]
    pub reset: bool,

    #[arg(
        long = "log-file",
        env = "TODO_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();
    Cli::parse()
}
