use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cli::{Backend, Cli, FileIdSeed};
use crate::storage::IdSeed;

/// Resolved runtime configuration, decoupled from CLI parsing.
pub struct Context {
    pub backend: Backend,
    pub data_dir: PathBuf,
    pub api_listen: SocketAddr,
    pub id_seed: IdSeed,
    pub reset: bool,
    pub log_file: Option<PathBuf>,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            backend: cli.backend,
            data_dir: PathBuf::from(&cli.data_dir),
            api_listen: cli.api_listen,
            id_seed: match cli.file_id_seed {
                FileIdSeed::Count => IdSeed::Count,
                FileIdSeed::MaxId => IdSeed::MaxId,
            },
            reset: cli.reset,
            log_file: cli.log_file.as_deref().map(PathBuf::from),
        }
    }
}
