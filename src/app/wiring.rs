use anyhow::{Context as AnyhowContext, Result};

use crate::cli::Backend;
use crate::context::Context;
use crate::storage::{self, Repository};

const FILE_STORE: &str = "db.json";
const SQLITE_STORE: &str = "todos.sqlite";

pub fn init_data_dir(ctx: &Context) -> Result<()> {
    std::fs::create_dir_all(&ctx.data_dir)?;
    Ok(())
}

/// Builds the configured backend, applying `--reset` first.
pub fn init_repository(ctx: &Context) -> Result<Box<dyn Repository + Send>> {
    match ctx.backend {
        Backend::Sqlite => {
            let db_path = ctx.data_dir.join(SQLITE_STORE);
            if ctx.reset {
                storage::SqliteRepository::reset_all(&db_path)
                    .context("resetting todo database")?;
            }
            let repo = storage::SqliteRepository::open(&db_path)
                .context("initializing todo database")?;
            Ok(Box::new(repo))
        }
        Backend::File => {
            let file_path = ctx.data_dir.join(FILE_STORE);
            if ctx.reset && file_path.exists() {
                std::fs::remove_file(&file_path).context("resetting todo store")?;
            }
            let repo = storage::FileRepository::open_with_seed(&file_path, ctx.id_seed)
                .context("opening todo store")?;
            Ok(Box::new(repo))
        }
    }
}
