mod wiring;

use std::sync::Arc;

use anyhow::{Context as AnyhowContext, Result};
use tokio_util::sync::CancellationToken;

use crate::{cli, context, rest, service::TodoService};

pub struct App {
    pub ctx: context::Context,
    pub service: Arc<TodoService>,
}

impl App {
    pub fn from_cli() -> Result<Self> {
        let cli = cli::parse();
        let ctx = context::Context::from_cli(&cli);

        crate::tracing::init(ctx.log_file.as_deref());
        log::info!("🚀 Starting todo-api");
        log::info!("🗄️ Backend: {:?}", ctx.backend);
        log::info!("📂 Data dir: {}", ctx.data_dir.display());

        wiring::init_data_dir(&ctx).context("initializing data dir")?;
        let repo = wiring::init_repository(&ctx)?;

        // Loads durable state before the first request can arrive.
        let service = TodoService::new(repo).context("loading todo repository")?;

        Ok(Self {
            ctx,
            service: Arc::new(service),
        })
    }
}

pub async fn run_daemon(app: App) -> Result<()> {
    log::info!("🌐 REST API: http://{}", app.ctx.api_listen);
    if let Some(path) = app.ctx.log_file.as_deref() {
        log::info!("📝 Log file: {}", path.display());
    }

    let shutdown = CancellationToken::new();

    let api_addr = app.ctx.api_listen;
    let rest_service = app.service.clone();
    let rest_shutdown = shutdown.clone();
    let mut rest_handle = tokio::spawn(async move {
        if let Err(e) = rest::serve(api_addr, rest_service, rest_shutdown).await {
            log::error!("REST server error: {}", e);
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("🧨 Ctrl-C received, shutting down");
            shutdown.cancel();
            if let Err(e) = (&mut rest_handle).await {
                log::error!("REST task error: {}", e);
            }
        }
        res = &mut rest_handle => {
            if let Err(e) = res {
                log::error!("REST task error: {}", e);
            }
        }
    }

    // The server has drained; flush and release the store.
    app.service.close().context("closing todo service")?;

    log::info!("✅ Shutdown complete");
    Ok(())
}
