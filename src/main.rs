mod app;
mod cli;
mod context;
mod model;
mod rest;
mod service;
mod storage;
mod tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = app::App::from_cli()?;
    app::run_daemon(app).await
}
