//! quops-web - Public dashboard service
//!
//! Visualization of the approved quantum-computing metrics dataset plus
//! the public submission and update-proposal forms.

use anyhow::Result;
use clap::Parser;
use quops_common::config::{prepare_database_path, resolve_data_source, resolve_root_folder};
use quops_common::db::init_database;
use quops_web::{build_router, AppState};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "quops-web", about = "QuOps public dashboard service")]
struct Args {
    /// Root folder holding the database (overrides environment/config)
    #[arg(long)]
    root_folder: Option<String>,

    /// Port to listen on
    #[arg(long, env = "QUOPS_WEB_PORT", default_value_t = 5730)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting QuOps dashboard (quops-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root_folder = resolve_root_folder(args.root_folder.as_deref());
    let db_path = prepare_database_path(&root_folder)?;
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;

    let source = resolve_data_source()?;
    info!("Dataset source: {:?}", source);

    let state = AppState::new(pool, source);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("quops-web listening on http://127.0.0.1:{}", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
