//! quops-admin - Moderation service
//!
//! Administrator review of submitted data points: approve, reject, edit,
//! and raw table browsing over the shared store.

use anyhow::Result;
use clap::Parser;
use quops_common::config::{prepare_database_path, resolve_root_folder};
use quops_common::db::init_database;
use quops_admin::{build_router, AppState};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "quops-admin", about = "QuOps moderation service")]
struct Args {
    /// Root folder holding the database (overrides environment/config)
    #[arg(long)]
    root_folder: Option<String>,

    /// Port to listen on
    #[arg(long, env = "QUOPS_ADMIN_PORT", default_value_t = 5731)]
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
        "Starting QuOps moderation (quops-admin) v{} [{}] built {} ({})",
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

    let state = AppState::new(pool);
    let app = build_router(state);

    // Admin service binds loopback only
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("quops-admin listening on http://127.0.0.1:{}", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
