//! Groundworks - backend for the construction & landscaping site
//! Serves the staff API and provides admin commands for tokens and users.

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use groundworks_backend::{
    api::{router, AppState},
    auth::{JwtHandler, SignOptions, SqliteUserStore, TokenPayload, UserStore},
    config::{resolve_data_path, token_lifetime, Cli, Command},
};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    let cli = Cli::parse();
    let db_path = resolve_data_path(&cli.db_path);

    match cli.command() {
        Command::Serve => serve(cli.bind, &db_path).await,
        Command::IssueToken {
            sub,
            role,
            email,
            name,
            hours,
        } => {
            let jwt = JwtHandler::from_env();
            let mut payload = TokenPayload::new(sub, role);
            payload.email = email;
            payload.name = name;

            let lifetime = token_lifetime(hours)?;
            let signed = jwt
                .sign(&payload, SignOptions::expires_in(lifetime))
                .context("Failed to sign token")?;

            info!(
                sub = %payload.sub,
                role = %payload.role,
                expires_in_secs = signed.expires_in,
                "Issued token"
            );
            println!("{}", signed.token);
            Ok(())
        }
        Command::AddUser {
            email,
            first_name,
            last_name,
            role,
        } => {
            let store = SqliteUserStore::new(&db_path)?;
            let user = store
                .create_user(&email, &first_name, &last_name, role)
                .await?;
            info!(id = %user.id, email = %user.email, role = %user.role, "Added user");
            println!("{}", user.id);

            // Hand out a first token when a secret is configured
            let jwt = JwtHandler::from_env();
            if jwt.check_secret().is_ok() {
                let signed = jwt
                    .sign(&user.token_payload(), SignOptions::default())
                    .context("Failed to sign token")?;
                println!("{}", signed.token);
            }
            Ok(())
        }
    }
}

async fn serve(bind: std::net::SocketAddr, db_path: &str) -> Result<()> {
    info!("Groundworks backend starting");

    // Refuse to start without a signing secret
    let jwt = Arc::new(JwtHandler::from_env());
    jwt.check_secret()
        .context("JWT_SECRET must be set before starting the server")?;

    let user_store: Arc<dyn UserStore> = Arc::new(SqliteUserStore::new(db_path)?);
    info!(db_path, "User store initialized");

    let app = router(AppState::new(jwt, user_store));

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!("API server listening on {}", bind);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing with an env-driven filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "groundworks_backend=debug,groundworks=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also the crate directory's .env when launched from elsewhere
    let candidate = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}
