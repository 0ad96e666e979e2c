use dotenvy::dotenv;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use flagstone::modules::auth::model::UserRole;
use flagstone::router::init_router;
use flagstone::state::init_app_state;
use flagstone::utils::password::hash_password;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    // Check if this is a CLI command
    if args.len() > 1 && args[1] == "create-user" {
        handle_create_user(args).await;
        return Ok(());
    }

    // Normal server startup
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = init_app_state().await?;
    let app = init_router(state);

    let port = std::env::var("API_PORT").unwrap_or_else(|_| "8080".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!(port = %port, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// In-flight requests drain after the signal; new connections are refused.
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("received shutdown signal, draining in-flight requests");
}

async fn handle_create_user(args: Vec<String>) {
    if args.len() != 5 {
        eprintln!("Usage: {} create-user <username> <password> <role>", args[0]);
        std::process::exit(1);
    }

    let username = &args[2];
    let password = &args[3];
    let role = &args[4];

    if UserRole::parse(role).is_none() {
        eprintln!("Invalid role '{}'. Expected 'editor' or 'viewer'.", role);
        std::process::exit(1);
    }

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let hashed = hash_password(password).expect("Failed to hash password");

    match sqlx::query("INSERT INTO users (username, password, role) VALUES ($1, $2, $3)")
        .bind(username)
        .bind(&hashed)
        .bind(role)
        .execute(&pool)
        .await
    {
        Ok(_) => {
            println!("User created successfully!");
            println!("   Username: {}", username);
            println!("   Role: {}", role);
        }
        Err(e) => {
            eprintln!("Error creating user: {}", e);
            std::process::exit(1);
        }
    }
}
