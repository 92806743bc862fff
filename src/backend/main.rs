/**
 * Masagena Server Entry Point
 *
 * This is the main entry point for the Masagena backend server.
 * It loads the configuration, initializes tracing and serves the Axum app.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let config = masagena::shared::AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .init();

    tracing::info!(
        "Server initialization started (error policy: {:?})",
        config.error_policy
    );

    let addr = config.bind_addr;

    // Create the Axum app
    let app = masagena::backend::server::init::create_app(config).await;

    // Run the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin masagena-server --features ssr");
    std::process::exit(1);
}
