// Community Feed Server - REST surface over the feed data layer

use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

use community_feed::{api::create_feed_router, app_state::AppState, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Media uploads are written here and served back under /media
    tokio::fs::create_dir_all(&config.media.root).await?;

    // Initialize application state
    let app_state = AppState::new(config.clone()).await?;

    // Build main application router
    let app = Router::new()
        .nest("/api/v1/feed", create_feed_router(app_state))
        .nest_service("/media", ServeDir::new(&config.media.root))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()));

    let addr = config.server_address();
    println!("🚀 Community Feed Server starting on http://{}", addr);
    println!("📋 API Documentation:");
    println!("  GET    /api/v1/feed/posts                       - List posts (x-viewer-id optional)");
    println!("  POST   /api/v1/feed/posts                       - Create post");
    println!("  POST   /api/v1/feed/posts/{{id}}/like             - Toggle like");
    println!("  GET    /api/v1/feed/posts/{{id}}/comments         - List comments");
    println!("  POST   /api/v1/feed/posts/{{id}}/comments         - Add comment");
    println!("  POST   /api/v1/feed/uploads/avatar              - Upload avatar image");
    println!("  POST   /api/v1/feed/uploads/post-image          - Upload post image");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
