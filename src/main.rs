use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use lobby_guard::{AppState, config::Config, router::create_router, search::HttpSearchBackend};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    let search = HttpSearchBackend::new(
        config.search_backend_url.clone(),
        config.search_backend_timeout,
    )
    .expect("Failed to build search backend client");

    // 设置应用状态
    let state = AppState::new(config, Arc::new(search)).expect("Invalid query cache settings");
    let sweepers = state.spawn_sweepers();

    tracing::info!(
        "Query cache: max {} entries, ttl {:?}",
        state.query_cache.max_size(),
        state.query_cache.ttl()
    );

    let router = create_router(state.clone());

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    // 启动服务器
    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router,
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Failed to start server");

    for sweeper in sweepers {
        let name = sweeper.name();
        sweeper.shutdown().await;
        tracing::info!("{} sweeper stopped", name);
    }
    tracing::info!("Server shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
