// Application startup - binds the listener and wires the resolver into actix-web
use actix_web::{dev::Server, http::StatusCode, middleware::ErrorHandlers, web, App, HttpServer};
use std::net::TcpListener;
use tracing::info;
use tracing_actix_web::TracingLogger;

use crate::{
    api::{payload_too_large, search_routes},
    config::ServiceConfig,
    search::QueryResolver,
};

/// Holds the newly built server and the port it actually bound
pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    #[tracing::instrument(name = "Building application", skip(config))]
    pub async fn build(config: ServiceConfig) -> anyhow::Result<Self> {
        let listener = TcpListener::bind((config.host.as_str(), config.port))?;
        let resolver = QueryResolver::from_config(config)?;
        Self::with_resolver(listener, resolver)
    }

    /// Serves an already-built resolver; port 0 on the listener picks a free port.
    pub fn with_resolver(listener: TcpListener, resolver: QueryResolver) -> anyhow::Result<Self> {
        let port = listener.local_addr()?.port();
        info!(port, strategies = ?resolver.strategy_ids(), "Search pipeline ready");

        let server = run(listener, resolver)?;
        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Only returns once the server is stopped
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        info!(port = self.port, "Running search service");
        self.server.await
    }
}

pub fn run(listener: TcpListener, resolver: QueryResolver) -> Result<Server, std::io::Error> {
    // Shared read-only across workers
    let resolver = web::Data::new(resolver);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(ErrorHandlers::new().handler(StatusCode::PAYLOAD_TOO_LARGE, payload_too_large))
            .wrap(TracingLogger::default())
            .app_data(resolver.clone())
            .configure(search_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
