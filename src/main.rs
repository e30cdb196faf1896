use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rpc_calculator::application::session::CalculatorSession;
use rpc_calculator::config::CalculatorConfig;
use rpc_calculator::domain::accumulator::Precision;
use rpc_calculator::domain::ports::SessionLifecycle;
use rpc_calculator::infrastructure::in_memory::InMemoryRouter;
use rpc_calculator::interfaces::rpc::server::RpcServer;
use rpc_calculator::interfaces::web;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug output.
    #[arg(short, long)]
    debug: bool,

    /// Port for the embedded web server. Use 0 to disable.
    #[arg(long, default_value_t = 8080)]
    web: u16,

    /// Directory served by the embedded web server.
    #[arg(long, default_value = ".")]
    web_root: PathBuf,

    /// Address the embedded router listens on for callers.
    #[arg(long, default_value = "127.0.0.1:9000")]
    listen: SocketAddr,

    /// Significant digits kept by arithmetic results (1 to 1000).
    #[arg(long, default_value_t = 20)]
    precision: u32,
}

impl Cli {
    fn into_config(self) -> Result<CalculatorConfig> {
        Ok(CalculatorConfig {
            listen: self.listen,
            web_port: self.web,
            web_root: self.web_root,
            precision: Precision::new(self.precision).into_diagnostic()?,
            debug: self.debug,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .init();

    // Join: register the calculator on the embedded router
    let router = InMemoryRouter::new();
    let session = CalculatorSession::new(config.precision);
    session.on_join(&router).await.into_diagnostic()?;

    let listener = TcpListener::bind(config.listen).await.into_diagnostic()?;
    tracing::info!(
        addr = %listener.local_addr().into_diagnostic()?,
        precision = config.precision.digits(),
        "router listening"
    );

    if let Some(addr) = config.web_addr() {
        let web_listener = TcpListener::bind(addr).await.into_diagnostic()?;
        let root = config.web_root.clone();
        tracing::info!(%addr, root = %root.display(), "web server listening");
        tokio::spawn(async move {
            if let Err(e) = web::serve(web_listener, root).await {
                tracing::error!("web server error: {e}");
            }
        });
    }

    tokio::select! {
        () = RpcServer::new(router).serve(listener) => {}
        _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
    }

    Ok(())
}
