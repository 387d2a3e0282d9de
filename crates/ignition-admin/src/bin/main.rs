//! Admin server entry point. Grounded on `runtimed/src/main.rs`'s
//! `init_logger` + `axum::serve` shape, minus the sqlite pool this system
//! has no use for.
use std::net::{IpAddr, SocketAddr};

use axum::Router;
use ignition_kernel::KernelConfig;
use ignition_admin::{kernel_routes, AppState};

const IP: &str = "0.0.0.0";
const PORT: u16 = 12397;

fn init_logger() {
    let level = if cfg!(debug_assertions) { "debug" } else { "info" };
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", level);
    }
    env_logger::init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let ip: IpAddr = IP.parse().expect("could not parse admin bind address");
    let addr = SocketAddr::from((ip, PORT));

    let state = AppState::new(KernelConfig::from_env());
    let app = Router::new().merge(kernel_routes()).with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("ignition-admin listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
