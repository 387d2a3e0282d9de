//! Standalone kernel process entry point.
//!
//! Reads a connection file path from the command line (the same contract
//! `jupyter_client` uses to launch a kernel: one positional argument, `-f
//! <connection_file>`), launches a `Kernel` against it with the reference
//! `EchoEngine`, and blocks until the control channel asks it to shut down
//! or its heartbeat lapses.
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use jupyter_protocol::ConnectionInfo;

use ignition_kernel::{reference_kernel_info, EchoEngine, KernelConfig};

#[derive(Parser, Debug)]
#[command(name = "ignition-kernel", about = "A Jupyter kernel core")]
struct Args {
    /// Path to the connection file written by the launching client.
    #[arg(short = 'f', long = "connection-file")]
    connection_file: PathBuf,

    /// Identifier to report for this kernel; defaults to the connection
    /// file's stem if omitted.
    #[arg(long)]
    kernel_id: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let contents = std::fs::read_to_string(&args.connection_file)?;
    let connection_info: ConnectionInfo = serde_json::from_str(&contents)?;

    let kernel_id = args.kernel_id.unwrap_or_else(|| {
        args.connection_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ignition-kernel".to_string())
    });

    let config = KernelConfig::from_env();

    let kernel = ignition_kernel::Kernel::launch(
        kernel_id.clone(),
        connection_info,
        config,
        reference_kernel_info(),
        Box::new(EchoEngine),
    )
    .await?;

    log::info!("kernel {kernel_id} is listening");

    loop {
        if kernel.shutdown_requested() {
            log::info!("kernel {kernel_id} received shutdown_request, tearing down");
            break;
        }
        if let Err(err) = kernel.check_pulse() {
            log::error!("kernel {kernel_id} missed its heartbeat deadline: {err}");
            break;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    kernel.tear_down().await;
    Ok(())
}
