//! Turns a `POST /kernel` body into a launched `Kernel`: allocates ports,
//! generates a session key and Curve keypair, writes the resulting
//! `ConnectionInfo`, and hands it to `ignition_kernel::Kernel::launch`.
use std::net::IpAddr;

use ignition_kernel::{reference_kernel_info, EchoEngine, Kernel, KernelConfig};
use jupyter_protocol::connection_info::{ConnectionInfo, Transport};
use runtimelib::peek_ports;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The JSON body accepted by `POST /kernel`. Fields are all optional; any
/// that's absent falls back to `KernelConfig`'s defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpawnOptions {
    pub kernel_id: Option<String>,
    pub ip: Option<String>,
    pub transport: Option<String>,
    pub signature_scheme: Option<String>,
}

/// The response shape for `POST /kernel` / `GET /kernel/{id}`: the kernel's
/// id plus its connection info, the JSON form a client would write to a
/// connection file.
#[derive(Debug, Clone, Serialize)]
pub struct KernelInfoResponse {
    pub kernel_id: String,
    #[serde(flatten)]
    pub connection_info: ConnectionInfo,
}

#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error("invalid ip address: {0}")]
    InvalidIp(#[from] std::net::AddrParseError),
    #[error(transparent)]
    Kernel(#[from] ignition_kernel::KernelError),
}

/// Allocates ports, builds a connection file's worth of `ConnectionInfo`,
/// and launches a kernel. Returns the launched `Kernel` plus the info a
/// client needs to connect to it.
pub async fn spawn_kernel(
    options: &SpawnOptions,
    config: &KernelConfig,
) -> Result<(Kernel, ConnectionInfo), SpawnError> {
    let kernel_id = options
        .kernel_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let ip: IpAddr = options
        .ip
        .clone()
        .unwrap_or_else(|| config.ip.clone())
        .parse()?;
    let transport = match options
        .transport
        .as_deref()
        .unwrap_or(&config.transport)
    {
        "ipc" => Transport::IPC,
        _ => Transport::TCP,
    };

    let ports = peek_ports(ip, 5).await.map_err(ignition_kernel::KernelError::from)?;
    let keypair = runtimelib::keypair::keypair_for(&kernel_id);

    let connection_info = ConnectionInfo {
        ip: ip.to_string(),
        transport,
        shell_port: ports[0],
        iopub_port: ports[1],
        stdin_port: ports[2],
        control_port: ports[3],
        hb_port: ports[4],
        key: Uuid::new_v4().to_string(),
        signature_scheme: options
            .signature_scheme
            .clone()
            .unwrap_or_else(|| config.signature_scheme.clone()),
        kernel_name: Some("ignition-script".to_string()),
        ignition_kernel_id: Some(kernel_id.clone()),
        server_public_key: Some(keypair.public_key_z85.clone()),
    };

    let kernel = Kernel::launch(
        kernel_id,
        connection_info.clone(),
        config.clone(),
        reference_kernel_info(),
        Box::new(EchoEngine),
    )
    .await?;

    Ok((kernel, connection_info))
}

/// Whether an already-running kernel's connection info was built from
/// options that match a fresh request, the check `POST /kernel` uses to
/// decide whether to warn about option drift instead of respawning.
pub fn options_drifted(options: &SpawnOptions, existing: &ConnectionInfo) -> bool {
    if let Some(ip) = &options.ip {
        if ip != &existing.ip {
            return true;
        }
    }
    if let Some(scheme) = &options.signature_scheme {
        if scheme != &existing.signature_scheme {
            return true;
        }
    }
    false
}
