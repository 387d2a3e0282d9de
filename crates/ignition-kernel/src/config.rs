//! Kernel configuration: the tunables the original core keeps in
//! `_SLOT_DEFAULTS` (poll delays, port ranges, the cardiac-arrest timeout),
//! read from the environment the way `ConnectionInfo` reads from a
//! connection file — plain data, no builder macro.
use std::time::Duration;

use runtimelib::socket_set::{CARDIAC_ARREST_TIMEOUT, LINGERING_DELAY, LOOP_DELAY};

/// Tunables for a launched kernel, defaulting to the original core's
/// `_SLOT_DEFAULTS` values. Field names follow the recognized configuration
/// keys verbatim (`transport`, `ip`, `min_port_range`, `max_port_range`,
/// `zpoll_timeout_ms`, `loop_delay`, `lingering_delay`,
/// `cardiac_arrest_timeout`, `default_logging_level`, `live_reload`,
/// `signature_scheme`, `username`) so the environment-variable overrides
/// below read as a direct mapping rather than a reinterpretation.
#[derive(Debug, Clone)]
pub struct KernelConfig {
    pub transport: String,
    pub ip: String,
    pub username: String,
    /// Lowest port considered when ports aren't pinned in the connection
    /// file (random binding).
    pub min_port_range: u16,
    /// Highest port considered when ports aren't pinned.
    pub max_port_range: u16,
    /// How long a poll loop sleeps between checking `interrupted` when idle.
    pub loop_delay: Duration,
    /// How long `tear_down` waits for in-flight poll iterations to notice
    /// a closed socket before the ZeroMQ context itself is dropped.
    pub lingering_delay: Duration,
    /// ZeroMQ poll timeout per iteration of a poll loop.
    pub zpoll_timeout_ms: u64,
    /// How long the supervisor tolerates a kernel going without a
    /// heartbeat before declaring it dead.
    pub cardiac_arrest_timeout: Duration,
    pub default_logging_level: String,
    /// Dynamic handler reload toggle; see `reload::ReloadPolicy` for why
    /// this is a documented seam rather than a working feature.
    pub live_reload: bool,
    pub signature_scheme: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig {
            transport: "tcp".to_string(),
            ip: "127.0.0.1".to_string(),
            username: "kernel".to_string(),
            min_port_range: 30000,
            max_port_range: 32000,
            loop_delay: LOOP_DELAY,
            lingering_delay: LINGERING_DELAY,
            zpoll_timeout_ms: 10,
            cardiac_arrest_timeout: CARDIAC_ARREST_TIMEOUT,
            default_logging_level: "info".to_string(),
            live_reload: false,
            signature_scheme: "hmac-sha256".to_string(),
        }
    }
}

impl KernelConfig {
    /// Overrides defaults from environment variables, under the
    /// `IGNITION_KERNEL_*` naming spec.md's configuration section uses.
    /// Any variable that's absent or fails to parse is left at its default.
    pub fn from_env() -> Self {
        let mut config = KernelConfig::default();

        if let Ok(value) = std::env::var("IGNITION_KERNEL_TRANSPORT") {
            config.transport = value;
        }
        if let Ok(value) = std::env::var("IGNITION_KERNEL_IP") {
            config.ip = value;
        }
        if let Ok(value) = std::env::var("IGNITION_KERNEL_USERNAME") {
            config.username = value;
        }
        if let Ok(value) = std::env::var("IGNITION_KERNEL_MIN_PORT_RANGE") {
            if let Ok(port) = value.parse() {
                config.min_port_range = port;
            }
        }
        if let Ok(value) = std::env::var("IGNITION_KERNEL_MAX_PORT_RANGE") {
            if let Ok(port) = value.parse() {
                config.max_port_range = port;
            }
        }
        if let Ok(value) = std::env::var("IGNITION_KERNEL_ZPOLL_TIMEOUT_MS") {
            if let Ok(ms) = value.parse() {
                config.zpoll_timeout_ms = ms;
            }
        }
        if let Ok(value) = std::env::var("IGNITION_KERNEL_CARDIAC_ARREST_SECS") {
            if let Ok(secs) = value.parse::<u64>() {
                config.cardiac_arrest_timeout = Duration::from_secs(secs);
            }
        }
        if let Ok(value) = std::env::var("IGNITION_KERNEL_LOOP_DELAY_MS") {
            if let Ok(ms) = value.parse::<u64>() {
                config.loop_delay = Duration::from_millis(ms);
            }
        }
        if let Ok(value) = std::env::var("IGNITION_KERNEL_DEFAULT_LOGGING_LEVEL") {
            config.default_logging_level = value;
        }
        if let Ok(value) = std::env::var("IGNITION_KERNEL_LIVE_RELOAD") {
            config.live_reload = value == "1" || value.eq_ignore_ascii_case("true");
        }
        if let Ok(value) = std::env::var("IGNITION_KERNEL_SIGNATURE_SCHEME") {
            config.signature_scheme = value;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_original_cores_slot_defaults() {
        let config = KernelConfig::default();
        assert_eq!(config.cardiac_arrest_timeout, Duration::from_secs(15 * 60));
        assert_eq!(config.loop_delay, Duration::from_millis(50));
        assert_eq!(config.lingering_delay, Duration::from_millis(350));
        assert_eq!(config.zpoll_timeout_ms, 10);
        assert_eq!(config.min_port_range, 30000);
        assert_eq!(config.max_port_range, 32000);
        assert!(!config.live_reload);
    }
}
