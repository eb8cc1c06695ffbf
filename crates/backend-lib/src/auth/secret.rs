// ============================
// crates/backend-lib/src/auth/secret.rs
// ============================
//! Random signing secrets.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;

/// Default secret size in bytes (256 bits of entropy)
const DEFAULT_SECRET_BYTES: usize = 32;

/** Generate a signing secret from the OS-seeded thread RNG.
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_secret() -> String {
    generate_secret_with_size(DEFAULT_SECRET_BYTES)
}

/** Generate a signing secret of the given size
# Arguments
* `bytes` - The number of random bytes */
pub fn generate_secret_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
