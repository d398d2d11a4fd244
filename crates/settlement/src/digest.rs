//! Move Commitments
//!
//! Binding digests over (move, salt) pairs. The salt is generated from the
//! operating system's random source, never from the seeded simulation RNG:
//! salt reuse across commits would break both hiding and binding.

use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes in a commitment salt.
pub const SALT_BYTES: usize = 32;

/// Domain separation tag so move commitments can never collide with any
/// other blake3 use in the workspace.
const COMMITMENT_DOMAIN: &[u8] = b"bond-economy.move-commitment.v1";

/// A 32-byte commitment digest.
pub type Digest = [u8; 32];

/// Generate a fresh hex-encoded salt from the OS random source.
pub fn random_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Compute the binding commitment digest for a move.
///
/// The digest covers a domain tag, the move as a single byte, and the salt
/// string, so the same (move, salt) pair always recomputes to the same
/// digest at reveal time.
pub fn commitment_digest(cooperate: bool, salt: &str) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(COMMITMENT_DOMAIN);
    hasher.update(&[u8::from(cooperate)]);
    hasher.update(salt.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Hex encoding of a digest, for logs and receipts.
pub fn digest_hex(digest: &Digest) -> String {
    hex::encode(digest)
}
