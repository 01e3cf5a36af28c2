//! Public slug generation.

use uuid::Uuid;

pub const SLUG_LENGTH: usize = 8;
pub const SLUG_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Largest multiple of the alphabet size that fits in a byte.
const REJECT_FROM: u8 = 248;

/// Generate a random slug of `SLUG_LENGTH` alphanumeric characters.
///
/// Randomness comes from v4 UUIDs, i.e. the OS CSPRNG. Bytes 6 and 8 carry
/// the version and variant bits and are skipped; bytes at or above
/// `REJECT_FROM` are rejected to keep the distribution uniform.
pub fn generate_slug() -> String {
    let mut slug = String::with_capacity(SLUG_LENGTH);
    while slug.len() < SLUG_LENGTH {
        let bytes = Uuid::new_v4().into_bytes();
        for (i, byte) in bytes.into_iter().enumerate() {
            if i == 6 || i == 8 || byte >= REJECT_FROM {
                continue;
            }
            slug.push(SLUG_ALPHABET[(byte % 62) as usize] as char);
            if slug.len() == SLUG_LENGTH {
                break;
            }
        }
    }
    slug
}

/// Whether `candidate` could have been produced by [`generate_slug`].
pub fn is_valid_slug(candidate: &str) -> bool {
    candidate.len() == SLUG_LENGTH && candidate.bytes().all(|b| b.is_ascii_alphanumeric())
}
