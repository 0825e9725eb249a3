//! Salted PBKDF2-HMAC-SHA256 password hashes
//!
//! Stored as `pbkdf2-sha256$<rounds>$<salt hex>$<key hex>`.

use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::tokens::{hex_decode, hex_encode, random_bytes};
use crate::error::BowoResult;

const SCHEME: &str = "pbkdf2-sha256";
const ROUNDS: u32 = 100_000;
const KEY_LEN: usize = 32;

pub fn hash_password(password: &str) -> BowoResult<String> {
    let salt = random_bytes::<16>()?;
    let key = derive(password, &salt, ROUNDS);
    Ok(format!(
        "{SCHEME}${ROUNDS}${}${}",
        hex_encode(&salt),
        hex_encode(&key)
    ))
}

/// False for a wrong password and for any malformed stored hash
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(SCHEME), Some(rounds), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    let (Ok(rounds), Some(salt), Some(expected)) =
        (rounds.parse::<u32>(), hex_decode(salt), hex_decode(expected))
    else {
        return false;
    };
    if rounds == 0 {
        return false;
    }

    let key = derive(password, &salt, rounds);
    key[..].ct_eq(&expected[..]).into()
}

fn derive(password: &str, salt: &[u8], rounds: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, rounds, &mut key);
    key
}
