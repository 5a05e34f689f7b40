//! Session token generation
//!
//! Tokens are 12 hex characters produced by six rounds of a small
//! linear-congruential mix over a seed derived from the account identity.
//! This is not a secure random token.

use serde::Deserialize;

const TOKEN_ROUNDS: usize = 6;
const MIX_MULTIPLIER: u32 = 7;
const MIX_INCREMENT: u32 = 11;

/// How the token seed is salted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenMode {
    /// Login time and a random component are mixed in, so every login
    /// produces a fresh token
    #[default]
    PerLogin,
    /// Token depends on username and transformed password only
    Reproducible,
}

/// Derives a session token from `username` and `transformed`.
///
/// The seed is the sum of the code points of `username` followed by
/// `transformed`, plus `salt` when given.
pub fn generate_token(username: &str, transformed: &str, salt: Option<u64>) -> String {
    let seed = username
        .chars()
        .chain(transformed.chars())
        .fold(0u64, |acc, ch| acc.wrapping_add(u64::from(ch)))
        .wrapping_add(salt.unwrap_or(0));

    let mut state = (seed % 256) as u32;
    let mut token = String::with_capacity(TOKEN_ROUNDS * 2);
    for _ in 0..TOKEN_ROUNDS {
        state = (state * MIX_MULTIPLIER + MIX_INCREMENT) % 256;
        token.push_str(&format!("{state:02x}"));
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::flip_flop_transform;

    #[test]
    fn reproducible_without_salt() {
        let transformed = flip_flop_transform("secret");
        assert_eq!(generate_token("alice", &transformed, None), "aab1e2399a41");
        assert_eq!(
            generate_token("alice", &transformed, None),
            generate_token("alice", &transformed, None)
        );
        assert_eq!(
            generate_token("bob", &flip_flop_transform("hunter2"), None),
            "87bc2f54576c"
        );
    }

    #[test]
    fn empty_identity() {
        assert_eq!(generate_token("", "", None), "0b5873305b88");
    }

    #[test]
    fn salt_shifts_the_seed() {
        let transformed = flip_flop_transform("secret");
        assert_eq!(generate_token("alice", &transformed, Some(5)), "cda6951edd16");
        // Salts congruent mod 256 give the same token
        assert_eq!(
            generate_token("alice", &transformed, Some(0)),
            generate_token("alice", &transformed, Some(256))
        );
    }

    #[test]
    fn always_twelve_hex_chars() {
        for salt in [None, Some(1), Some(u64::MAX)] {
            let token = generate_token("someone", "L", salt);
            assert_eq!(token.len(), 12);
            assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn token_mode_from_config_names() {
        let mode: TokenMode = serde_json::from_str("\"reproducible\"").unwrap();
        assert_eq!(mode, TokenMode::Reproducible);
        let mode: TokenMode = serde_json::from_str("\"per_login\"").unwrap();
        assert_eq!(mode, TokenMode::PerLogin);
    }
}
