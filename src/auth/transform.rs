//! Flip-flop password transform
//!
//! A deterministic character-wise scrambler applied before hashing.
//! It is an obfuscation step only: neither reversible by intent nor one-way.

/// Initial flip-flop state (0b1010)
const INITIAL_STATE: u32 = 0b1010;

/// Transforms a password one character at a time.
///
/// For each character the running state is XORed with the character's code
/// point, and the emitted character is `(state + code point) mod 128`. The
/// output always has as many characters as the input and is 7-bit ASCII.
pub fn flip_flop_transform(password: &str) -> String {
    let mut state = INITIAL_STATE;

    password
        .chars()
        .map(|ch| {
            let bit = u32::from(ch);
            state ^= bit;
            // (state + bit) % 128 is always a valid ASCII scalar
            char::from(((state + bit) % 128) as u8)
        })
        .collect()
}
