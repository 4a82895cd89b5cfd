//! Bijection between non-negative integers and bare C identifiers.
//!
//! Identifiers are ordered by length, then by symbol rank within the
//! alphabet `a-z A-Z _ 1-9 0`. The first symbol can't be a digit, so the
//! numeral system is mixed-radix: 52 for the leading symbol, 63 afterwards.

use std::cell::RefCell;
use std::collections::HashMap;

#[cfg(test)]
mod tests;

/// Symbols allowed in leading position.
pub const FIRST_RADIX: u64 = 52;
/// Symbols allowed in any other position.
pub const RADIX: u64 = 63;

const ALPHABET: &[u8; RADIX as usize] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_1234567890";

const MAX_CACHE_SIZE: usize = 16384;

fn symbol_rank(c: u8) -> Option<u64> {
    let rank = match c {
        b'a'..=b'z' => c - b'a',
        b'A'..=b'Z' => c - b'A' + 26,
        b'_' => 52,
        b'1'..=b'9' => c - b'1' + 53,
        b'0' => 62,
        _ => return None,
    };
    Some(rank as u64)
}

/// Count of identifiers made of exactly `len` symbols. `None` past `u64`.
fn block_size(len: u32) -> Option<u64> {
    RADIX.checked_pow(len - 1)?.checked_mul(FIRST_RADIX)
}

/// Splits `i` into the identifier length and the offset inside that length's block.
fn locate(i: u64) -> (u32, u64) {
    let mut len = 1;
    let mut rem = i;
    loop {
        match block_size(len) {
            Some(size) if rem >= size => {
                rem -= size;
                len += 1;
            }
            // an overflowing block is larger than any u64 remainder
            _ => return (len, rem),
        }
    }
}

/// Encodes `i` as the `i`-th identifier.
pub fn encode(i: u64) -> String {
    let (len, rem) = locate(i);
    let mut symbols = vec![0u8; len as usize];
    let mut rest = rem;
    for slot in symbols.iter_mut().skip(1).rev() {
        *slot = ALPHABET[(rest % RADIX) as usize];
        rest /= RADIX;
    }
    symbols[0] = ALPHABET[rest as usize];
    symbols.into_iter().map(char::from).collect()
}

/// Length of `encode(i)`, without building the string.
pub fn length_of(i: u64) -> usize {
    locate(i).0 as usize
}

/// Inverse of [`encode`]. `None` when `s` can never be produced by it.
pub fn decode(s: &str) -> Option<u64> {
    let (&first, rest) = s.as_bytes().split_first()?;
    let mut value = symbol_rank(first).filter(|&rank| rank < FIRST_RADIX)?;
    for &c in rest {
        value = value.checked_mul(RADIX)?.checked_add(symbol_rank(c)?)?;
    }
    // 52 * (63^(L-1) - 1) / 62 identifiers are shorter than `s`
    let len = s.len() as u32;
    let shorter = (RADIX.checked_pow(len - 1)? - 1) / (RADIX - 1) * FIRST_RADIX;
    shorter.checked_add(value)
}

/// An identifier stream that steps over reserved names.
///
/// Asking for the `i`-th identifier yields the `i`-th one that is not
/// reserved. Reserved strings that [`decode`] rejects can never collide and
/// are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    skips: Vec<u64>,
}

impl Scope {
    /// A scope with nothing reserved, equivalent to the plain codec.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn reserving<I>(preimages: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let mut skips: Vec<u64> = preimages.into_iter().collect();
        skips.sort_unstable();
        skips.dedup();
        Self { skips }
    }

    pub fn reserving_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::reserving(names.into_iter().filter_map(decode))
    }

    /// Codec preimage of the `i`-th identifier of this scope.
    pub fn index(&self, mut i: u64) -> u64 {
        for &skip in &self.skips {
            if skip > i {
                break;
            }
            i += 1;
        }
        i
    }

    pub fn ident(&self, i: u64) -> String {
        encode(self.index(i))
    }
}

/// Insert-if-absent memo of [`encode`].
///
/// Owned by whoever generates names; share across threads only behind a lock.
#[derive(Debug, Default)]
pub struct IdentCache {
    map: RefCell<HashMap<u64, String>>,
}

impl IdentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, i: u64) -> String {
        if let Some(hit) = self.map.borrow().get(&i) {
            return hit.clone();
        }
        let ident = encode(i);
        let mut map = self.map.borrow_mut();
        if map.len() < MAX_CACHE_SIZE {
            map.insert(i, ident.clone());
        }
        ident
    }

    /// The `i`-th identifier of `scope`.
    pub fn scoped(&self, scope: &Scope, i: u64) -> String {
        self.get(scope.index(i))
    }
}
