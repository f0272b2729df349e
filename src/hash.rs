//! The crypto hash that binds every encrypted object to its inputs, and the deterministic
//! nonce sequences derived from it.
//!
//! The hash of an ordered list of items is SHA3-256 over `"|" + item_1 + "|" + ... + item_n + "|"`
//! reduced mod `Q`, where every item is rendered as text:
//! - a missing value as `null`
//! - a string as itself, with `\` and `|` escaped by a backslash
//! - a number in decimal
//! - a group element in upper-case hex
//! - a nested sequence as the hex of its own hash, or `null` when it is empty
use crate::{
    arithmetics::{ElementModP, ElementModQ},
    BigIntQ,
};
use sha3::{Digest, Sha3_256};

/// One item of a hash input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoHashInput {
    Null,
    Text(String),
    Number(u64),
    ModP(ElementModP),
    ModQ(ElementModQ),
    Sequence(Vec<CryptoHashInput>),
}

impl CryptoHashInput {
    fn render(&self) -> String {
        return match self {
            CryptoHashInput::Null => "null".to_string(),
            CryptoHashInput::Text(text) => escape(text),
            CryptoHashInput::Number(number) => number.to_string(),
            CryptoHashInput::ModP(element) => element.to_hex(),
            CryptoHashInput::ModQ(element) => element.to_hex(),
            CryptoHashInput::Sequence(items) if items.is_empty() => "null".to_string(),
            CryptoHashInput::Sequence(items) => hash_elems(items).to_hex(),
        };
    }
}

/// `\` and `|` in text are escaped with a backslash, so a separator inside a value cannot be
/// mistaken for a field boundary
fn escape(text: &str) -> String {
    if !text.contains(['\\', '|']) {
        return text.to_string();
    }
    let mut escaped = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        if c == '\\' || c == '|' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    return escaped;
}

/// Objects that are bound into the hash chain by a hash of their content
pub trait CryptoHashable {
    fn crypto_hash(&self) -> ElementModQ;
}

/// Hash an ordered list of items into an element of `Z_Q`
pub fn hash_elems(items: &[CryptoHashInput]) -> ElementModQ {
    let mut hasher = Sha3_256::new();
    hasher.update(b"|");
    for item in items {
        hasher.update(item.render().as_bytes());
        hasher.update(b"|");
    }
    let digest = hasher.finalize();
    return ElementModQ::reduce(&BigIntQ::from_be_slice(&digest));
}

/// Hash any number of values convertible into [`CryptoHashInput`]
///
/// ```
/// use electionguard_encryption::{hash_elems, ElementModQ};
/// let h = hash_elems!("contest-1", 3u64, ElementModQ::from_u64(7));
/// assert!(h.is_in_bounds());
/// ```
#[macro_export]
macro_rules! hash_elems {
    ($($item:expr),* $(,)?) => {
        $crate::hash::hash_elems(&[$($crate::hash::CryptoHashInput::from($item)),*])
    };
}

impl From<&str> for CryptoHashInput {
    fn from(text: &str) -> Self {
        return CryptoHashInput::Text(text.to_string());
    }
}

impl From<String> for CryptoHashInput {
    fn from(text: String) -> Self {
        return CryptoHashInput::Text(text);
    }
}

impl From<&String> for CryptoHashInput {
    fn from(text: &String) -> Self {
        return CryptoHashInput::Text(text.clone());
    }
}

impl From<u64> for CryptoHashInput {
    fn from(number: u64) -> Self {
        return CryptoHashInput::Number(number);
    }
}

impl From<u32> for CryptoHashInput {
    fn from(number: u32) -> Self {
        return CryptoHashInput::Number(number as u64);
    }
}

impl From<usize> for CryptoHashInput {
    fn from(number: usize) -> Self {
        return CryptoHashInput::Number(number as u64);
    }
}

impl From<ElementModP> for CryptoHashInput {
    fn from(element: ElementModP) -> Self {
        return CryptoHashInput::ModP(element);
    }
}

impl From<&ElementModP> for CryptoHashInput {
    fn from(element: &ElementModP) -> Self {
        return CryptoHashInput::ModP(*element);
    }
}

impl From<ElementModQ> for CryptoHashInput {
    fn from(element: ElementModQ) -> Self {
        return CryptoHashInput::ModQ(element);
    }
}

impl From<&ElementModQ> for CryptoHashInput {
    fn from(element: &ElementModQ) -> Self {
        return CryptoHashInput::ModQ(*element);
    }
}

impl<T: Into<CryptoHashInput>> From<Option<T>> for CryptoHashInput {
    fn from(value: Option<T>) -> Self {
        return match value {
            Some(value) => value.into(),
            None => CryptoHashInput::Null,
        };
    }
}

impl<T: Into<CryptoHashInput>> From<Vec<T>> for CryptoHashInput {
    fn from(items: Vec<T>) -> Self {
        return CryptoHashInput::Sequence(items.into_iter().map(Into::into).collect());
    }
}

/// An indexable, endless sequence of nonces derived from a seed and optional headers:
/// `n_i = H(H(seed, headers...), i)`. Without headers the seed is used as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonces {
    seed: ElementModQ,
    next: u64,
}

impl Nonces {
    pub fn new(seed: &ElementModQ, headers: &[CryptoHashInput]) -> Self {
        let seed = if headers.is_empty() {
            *seed
        } else {
            let mut items = vec![CryptoHashInput::ModQ(*seed)];
            items.extend_from_slice(headers);
            hash_elems(&items)
        };
        return Self { seed, next: 0 };
    }

    pub fn get_seed(&self) -> &ElementModQ {
        return &self.seed;
    }

    /// The nonce at a given position, independent of the iterator's state
    pub fn get(&self, index: u64) -> ElementModQ {
        return hash_elems(&[CryptoHashInput::ModQ(self.seed), CryptoHashInput::Number(index)]);
    }
}

impl Iterator for Nonces {
    type Item = ElementModQ;

    fn next(&mut self) -> Option<Self::Item> {
        let nonce = self.get(self.next);
        self.next += 1;
        return Some(nonce);
    }
}
