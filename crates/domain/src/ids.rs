use crate::{Error, Result};

/// Generate a fresh 24-char lowercase-hex document id (12 random bytes).
pub fn new_object_id() -> String {
    let bytes: [u8; 12] = rand::random();
    hex::encode(bytes)
}

/// Well-formedness check for document ids supplied by clients.
pub fn is_valid_id(s: &str) -> bool {
    s.len() == 24 && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Reject malformed ids before any lookup is attempted.
pub fn ensure_valid_id(s: &str, what: &str) -> Result<()> {
    if is_valid_id(s) {
        Ok(())
    } else {
        Err(Error::Validation(format!("invalid {}: {:?}", what, s)))
    }
}
