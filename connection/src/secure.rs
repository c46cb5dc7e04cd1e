use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Erasable password buffer.
///
/// Created per request from the parsed settings and moved into exactly one
/// consumer. The bytes are zeroed on drop. There is no `Clone` and no
/// conversion back into a `String`; consumers borrow the bytes for as long as
/// they need them.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecurePassword(Box<[u8]>);

impl SecurePassword {
    pub fn new(value: &str) -> Self {
        Self(value.as_bytes().into())
    }

    /// Borrows the secret bytes. The caller must not copy them into a
    /// long-lived plain buffer.
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecurePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecurePassword(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_never_shows_secret() {
        let password = SecurePassword::new("hunter2");
        assert_eq!(format!("{password:?}"), "SecurePassword(***)");
    }

    #[test]
    fn test_expose_returns_bytes() {
        let password = SecurePassword::new("p@ss");
        assert_eq!(password.expose(), b"p@ss");
        assert_eq!(password.len(), 4);
        assert!(!password.is_empty());
    }

    #[test]
    fn test_zeroize_clears_buffer() {
        let mut password = SecurePassword::new("secret");
        password.zeroize();
        assert!(password.expose().iter().all(|b| *b == 0) || password.is_empty());
    }
}
