//! `PasswordMessage` payload construction.
//!
//! Grounded on the sibling `postgres-protocol` crate's dependency on `md-5`
//! for MD5-challenge authentication — this codec implements the actual hash
//! chain itself since nothing in the surrounding corpus does (every example
//! driver only decodes the `AuthenticationMD5Password` request, never
//! answers it).

use md5::{Digest, Md5};

/// The payload of a `PasswordMessage`, before NUL-termination and framing.
#[derive(Clone)]
pub enum Password<'a> {
    /// Sent verbatim in response to `AuthenticationCleartextPassword`.
    ClearText(&'a str),
    /// Sent in response to `AuthenticationMD5Password`.
    ///
    /// Already-hashed: construct with [`Password::md5`].
    Md5(String),
}

impl std::fmt::Debug for Password<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Password::ClearText(_) => write!(f, "ClearText(<REDACTED>)"),
            Password::Md5(_) => write!(f, "Md5(<REDACTED>)"),
        }
    }
}

impl Password<'_> {
    /// Computes `"md5" ++ hex(md5(hex(md5(password ++ user)) ++ salt))`,
    /// matching Postgres's `AuthenticationMD5Password` challenge exactly.
    pub fn md5(user: &str, password: &str, salt: [u8; 4]) -> Password<'static> {
        let mut inner = Md5::new();
        inner.update(password.as_bytes());
        inner.update(user.as_bytes());
        let inner_hex = hex_lower(&inner.finalize());

        let mut outer = Md5::new();
        outer.update(inner_hex.as_bytes());
        outer.update(salt);
        let outer_hex = hex_lower(&outer.finalize());

        Password::Md5(format!("md5{outer_hex}"))
    }

    pub(crate) fn as_str(&self) -> &str {
        match self {
            Password::ClearText(s) => s,
            Password::Md5(s) => s,
        }
    }
}

fn hex_lower(digest: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        write!(out, "{byte:02x}").expect("writing to a String never fails");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_matches_scenario_g() {
        // Scenario G from the protocol's test suite: user="u", password="p",
        // salt = 01 02 03 04.
        let salt = [0x01, 0x02, 0x03, 0x04];

        let inner = {
            let mut hasher = Md5::new();
            hasher.update(b"p");
            hasher.update(b"u");
            hex_lower(&hasher.finalize())
        };
        let expect = {
            let mut hasher = Md5::new();
            hasher.update(inner.as_bytes());
            hasher.update(salt);
            format!("md5{}", hex_lower(&hasher.finalize()))
        };

        let Password::Md5(actual) = Password::md5("u", "p", salt) else {
            panic!("expected Md5 variant");
        };
        assert_eq!(actual, expect);
    }
}
