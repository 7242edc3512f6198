//! Public-key line parsing.

use std::collections::HashSet;

use tracing::debug;

use dirsync_core::normalize;

/// A desired public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub public_key: String,
    pub name: String,
}

impl Credential {
    /// Parse an `authorized_keys`-style line: `<type> <material> <label>`.
    ///
    /// Anything that is not exactly three fields is rejected.
    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [_kind, public_key, name] => Some(Self {
                public_key: public_key.to_string(),
                name: name.to_string(),
            }),
            _ => None,
        }
    }
}

/// Parse every line, dropping malformed ones and repeated key material.
pub fn parse_all<I>(lines: I) -> Vec<Credential>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut credentials = Vec::new();

    for line in lines {
        let line = line.as_ref();
        match Credential::parse(line) {
            Some(credential) => {
                if seen.insert(normalize(&credential.public_key)) {
                    credentials.push(credential);
                }
            }
            None => debug!("Ignoring key line: {:?}", line),
        }
    }

    credentials
}
