// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Truncated input: {0}")]
    TruncatedInput(String),
    #[error("Trailing data: {0}")]
    TrailingData(String),
    #[error("Invalid magic: expecting 0xff544347, got {0:#010x}")]
    InvalidMagic(u32),
    #[error("Unexpected attestation type: expecting 0x8018, got {0:#06x}")]
    UnexpectedAttestType(u16),
    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(String),
    #[error("Unsupported hash algorithm: {0:#06x}")]
    UnsupportedHashAlgorithm(u16),
    #[error("Digest length mismatch: {0}")]
    DigestLengthMismatch(String),
    #[error("Unsupported signature scheme: {0:#06x}")]
    UnsupportedScheme(u16),
    #[error("Key error: {0}")]
    Key(String),
    #[error("Key type mismatch: {0}")]
    KeyTypeMismatch(String),
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),
    #[error("Signature invalid: {0}")]
    SignatureInvalid(String),
    #[error("Oversized field: {0}")]
    Oversized(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TruncatedInput(e)
            | Error::TrailingData(e)
            | Error::MalformedIdentifier(e)
            | Error::DigestLengthMismatch(e)
            | Error::Key(e)
            | Error::KeyTypeMismatch(e)
            | Error::UnsupportedKeyType(e)
            | Error::SignatureInvalid(e)
            | Error::Oversized(e) => {
                write!(f, "{}", e)
            }
            Error::InvalidMagic(_)
            | Error::UnexpectedAttestType(_)
            | Error::UnsupportedHashAlgorithm(_)
            | Error::UnsupportedScheme(_) => write!(f, "{}", self),
        }
    }
}
