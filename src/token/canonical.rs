// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::quote::AttestationQuote;
use super::signature::SignatureBlock;

/// The quote followed by the signature, with every integer field in
/// big-endian order.  This is what gets handed over for packaging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalEvidence {
    bytes: Vec<u8>,
    quote_len: usize,
}

impl CanonicalEvidence {
    pub fn new(q: &AttestationQuote, s: &SignatureBlock) -> Result<CanonicalEvidence, Error> {
        let mut bytes = q.encode()?;
        let quote_len = bytes.len();

        bytes.extend(s.encode()?);

        Ok(CanonicalEvidence { bytes, quote_len })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Size prefix and attestation body
    pub fn quote(&self) -> &[u8] {
        &self.bytes[..self.quote_len]
    }

    /// The attestation body alone, i.e., the signed bytes
    pub fn attest_body(&self) -> &[u8] {
        &self.bytes[2..self.quote_len]
    }

    pub fn signature(&self) -> &[u8] {
        &self.bytes[self.quote_len..]
    }
}

impl AsRef<[u8]> for CanonicalEvidence {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::ByteOrderPolicy;

    const TEST_QUOTE_OK: &[u8; 96] = include_bytes!("../../testdata/quote.bin");
    const TEST_SIGNATURE_OK: &[u8; 72] = include_bytes!("../../testdata/signature.bin");
    const TEST_CANONICAL_OK: &[u8; 168] = include_bytes!("../../testdata/canonical.bin");

    #[test]
    fn canonical_layout() {
        let q = AttestationQuote::decode(TEST_QUOTE_OK, &ByteOrderPolicy::AGENT).unwrap();
        let s = SignatureBlock::decode(TEST_SIGNATURE_OK, &ByteOrderPolicy::AGENT).unwrap();

        let c = CanonicalEvidence::new(&q, &s).unwrap();

        assert_eq!(c.as_bytes(), TEST_CANONICAL_OK);
        assert_eq!(c.quote().len(), 96);
        assert_eq!(c.attest_body(), &TEST_QUOTE_OK[2..]);
        assert_eq!(c.signature(), &TEST_CANONICAL_OK[96..]);
        assert_eq!(c.clone().into_bytes(), c.as_bytes());
    }
}
