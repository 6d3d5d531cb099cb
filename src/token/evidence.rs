// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::canonical::CanonicalEvidence;
use super::errors::Error;
use super::identity;
use super::layout::ByteOrderPolicy;
use super::quote::AttestationQuote;
use super::signature::SignatureBlock;
use super::verifier::{verify_signature, Verdict};
use crate::store::Node;
use uuid::Uuid;

/// Decodes agent blobs according to a fixed byte-order policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decoder {
    policy: ByteOrderPolicy,
}

impl Decoder {
    pub fn new(policy: ByteOrderPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ByteOrderPolicy {
        &self.policy
    }

    /// Decode the quote and signature blobs and reassemble them in
    /// canonical form.  Nothing is returned unless both blobs decode
    /// cleanly.
    pub fn decode(&self, quote: &[u8], signature: &[u8]) -> Result<Evidence, Error> {
        let quote = AttestationQuote::decode(quote, &self.policy)?;
        let signature = SignatureBlock::decode(signature, &self.policy)?;

        quote.check_pcr_digest(signature.hash_alg_id)?;

        let canonical = CanonicalEvidence::new(&quote, &signature)?;

        Ok(Evidence {
            quote,
            signature,
            canonical,
        })
    }
}

/// Collects all the components of an EnactTrust evidence submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evidence {
    /// Decoded TPMS_ATTEST
    pub quote: AttestationQuote,
    /// Decoded TPMT_SIGNATURE
    pub signature: SignatureBlock,
    /// Normalised quote and signature
    pub canonical: CanonicalEvidence,
}

impl Evidence {
    /// Decode blobs as emitted by the EnactTrust agent
    pub fn decode(quote: &[u8], signature: &[u8]) -> Result<Evidence, Error> {
        Decoder::default().decode(quote, signature)
    }

    /// The node identifier carried in the quote
    pub fn node_id(&self) -> Result<Uuid, Error> {
        identity::node_id(&self.quote)
    }

    /// Cryptographically verify the quote using the node's enrolled AK
    pub fn verify(&self, node: &Node) -> Result<Verdict, Error> {
        verify_signature(self.canonical.attest_body(), &self.signature, &node.ak_pub)
    }

    pub fn into_canonical(self) -> CanonicalEvidence {
        self.canonical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Endian, TPM_ALG_SHA256};
    use hex_literal::hex;

    const TEST_QUOTE_OK: &[u8; 96] = include_bytes!("../../testdata/quote.bin");
    const TEST_SIGNATURE_OK: &[u8; 72] = include_bytes!("../../testdata/signature.bin");
    const TEST_CANONICAL_OK: &[u8; 168] = include_bytes!("../../testdata/canonical.bin");
    const TEST_AK_PUB: &str = include_str!("../../testdata/ak-pub.pem");
    const TEST_RSA_PUB: &str = include_str!("../../testdata/rsa-pub.pem");

    #[test]
    fn decode_good_evidence() {
        let e = Evidence::decode(TEST_QUOTE_OK, TEST_SIGNATURE_OK).unwrap();

        assert_eq!(e.canonical.as_bytes(), TEST_CANONICAL_OK);
        assert_eq!(e.signature.hash_alg_id, TPM_ALG_SHA256);
        assert_eq!(
            e.node_id().unwrap(),
            Uuid::from_bytes(hex!("7dd5db06d2f54e0d8a9c9baaa5a446ef"))
        );
    }

    #[test]
    fn decode_is_repeatable() {
        let a = Evidence::decode(TEST_QUOTE_OK, TEST_SIGNATURE_OK).unwrap();
        let b = Evidence::decode(TEST_QUOTE_OK, TEST_SIGNATURE_OK).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn pre_swapped_input_gives_same_canonical_bytes() {
        let e = Evidence::decode(TEST_QUOTE_OK, TEST_SIGNATURE_OK).unwrap();

        // a caller that already fixed the byte order uses the canonical policy
        let fixed_q = e.quote.encode().unwrap();
        let fixed_s = e.signature.encode().unwrap();

        let f = Decoder::new(ByteOrderPolicy::CANONICAL)
            .decode(&fixed_q, &fixed_s)
            .unwrap();

        assert_eq!(f.canonical, e.canonical);
    }

    #[test]
    fn custom_policy() {
        let policy = ByteOrderPolicy {
            ecc_param_size: Endian::Little,
            ..ByteOrderPolicy::AGENT
        };
        let e = Evidence::decode(TEST_QUOTE_OK, TEST_SIGNATURE_OK).unwrap();
        let s = e.signature.encode_with(&policy).unwrap();

        let d = Decoder::new(policy);
        assert_eq!(d.policy(), &policy);
        assert_eq!(
            d.decode(TEST_QUOTE_OK, &s).unwrap().into_canonical(),
            e.canonical
        );
    }

    #[test]
    fn pcr_digest_must_match_signature_hash() {
        let e = Evidence::decode(TEST_QUOTE_OK, TEST_SIGNATURE_OK).unwrap();

        // SHA-1 signature over a quote with a 32-byte PCR digest
        let mut s = TEST_SIGNATURE_OK.to_vec();
        s[2..4].copy_from_slice(&hex!("0400"));

        assert!(matches!(
            Evidence::decode(TEST_QUOTE_OK, &s),
            Err(Error::DigestLengthMismatch(_))
        ));

        let q = AttestationQuote::new(&e.quote.qualified_signer, &e.quote.extra_data, &[0; 20])
            .unwrap();
        let q = q.encode_with(&ByteOrderPolicy::AGENT).unwrap();

        assert!(Evidence::decode(&q, &s).is_ok());
    }

    #[test]
    fn verify_with_node() {
        let e = Evidence::decode(TEST_QUOTE_OK, TEST_SIGNATURE_OK).unwrap();
        let id = e.node_id().unwrap();

        assert_eq!(e.verify(&Node::new(id, TEST_AK_PUB)), Ok(Verdict::Verified));
        assert!(matches!(
            e.verify(&Node::new(id, TEST_RSA_PUB)),
            Err(Error::UnsupportedKeyType(_))
        ));
    }

    #[test]
    fn truncation_never_panics() {
        for n in 0..TEST_QUOTE_OK.len() {
            assert!(matches!(
                Evidence::decode(&TEST_QUOTE_OK[..n], TEST_SIGNATURE_OK),
                Err(Error::TruncatedInput(_))
            ));
        }

        for n in 0..TEST_SIGNATURE_OK.len() {
            assert!(matches!(
                Evidence::decode(TEST_QUOTE_OK, &TEST_SIGNATURE_OK[..n]),
                Err(Error::TruncatedInput(_))
            ));
        }
    }
}
