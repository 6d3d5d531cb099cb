// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::common::*;
use super::errors::Error;
use super::layout::{ByteOrderPolicy, Endian};
use super::wire::{put_sized, WireReader};
use serde::Serialize;

/// A decoded TPMS_ATTEST quote, as produced by the EnactTrust agent.  The
/// agent strips clock info, firmware version and PCR selection, so the body
/// only carries the fields below.
#[serde_with::serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttestationQuote {
    /// Length of the attestation body that follows the size prefix
    pub size: u16,

    /// TPM_GENERATED_VALUE
    pub magic: u32,

    /// TPMI_ST_ATTEST, always TPM_ST_ATTEST_QUOTE here
    #[serde(rename = "type")]
    pub attest_type: u16,

    /// TPM2B_NAME of the signing key
    #[serde(rename = "qualified-signer")]
    #[serde_as(as = "serde_with::hex::Hex")]
    pub qualified_signer: Vec<u8>,

    /// TPM2B_DATA, repurposed to carry the 16-byte node identifier
    #[serde(rename = "extra-data")]
    #[serde_as(as = "serde_with::hex::Hex")]
    pub extra_data: Vec<u8>,

    /// TPM2B_DIGEST over the selected PCRs
    #[serde(rename = "pcr-digest")]
    #[serde_as(as = "serde_with::hex::Hex")]
    pub pcr_digest: Vec<u8>,
}

impl AttestationQuote {
    /// Build a quote out of its variable-length fields
    pub fn new(
        qualified_signer: &[u8],
        extra_data: &[u8],
        pcr_digest: &[u8],
    ) -> Result<AttestationQuote, Error> {
        let mut q = AttestationQuote {
            size: 0,
            magic: TPM_GENERATED_VALUE,
            attest_type: TPM_ST_ATTEST_QUOTE,
            qualified_signer: qualified_signer.to_vec(),
            extra_data: extra_data.to_vec(),
            pcr_digest: pcr_digest.to_vec(),
        };

        let body = q.encode_body()?;

        q.size = u16::try_from(body.len()).map_err(|_| {
            Error::Oversized(format!("attestation body: {} bytes", body.len()))
        })?;

        Ok(q)
    }

    /// Decode a quote blob whose size prefix is in the byte order dictated
    /// by `policy`.  The blob must hold exactly one attestation body.
    pub fn decode(buf: &[u8], policy: &ByteOrderPolicy) -> Result<AttestationQuote, Error> {
        let mut r = WireReader::new(buf);

        let size = r.u16(policy.attest_size, "attest size")?;
        let body = r.bytes(size as usize, "attestation body")?;

        let q = Self::decode_body(size, body)?;

        r.finish("quote")?;

        Ok(q)
    }

    fn decode_body(size: u16, body: &[u8]) -> Result<AttestationQuote, Error> {
        let mut r = WireReader::new(body);

        let magic = r.u32_be("magic")?;

        if magic != TPM_GENERATED_VALUE {
            return Err(Error::InvalidMagic(magic));
        }

        let attest_type = r.u16(Endian::Big, "attest type")?;

        if attest_type != TPM_ST_ATTEST_QUOTE {
            return Err(Error::UnexpectedAttestType(attest_type));
        }

        let qualified_signer = r.sized(Endian::Big, "qualified signer")?.to_vec();
        let extra_data = r.sized(Endian::Big, "extra data")?.to_vec();
        let pcr_digest = r.sized(Endian::Big, "pcr digest")?.to_vec();

        r.finish("attestation body")?;

        Ok(AttestationQuote {
            size,
            magic,
            attest_type,
            qualified_signer,
            extra_data,
            pcr_digest,
        })
    }

    /// Check the PCR digest length against the hash algorithm in use
    pub fn check_pcr_digest(&self, hash_alg: u16) -> Result<(), Error> {
        let want = digest_size(hash_alg)?;
        let got = self.pcr_digest.len();

        if want != got {
            return Err(Error::DigestLengthMismatch(format!(
                "pcr digest: expecting {want} bytes for hash algorithm {hash_alg:#06x}, got {got}"
            )));
        }

        Ok(())
    }

    /// The TPMS_ATTEST body, i.e., the bytes covered by the signature
    pub fn encode_body(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::with_capacity(self.size as usize);

        out.extend_from_slice(&self.magic.to_be_bytes());
        out.extend_from_slice(&self.attest_type.to_be_bytes());
        put_sized(&mut out, Endian::Big, &self.qualified_signer, "qualified signer")?;
        put_sized(&mut out, Endian::Big, &self.extra_data, "extra data")?;
        put_sized(&mut out, Endian::Big, &self.pcr_digest, "pcr digest")?;

        Ok(out)
    }

    /// Canonical serialisation: big-endian size prefix followed by the body
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        self.encode_with(&ByteOrderPolicy::CANONICAL)
    }

    /// Serialise the quote the way the agent does under `policy`
    pub fn encode_with(&self, policy: &ByteOrderPolicy) -> Result<Vec<u8>, Error> {
        let body = self.encode_body()?;
        let mut out = Vec::with_capacity(2 + body.len());

        put_sized(&mut out, policy.attest_size, &body, "attestation body")?;

        Ok(out)
    }
}
