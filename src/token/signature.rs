// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::common::*;
use super::errors::Error;
use super::layout::{ByteOrderPolicy, Endian};
use super::wire::{put_sized, WireReader};
use serde::Serialize;

/// A decoded TPMT_SIGNATURE carrying a TPMS_SIGNATURE_ECC
#[serde_with::serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignatureBlock {
    /// TPMI_ALG_SIG_SCHEME
    #[serde(rename = "scheme")]
    pub scheme_id: u16,

    /// TPMI_ALG_HASH used to digest the attestation body
    #[serde(rename = "hash-alg")]
    pub hash_alg_id: u16,

    /// ECDSA signature R, unsigned big-endian integer
    #[serde_as(as = "serde_with::hex::Hex")]
    pub r: Vec<u8>,

    /// ECDSA signature S, unsigned big-endian integer
    #[serde_as(as = "serde_with::hex::Hex")]
    pub s: Vec<u8>,
}

impl SignatureBlock {
    /// Decode a signature blob.  Only the ECC signature layout is
    /// understood: RSA signatures are rejected here rather than at
    /// verification time.
    pub fn decode(buf: &[u8], policy: &ByteOrderPolicy) -> Result<SignatureBlock, Error> {
        let mut r = WireReader::new(buf);

        let scheme_id = r.u16(policy.sig_scheme, "signature scheme")?;

        if !is_ecc_scheme(scheme_id) {
            return Err(Error::UnsupportedScheme(scheme_id));
        }

        let hash_alg_id = r.u16(policy.hash_alg, "hash algorithm")?;

        if !is_valid_hash_alg(hash_alg_id) {
            return Err(Error::UnsupportedHashAlgorithm(hash_alg_id));
        }

        let sig_r = r.sized(policy.ecc_param_size, "signature R")?.to_vec();
        let sig_s = r.sized(policy.ecc_param_size, "signature S")?.to_vec();

        r.finish("signature")?;

        Ok(SignatureBlock {
            scheme_id,
            hash_alg_id,
            r: sig_r,
            s: sig_s,
        })
    }

    /// Canonical serialisation, all integers big-endian
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        self.encode_with(&ByteOrderPolicy::CANONICAL)
    }

    /// Serialise the signature the way the agent does under `policy`
    pub fn encode_with(&self, policy: &ByteOrderPolicy) -> Result<Vec<u8>, Error> {
        let mut out = Vec::with_capacity(8 + self.r.len() + self.s.len());

        out.extend_from_slice(&policy.sig_scheme.write_u16(self.scheme_id));
        out.extend_from_slice(&policy.hash_alg.write_u16(self.hash_alg_id));
        put_sized(&mut out, policy.ecc_param_size, &self.r, "signature R")?;
        put_sized(&mut out, policy.ecc_param_size, &self.s, "signature S")?;

        Ok(out)
    }
}

fn is_ecc_scheme(scheme: u16) -> bool {
    matches!(
        scheme,
        TPM_ALG_ECDSA | TPM_ALG_ECDAA | TPM_ALG_SM2 | TPM_ALG_ECSCHNORR
    )
}
