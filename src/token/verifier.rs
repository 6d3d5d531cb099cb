// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::common::*;
use super::errors::Error;
use super::signature::SignatureBlock;
use openssl::bn::BigNum;
use openssl::ec::EcKey;
use openssl::ecdsa::EcdsaSig;
use openssl::pkey::{PKey, Public};
use openssl::sha::sha256;
use serde::Serialize;

const PEM_PUBLIC_KEY: &str = "PUBLIC KEY";

/// Outcome of the cryptographic check over a quote
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Verified,
    SignatureInvalid,
}

impl Verdict {
    pub fn is_verified(&self) -> bool {
        *self == Verdict::Verified
    }
}

/// Load an ECDSA verification key from a PEM-encoded SubjectPublicKeyInfo
pub fn ec_key_from_pem(ak_pub: &str) -> Result<EcKey<Public>, Error> {
    let p = pem::parse(ak_pub).map_err(|e| Error::Key(format!("decoding PEM: {e}")))?;

    if p.tag() != PEM_PUBLIC_KEY {
        return Err(Error::KeyTypeMismatch(format!(
            "expecting PEM type \"{PEM_PUBLIC_KEY}\", got \"{}\"",
            p.tag()
        )));
    }

    let pkey = PKey::public_key_from_der(p.contents())
        .map_err(|e| Error::Key(format!("decoding SubjectPublicKeyInfo: {e}")))?;

    let ec = pkey
        .ec_key()
        .map_err(|_| Error::UnsupportedKeyType(format!("{:?}", pkey.id())))?;

    if ec.group().curve_name().is_none() {
        return Err(Error::UnsupportedKeyType(
            "EC key on an unnamed curve".to_string(),
        ));
    }

    Ok(ec)
}

/// Check an ECDSA/SHA-256 signature over the given TPMS_ATTEST body using
/// the enrolled attestation key.  Key and algorithm problems are reported
/// as errors; a signature that does not check out, for whatever reason, is
/// reported as [`Verdict::SignatureInvalid`].
pub fn verify_signature(
    attest_body: &[u8],
    sig: &SignatureBlock,
    ak_pub: &str,
) -> Result<Verdict, Error> {
    let key = ec_key_from_pem(ak_pub)?;

    if sig.scheme_id != TPM_ALG_ECDSA {
        return Err(Error::UnsupportedScheme(sig.scheme_id));
    }

    if sig.hash_alg_id != TPM_ALG_SHA256 {
        return Err(Error::UnsupportedHashAlgorithm(sig.hash_alg_id));
    }

    let field_len = (key.group().degree() as usize + 7) / 8;

    let ecdsa_sig = match to_ecdsa_sig(&sig.r, &sig.s, field_len) {
        Ok(s) => s,
        Err(_) => return Ok(Verdict::SignatureInvalid),
    };

    let digest = sha256(attest_body);

    match ecdsa_sig.verify(&digest, &key) {
        Ok(true) => Ok(Verdict::Verified),
        _ => Ok(Verdict::SignatureInvalid),
    }
}

fn to_ecdsa_sig(r: &[u8], s: &[u8], field_len: usize) -> Result<EcdsaSig, Error> {
    check_param(r, field_len, "R")?;
    check_param(s, field_len, "S")?;

    let r = BigNum::from_slice(r).map_err(|e| Error::SignatureInvalid(e.to_string()))?;
    let s = BigNum::from_slice(s).map_err(|e| Error::SignatureInvalid(e.to_string()))?;

    EcdsaSig::from_private_components(r, s).map_err(|e| Error::SignatureInvalid(e.to_string()))
}

fn check_param(v: &[u8], field_len: usize, what: &str) -> Result<(), Error> {
    if v.is_empty() || v.len() > field_len {
        return Err(Error::SignatureInvalid(format!(
            "{what}: expecting 1..={field_len} bytes, got {}",
            v.len()
        )));
    }

    if v.iter().all(|b| *b == 0) {
        return Err(Error::SignatureInvalid(format!("{what} is zero")));
    }

    Ok(())
}
