// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;

/// TPM_GENERATED_VALUE, prefixed to every structure the TPM signs
pub const TPM_GENERATED_VALUE: u32 = 0xff54_4347;

/// TPM_ST_ATTEST_QUOTE
pub const TPM_ST_ATTEST_QUOTE: u16 = 0x8018;

pub const TPM_ALG_SHA1: u16 = 0x0004;
pub const TPM_ALG_SHA256: u16 = 0x000b;
pub const TPM_ALG_SHA384: u16 = 0x000c;
pub const TPM_ALG_SHA512: u16 = 0x000d;
pub const TPM_ALG_SM3_256: u16 = 0x0012;

pub const TPM_ALG_ECDSA: u16 = 0x0018;
pub const TPM_ALG_ECDAA: u16 = 0x001a;
pub const TPM_ALG_SM2: u16 = 0x001b;
pub const TPM_ALG_ECSCHNORR: u16 = 0x001c;

/// Size of the node identifier carried in the quote's extra data
pub const NODE_ID_LEN: usize = 16;

// See TPM 2.0 Part 2, Table 9 (TPM_ALG_ID)
pub fn digest_size(hash_alg: u16) -> Result<usize, Error> {
    match hash_alg {
        TPM_ALG_SHA1 => Ok(20),
        TPM_ALG_SHA256 | TPM_ALG_SM3_256 => Ok(32),
        TPM_ALG_SHA384 => Ok(48),
        TPM_ALG_SHA512 => Ok(64),
        x => Err(Error::UnsupportedHashAlgorithm(x)),
    }
}

pub fn is_valid_hash_alg(hash_alg: u16) -> bool {
    digest_size(hash_alg).is_ok()
}
