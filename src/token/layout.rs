// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Byte order of a multi-byte integer as it appears on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    pub fn read_u16(self, b: [u8; 2]) -> u16 {
        match self {
            Endian::Big => u16::from_be_bytes(b),
            Endian::Little => u16::from_le_bytes(b),
        }
    }

    pub fn write_u16(self, v: u16) -> [u8; 2] {
        match self {
            Endian::Big => v.to_be_bytes(),
            Endian::Little => v.to_le_bytes(),
        }
    }
}

/// Wire byte order of the integer fields the EnactTrust agent is known to
/// serialise inconsistently.  All the other fields are big-endian, as
/// mandated by TPM 2.0 Part 1, and are never listed here.
///
/// The table is applied as-is: a decoder never tries to detect which order
/// a field is in.  If the agent's encoding changes, a new table must be
/// supplied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ByteOrderPolicy {
    /// TPM2B_ATTEST size prefix at the start of the quote blob
    pub attest_size: Endian,

    /// TPMI_ALG_SIG_SCHEME at the start of the signature blob
    pub sig_scheme: Endian,

    /// TPMI_ALG_HASH following the signature scheme
    pub hash_alg: Endian,

    /// size prefixes of the TPM2B_ECC_PARAMETER signature R and S
    pub ecc_param_size: Endian,
}

impl ByteOrderPolicy {
    /// The byte order emitted by the EnactTrust agent
    // XXX not validated against captured agent output for every agent
    // revision: some revisions also emit R/S sizes in little-endian
    pub const AGENT: ByteOrderPolicy = ByteOrderPolicy {
        attest_size: Endian::Little,
        sig_scheme: Endian::Little,
        hash_alg: Endian::Little,
        ecc_param_size: Endian::Big,
    };

    /// Plain TPM 2.0 marshalling, i.e., everything big-endian
    pub const CANONICAL: ByteOrderPolicy = ByteOrderPolicy {
        attest_size: Endian::Big,
        sig_scheme: Endian::Big,
        hash_alg: Endian::Big,
        ecc_param_size: Endian::Big,
    };

    /// Parse a policy from its JSON representation, e.g.:
    /// `{"attest-size": "little", "sig-scheme": "little", "hash-alg":
    /// "little", "ecc-param-size": "big"}`
    pub fn from_json(j: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(j)
    }
}

impl Default for ByteOrderPolicy {
    fn default() -> Self {
        Self::AGENT
    }
}
