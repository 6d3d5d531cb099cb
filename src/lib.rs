// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! EnactTrust TPM evidence decoding, normalisation and verification.
//!
//! The EnactTrust agent sends the backend two blobs for every attestation:
//! a TPM2 quote (TPMS_ATTEST) and its signature (TPMT_SIGNATURE).  A few of
//! their integer fields are serialised in the wrong byte order.  This crate
//! decodes both blobs, fixes their byte order according to an explicit
//! policy, extracts the node identifier the agent embeds in the quote, and
//! verifies the quote's ECDSA signature using the attestation key the node
//! registered at enrollment.
//!
//! The API allows:
//! * Decoding and normalising quote and signature blobs ([`token`])
//! * Looking up enrolled nodes ([`store`])
//! * Running the whole sequence on a submission ([`pipeline`])
//!
//! Transport, persistence and packaging of the results for a verification
//! service are left to the caller.

pub mod pipeline;
pub mod store;
pub mod token;
