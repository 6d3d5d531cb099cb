// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! The token module provides an [`Evidence`] object to encapsulate the
//! decoding, normalisation and verification of the quote and signature
//! blobs sent by the EnactTrust agent.
//!
//! # Example
//!
//! ```
//! use enacttoken::store::Node;
//! use enacttoken::token::{Evidence, Verdict};
//!
//! const quote: &[u8; 96] = include_bytes!("../../testdata/quote.bin");
//! const signature: &[u8; 72] = include_bytes!("../../testdata/signature.bin");
//! const ak_pub: &str = include_str!("../../testdata/ak-pub.pem");
//!
//! let e = Evidence::decode(quote, signature).expect("decoding evidence");
//!
//! // the node identifier is carried in the quote's extra data
//! let node_id = e.node_id().expect("extracting node-id");
//!
//! let verdict = e.verify(&Node::new(node_id, ak_pub)).expect("verifying quote");
//! assert_eq!(verdict, Verdict::Verified);
//!
//! // big-endian quote || signature, ready for packaging
//! let canonical = e.into_canonical().into_bytes();
//! assert_eq!(canonical.len(), 168);
//! ```

pub use self::canonical::CanonicalEvidence;
pub use self::common::*;
pub use self::errors::Error;
pub use self::evidence::{Decoder, Evidence};
pub use self::identity::node_id;
pub use self::layout::{ByteOrderPolicy, Endian};
pub use self::quote::AttestationQuote;
pub use self::signature::SignatureBlock;
pub use self::verifier::{ec_key_from_pem, verify_signature, Verdict};

mod canonical;
mod common;
mod errors;
mod evidence;
mod identity;
mod layout;
mod quote;
mod signature;
mod verifier;
mod wire;
