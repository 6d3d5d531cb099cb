// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Sequencing of decoding, identity resolution, key lookup and signature
//! checking for one evidence submission.
//!
//! A [`Pipeline`] holds no mutable state: it can be shared between threads
//! (as long as the node store can) and running it twice on the same input
//! against an unchanged store gives the same result.

use crate::store::{INodeStore, Node};
use crate::token::{self, ByteOrderPolicy, CanonicalEvidence, Decoder, Evidence, Verdict};
use std::fmt;
use uuid::Uuid;

/// The stages a submission goes through, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Decoding,
    IdentityResolution,
    KeyLookup,
    SignatureCheck,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Decoding => "decoding",
            Stage::IdentityResolution => "identity resolution",
            Stage::KeyLookup => "key lookup",
            Stage::SignatureCheck => "signature check",
        };

        f.write_str(s)
    }
}

/// The first failure encountered while processing a submission
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PipelineError {
    #[error("decoding evidence: {0}")]
    Decode(token::Error),
    #[error("resolving node identity: {0}")]
    Identity(token::Error),
    #[error("node-id mismatch: claimed {claimed}, quote carries {actual}")]
    IdentifierMismatch { claimed: Uuid, actual: Uuid },
    #[error("node {0} is not enrolled")]
    EntityNotFound(Uuid),
    #[error("attestation key for node {node_id} unusable: {error}")]
    Key { node_id: Uuid, error: token::Error },
    #[error("quote signature for node {0} does not verify")]
    SignatureInvalid(Uuid),
}

impl PipelineError {
    /// The stage at which processing stopped
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Decode(_) => Stage::Decoding,
            PipelineError::Identity(_) | PipelineError::IdentifierMismatch { .. } => {
                Stage::IdentityResolution
            }
            PipelineError::EntityNotFound(_) => Stage::KeyLookup,
            PipelineError::Key { .. } | PipelineError::SignatureInvalid(_) => {
                Stage::SignatureCheck
            }
        }
    }
}

/// What a successful run hands over for packaging
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub verdict: Verdict,
    pub evidence: CanonicalEvidence,
    pub node_id: Uuid,
}

impl Outcome {
    pub fn into_parts(self) -> (Verdict, CanonicalEvidence, Uuid) {
        (self.verdict, self.evidence, self.node_id)
    }
}

enum State {
    Decoding,
    IdentityResolution(Evidence),
    KeyLookup(Evidence, Uuid),
    SignatureCheck(Evidence, Node),
    Done(Outcome),
    Failed(PipelineError),
}

/// Processes evidence submissions against a node store
pub struct Pipeline<'a, S: INodeStore + ?Sized> {
    store: &'a S,
    decoder: Decoder,
}

impl<'a, S: INodeStore + ?Sized> Pipeline<'a, S> {
    /// A pipeline decoding blobs as emitted by the EnactTrust agent
    pub fn new(store: &'a S) -> Self {
        Self::with_policy(store, ByteOrderPolicy::AGENT)
    }

    pub fn with_policy(store: &'a S, policy: ByteOrderPolicy) -> Self {
        Self {
            store,
            decoder: Decoder::new(policy),
        }
    }

    /// Decode, identify and verify one submission
    pub fn process(&self, quote: &[u8], signature: &[u8]) -> Result<Outcome, PipelineError> {
        self.process_claimed(None, quote, signature)
    }

    /// Same as [`Pipeline::process`], but also require the node-id carried
    /// in the quote to be `claimed`, when the transport supplies one
    pub fn process_claimed(
        &self,
        claimed: Option<&Uuid>,
        quote: &[u8],
        signature: &[u8],
    ) -> Result<Outcome, PipelineError> {
        let mut state = State::Decoding;

        loop {
            state = match state {
                State::Decoding => match self.decoder.decode(quote, signature) {
                    Ok(e) => State::IdentityResolution(e),
                    Err(e) => State::Failed(PipelineError::Decode(e)),
                },

                State::IdentityResolution(e) => match e.node_id() {
                    Ok(actual) => match claimed {
                        Some(c) if *c != actual => {
                            State::Failed(PipelineError::IdentifierMismatch {
                                claimed: *c,
                                actual,
                            })
                        }
                        _ => State::KeyLookup(e, actual),
                    },
                    Err(err) => State::Failed(PipelineError::Identity(err)),
                },

                State::KeyLookup(e, node_id) => match self.store.lookup(&node_id) {
                    Some(node) => State::SignatureCheck(e, node),
                    None => State::Failed(PipelineError::EntityNotFound(node_id)),
                },

                State::SignatureCheck(e, node) => match e.verify(&node) {
                    Ok(Verdict::Verified) => State::Done(Outcome {
                        verdict: Verdict::Verified,
                        evidence: e.into_canonical(),
                        node_id: node.id,
                    }),
                    Ok(Verdict::SignatureInvalid) => {
                        State::Failed(PipelineError::SignatureInvalid(node.id))
                    }
                    Err(error) => State::Failed(PipelineError::Key {
                        node_id: node.id,
                        error,
                    }),
                },

                State::Done(o) => return Ok(o),
                State::Failed(err) => return Err(err),
            }
        }
    }
}
