// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A node enrolled with the backend, and the keys it registered
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Node {
    /// Identifier assigned at enrollment, echoed back by the agent in the
    /// extra data of every quote
    #[serde(rename = "node-id")]
    pub id: Uuid,

    /// The attestation key (AK) wrapped in a Subject Public Key Info and
    /// serialised using the textual encoding described in §13 of RFC7468
    #[serde(rename = "ak-pub")]
    pub ak_pub: String,

    /// The endorsement key, same encoding as the AK.  Not used for
    /// verification.
    #[serde(rename = "ek-pub", default, skip_serializing_if = "Option::is_none")]
    pub ek_pub: Option<String>,

    #[serde(rename = "created-at", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Node {
    pub fn new(id: Uuid, ak_pub: &str) -> Self {
        Self {
            id,
            ak_pub: ak_pub.to_string(),
            ek_pub: None,
            created_at: None,
        }
    }

    // the AK is parsed at verification time only
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.id.is_nil() {
            return Err(Error::Sema("node-id: nil UUID".to_string()));
        }

        if self.ak_pub.trim().is_empty() {
            return Err(Error::Sema(format!("{}: empty ak-pub", self.id)));
        }

        Ok(())
    }
}
