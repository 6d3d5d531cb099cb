// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::common::NODE_ID_LEN;
use super::errors::Error;
use super::quote::AttestationQuote;
use uuid::Uuid;

/// Extract the node identifier the agent stashes in the quote's extra data.
/// The 16 bytes are taken in RFC 4122 order, with no byte swapping.
pub fn node_id(q: &AttestationQuote) -> Result<Uuid, Error> {
    let b: [u8; NODE_ID_LEN] = q.extra_data.as_slice().try_into().map_err(|_| {
        Error::MalformedIdentifier(format!(
            "extra data: expecting {NODE_ID_LEN} bytes, got {}",
            q.extra_data.len()
        ))
    })?;

    Ok(Uuid::from_bytes(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use rstest::rstest;

    const TEST_NODE_ID: [u8; 16] = hex!("7dd5db06d2f54e0d8a9c9baaa5a446ef");

    #[test]
    fn node_id_ok() {
        let q = AttestationQuote::new(&[], &TEST_NODE_ID, &[0; 32]).unwrap();

        assert_eq!(
            node_id(&q).unwrap(),
            Uuid::parse_str("7dd5db06-d2f5-4e0d-8a9c-9baaa5a446ef").unwrap()
        );
    }

    #[rstest]
    #[case(0)]
    #[case(15)]
    #[case(17)]
    #[case(32)]
    fn node_id_bad_length(#[case] len: usize) {
        let q = AttestationQuote::new(&[], &vec![0xab; len], &[0; 32]).unwrap();

        assert!(matches!(node_id(&q), Err(Error::MalformedIdentifier(_))));
    }
}
