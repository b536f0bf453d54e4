//! Inverse of decoding: build the log a registry would emit for an event.
//!
//! Test fixtures only; enabled by the `test-util` feature.

use ethers::abi::{self, Token};
use ethers::types::{Address, Bytes, Log, H256, U256, U64};
use lineage_types::{AssetAction, AssetEvent, AttestationEvent, EventKind};

/// Encode an `AssetCreated` log emitted by `contract`.
pub fn asset_log(event: &AssetEvent, contract: Address) -> Log {
    let action = match event.action {
        AssetAction::Publish => 0u8,
        AssetAction::Derive => 1u8,
    };
    let data = abi::encode(&[
        Token::Uint(U256::from(action)),
        Token::FixedBytes(event.recipe_hash.as_bytes().to_vec()),
        Token::String(event.recipe_uri.clone()),
    ]);

    Log {
        address: contract,
        topics: vec![
            EventKind::AssetCreated.topic(),
            uint_topic(event.asset_id),
            uint_topic(event.parent_id),
            address_topic(event.actor),
        ],
        data: Bytes::from(data),
        block_number: Some(U64::from(event.block_number)),
        transaction_hash: Some(event.tx_hash),
        ..Default::default()
    }
}

/// Encode an `AssetAttested` log emitted by `contract`.
pub fn attestation_log(event: &AttestationEvent, contract: Address) -> Log {
    let data = abi::encode(&[
        Token::FixedBytes(event.claim_hash.as_bytes().to_vec()),
        Token::String(event.claim_uri.clone()),
    ]);

    Log {
        address: contract,
        topics: vec![
            EventKind::AssetAttested.topic(),
            uint_topic(event.asset_id),
            address_topic(event.actor),
        ],
        data: Bytes::from(data),
        block_number: Some(U64::from(event.block_number)),
        transaction_hash: Some(event.tx_hash),
        ..Default::default()
    }
}

fn uint_topic(value: U256) -> H256 {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    H256::from(word)
}

fn address_topic(address: Address) -> H256 {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    H256::from(word)
}
