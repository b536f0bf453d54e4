//! Decoding of raw registry logs into typed events.
//!
//! Each event kind implements [`FromLog`], so callers that fetched logs for a
//! given topic decode them without sniffing the record type at runtime.
//! Decoding is total for well-formed logs; anything else yields a
//! [`DecodeError`] for that record alone.

#[cfg(any(test, feature = "test-util"))]
mod encode;

use ethers::abi::{self, ParamType, Token};
use ethers::types::{Address, Log, H256, U256};
use lineage_types::{AssetAction, AssetEvent, AttestationEvent, EventKind};
use thiserror::Error;

#[cfg(any(test, feature = "test-util"))]
pub use encode::{asset_log, attestation_log};

/// Errors produced while decoding a single log record.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{kind} log has topic {found:?}, expected {expected:?}")]
    WrongTopic {
        kind: EventKind,
        expected: H256,
        found: Option<H256>,
    },

    #[error("{kind} log has {found} topics, expected {expected}")]
    TopicCount {
        kind: EventKind,
        expected: usize,
        found: usize,
    },

    #[error("{kind} log data is not valid ABI: {source}")]
    Abi {
        kind: EventKind,
        #[source]
        source: abi::Error,
    },

    #[error("{kind} log field '{field}' has an unexpected type")]
    UnexpectedToken {
        kind: EventKind,
        field: &'static str,
    },

    #[error("AssetCreated action discriminant {0} does not fit in uint8")]
    ActionOutOfRange(U256),

    #[error("{kind} log is missing '{field}' (pending or pruned record)")]
    MissingField {
        kind: EventKind,
        field: &'static str,
    },
}

/// A typed event decodable from one registry log.
pub trait FromLog: Sized {
    /// Which event signature this type decodes.
    const KIND: EventKind;

    fn from_log(log: &Log) -> Result<Self, DecodeError>;
}

impl FromLog for AssetEvent {
    const KIND: EventKind = EventKind::AssetCreated;

    fn from_log(log: &Log) -> Result<Self, DecodeError> {
        let kind = Self::KIND;
        let topics = indexed_topics(kind, log)?;
        let meta = RecordMeta::from_log(kind, log)?;

        let mut data = decode_data(
            kind,
            &[ParamType::Uint(8), ParamType::FixedBytes(32), ParamType::String],
            log,
        )?
        .into_iter();

        let raw_action = next_uint(kind, "action", data.next())?;
        if raw_action > U256::from(u8::MAX) {
            return Err(DecodeError::ActionOutOfRange(raw_action));
        }

        Ok(AssetEvent {
            asset_id: topic_to_uint(&topics[0]),
            parent_id: topic_to_uint(&topics[1]),
            actor: topic_to_address(&topics[2]),
            action: AssetAction::from(raw_action.low_u32() as u8),
            recipe_hash: next_bytes32(kind, "recipeHash", data.next())?,
            recipe_uri: next_string(kind, "recipeURI", data.next())?,
            tx_hash: meta.tx_hash,
            block_number: meta.block_number,
        })
    }
}

impl FromLog for AttestationEvent {
    const KIND: EventKind = EventKind::AssetAttested;

    fn from_log(log: &Log) -> Result<Self, DecodeError> {
        let kind = Self::KIND;
        let topics = indexed_topics(kind, log)?;
        let meta = RecordMeta::from_log(kind, log)?;

        let mut data =
            decode_data(kind, &[ParamType::FixedBytes(32), ParamType::String], log)?.into_iter();

        Ok(AttestationEvent {
            asset_id: topic_to_uint(&topics[0]),
            actor: topic_to_address(&topics[1]),
            claim_hash: next_bytes32(kind, "claimHash", data.next())?,
            claim_uri: next_string(kind, "claimURI", data.next())?,
            tx_hash: meta.tx_hash,
            block_number: meta.block_number,
        })
    }
}

/// Where a record sits on chain.
struct RecordMeta {
    tx_hash: H256,
    block_number: u64,
}

impl RecordMeta {
    fn from_log(kind: EventKind, log: &Log) -> Result<Self, DecodeError> {
        let tx_hash = log.transaction_hash.ok_or(DecodeError::MissingField {
            kind,
            field: "transactionHash",
        })?;
        let block_number = log.block_number.ok_or(DecodeError::MissingField {
            kind,
            field: "blockNumber",
        })?;
        Ok(Self {
            tx_hash,
            block_number: block_number.as_u64(),
        })
    }
}

/// Check `topics[0]` and return the indexed parameters that follow it.
fn indexed_topics(kind: EventKind, log: &Log) -> Result<&[H256], DecodeError> {
    let expected = kind.topic();
    let found = log.topics.first().copied();
    if found != Some(expected) {
        return Err(DecodeError::WrongTopic {
            kind,
            expected,
            found,
        });
    }

    let indexed = &log.topics[1..];
    if indexed.len() != kind.indexed_params() {
        return Err(DecodeError::TopicCount {
            kind,
            expected: kind.indexed_params() + 1,
            found: log.topics.len(),
        });
    }
    Ok(indexed)
}

fn decode_data(
    kind: EventKind,
    params: &[ParamType],
    log: &Log,
) -> Result<Vec<Token>, DecodeError> {
    abi::decode(params, &log.data).map_err(|source| DecodeError::Abi { kind, source })
}

fn topic_to_uint(topic: &H256) -> U256 {
    U256::from_big_endian(topic.as_bytes())
}

fn topic_to_address(topic: &H256) -> Address {
    Address::from_slice(&topic.as_bytes()[12..])
}

fn next_uint(
    kind: EventKind,
    field: &'static str,
    token: Option<Token>,
) -> Result<U256, DecodeError> {
    match token {
        Some(Token::Uint(value)) => Ok(value),
        _ => Err(DecodeError::UnexpectedToken { kind, field }),
    }
}

fn next_bytes32(
    kind: EventKind,
    field: &'static str,
    token: Option<Token>,
) -> Result<H256, DecodeError> {
    match token {
        Some(Token::FixedBytes(bytes)) if bytes.len() == 32 => Ok(H256::from_slice(&bytes)),
        _ => Err(DecodeError::UnexpectedToken { kind, field }),
    }
}

fn next_string(
    kind: EventKind,
    field: &'static str,
    token: Option<Token>,
) -> Result<String, DecodeError> {
    match token {
        Some(Token::String(value)) => Ok(value),
        _ => Err(DecodeError::UnexpectedToken { kind, field }),
    }
}
