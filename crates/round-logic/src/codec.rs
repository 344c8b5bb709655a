//! Choice payload codec
//!
//! A payload is the choice's uppercase name as UTF-8 bytes, nothing else:
//! no framing, no length prefix, no trailing newline.

use crate::choice::Choice;
use crate::error::GameError;

/// Serialize a choice for the connectivity layer
pub fn encode_choice(choice: Choice) -> Vec<u8> {
    choice.name().as_bytes().to_vec()
}

/// Decode a payload received from the connectivity layer
pub fn decode_choice(payload: &[u8]) -> Result<Choice, GameError> {
    let text = core::str::from_utf8(payload).map_err(|_| GameError::invalid_payload(payload))?;
    text.parse()
}
