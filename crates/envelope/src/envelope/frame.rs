//! Textual framing of envelope fields.
//!
//! ```text
//! message: "[" <context> "]:" <noise><ivHex><base64> ":" <hmacHex>
//! object:  <noise><ivHex><base64> ":" <hmacHex>
//! ```
//!
//! Every field is drawn from an alphabet that excludes [`DELIMITER`], so a
//! well-formed envelope always splits into exactly the expected number of
//! fields. Anything else is rejected rather than guessed at.

use crate::error::EnvelopeError;

/// Separator between envelope fields.
pub const DELIMITER: char = ':';

/// Characters that may not appear in a context tag or noise charset.
pub const RESERVED: [char; 3] = [DELIMITER, '[', ']'];

/// Borrowed fields of a message-form envelope.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct MessageFields<'a> {
    pub context_tag: &'a str,
    /// `"[" context "]:" payload`: the exact bytes the tag covers.
    pub authenticated: &'a str,
    pub payload: &'a str,
    pub tag: &'a str,
}

/// Borrowed fields of an object-form envelope.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ObjectFields<'a> {
    /// Also the exact bytes the tag covers.
    pub payload: &'a str,
    pub tag: &'a str,
}

/// Build the authenticated part of a message envelope.
pub(crate) fn frame_message(context_tag: &str, payload: &str) -> Result<String, EnvelopeError> {
    if context_tag.contains(RESERVED) {
        return Err(EnvelopeError::InvalidContextTag);
    }
    Ok(format!("[{context_tag}]{DELIMITER}{payload}"))
}

/// Reject provider output that would add a field to the envelope.
pub(crate) fn ensure_unframed(field: &'static str, value: &str) -> Result<(), EnvelopeError> {
    if value.contains(DELIMITER) {
        return Err(EnvelopeError::UnframeableField(field));
    }
    Ok(())
}

/// Append the authentication tag to an authenticated prefix.
pub(crate) fn append_tag(mut authenticated: String, tag: &str) -> String {
    authenticated.push(DELIMITER);
    authenticated.push_str(tag);
    authenticated
}

pub(crate) fn split_message(envelope: &str) -> Result<MessageFields<'_>, EnvelopeError> {
    let mut fields = envelope.split(DELIMITER);
    let (Some(prefix), Some(payload), Some(tag), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(field_count_error(3, envelope));
    };

    let context_tag = prefix
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .filter(|inner| !inner.contains(RESERVED))
        .ok_or_else(|| {
            EnvelopeError::MalformedEnvelope("context tag must be wrapped in '[' ']'".into())
        })?;

    Ok(MessageFields {
        context_tag,
        authenticated: &envelope[..prefix.len() + DELIMITER.len_utf8() + payload.len()],
        payload,
        tag,
    })
}

pub(crate) fn split_object(envelope: &str) -> Result<ObjectFields<'_>, EnvelopeError> {
    match envelope.split_once(DELIMITER) {
        Some((payload, tag)) if !tag.contains(DELIMITER) => Ok(ObjectFields { payload, tag }),
        _ => Err(field_count_error(2, envelope)),
    }
}

/// Drop the first `noise_length` characters of a payload.
pub(crate) fn strip_noise(payload: &str, noise_length: usize) -> Result<&str, EnvelopeError> {
    if noise_length == 0 {
        return Ok(payload);
    }
    payload
        .char_indices()
        .nth(noise_length)
        .map(|(offset, _)| &payload[offset..])
        .ok_or_else(|| {
            EnvelopeError::MalformedEnvelope(format!(
                "payload is shorter than the {noise_length}-character noise prefix"
            ))
        })
}

fn field_count_error(expected: usize, envelope: &str) -> EnvelopeError {
    let found = envelope.matches(DELIMITER).count() + 1;
    EnvelopeError::MalformedEnvelope(format!("expected {expected} fields, found {found}"))
}
