use nom::{
    bytes::complete::{tag, take, take_while},
    combinator::rest,
    multi::separated_list1,
    sequence::{preceded, separated_pair},
    IResult,
};

use super::error::SaslError;
use super::types::*;

// -----------------------------------------------------------------
//
// CHALLENGE PARSING
//
// -----------------------------------------------------------------

fn not_comma(c: u8) -> bool {
    c != 0x2c // ,
}

fn not_equal(c: u8) -> bool {
    c != 0x3d // =
}

/// Discard the transport framing, keep everything else
fn frame_body(input: &[u8]) -> IResult<&[u8], &[u8]> {
    preceded(take(FRAME_PREFIX_LEN), rest)(input)
}

/// `k1=v1,k2="v2",...`; values are not allowed to contain a comma,
/// even when quoted.
fn directive_list(input: &[u8]) -> IResult<&[u8], Vec<&[u8]>> {
    separated_list1(tag(b","), take_while(not_comma))(input)
}

/// Split on the first `=` only, the value keeps any other one.
fn directive(input: &[u8]) -> IResult<&[u8], (&[u8], &[u8])> {
    separated_pair(take_while(not_equal), tag(b"="), rest)(input)
}

/// Drop the first and last byte whatever they are.
fn unquote(value: &[u8]) -> &[u8] {
    value.get(1..value.len().saturating_sub(1)).unwrap_or_default()
}

fn utf8(value: &[u8]) -> Result<String, SaslError> {
    std::str::from_utf8(value)
        .map(|v| v.to_string())
        .map_err(|_| SaslError::MalformedPayload)
}

impl HandshakeState {
    /// Parse a server challenge and replace `nonce`, `realm` and `rspauth`
    /// with what it carries. Returns the number of consumed bytes, which is
    /// always the full buffer. On error the three fields are left empty.
    pub fn decode(&mut self, buf: &[u8]) -> Result<usize, SaslError> {
        self.reset();

        let body = match frame_body(buf) {
            Ok((_, body)) if !body.is_empty() => body,
            _ => {
                tracing::debug!(len = buf.len(), "Empty SASL challenge");
                return Err(SaslError::InvalidPayload);
            }
        };

        let (_, items) = directive_list(body).map_err(|_| SaslError::InvalidPayload)?;

        let mut next = HandshakeState::new();
        for item in items {
            let (key, value) = match directive(item) {
                Ok((_, kv)) => kv,
                Err(_) => {
                    tracing::debug!("SASL directive without '=' separator");
                    return Err(SaslError::MalformedPayload);
                }
            };

            if key.eq_ignore_ascii_case(b"nonce") {
                next.nonce = utf8(unquote(value))?;
            } else if key.eq_ignore_ascii_case(b"realm") {
                next.realm = utf8(unquote(value))?;
            } else if key.eq_ignore_ascii_case(b"rspauth") {
                next.rspauth = utf8(value)?;
            } else {
                tracing::trace!(key = %String::from_utf8_lossy(key), "Ignored SASL directive");
            }
        }

        *self = next;
        tracing::trace!(state=?self, "Decoded SASL challenge");
        Ok(buf.len())
    }
}
