use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaslError {
    /// Nothing to parse once the framing prefix is removed.
    #[error("invalid sasl payload")]
    InvalidPayload,
    /// A directive lacks its `=` separator or is not valid UTF-8.
    #[error("invalid sasl payload format")]
    MalformedPayload,
    #[error("found invalid user&password")]
    InvalidCredentials,
    #[error("secure random source unavailable: {0}")]
    RandomnessUnavailable(#[from] rand::Error),
    /// A response was requested before a challenge provided `nonce` and `realm`.
    #[error("no nonce or realm available, decode a challenge first")]
    IncompleteChallenge,
    #[error("no message is expected in this state")]
    UnexpectedMessage,
    #[error("server final message has no rspauth directive")]
    MissingRspAuth,
}
