use tokio_util::bytes::BytesMut;

use super::config::DigestConfig;
use super::encode::Encode;
use super::error::SaslError;
use super::types::*;

#[derive(Debug, PartialEq)]
pub enum Step {
    /// Send this directive list back to the server
    Respond(String),
    /// The server confirmed the authentication
    Done { rspauth: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    Error,
    Init,
    Responded,
    Done,
}

/// Drive one client authentication attempt: the server challenge gets a
/// response, the server final message must carry `rspauth`.
#[derive(Debug)]
pub struct Client {
    config: DigestConfig,
    credentials: Credentials,
    cnonce: String,
    handshake: HandshakeState,
    state: State,
}

impl Client {
    pub fn new(config: DigestConfig, auth: &[u8]) -> Result<Self, SaslError> {
        Ok(Self {
            config,
            credentials: Credentials::parse(auth)?,
            cnonce: String::new(),
            handshake: HandshakeState::new(),
            state: State::Init,
        })
    }

    /// Use a fixed client nonce instead of a random one.
    pub fn with_cnonce(mut self, cnonce: impl Into<String>) -> Self {
        self.cnonce = cnonce.into();
        self
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn handshake(&self) -> &HandshakeState {
        &self.handshake
    }

    fn respond(&mut self, payload: &[u8]) -> Result<Step, SaslError> {
        self.handshake.decode(payload)?;
        let resp = self.handshake.digest_response(
            &self.config.digest_uri,
            &self.credentials,
            &self.cnonce,
        )?;

        let mut out = BytesMut::new();
        resp.encode(&mut out);
        Ok(Step::Respond(String::from_utf8_lossy(&out).into_owned()))
    }

    fn confirm(&mut self, payload: &[u8]) -> Result<Step, SaslError> {
        self.handshake.decode(payload)?;
        match self.handshake.rspauth() {
            "" => Err(SaslError::MissingRspAuth),
            rspauth => Ok(Step::Done {
                rspauth: rspauth.to_string(),
            }),
        }
    }

    /// Feed the next server message.
    pub fn progress(&mut self, payload: &[u8]) -> Result<Step, SaslError> {
        let res = match std::mem::replace(&mut self.state, State::Error) {
            State::Init => self.respond(payload),
            State::Responded => self.confirm(payload),
            State::Done | State::Error => {
                tracing::error!("This message is not valid in this context");
                Err(SaslError::UnexpectedMessage)
            }
        };

        self.state = match &res {
            Ok(Step::Respond(_)) => State::Responded,
            Ok(Step::Done { .. }) => State::Done,
            Err(e) => {
                tracing::error!(err=?e, "DIGEST-MD5 authentication failed");
                State::Error
            }
        };
        tracing::debug!(state=?self.state, "Made progress");

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHALLENGE: &[u8] =
        br#"0000realm="zk-sasl-md5",nonce="qWkHmx+rW9vYQNysvUOCA3gWLks3u9cL5rc9JJFi",qop="auth",charset=utf-8,algorithm=md5-sess"#;

    #[test]
    fn full_exchange() {
        let mut client = Client::new(DigestConfig::default(), b"super:admin")
            .unwrap()
            .with_cnonce("140741146289");
        assert_eq!(client.state(), &State::Init);

        let resp = match client.progress(CHALLENGE).unwrap() {
            Step::Respond(r) => r,
            other => panic!("unexpected step {:?}", other),
        };
        assert!(resp.contains("response=08125d12f8b89ca7dd8b5028b5cd7c3b"));
        assert_eq!(client.state(), &State::Responded);

        let done = client
            .progress(b"0000rspauth=a2b4e7d1c1b7cf2a1fa1e5b1f6e5a3d1")
            .unwrap();
        assert_eq!(
            done,
            Step::Done {
                rspauth: "a2b4e7d1c1b7cf2a1fa1e5b1f6e5a3d1".into()
            }
        );
        assert_eq!(client.state(), &State::Done);

        assert!(matches!(
            client.progress(CHALLENGE),
            Err(SaslError::UnexpectedMessage)
        ));
        assert_eq!(client.state(), &State::Error);
    }

    #[test]
    fn final_message_without_rspauth() {
        let mut client = Client::new(DigestConfig::default(), b"super:admin").unwrap();
        client.progress(CHALLENGE).unwrap();

        assert!(matches!(
            client.progress(CHALLENGE),
            Err(SaslError::MissingRspAuth)
        ));
        assert_eq!(client.state(), &State::Error);
    }

    #[test]
    fn malformed_challenge_is_fatal() {
        let mut client = Client::new(DigestConfig::default(), b"super:admin").unwrap();
        assert!(matches!(
            client.progress(b"0000nonce"),
            Err(SaslError::MalformedPayload)
        ));
        assert_eq!(client.state(), &State::Error);
        assert!(matches!(
            client.progress(CHALLENGE),
            Err(SaslError::UnexpectedMessage)
        ));
    }

    #[test]
    fn challenge_without_nonce() {
        let mut client = Client::new(DigestConfig::default(), b"super:admin").unwrap();
        assert!(matches!(
            client.progress(br#"0000realm="zk-sasl-md5""#),
            Err(SaslError::IncompleteChallenge)
        ));
    }

    #[test]
    fn credentials_checked_upfront() {
        assert!(matches!(
            Client::new(DigestConfig::default(), b"super"),
            Err(SaslError::InvalidCredentials)
        ));
    }
}
