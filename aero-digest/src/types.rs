use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::SaslError;

/// Number of bytes the transport prepends to every challenge.
/// They carry no meaning for the mechanism and are discarded.
pub const FRAME_PREFIX_LEN: usize = 4;

/// Only a single authentication round is supported, so the
/// nonce-count never goes past 1.
pub const NONCE_COUNT: u32 = 1;

pub const DEFAULT_SERV_TYPE: &str = "zookeeper";
pub const DEFAULT_HOST: &str = "zk-sasl-md5";

/// Quality of protection levels defined by RFC 2831.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qop {
    /// Authentication only
    Auth,
    /// Authentication with integrity protection
    AuthInt,
    /// Authentication with integrity and confidentiality protection
    AuthConf,
}

impl Qop {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::AuthInt => "auth-int",
            Self::AuthConf => "auth-conf",
        }
    }
}

impl fmt::Display for Qop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `digest-uri` directive: `serv-type "/" host`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DigestUri {
    #[serde(default = "default_serv_type")]
    pub serv_type: String,
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for DigestUri {
    fn default() -> Self {
        Self {
            serv_type: default_serv_type(),
            host: default_host(),
        }
    }
}

impl fmt::Display for DigestUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.serv_type, self.host)
    }
}

fn default_serv_type() -> String {
    DEFAULT_SERV_TYPE.into()
}

fn default_host() -> String {
    DEFAULT_HOST.into()
}

/// A `user:password` pair extracted from the opaque credential blob.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Split the blob on its first colon; the password may contain more colons.
    pub fn parse(auth: &[u8]) -> Result<Self, SaslError> {
        let blob = std::str::from_utf8(auth).map_err(|_| SaslError::InvalidCredentials)?;
        let (username, password) = blob.split_once(':').ok_or(SaslError::InvalidCredentials)?;

        if username.is_empty() || password.is_empty() {
            return Err(SaslError::InvalidCredentials);
        }

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No usable challenge decoded yet
    Fresh,
    /// `nonce` and `realm` are known, a response can be built
    Challenged,
}

/// Per-attempt state filled by [`HandshakeState::decode`] and read when
/// building the client response. Do not share one instance between
/// concurrent authentication attempts.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct HandshakeState {
    pub(crate) nonce: String,
    pub(crate) realm: String,
    pub(crate) rspauth: String,
}

impl HandshakeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Confirmation token sent by the server, quotes included.
    pub fn rspauth(&self) -> &str {
        &self.rspauth
    }

    pub fn phase(&self) -> Phase {
        match self.nonce.is_empty() || self.realm.is_empty() {
            true => Phase::Fresh,
            false => Phase::Challenged,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.nonce.clear();
        self.realm.clear();
        self.rspauth.clear();
    }
}

impl fmt::Debug for HandshakeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandshakeState")
            .field("realm", &self.realm)
            .field("has_nonce", &!self.nonce.is_empty())
            .field("has_rspauth", &!self.rspauth.is_empty())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_split_on_first_colon() {
        let c = Credentials::parse(b"super:admin").unwrap();
        assert_eq!(c.username, "super");
        assert_eq!(c.password, "admin");

        let c = Credentials::parse(b"a:b:c").unwrap();
        assert_eq!(c.username, "a");
        assert_eq!(c.password, "b:c");
    }

    #[test]
    fn credentials_rejected() {
        for blob in [
            &b""[..],
            &b"nocolon"[..],
            &b":pass"[..],
            &b"user:"[..],
            &b"\xff:pass"[..],
        ] {
            assert!(matches!(
                Credentials::parse(blob),
                Err(SaslError::InvalidCredentials)
            ));
        }
    }

    #[test]
    fn credentials_debug_hides_password() {
        let c = Credentials::parse(b"super:hunter2").unwrap();
        let dbg = format!("{:?}", c);
        assert!(dbg.contains("super"));
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn default_digest_uri() {
        assert_eq!(DigestUri::default().to_string(), "zookeeper/zk-sasl-md5");
    }

    #[test]
    fn qop_names() {
        assert_eq!(Qop::Auth.to_string(), "auth");
        assert_eq!(Qop::AuthInt.to_string(), "auth-int");
        assert_eq!(Qop::AuthConf.to_string(), "auth-conf");
    }

    #[test]
    fn phase_follows_nonce_and_realm() {
        let mut st = HandshakeState::new();
        assert_eq!(st.phase(), Phase::Fresh);
        st.nonce = "n".into();
        assert_eq!(st.phase(), Phase::Fresh);
        st.realm = "r".into();
        assert_eq!(st.phase(), Phase::Challenged);
        st.reset();
        assert_eq!(st.phase(), Phase::Fresh);
    }
}
