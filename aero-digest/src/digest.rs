use md5::{Digest, Md5};
use rand::{rngs::OsRng, RngCore};
use tokio_util::bytes::BytesMut;

use super::encode::{DigestResponse, Encode};
use super::error::SaslError;
use super::types::*;

// -----------------------------------------------------------------
//
// RFC 2831 HASHES
//
// -----------------------------------------------------------------

fn hex_md5(data: impl AsRef<[u8]>) -> String {
    hex::encode(Md5::digest(data))
}

/// `HEX(H(H(user:realm:password) ":" nonce ":" cnonce))`
///
/// The inner hash is kept binary, as RFC 2831 mandates for A1.
pub fn ha1(creds: &Credentials, realm: &str, nonce: &str, cnonce: &str) -> String {
    let secret = Md5::digest(format!("{}:{}:{}", creds.username, realm, creds.password));

    let mut a1 = Md5::new();
    a1.update(secret);
    a1.update(b":");
    a1.update(nonce.as_bytes());
    a1.update(b":");
    a1.update(cnonce.as_bytes());
    hex::encode(a1.finalize())
}

/// `HEX(H("AUTHENTICATE:" digest-uri))`, `qop=auth` has no body hash.
pub fn ha2(digest_uri: &DigestUri) -> String {
    hex_md5(format!("AUTHENTICATE:{}", digest_uri))
}

/// The `response` directive value.
pub fn response_value(
    ha1: &str,
    nonce: &str,
    nc: u32,
    cnonce: &str,
    qop: Qop,
    ha2: &str,
) -> String {
    hex_md5(format!(
        "{}:{}:{:08x}:{}:{}:{}",
        ha1, nonce, nc, cnonce, qop, ha2
    ))
}

/// Decimal client nonce in `[0, 65535]`, drawn from the OS random source.
/// There is no fallback: a failing source aborts the authentication.
pub fn generate_cnonce() -> Result<String, SaslError> {
    let mut buf = [0u8; 2];
    OsRng.try_fill_bytes(&mut buf).map_err(|e| {
        tracing::error!(err=?e, "Unable to draw a client nonce");
        SaslError::RandomnessUnavailable(e)
    })?;
    Ok(u16::from_be_bytes(buf).to_string())
}

// -----------------------------------------------------------------
//
// RESPONSE BUILDING
//
// -----------------------------------------------------------------

impl HandshakeState {
    /// Compute the client response for the decoded challenge against the
    /// default `zookeeper/zk-sasl-md5` digest-uri.
    ///
    /// `auth` is a `user:password` blob. An empty `cnonce` is replaced by a
    /// random one; passing a fixed value makes the output reproducible.
    pub fn build_response(&self, auth: &[u8], cnonce: &str) -> Result<String, SaslError> {
        self.build_response_for(&DigestUri::default(), auth, cnonce)
    }

    pub fn build_response_for(
        &self,
        digest_uri: &DigestUri,
        auth: &[u8],
        cnonce: &str,
    ) -> Result<String, SaslError> {
        let creds = Credentials::parse(auth)?;
        let resp = self.digest_response(digest_uri, &creds, cnonce)?;

        let mut out = BytesMut::new();
        resp.encode(&mut out);
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn digest_response(
        &self,
        digest_uri: &DigestUri,
        creds: &Credentials,
        cnonce: &str,
    ) -> Result<DigestResponse, SaslError> {
        if self.phase() != Phase::Challenged {
            tracing::error!(state=?self, "Response requested before any challenge");
            return Err(SaslError::IncompleteChallenge);
        }

        let cnonce = match cnonce.is_empty() {
            true => generate_cnonce()?,
            false => cnonce.to_string(),
        };

        // Only "auth" is supported so far.
        let qop = Qop::Auth;
        let a1 = ha1(creds, &self.realm, &self.nonce, &cnonce);
        let a2 = ha2(digest_uri);
        let response = response_value(&a1, &self.nonce, NONCE_COUNT, &cnonce, qop, &a2);

        tracing::debug!(user=%creds.username, digest_uri=%digest_uri, "Built DIGEST-MD5 response");
        Ok(DigestResponse {
            digest_uri: digest_uri.clone(),
            qop,
            nc: NONCE_COUNT,
            realm: self.realm.clone(),
            username: creds.username.clone(),
            cnonce,
            nonce: self.nonce.clone(),
            response,
        })
    }
}
