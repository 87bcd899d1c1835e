use tokio_util::bytes::{BufMut, BytesMut};

use super::types::*;

pub trait Encode {
    fn encode(&self, out: &mut BytesMut);
}

/// Directives of the client `digest-response`, RFC 2831 section 2.1.2.
#[derive(Debug, Clone, PartialEq)]
pub struct DigestResponse {
    pub digest_uri: DigestUri,
    pub qop: Qop,
    pub nc: u32,
    pub realm: String,
    pub username: String,
    pub cnonce: String,
    pub nonce: String,
    /// Lowercase hex MD5, sent unquoted
    pub response: String,
}

fn sep_enc(out: &mut BytesMut) {
    out.put(&b","[..])
}

fn key_enc(out: &mut BytesMut, key: &str) {
    out.put(key.as_bytes());
    out.put(&b"="[..]);
}

fn quoted_enc(out: &mut BytesMut, value: &str) {
    out.put(&b"\""[..]);
    out.put(value.as_bytes());
    out.put(&b"\""[..]);
}

impl Encode for DigestResponse {
    fn encode(&self, out: &mut BytesMut) {
        key_enc(out, "digest-uri");
        quoted_enc(out, &self.digest_uri.to_string());
        sep_enc(out);

        key_enc(out, "qop");
        out.put(self.qop.as_str().as_bytes());
        sep_enc(out);

        key_enc(out, "nc");
        out.put(format!("{:08x}", self.nc).as_bytes());
        sep_enc(out);

        key_enc(out, "realm");
        quoted_enc(out, &self.realm);
        sep_enc(out);

        key_enc(out, "username");
        quoted_enc(out, &self.username);
        sep_enc(out);

        key_enc(out, "cnonce");
        quoted_enc(out, &self.cnonce);
        sep_enc(out);

        key_enc(out, "nonce");
        quoted_enc(out, &self.nonce);
        sep_enc(out);

        key_enc(out, "response");
        out.put(self.response.as_bytes());
    }
}
