pub mod config;
pub mod decode;
pub mod digest;
pub mod encode;
pub mod error;
pub mod flow;
/// Client side of the DIGEST-MD5 SASL mechanism, as spoken by ZooKeeper
///
/// ## Trace
///
/// ```text
/// S: ....realm="zk-sasl-md5",nonce="qWkHmx+rW9vYQNysvUOCA3gWLks3u9cL5rc9JJFi",charset=utf-8,algorithm=md5-sess
/// C: digest-uri="zookeeper/zk-sasl-md5",qop=auth,nc=00000001,realm="zk-sasl-md5",
///    username="super",cnonce="140741146289",nonce="qWkHmx+rW9vYQNysvUOCA3gWLks3u9cL5rc9JJFi",
///    response=08125d12f8b89ca7dd8b5028b5cd7c3b
/// S: ....rspauth=...
/// ```
///
/// The four leading bytes of each server message belong to the transport
/// framing and are skipped. Only `qop=auth` and a single round
/// (`nc=00000001`) are supported.
///
/// ## RFC References
///
/// DIGEST-MD5 SASL - https://datatracker.ietf.org/doc/html/rfc2831
pub mod types;

pub use error::SaslError;
pub use types::{Credentials, DigestUri, HandshakeState, Phase, Qop};
