// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Transport and setup errors (§7). Validation failures are never
//! represented here: a broken DNSSEC chain downgrades a `TrustLevel` and
//! logs a warning, it never aborts the query (§7's propagation policy).

use delv_proto::ProtoError;

/// Alias used throughout this crate.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Everything that can stop a query before a `ResponseSet` is produced.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No upstream server remained reachable for this query's address family.
    #[error("no compatible upstream server for {0}")]
    NoCompatibleServer(String),

    /// Every configured upstream timed out.
    #[error("query for {qname} {qtype} timed out against all servers")]
    Timeout {
        /// the name being queried
        qname: String,
        /// the type being queried
        qtype: String,
    },

    /// TCP connection refused by the upstream.
    #[error("connection refused by {0}")]
    ConnectionRefused(String),

    /// A response arrived truncated over TCP too (should not happen; TC=1
    /// over UDP is handled by promoting to TCP, not surfaced as an error).
    #[error("truncated response from {0} even over TCP")]
    Truncated(String),

    /// A response could not be decoded at all (§4.1 wire codec invariant:
    /// the whole message is dropped, not partially accepted).
    #[error("malformed response from {server}: {source}")]
    MalformedResponse {
        /// the server that sent the bad response
        server: String,
        /// the underlying decode failure
        #[source]
        source: ProtoError,
    },

    /// The server returned FORMERR; per §7 this ends the query rather than
    /// retrying (the query itself is presumed malformed).
    #[error("server {0} rejected the query with FORMERR")]
    FormErr(String),

    /// No usable trust anchors were loaded but validation was requested.
    #[error("no trusted keys available for validation")]
    NoTrustedKeys,

    /// A trust anchor file failed the `BadAnchorDigestLength` invariant.
    #[error("trust anchor error: {0}")]
    Anchor(String),

    /// The query name/type/class combination is rejected outright (zone
    /// transfer types, per §6).
    #[error("unsupported query: {0}")]
    UnsupportedQuery(String),

    /// Wraps a lower-level wire-codec error encountered while building a
    /// query message.
    #[error(transparent)]
    Proto(#[from] ProtoError),

    /// Wraps the underlying OS I/O error from the transport layer.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
