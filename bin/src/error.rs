// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Setup-time errors for the CLI driver (§7): argument parsing, anchor-file
//! loading, and address/port validation. Everything here is fatal -- the
//! process exits nonzero rather than attempting the query at all.

use delv_proto::ProtoError;
use delv_resolver::ResolveError;

/// Alias used throughout the binary crate.
pub type CliResult<T> = Result<T, CliError>;

/// Everything that can keep `delv` from issuing a query at all.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// An option or positional token could not be parsed.
    #[error("{0}")]
    BadArgument(String),

    /// `-t AXFR`/`-t IXFR`, or a zone-transfer query type otherwise reached
    /// the driver.
    #[error("zone transfers are not supported: {0}")]
    UnsupportedQuery(String),

    /// A `-b`/`@server` address or port failed to parse.
    #[error("invalid address: {0}")]
    BadAddress(String),

    /// The trust-anchor file failed to parse or load.
    #[error("trust anchor file error: {0}")]
    Anchor(String),

    /// The resolver itself failed before producing a `ResponseSet`.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A lower-level wire-codec error surfaced while building the query.
    #[error(transparent)]
    Proto(#[from] ProtoError),

    /// Could not read a file the CLI was told to load (`-a`, resolv.conf).
    #[error("could not read {path}: {source}")]
    Io {
        /// the path that failed to open
        path: String,
        /// the underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    /// The process exit code for this failure (§6): any fatal setup error
    /// is nonzero; a successfully produced `ResponseSet` -- even a `Bogus`
    /// one -- never reaches this path at all.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
