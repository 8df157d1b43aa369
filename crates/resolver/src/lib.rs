// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Recursive-upstream transport and DNSSEC validation for a stub resolver.
//!
//! `resolve`/`resolve_query` perform one query: send it to the first
//! reachable, address-family-compatible upstream (§4.2), walk the DNSSEC
//! chain of trust for every RRset the answer carries (§4.4), and return a
//! `ResponseSet` with a `TrustLevel` recorded against each one. Everything
//! here is scoped to a single call -- no resolver instance, no shared
//! mutable state, no background tasks (§5).

pub mod config;
pub mod error;
mod name_server;
pub mod response_set;
mod resolver;
mod transport;
pub mod validator;

pub use config::{AddressFamily, NameServerConfig, ResolveOpts};
pub use error::{ResolveError, ResolveResult};
pub use resolver::{resolve, resolve_query, Query};
pub use response_set::{ResponseEntry, ResponseSet, ValidationStatus};
pub use validator::ChainCache;
