// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! UDP-first, TCP-fallback transport (§4.2). Each call is its own
//! cancellation unit: the `tokio::time::timeout` wrapping `send_query`
//! is what "releases sockets/timers without blocking" on drop.

mod tcp;
mod udp;

use delv_proto::op::Message;

use crate::config::{NameServerConfig, ResolveOpts};
use crate::error::{ResolveError, ResolveResult};

/// Sends `query` to `server`, honoring `opts.tcp`/retry/TC-promotion, and
/// returns the decoded response. This is the single cancellation unit the
/// resolver wraps in a `tokio::time::timeout`.
pub async fn send_query(server: &NameServerConfig, query: &Message, opts: &ResolveOpts) -> ResolveResult<Message> {
    if opts.tcp {
        return tcp::send(server, query, opts).await;
    }

    let bytes = query.to_vec()?;
    let mut last_err: Option<ResolveError> = None;

    for _ in 0..opts.attempts.max(1) {
        match udp::send(server, &bytes, opts).await {
            Ok(response) => {
                if response.truncated() {
                    return tcp::send(server, query, opts).await;
                }
                return Ok(response);
            }
            Err(err) => last_err = Some(err),
        }
    }

    Err(last_err.unwrap_or_else(|| ResolveError::Timeout {
        qname: query.queries().first().map(|q| q.name().to_string()).unwrap_or_default(),
        qtype: query.queries().first().map(|q| q.query_type().to_string()).unwrap_or_default(),
    }))
}
