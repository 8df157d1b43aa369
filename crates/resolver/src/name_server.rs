// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Upstream server fanout: try each configured server in order, skipping to
//! the next on a transport or FORMERR failure (§4.4's iteration strategy).

use delv_proto::op::{Message, ResponseCode};
use tracing::{debug, warn};

use crate::config::{NameServerConfig, ResolveOpts};
use crate::error::{ResolveError, ResolveResult};
use crate::transport;

/// Sends `query` to the first reachable, address-family-compatible server
/// in `opts.servers`, trying the next one on transport failure or FORMERR.
pub async fn query_servers(query: &Message, opts: &ResolveOpts) -> ResolveResult<Message> {
    let servers = opts.compatible_servers();
    if servers.is_empty() {
        return Err(ResolveError::NoCompatibleServer(format!("{:?}", opts.af)));
    }

    let mut last_err = None;
    for server in &servers {
        match try_server(server, query, opts).await {
            Ok(response) => return Ok(response),
            Err(err) => {
                warn!(server = %server.socket_addr, error = %err, "server failed, trying next");
                last_err = Some(err);
            }
        }
    }

    Err(last_err.expect("servers is non-empty, so at least one attempt ran"))
}

async fn try_server(server: &NameServerConfig, query: &Message, opts: &ResolveOpts) -> ResolveResult<Message> {
    let response = transport::send_query(server, query, opts).await?;

    if response.response_code() == ResponseCode::FormErr {
        return Err(ResolveError::FormErr(server.socket_addr.to_string()));
    }

    debug!(server = %server.socket_addr, rcode = %response.response_code(), "received response");
    Ok(response)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use super::*;
    use crate::config::AddressFamily;

    #[tokio::test]
    async fn no_compatible_server_is_reported() {
        let opts = ResolveOpts {
            af: AddressFamily::Ipv6Only,
            servers: vec![NameServerConfig::new("127.0.0.1:53".parse::<SocketAddr>().unwrap())],
            ..ResolveOpts::default()
        };

        let query = Message::query(1);
        let err = query_servers(&query, &opts).await.unwrap_err();
        assert!(matches!(err, ResolveError::NoCompatibleServer(_)));
    }
}
