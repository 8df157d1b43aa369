// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! One UDP send/wait/decode attempt (§4.2). Retries and TC-promotion live
//! one level up in `transport::send_query`.

use std::net::SocketAddr;

use delv_proto::op::Message;
use tokio::net::UdpSocket;

use crate::config::{NameServerConfig, ResolveOpts};
use crate::error::{ResolveError, ResolveResult};

const MAX_UDP_RESPONSE: usize = 4096;

pub(super) async fn send(server: &NameServerConfig, bytes: &[u8], opts: &ResolveOpts) -> ResolveResult<Message> {
    let local_addr = bind_addr(server.socket_addr, opts);
    let socket = UdpSocket::bind(local_addr).await?;
    socket.connect(server.socket_addr).await?;

    let attempt = async {
        socket.send(bytes).await?;
        let mut buf = [0u8; MAX_UDP_RESPONSE];
        let n = socket.recv(&mut buf).await?;
        Message::from_vec(&buf[..n]).map_err(|source| ResolveError::MalformedResponse {
            server: server.socket_addr.to_string(),
            source,
        })
    };

    match tokio::time::timeout(opts.timeout, attempt).await {
        Ok(result) => result,
        Err(_) => Err(ResolveError::Timeout {
            qname: String::new(),
            qtype: String::new(),
        }),
    }
}

fn bind_addr(server: SocketAddr, opts: &ResolveOpts) -> SocketAddr {
    let explicit = if server.is_ipv4() { opts.source_addr_v4 } else { opts.source_addr_v6 };
    explicit.unwrap_or_else(|| {
        if server.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 0], 0))
        }
    })
}
