// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! TCP transport: 2-byte length-prefix framing, one query per connection
//! (§4.2). Used for `+tcp` and as the fallback when a UDP reply sets `TC=1`.

use delv_proto::op::Message;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::{NameServerConfig, ResolveOpts};
use crate::error::{ResolveError, ResolveResult};

pub(super) async fn send(server: &NameServerConfig, query: &Message, opts: &ResolveOpts) -> ResolveResult<Message> {
    let bytes = query.to_vec()?;

    let attempt = async {
        let mut stream = TcpStream::connect(server.socket_addr).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::ConnectionRefused {
                ResolveError::ConnectionRefused(server.socket_addr.to_string())
            } else {
                ResolveError::Io(e)
            }
        })?;

        let len = bytes.len() as u16;
        stream.write_all(&len.to_be_bytes()).await?;
        stream.write_all(&bytes).await?;

        let mut len_buf = [0u8; 2];
        stream.read_exact(&mut len_buf).await?;
        let reply_len = u16::from_be_bytes(len_buf) as usize;

        let mut reply = vec![0u8; reply_len];
        stream.read_exact(&mut reply).await?;

        Message::from_vec(&reply).map_err(|source| ResolveError::MalformedResponse {
            server: server.socket_addr.to_string(),
            source,
        })
    };

    match tokio::time::timeout(opts.timeout, attempt).await {
        Ok(result) => {
            let response = result?;
            if response.truncated() {
                return Err(ResolveError::Truncated(server.socket_addr.to_string()));
            }
            Ok(response)
        }
        Err(_) => Err(ResolveError::Timeout {
            qname: String::new(),
            qtype: String::new(),
        }),
    }
}
