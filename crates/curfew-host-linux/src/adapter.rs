//! Network adapter control via rtnetlink
//!
//! Adapters are enumerated once at startup with an RTM_GETLINK dump and the
//! list is treated as read-only for the process lifetime; interfaces added
//! or removed at runtime are out of scope. Enable/disable set or clear the
//! interface's `IFF_UP` flag and wait for the kernel ACK.

use async_trait::async_trait;
use curfew_host_api::{AdapterHandle, AdapterSet, HostError, HostResult};
use netlink_packet_core::{
    NetlinkMessage, NetlinkPayload, NLM_F_ACK, NLM_F_DUMP, NLM_F_REQUEST,
};
use netlink_packet_route::link::{LinkAttribute, LinkFlags, LinkMessage};
use netlink_packet_route::RouteNetlinkMessage;
use netlink_sys::{protocols::NETLINK_ROUTE, Socket, SocketAddr};
use std::time::Duration;
use tracing::{debug, info};

const RECV_BUF_SIZE: usize = 8192;

/// Default bound on a single netlink link operation. Rtnetlink replies are
/// normally immediate; the bound keeps the tick loop from hanging if the
/// kernel never answers.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// `AdapterSet` implementation over rtnetlink.
pub struct LinuxAdapterSet {
    adapters: Vec<AdapterHandle>,
    op_timeout: Duration,
}

impl LinuxAdapterSet {
    /// Enumerate the host's non-loopback links and capture them as the
    /// adapter set. An empty result is valid; callers decide whether that
    /// is worth warning about.
    pub fn new() -> HostResult<Self> {
        Self::with_timeout(DEFAULT_OP_TIMEOUT)
    }

    pub fn with_timeout(op_timeout: Duration) -> HostResult<Self> {
        let adapters = enumerate_links()?;

        for adapter in &adapters {
            debug!(adapter = %adapter, "Found network adapter");
        }
        info!(count = adapters.len(), "Network adapters enumerated");

        Ok(Self {
            adapters,
            op_timeout,
        })
    }

    async fn set_enabled(&self, adapter: &AdapterHandle, up: bool) -> HostResult<()> {
        let index = adapter.index();

        let op = tokio::task::spawn_blocking(move || set_link_enabled(index, up));

        match tokio::time::timeout(self.op_timeout, op).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(HostError::Internal(format!(
                "link operation task failed: {}",
                join_err
            ))),
            Err(_) => Err(HostError::Timeout(self.op_timeout)),
        }
    }
}

#[async_trait]
impl AdapterSet for LinuxAdapterSet {
    fn list(&self) -> &[AdapterHandle] {
        &self.adapters
    }

    async fn enable(&self, adapter: &AdapterHandle) -> HostResult<()> {
        debug!(adapter = %adapter, "Bringing link up");
        self.set_enabled(adapter, true).await
    }

    async fn disable(&self, adapter: &AdapterHandle) -> HostResult<()> {
        debug!(adapter = %adapter, "Taking link down");
        self.set_enabled(adapter, false).await
    }
}

fn open_route_socket() -> HostResult<Socket> {
    let mut socket = Socket::new(NETLINK_ROUTE)?;
    socket.bind_auto()?;
    socket.connect(&SocketAddr::new(0, 0))?;
    Ok(socket)
}

/// Dump all links and collect the non-loopback ones.
fn enumerate_links() -> HostResult<Vec<AdapterHandle>> {
    let socket = open_route_socket()?;

    let mut request = NetlinkMessage::from(RouteNetlinkMessage::GetLink(LinkMessage::default()));
    request.header.flags = NLM_F_REQUEST | NLM_F_DUMP;
    request.header.sequence_number = 1;
    request.finalize();

    let mut buf = vec![0u8; request.buffer_len()];
    request.serialize(&mut buf);
    socket.send(&buf, 0)?;

    let mut adapters = Vec::new();
    let mut recv_buf = vec![0u8; RECV_BUF_SIZE];

    'recv: loop {
        let len = socket.recv(&mut &mut recv_buf[..], 0)?;
        if len == 0 {
            break;
        }

        let mut offset = 0;
        while offset < len {
            let msg = NetlinkMessage::<RouteNetlinkMessage>::deserialize(&recv_buf[offset..len])
                .map_err(|e| HostError::Netlink(e.to_string()))?;

            match msg.payload {
                NetlinkPayload::InnerMessage(RouteNetlinkMessage::NewLink(link)) => {
                    if !link.header.flags.contains(LinkFlags::Loopback) {
                        adapters.push(handle_from_link(link));
                    }
                }
                NetlinkPayload::Done(_) => break 'recv,
                NetlinkPayload::Error(err) => {
                    if let Some(code) = err.code {
                        return Err(HostError::Netlink(format!(
                            "link dump rejected with code {}",
                            code
                        )));
                    }
                }
                _ => {}
            }

            let msg_len = msg.header.length as usize;
            if msg_len == 0 {
                break 'recv;
            }
            offset += msg_len;
        }
    }

    Ok(adapters)
}

fn handle_from_link(link: LinkMessage) -> AdapterHandle {
    let index = link.header.index;
    let name = link
        .attributes
        .iter()
        .find_map(|attr| match attr {
            LinkAttribute::IfName(name) => Some(name.clone()),
            _ => None,
        })
        .unwrap_or_else(|| format!("if{}", index));

    AdapterHandle::new(index, name)
}

/// Set or clear IFF_UP on one link and wait for the kernel ACK.
fn set_link_enabled(index: u32, up: bool) -> HostResult<()> {
    let socket = open_route_socket()?;

    let mut link = LinkMessage::default();
    link.header.index = index;
    if up {
        link.header.flags = LinkFlags::Up;
    }
    link.header.change_mask = LinkFlags::Up;

    let mut request = NetlinkMessage::from(RouteNetlinkMessage::SetLink(link));
    request.header.flags = NLM_F_REQUEST | NLM_F_ACK;
    request.header.sequence_number = 1;
    request.finalize();

    let mut buf = vec![0u8; request.buffer_len()];
    request.serialize(&mut buf);
    socket.send(&buf, 0)?;

    let mut recv_buf = vec![0u8; RECV_BUF_SIZE];
    let len = socket.recv(&mut &mut recv_buf[..], 0)?;

    let mut offset = 0;
    while offset < len {
        let msg = NetlinkMessage::<RouteNetlinkMessage>::deserialize(&recv_buf[offset..len])
            .map_err(|e| HostError::Netlink(e.to_string()))?;

        if let NetlinkPayload::Error(err) = msg.payload {
            // An error message with no code is the ACK
            return match err.code {
                None => Ok(()),
                Some(code) => Err(HostError::Netlink(format!(
                    "link change for interface {} rejected with code {}",
                    index, code
                ))),
            };
        }

        let msg_len = msg.header.length as usize;
        if msg_len == 0 {
            break;
        }
        offset += msg_len;
    }

    Err(HostError::Netlink(format!(
        "no ACK received for link change on interface {}",
        index
    )))
}
