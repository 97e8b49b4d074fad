//! Byte-duplex channels carrying command frames.
//!
//! The physical link to the device is not this crate's concern; a session
//! runs over anything that moves bytes both ways. The only semantics a
//! channel must provide is that one write is one logical frame: the
//! serial bridge, socket, or in-memory pipe defines message boundaries,
//! the protocol itself carries no framing metadata.

use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// A byte-duplex stream usable as a device channel
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}

/// Connect to a device bridged over TCP (ser2net-style serial bridges),
/// with Nagle disabled so small command frames go out immediately.
pub async fn connect_tcp(addr: SocketAddr) -> std::io::Result<TcpStream> {
    let stream = TcpStream::connect(addr).await?;
    stream.set_nodelay(true)?;
    Ok(stream)
}
