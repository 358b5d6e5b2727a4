// Listener module
// Creates the TCP listener the relay accepts on

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Listen backlog, matching Node's default
const BACKLOG: i32 = 511;

/// Create a `TcpListener` with `SO_REUSEADDR`.
///
/// Lets a restarted relay bind immediately while the previous process's
/// sockets sit in `TIME_WAIT`. A second live relay on the same port still
/// fails with `AddrInUse`.
pub fn create_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    // socket2::Socket -> std::net::TcpListener -> tokio::net::TcpListener
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
