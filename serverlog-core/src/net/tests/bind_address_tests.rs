use crate::net::{BindAddress, BindAddressError, DEFAULT_BIND_ADDRESS};
use pretty_assertions::assert_eq;

fn tcp(host: &str, port: u16) -> BindAddress {
    BindAddress::Tcp {
        host: host.to_string(),
        port,
    }
}

#[test]
fn default_address_listens_everywhere() {
    let addr: BindAddress = DEFAULT_BIND_ADDRESS.parse().unwrap();

    assert_eq!(addr, tcp("0.0.0.0", 9911));
    assert_eq!(addr.to_string(), "tcp://0.0.0.0:9911");
}

#[test]
fn scheme_defaults_to_tcp() {
    assert_eq!("127.0.0.1:4000".parse::<BindAddress>(), Ok(tcp("127.0.0.1", 4000)));
    assert_eq!("tcp://localhost:4000".parse::<BindAddress>(), Ok(tcp("localhost", 4000)));
    assert_eq!(":4000".parse::<BindAddress>(), Ok(tcp("0.0.0.0", 4000)));
}

#[test]
fn ipv6_hosts_lose_their_brackets() {
    let addr: BindAddress = "[::1]:9911".parse().unwrap();

    assert_eq!(addr, tcp("::1", 9911));
    assert_eq!(addr.to_string(), "tcp://[::1]:9911");
}

#[cfg(unix)]
#[test]
fn unix_socket_paths() {
    let addr: BindAddress = "unix:///tmp/serverlog.sock".parse().unwrap();

    assert_eq!(addr, BindAddress::Unix("/tmp/serverlog.sock".into()));
    assert_eq!(addr.to_string(), "unix:///tmp/serverlog.sock");
}

#[test]
fn rejects_bad_addresses() {
    assert_eq!(
        "udp://0:9911".parse::<BindAddress>(),
        Err(BindAddressError::UnsupportedScheme("udp".into()))
    );
    assert_eq!(
        "localhost".parse::<BindAddress>(),
        Err(BindAddressError::MissingPort("localhost".into()))
    );
    assert_eq!(
        "localhost:".parse::<BindAddress>(),
        Err(BindAddressError::MissingPort("localhost:".into()))
    );
    assert_eq!(
        "localhost:99999".parse::<BindAddress>(),
        Err(BindAddressError::InvalidPort("localhost:99999".into()))
    );
}
