//! Network wrappers over the C library.
//!
//! errno discipline applies throughout: the slot is cleared immediately
//! before each native call, and a sentinel result is converted into a
//! typed error built from errno (`strerror_r` text) or, for the
//! resolver, from the `getaddrinfo` return code (`gai_strerror` text).
//!
//! The legacy netdb lookups (`getprotoby*`, `getservby*`) return
//! pointers into process-global static storage; those calls are
//! serialized behind a mutex and the results copied out before the lock
//! is released.

use std::collections::BTreeMap;
use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::mem::size_of;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, TcpStream};
use std::os::fd::FromRawFd;
use std::ptr;
use std::time::Duration;

use parking_lot::Mutex;

use safecall_core::{SafeError, SafeResult};

use crate::errno;

/// Serializes calls that return pointers to static netdb storage.
static NETDB_LOCK: Mutex<()> = Mutex::new(());

/// Address-conversion symbols the `libc` crate does not re-export.
mod c {
    use std::ffi::{c_char, c_int, c_void};

    unsafe extern "C" {
        pub fn inet_pton(af: c_int, src: *const c_char, dst: *mut c_void) -> c_int;
        pub fn inet_ntop(
            af: c_int,
            src: *const c_void,
            dst: *mut c_char,
            size: libc::socklen_t,
        ) -> *const c_char;
    }
}

/// Worst-case presentation length for an IPv6 address, NUL included.
const PRESENTATION_LEN: usize = 46;

fn cstring(operation: &'static str, text: &str) -> SafeResult<CString> {
    CString::new(text).map_err(|_| {
        SafeError::for_operation(operation, Some(libc::EINVAL), errno::message(libc::EINVAL))
    })
}

/// Errno-based error when the slot holds something, otherwise `fallback`.
fn capture_or(operation: &'static str, fallback: String) -> SafeError {
    let code = errno::current();
    if code != 0 {
        SafeError::for_operation(operation, Some(code), errno::message(code))
    } else {
        SafeError::for_operation(operation, None, fallback)
    }
}

/// Typed error for a nonzero `getaddrinfo` return code. `EAI_SYSTEM`
/// defers to errno; everything else uses the resolver's own diagnostic.
fn resolver_error(operation: &'static str, rc: c_int) -> SafeError {
    if rc == libc::EAI_SYSTEM {
        return errno::capture(operation);
    }
    // SAFETY: gai_strerror returns a pointer to a static message.
    let text = unsafe { CStr::from_ptr(libc::gai_strerror(rc)) };
    SafeError::for_operation(operation, Some(rc), text.to_string_lossy().into_owned())
}

// ---------------------------------------------------------------------------
// Host and database lookups
// ---------------------------------------------------------------------------

/// Standard host name of the local machine. Sentinel: `-1`.
pub fn gethostname() -> SafeResult<String> {
    errno::clear();
    let mut buf = [0 as c_char; 256];
    // SAFETY: buffer pointer and length describe valid writable storage.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr(), buf.len()) };
    if rc == -1 {
        return Err(errno::capture("gethostname"));
    }
    // SAFETY: on success the buffer holds a NUL-terminated host name.
    let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
    Ok(name.to_string_lossy().into_owned())
}

/// Protocol number for `name` as per `/etc/protocols`. Sentinel: `NULL`.
pub fn getprotobyname(name: &str) -> SafeResult<i32> {
    let cname = cstring("getprotobyname", name)?;
    let _guard = NETDB_LOCK.lock();
    errno::clear();
    // SAFETY: cname is a valid NUL-terminated string.
    let ent = unsafe { libc::getprotobyname(cname.as_ptr()) };
    if ent.is_null() {
        return Err(capture_or(
            "getprotobyname",
            format!("protocol '{name}' not found"),
        ));
    }
    // SAFETY: a non-null protoent from the library is valid for reads.
    Ok(unsafe { (*ent).p_proto })
}

/// Protocol name for `number` as per `/etc/protocols`. Sentinel: `NULL`.
pub fn getprotobynumber(number: i32) -> SafeResult<String> {
    let _guard = NETDB_LOCK.lock();
    errno::clear();
    // SAFETY: any integer is a legal query.
    let ent = unsafe { libc::getprotobynumber(number) };
    if ent.is_null() {
        return Err(capture_or(
            "getprotobynumber",
            format!("protocol {number} not found"),
        ));
    }
    // SAFETY: p_name in a non-null protoent is a valid NUL-terminated string.
    let pname = unsafe { CStr::from_ptr((*ent).p_name) };
    Ok(pname.to_string_lossy().into_owned())
}

/// Port number for `service` over `proto` as per `/etc/services`.
/// Sentinel: `NULL`.
pub fn getservbyname(service: &str, proto: &str) -> SafeResult<u16> {
    let cservice = cstring("getservbyname", service)?;
    let cproto = cstring("getservbyname", proto)?;
    let _guard = NETDB_LOCK.lock();
    errno::clear();
    // SAFETY: both arguments are valid NUL-terminated strings.
    let ent = unsafe { libc::getservbyname(cservice.as_ptr(), cproto.as_ptr()) };
    if ent.is_null() {
        return Err(capture_or(
            "getservbyname",
            format!("service '{service}/{proto}' not found"),
        ));
    }
    // s_port is stored in network byte order.
    // SAFETY: a non-null servent from the library is valid for reads.
    Ok(u16::from_be(unsafe { (*ent).s_port } as u16))
}

/// Internet service name on `port` over `proto` as per `/etc/services`.
/// Sentinel: `NULL`.
pub fn getservbyport(port: u16, proto: &str) -> SafeResult<String> {
    let cproto = cstring("getservbyport", proto)?;
    let _guard = NETDB_LOCK.lock();
    errno::clear();
    // to_be() stays unsigned: a byte-swapped value in the u16 high range
    // must not sign-extend into a negative query.
    // SAFETY: cproto is a valid NUL-terminated string.
    let ent = unsafe { libc::getservbyport(c_int::from(port.to_be()), cproto.as_ptr()) };
    if ent.is_null() {
        return Err(capture_or(
            "getservbyport",
            format!("service on port {port}/{proto} not found"),
        ));
    }
    // SAFETY: s_name in a non-null servent is a valid NUL-terminated string.
    let sname = unsafe { CStr::from_ptr((*ent).s_name) };
    Ok(sname.to_string_lossy().into_owned())
}

// ---------------------------------------------------------------------------
// Address conversion
// ---------------------------------------------------------------------------

/// Presentation form of a binary address; the family is inferred from
/// the 4- or 16-byte length. Sentinel: `NULL`.
pub fn inet_ntop(addr: &[u8]) -> SafeResult<String> {
    ntop("inet_ntop", addr)
}

/// Binary form of a human-readable IPv4 or IPv6 address. Sentinels: `0`
/// (syntactically invalid text) and `-1` (family error).
pub fn inet_pton(text: &str) -> SafeResult<Vec<u8>> {
    let ctext = cstring("inet_pton", text)?;

    let mut v4 = [0u8; 4];
    errno::clear();
    // SAFETY: destination is 4 writable bytes, as AF_INET requires.
    let rc = unsafe {
        c::inet_pton(
            libc::AF_INET,
            ctext.as_ptr(),
            v4.as_mut_ptr().cast::<c_void>(),
        )
    };
    if rc == -1 {
        return Err(errno::capture("inet_pton"));
    }
    if rc == 1 {
        return Ok(v4.to_vec());
    }

    let mut v6 = [0u8; 16];
    errno::clear();
    // SAFETY: destination is 16 writable bytes, as AF_INET6 requires.
    let rc = unsafe {
        c::inet_pton(
            libc::AF_INET6,
            ctext.as_ptr(),
            v6.as_mut_ptr().cast::<c_void>(),
        )
    };
    if rc == -1 {
        return Err(errno::capture("inet_pton"));
    }
    if rc == 1 {
        return Ok(v6.to_vec());
    }
    Err(SafeError::for_operation(
        "inet_pton",
        None,
        format!("'{text}' is not a valid IPv4 or IPv6 address"),
    ))
}

/// Dotted-quad form of a packed big-endian IPv4 address.
///
/// Documented as never failing; the nominal `NULL` sentinel from the
/// converter is still checked defensively and raises the generic
/// diagnostic should it ever fire.
pub fn long2ip(packed: u32) -> SafeResult<String> {
    ntop("long2ip", &packed.to_be_bytes())
}

fn ntop(operation: &'static str, addr: &[u8]) -> SafeResult<String> {
    let family = match addr.len() {
        4 => libc::AF_INET,
        16 => libc::AF_INET6,
        _ => {
            return Err(SafeError::for_operation(
                operation,
                Some(libc::EAFNOSUPPORT),
                errno::message(libc::EAFNOSUPPORT),
            ));
        }
    };
    errno::clear();
    let mut buf = [0 as c_char; PRESENTATION_LEN];
    // SAFETY: source length matches the family; destination capacity is
    // stated truthfully.
    let rc = unsafe {
        c::inet_ntop(
            family,
            addr.as_ptr().cast::<c_void>(),
            buf.as_mut_ptr(),
            buf.len() as libc::socklen_t,
        )
    };
    if rc.is_null() {
        return Err(errno::capture(operation));
    }
    // SAFETY: on success the buffer holds a NUL-terminated address.
    let text = unsafe { CStr::from_ptr(buf.as_ptr()) };
    Ok(text.to_string_lossy().into_owned())
}

// ---------------------------------------------------------------------------
// DNS records
// ---------------------------------------------------------------------------

/// Address family filter for [`dns_records`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Any,
    V4,
    V6,
}

/// Resolved record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
}

/// One resolved address record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// The queried name.
    pub host: String,
    pub kind: RecordKind,
    pub address: IpAddr,
    /// Canonical name reported by the resolver, when available.
    pub canonical: Option<String>,
}

/// Address records for `hostname` from the system resolver.
///
/// Failure is classified purely from the resolver's return code (the
/// per-operation rule for this family); `EAI_SYSTEM` defers to errno.
pub fn dns_records(hostname: &str, family: AddressFamily) -> SafeResult<Vec<DnsRecord>> {
    let chost = cstring("dns_records", hostname)?;
    // SAFETY: addrinfo is plain data; zeroed is the documented "no hints"
    // starting point.
    let mut hints: libc::addrinfo = unsafe { std::mem::zeroed() };
    hints.ai_family = match family {
        AddressFamily::Any => libc::AF_UNSPEC,
        AddressFamily::V4 => libc::AF_INET,
        AddressFamily::V6 => libc::AF_INET6,
    };
    // One socket type so each address appears once.
    hints.ai_socktype = libc::SOCK_STREAM;
    hints.ai_flags = libc::AI_CANONNAME;

    let mut res: *mut libc::addrinfo = ptr::null_mut();
    errno::clear();
    // SAFETY: all pointers are valid; res is an out-parameter.
    let rc = unsafe { libc::getaddrinfo(chost.as_ptr(), ptr::null(), &hints, &mut res) };
    if rc != 0 {
        return Err(resolver_error("dns_records", rc));
    }

    let mut records = Vec::new();
    let mut canonical: Option<String> = None;
    let mut node = res;
    while !node.is_null() {
        // SAFETY: list nodes from getaddrinfo are valid until freeaddrinfo.
        let ai = unsafe { &*node };
        if canonical.is_none() && !ai.ai_canonname.is_null() {
            // SAFETY: ai_canonname, when set, is a valid NUL-terminated string.
            let cname = unsafe { CStr::from_ptr(ai.ai_canonname) };
            canonical = Some(cname.to_string_lossy().into_owned());
        }
        if let Some((_, address)) = sockaddr_ip(ai.ai_addr) {
            records.push(DnsRecord {
                host: hostname.to_string(),
                kind: match address {
                    IpAddr::V4(_) => RecordKind::A,
                    IpAddr::V6(_) => RecordKind::Aaaa,
                },
                address,
                canonical: canonical.clone(),
            });
        }
        node = ai.ai_next;
    }
    // SAFETY: res was produced by getaddrinfo above.
    unsafe { libc::freeaddrinfo(res) };
    Ok(records)
}

/// Reads the IP address out of a resolver/interface sockaddr. Returns
/// `None` for null pointers and non-IP families.
fn sockaddr_ip(sa: *const libc::sockaddr) -> Option<(i32, IpAddr)> {
    if sa.is_null() {
        return None;
    }
    // SAFETY: the caller hands us a sockaddr valid for reads.
    let family = i32::from(unsafe { (*sa).sa_family });
    match family {
        libc::AF_INET => {
            // SAFETY: AF_INET sockaddrs are sockaddr_in.
            let sin = unsafe { &*sa.cast::<libc::sockaddr_in>() };
            let ip = Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr));
            Some((family, IpAddr::V4(ip)))
        }
        libc::AF_INET6 => {
            // SAFETY: AF_INET6 sockaddrs are sockaddr_in6.
            let sin6 = unsafe { &*sa.cast::<libc::sockaddr_in6>() };
            Some((family, IpAddr::V6(Ipv6Addr::from(sin6.sin6_addr.s6_addr))))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Stream connection
// ---------------------------------------------------------------------------

/// Opens a TCP connection to `host:port`.
///
/// With `timeout: None` the plain blocking connect path is taken, so the
/// runtime's own default applies — never a placeholder value. With
/// `Some(d)` the socket connects non-blocking and is polled for up to
/// `d`.
///
/// On failure the by-reference `error_code` and `error_message` slots
/// receive the system error number and message (code `0` means the
/// failure happened before any connect attempt, e.g. in resolution), and
/// the typed error is returned. The connected stream is handed to the
/// caller, which owns its release.
pub fn connect_stream(
    host: &str,
    port: u16,
    error_code: &mut Option<i32>,
    error_message: &mut Option<String>,
    timeout: Option<Duration>,
) -> SafeResult<TcpStream> {
    *error_code = None;
    *error_message = None;

    let chost = cstring("connect_stream", host)?;
    let cport = cstring("connect_stream", &port.to_string())?;
    // SAFETY: addrinfo is plain data.
    let mut hints: libc::addrinfo = unsafe { std::mem::zeroed() };
    hints.ai_family = libc::AF_UNSPEC;
    hints.ai_socktype = libc::SOCK_STREAM;
    hints.ai_flags = libc::AI_NUMERICSERV;

    let mut res: *mut libc::addrinfo = ptr::null_mut();
    errno::clear();
    // SAFETY: all pointers are valid; res is an out-parameter.
    let rc = unsafe { libc::getaddrinfo(chost.as_ptr(), cport.as_ptr(), &hints, &mut res) };
    if rc != 0 {
        let err = resolver_error("connect_stream", rc);
        // Code 0 signals a failure before any connect() took place.
        *error_code = Some(0);
        *error_message = Some(err.message().to_string());
        return Err(err);
    }

    let mut last_code = 0;
    let mut node = res;
    while !node.is_null() {
        // SAFETY: list nodes from getaddrinfo are valid until freeaddrinfo.
        let ai = unsafe { &*node };
        errno::clear();
        // SAFETY: family/socktype/protocol come straight from the resolver.
        let fd = unsafe { libc::socket(ai.ai_family, ai.ai_socktype, ai.ai_protocol) };
        if fd == -1 {
            last_code = errno::current();
            node = ai.ai_next;
            continue;
        }
        let attempt = match timeout {
            None => blocking_connect(fd, ai.ai_addr, ai.ai_addrlen),
            Some(d) => timed_connect(fd, ai.ai_addr, ai.ai_addrlen, d),
        };
        match attempt {
            Ok(()) => {
                // SAFETY: res was produced by getaddrinfo above.
                unsafe { libc::freeaddrinfo(res) };
                // SAFETY: fd is an open, connected stream socket owned
                // solely by this call; ownership passes to the stream.
                return Ok(unsafe { TcpStream::from_raw_fd(fd) });
            }
            Err(code) => {
                // SAFETY: fd was opened above and is not otherwise owned.
                unsafe { libc::close(fd) };
                last_code = code;
            }
        }
        node = ai.ai_next;
    }
    // SAFETY: res was produced by getaddrinfo above.
    unsafe { libc::freeaddrinfo(res) };

    let message = if last_code != 0 {
        errno::message(last_code)
    } else {
        String::new()
    };
    let err = SafeError::for_operation(
        "connect_stream",
        if last_code != 0 { Some(last_code) } else { None },
        message,
    );
    *error_code = Some(last_code);
    *error_message = Some(err.message().to_string());
    Err(err)
}

fn blocking_connect(fd: c_int, addr: *const libc::sockaddr, len: libc::socklen_t) -> Result<(), i32> {
    errno::clear();
    // SAFETY: fd is an open socket; addr/len come from the resolver.
    let rc = unsafe { libc::connect(fd, addr, len) };
    if rc == -1 { Err(errno::current()) } else { Ok(()) }
}

fn timed_connect(
    fd: c_int,
    addr: *const libc::sockaddr,
    len: libc::socklen_t,
    timeout: Duration,
) -> Result<(), i32> {
    // SAFETY: fd is an open socket owned by the caller.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags == -1 {
        return Err(errno::current());
    }
    // SAFETY: see above.
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } == -1 {
        return Err(errno::current());
    }

    errno::clear();
    // SAFETY: fd is an open socket; addr/len come from the resolver.
    let rc = unsafe { libc::connect(fd, addr, len) };
    if rc == -1 {
        if errno::current() != libc::EINPROGRESS {
            return Err(errno::current());
        }
        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLOUT,
            revents: 0,
        };
        let ms = timeout.as_millis().min(c_int::MAX as u128) as c_int;
        // SAFETY: pfd is a single valid pollfd.
        let prc = unsafe { libc::poll(&mut pfd, 1, ms) };
        if prc == -1 {
            return Err(errno::current());
        }
        if prc == 0 {
            return Err(libc::ETIMEDOUT);
        }
        let mut soerr: c_int = 0;
        let mut slen = size_of::<c_int>() as libc::socklen_t;
        // SAFETY: soerr/slen describe valid storage for an int option.
        let grc = unsafe {
            libc::getsockopt(
                fd,
                libc::SOL_SOCKET,
                libc::SO_ERROR,
                (&mut soerr as *mut c_int).cast::<c_void>(),
                &mut slen,
            )
        };
        if grc == -1 {
            return Err(errno::current());
        }
        if soerr != 0 {
            return Err(soerr);
        }
    }

    // Restore blocking mode so the returned stream behaves like the
    // plain path.
    // SAFETY: fd is still owned by the caller.
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags) } == -1 {
        return Err(errno::current());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Interface enumeration
// ---------------------------------------------------------------------------

/// One unicast address attached to an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddress {
    /// Address family (`AF_INET` / `AF_INET6`).
    pub family: i32,
    pub address: String,
    pub netmask: Option<String>,
}

/// Attributes of one local network interface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Interface {
    pub up: bool,
    pub flags: u32,
    pub unicast: Vec<InterfaceAddress>,
}

/// Enumerates the local machine's network interfaces. Sentinel: `-1`
/// from `getifaddrs`.
pub fn interfaces() -> SafeResult<BTreeMap<String, Interface>> {
    errno::clear();
    let mut ifap: *mut libc::ifaddrs = ptr::null_mut();
    // SAFETY: ifap is a valid out-parameter.
    let rc = unsafe { libc::getifaddrs(&mut ifap) };
    if rc == -1 {
        return Err(errno::capture("interfaces"));
    }

    let mut map: BTreeMap<String, Interface> = BTreeMap::new();
    let mut node = ifap;
    while !node.is_null() {
        // SAFETY: list nodes from getifaddrs are valid until freeifaddrs.
        let ifa = unsafe { &*node };
        // SAFETY: ifa_name is a valid NUL-terminated string.
        let name = unsafe { CStr::from_ptr(ifa.ifa_name) }
            .to_string_lossy()
            .into_owned();
        let flags = ifa.ifa_flags;
        let entry = map.entry(name).or_insert_with(|| Interface {
            up: (flags & libc::IFF_UP as u32) != 0,
            flags,
            unicast: Vec::new(),
        });
        if let Some((family, address)) = sockaddr_ip(ifa.ifa_addr) {
            entry.unicast.push(InterfaceAddress {
                family,
                address: address.to_string(),
                netmask: sockaddr_ip(ifa.ifa_netmask).map(|(_, ip)| ip.to_string()),
            });
        }
        node = ifa.ifa_next;
    }
    // SAFETY: ifap was produced by getifaddrs above.
    unsafe { libc::freeifaddrs(ifap) };
    Ok(map)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    // -- gethostname --

    #[test]
    fn test_gethostname_returns_real_name() {
        let name = gethostname().unwrap();
        assert!(!name.is_empty());
    }

    // -- protocol / service databases --

    #[test]
    fn test_getprotobyname_known_protocol() {
        // /etc/protocols may be absent in minimal environments; the
        // contract still holds either way: a real number or a typed
        // error with a diagnostic, never a sentinel.
        match getprotobyname("tcp") {
            Ok(n) => assert_eq!(n, libc::IPPROTO_TCP),
            Err(e) => {
                assert!(matches!(e, SafeError::Network { .. }));
                assert!(!e.message().is_empty());
            }
        }
    }

    #[test]
    fn test_getprotobyname_unknown_is_typed_error() {
        let e = getprotobyname("no-such-protocol-xyz").unwrap_err();
        assert_eq!(e.operation(), "getprotobyname");
        assert!(!e.message().is_empty());
    }

    #[test]
    fn test_getprotobynumber_round_trip_when_db_present() {
        if let Ok(n) = getprotobyname("udp") {
            assert_eq!(getprotobynumber(n).unwrap(), "udp");
        }
    }

    #[test]
    fn test_getservbyname_unknown_is_typed_error() {
        let e = getservbyname("no-such-service-xyz", "tcp").unwrap_err();
        assert_eq!(e.operation(), "getservbyname");
        assert!(!e.message().is_empty());
    }

    #[test]
    fn test_getservbyname_known_service_when_db_present() {
        if let Ok(port) = getservbyname("ssh", "tcp") {
            assert_eq!(port, 22);
            assert_eq!(getservbyport(22, "tcp").unwrap(), "ssh");
        }
    }

    #[test]
    fn test_getservbyport_high_port_when_db_present() {
        // 443 byte-swaps to 0xBB01, which lands in the u16 high range;
        // the query must stay unsigned.
        if let Ok(port) = getservbyname("https", "tcp") {
            assert_eq!(port, 443);
            assert_eq!(getservbyport(443, "tcp").unwrap(), "https");
        }
    }

    // -- address conversion --

    #[test]
    fn test_inet_pton_v4() {
        assert_eq!(inet_pton("127.0.0.1").unwrap(), vec![127, 0, 0, 1]);
    }

    #[test]
    fn test_inet_pton_v6() {
        let bytes = inet_pton("::1").unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes[15], 1);
    }

    #[test]
    fn test_inet_pton_invalid_is_typed_error() {
        for bad in ["not an ip", "300.1.2.3", "1.2.3", ""] {
            let e = inet_pton(bad).unwrap_err();
            assert_eq!(e.operation(), "inet_pton", "{bad}");
            assert!(!e.message().is_empty(), "{bad}");
        }
    }

    #[test]
    fn test_inet_ntop_v4_and_v6() {
        assert_eq!(inet_ntop(&[192, 168, 0, 1]).unwrap(), "192.168.0.1");
        let mut v6 = [0u8; 16];
        v6[15] = 1;
        assert_eq!(inet_ntop(&v6).unwrap(), "::1");
    }

    #[test]
    fn test_inet_ntop_bad_length_is_typed_error() {
        let e = inet_ntop(&[1, 2, 3, 4, 5]).unwrap_err();
        assert_eq!(e.code(), Some(libc::EAFNOSUPPORT));
    }

    #[test]
    fn test_long2ip() {
        assert_eq!(long2ip(0x7F00_0001).unwrap(), "127.0.0.1");
        assert_eq!(long2ip(0).unwrap(), "0.0.0.0");
        assert_eq!(long2ip(u32::MAX).unwrap(), "255.255.255.255");
    }

    // -- DNS --

    #[test]
    fn test_dns_records_localhost() {
        match dns_records("localhost", AddressFamily::V4) {
            Ok(records) => {
                assert!(!records.is_empty());
                for r in &records {
                    assert_eq!(r.host, "localhost");
                    assert_eq!(r.kind, RecordKind::A);
                    assert!(r.address.is_loopback(), "{:?}", r.address);
                }
            }
            // Sandboxed environments without a resolver still satisfy
            // the contract: typed error, non-empty diagnostic.
            Err(e) => assert!(!e.message().is_empty()),
        }
    }

    #[test]
    fn test_dns_records_invalid_name_is_typed_error() {
        let e = dns_records("host.invalid.", AddressFamily::Any).unwrap_err();
        assert_eq!(e.operation(), "dns_records");
        assert!(matches!(e, SafeError::Network { .. }));
        assert!(!e.message().is_empty());
    }

    // -- connect_stream --

    #[test]
    fn test_connect_without_timeout_uses_blocking_path() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let mut code = None;
        let mut msg = None;
        let stream = connect_stream("127.0.0.1", port, &mut code, &mut msg, None).unwrap();
        assert!(stream.peer_addr().is_ok());
        assert!(code.is_none());
        assert!(msg.is_none());
    }

    #[test]
    fn test_connect_with_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let mut code = None;
        let mut msg = None;
        let stream = connect_stream(
            "127.0.0.1",
            port,
            &mut code,
            &mut msg,
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        assert!(stream.peer_addr().is_ok());
    }

    #[test]
    fn test_connect_refused_populates_out_params() {
        // Bind then drop to find a port with no listener.
        let port = {
            let l = TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let mut code = None;
        let mut msg = None;
        let err = connect_stream("127.0.0.1", port, &mut code, &mut msg, None).unwrap_err();
        assert_eq!(err.operation(), "connect_stream");
        assert_eq!(code, Some(libc::ECONNREFUSED));
        assert!(msg.as_deref().is_some_and(|m| !m.is_empty()));
    }

    // -- interfaces --

    #[test]
    fn test_interfaces_enumerates_addresses() {
        let map = interfaces().unwrap();
        assert!(!map.is_empty());
        for (name, iface) in &map {
            assert!(!name.is_empty());
            for ua in &iface.unicast {
                assert!(!ua.address.is_empty());
                assert!(ua.family == libc::AF_INET || ua.family == libc::AF_INET6);
            }
        }
    }
}
