pub mod probe;
pub mod result;
pub mod transport;

#[cfg(test)]
pub mod testing;

pub mod prelude {
    pub use super::probe::Prober;
    pub use super::result::{Headers, ProbeError, ProbeOutcome, ProbeResponse, ResponseBody};
    pub use super::transport::{
        HttpMethod, ReqwestTransport, Transport, TransportError, TransportRequest,
        TransportResponse,
    };
}

use std::fmt::Write;

/// Flattens an error and its sources into a single line.
fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_report_joins_sources() {
        let err = Outer(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"));
        assert_eq!(report(&err), "outer: refused");
    }
}
