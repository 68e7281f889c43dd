pub mod probe;
pub mod result;

use std::fmt::Write;

pub mod prelude {
    pub use super::probe::{HttpProber, Prober};
    pub use super::report;
    pub use super::result::ProbeResponse;
    pub use crate::error::ProbeError;
}

/// Render an error together with its chain of sources.
pub fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, "\n\nCaused by: {}", src);
        err = src;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer(#[source] Inner);

    #[derive(Debug, thiserror::Error)]
    #[error("inner")]
    struct Inner;

    #[test]
    fn test_report_walks_source_chain() {
        let err = Outer(Inner);
        assert_eq!(report(&err), "outer\n\nCaused by: inner");
    }

    #[test]
    fn test_report_single_error() {
        assert_eq!(report(&Inner), "inner");
    }
}
