//! Global subscriber installation.
//!
//! Kept in its own test binary: the subscriber is process-wide, so the first
//! call here is guaranteed to be the first in the process.

use std::sync::Arc;

use fspiop_protocol::ilp::{self, IlpCodec, IlpOptions, IlpVersion};
use fspiop_protocol::logging::{init_logging, LogFormat, TracingLogger};

#[test]
fn subscriber_installs_once() {
    assert!(init_logging("debug", LogFormat::Json));
    assert!(!init_logging("debug", LogFormat::Json));
    assert!(!init_logging("info", LogFormat::Pretty));

    // Engines log through the installed subscriber without issue.
    let engine = ilp::create(
        IlpVersion::V4,
        IlpOptions::new("secret", Arc::new(TracingLogger::new("logging-test"))),
    )
    .unwrap();
    assert!(!engine.validate_fulfil("AAAA", "AAAA"));
}
