use scale_core::error::WeightError;
use scale_core::{ReadRequest, SessionCfg, read_weight};
use scale_serial::SerialSettings;
use std::time::Duration;

#[test]
fn invalid_port_is_a_connection_error_before_parsing() {
    let req = ReadRequest::new(SerialSettings::new(
        "/dev/no-such-scale-here",
        9600,
        Duration::from_millis(10),
    ))
    .with_session(SessionCfg {
        max_iterations: Some(1),
        ..SessionCfg::default()
    });
    let err = read_weight(&req, None).expect_err("open must fail");
    match err.downcast_ref::<WeightError>() {
        Some(WeightError::Connection(msg)) => {
            assert!(msg.contains("/dev/no-such-scale-here"), "message: {msg}")
        }
        other => panic!("unexpected: {other:?}"),
    }
}
