//! Maps `Box<dyn Error>` from the `Chunk::Error` boundary to `WeightError`.
//!
//! `scale_traits` carries link failures as boxed errors; this module turns
//! them into the typed connection error, downcasting
//! `scale_serial::TransportError` when the `serial` feature is on.

use crate::error::WeightError;

/// Map a link failure to a typed `WeightError::Connection`.
pub fn map_transport_error(e: &(dyn std::error::Error + 'static)) -> WeightError {
    #[cfg(feature = "serial")]
    {
        if let Some(te) = e.downcast_ref::<scale_serial::TransportError>() {
            return match te {
                scale_serial::TransportError::Disconnected => {
                    WeightError::Connection("device disconnected".to_string())
                }
                other => WeightError::Connection(other.to_string()),
            };
        }
    }

    WeightError::Connection(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_become_connection_errors() {
        let io = std::io::Error::other("port vanished");
        match map_transport_error(&io) {
            WeightError::Connection(msg) => assert!(msg.contains("port vanished")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[cfg(feature = "serial")]
    #[test]
    fn disconnect_is_named() {
        let err = scale_serial::TransportError::Disconnected;
        assert_eq!(
            map_transport_error(&err),
            WeightError::Connection("device disconnected".to_string())
        );
    }
}
