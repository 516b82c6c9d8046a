//! MQTT adapter error types.

use pixelhub_domain::error::PixelHubError;

/// Errors specific to the MQTT bridge.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client rejected a request.
    #[error("MQTT client error")]
    Client(#[from] rumqttc::ClientError),

    /// An incoming publish carried nothing usable as a sensor reading.
    #[error("no usable sensor reading on `{topic}`")]
    Payload {
        /// Topic of the offending publish.
        topic: String,
    },
}

impl From<MqttError> for PixelHubError {
    fn from(err: MqttError) -> Self {
        Self::Transport(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_payload_error_with_topic() {
        let err = MqttError::Payload {
            topic: "tele/device1/SENSOR".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no usable sensor reading on `tele/device1/SENSOR`"
        );
    }

    #[test]
    fn should_convert_payload_error_to_transport_error() {
        let err: PixelHubError = MqttError::Payload {
            topic: "tele/x".to_string(),
        }
        .into();
        assert!(matches!(err, PixelHubError::Transport(_)));
    }
}
