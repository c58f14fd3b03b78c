use async_trait::async_trait;
use tracing::debug;

use crate::{error::Result, types::Waveform};

/// Platform vibration primitive
///
/// The single shared exclusive resource behind the bridge. Implementations
/// are fire-and-forget: a call returns once the request is submitted, not
/// when playback finishes, and the platform itself serializes conflicting
/// requests; a new waveform implicitly supersedes whatever was playing.
#[async_trait]
pub trait Vibrator: Send + Sync {
    /// Submit a waveform for playback
    ///
    /// # Errors
    ///
    /// Implementations surface platform submission failures as-is; no retry
    /// is attempted anywhere in the crate.
    async fn play_waveform(&self, waveform: &Waveform) -> Result<()>;

    /// Halt any in-progress vibration, including repeating patterns
    ///
    /// Must be a no-op success when nothing is playing.
    ///
    /// # Errors
    ///
    /// Implementations surface platform failures as-is.
    async fn cancel(&self) -> Result<()>;
}

/// Source of static device identifiers
///
/// Every getter is read fresh on each device-info request except the UUID,
/// which the bridge resolves once per process and memoizes.
pub trait DeviceIdentity: Send + Sync {
    /// Platform-provided device identifier, if the platform has one
    fn uuid(&self) -> Option<String>;

    /// Operating system version string
    fn os_version(&self) -> String;

    /// Device model name
    fn model(&self) -> String;

    /// Device manufacturer name
    fn manufacturer(&self) -> String;

    /// Hardware serial number
    fn serial_number(&self) -> String;

    /// Build fingerprint, used for emulator detection
    fn fingerprint(&self) -> String;

    /// Build product name, used for emulator detection
    fn product(&self) -> String;
}

/// A [`Vibrator`] that accepts every request and does nothing
///
/// Useful for hosts without haptic hardware: invocations still succeed, so
/// the embedding application never has to special-case the capability away.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopVibrator;

#[async_trait]
impl Vibrator for NoopVibrator {
    async fn play_waveform(&self, waveform: &Waveform) -> Result<()> {
        debug!(
            "noop vibrator discarding waveform of {} step(s)",
            waveform.len()
        );
        Ok(())
    }

    async fn cancel(&self) -> Result<()> {
        debug!("noop vibrator cancel");
        Ok(())
    }
}

/// A [`DeviceIdentity`] answering from fixed values supplied at construction
///
/// Suits hosts where the identity is known up front (or is a placeholder),
/// and doubles as the identity source in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticIdentity {
    /// Device identifier, or `None` to let the bridge generate one
    pub uuid: Option<String>,
    /// Operating system version string
    pub os_version: String,
    /// Device model name
    pub model: String,
    /// Device manufacturer name
    pub manufacturer: String,
    /// Hardware serial number
    pub serial_number: String,
    /// Build fingerprint
    pub fingerprint: String,
    /// Build product name
    pub product: String,
}

impl Default for StaticIdentity {
    fn default() -> Self {
        Self {
            uuid: None,
            os_version: "unknown".to_string(),
            model: "unknown".to_string(),
            manufacturer: "unknown".to_string(),
            serial_number: "unknown".to_string(),
            fingerprint: String::new(),
            product: String::new(),
        }
    }
}

impl DeviceIdentity for StaticIdentity {
    fn uuid(&self) -> Option<String> {
        self.uuid.clone()
    }

    fn os_version(&self) -> String {
        self.os_version.clone()
    }

    fn model(&self) -> String {
        self.model.clone()
    }

    fn manufacturer(&self) -> String {
        self.manufacturer.clone()
    }

    fn serial_number(&self) -> String {
        self.serial_number.clone()
    }

    fn fingerprint(&self) -> String {
        self.fingerprint.clone()
    }

    fn product(&self) -> String {
        self.product.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VibrationStep;

    #[tokio::test]
    async fn test_noop_vibrator_accepts_everything() {
        let vibrator = NoopVibrator;
        let steps = [VibrationStep::new(0.1, 1.0).unwrap()];
        let waveform = Waveform::from_steps(&steps, true);

        assert!(vibrator.play_waveform(&waveform).await.is_ok());
        assert!(vibrator.cancel().await.is_ok());
        // Cancel with nothing playing is still a success.
        assert!(vibrator.cancel().await.is_ok());
    }

    #[test]
    fn test_static_identity_returns_fields() {
        let identity = StaticIdentity {
            uuid: Some("fixed-uuid".to_string()),
            os_version: "14".to_string(),
            model: "Pixel 8".to_string(),
            manufacturer: "Google".to_string(),
            serial_number: "SER123".to_string(),
            fingerprint: "google/husky/husky:14".to_string(),
            product: "husky".to_string(),
        };

        assert_eq!(identity.uuid(), Some("fixed-uuid".to_string()));
        assert_eq!(identity.os_version(), "14");
        assert_eq!(identity.model(), "Pixel 8");
        assert_eq!(identity.manufacturer(), "Google");
        assert_eq!(identity.serial_number(), "SER123");
        assert_eq!(identity.product(), "husky");
    }

    #[test]
    fn test_static_identity_default_has_no_uuid() {
        let identity = StaticIdentity::default();
        assert!(identity.uuid().is_none());
        assert_eq!(identity.os_version(), "unknown");
    }
}
