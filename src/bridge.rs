use crate::{
    error::{BridgeError, Result},
    platform::{DeviceIdentity, Vibrator},
    protocol::{parse_vibrate_args, Action, Reply, ReplyChannel},
    types::{DeviceInfo, Platform, VibrationPattern, VibrationStep, Waveform},
};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Fingerprint substring that marks an emulator build
const VIRTUAL_FINGERPRINT_MARKER: &str = "generic";

/// Product-name substring that marks an emulator build
const VIRTUAL_PRODUCT_MARKER: &str = "sdk";

/// Main interface bridging a host runtime to native haptic capabilities
///
/// `HapticBridge` receives named actions with loosely-typed argument lists,
/// dispatches them to the platform vibration primitive or the device identity
/// source, and delivers the outcome through an asynchronous reply channel.
/// It also exposes the same operations as a typed Rust API for direct
/// callers.
///
/// The bridge holds no state machine: `cancel` is unconditional, `vibrate`
/// unconditionally supersedes whatever is playing, and the platform's own
/// on/off state is neither tracked nor queried. The only cached value is the
/// device UUID, resolved once per process lifetime.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use buzzbridge::{
///     platform::{NoopVibrator, StaticIdentity},
///     HapticBridge,
/// };
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let bridge = HapticBridge::new(
///         Some(Arc::new(NoopVibrator)),
///         Arc::new(StaticIdentity::default()),
///     );
///
///     // A short click at full intensity.
///     bridge.vibrate_once(0.1, 1.0).await?;
///
///     // Stop anything still playing.
///     bridge.cancel().await?;
///
///     let info = bridge.device_info()?;
///     println!("running on {} ({})", info.platform, info.model);
///     Ok(())
/// }
/// ```
pub struct HapticBridge {
    vibrator: Option<Arc<dyn Vibrator>>,
    identity: Arc<dyn DeviceIdentity>,
    platform: Platform,
    uuid: OnceCell<String>,
}

impl HapticBridge {
    /// Create a bridge over the given platform handles
    ///
    /// `vibrator` is `None` when the device has no vibration service; every
    /// subsequent vibrate/cancel call then fails immediately with
    /// [`BridgeError::PlatformUnavailable`]. The platform family is selected
    /// here, once, from the manufacturer string.
    #[must_use]
    pub fn new(vibrator: Option<Arc<dyn Vibrator>>, identity: Arc<dyn DeviceIdentity>) -> Self {
        let platform = Platform::from_manufacturer(&identity.manufacturer());
        info!(
            "haptic bridge initialized (platform: {}, vibrator: {})",
            platform,
            if vibrator.is_some() {
                "available"
            } else {
                "unavailable"
            }
        );

        Self {
            vibrator,
            identity,
            platform,
            uuid: OnceCell::new(),
        }
    }

    /// Whether a vibration service handle was obtained at construction
    #[must_use]
    pub const fn has_vibrator(&self) -> bool {
        self.vibrator.is_some()
    }

    /// The platform family selected at construction
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Play a vibration step sequence
    ///
    /// Each step is converted independently to a millisecond duration and a
    /// 0–255 amplitude, preserving order and length, and the resulting
    /// waveform is submitted to the platform. With `repeat` set, playback
    /// restarts from the first step after the last and runs until
    /// [`cancel`](Self::cancel); otherwise it plays once and stops. Any
    /// previous vibration is implicitly superseded.
    ///
    /// Step values are forwarded as given: intensities outside `[0, 1]`
    /// scale past the platform amplitude range and are left for the platform
    /// to judge. Use [`VibrationStep::new`] when validation is wanted.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::PlatformUnavailable`] if no vibration service
    /// handle was obtained at construction.
    pub async fn vibrate(&self, steps: &[VibrationStep], repeat: bool) -> Result<()> {
        let vibrator = self
            .vibrator
            .as_ref()
            .ok_or(BridgeError::PlatformUnavailable)?;

        let waveform = Waveform::from_steps(steps, repeat);
        debug!(
            "submitting waveform: {} step(s), repeat index {}",
            waveform.len(),
            waveform.repeat_index
        );

        vibrator.play_waveform(&waveform).await
    }

    /// Play a built [`VibrationPattern`], honoring its repeat flag
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::PlatformUnavailable`] if no vibration service
    /// is available.
    pub async fn play(&self, pattern: &VibrationPattern) -> Result<()> {
        self.vibrate(pattern.elements(), pattern.repeat).await
    }

    /// Convenience for a one-shot vibration
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidArgument`] for a negative duration or an
    /// intensity outside `[0, 1]`, and [`BridgeError::PlatformUnavailable`]
    /// if no vibration service is available.
    pub async fn vibrate_once(&self, duration: f64, intensity: f64) -> Result<()> {
        let step = VibrationStep::new(duration, intensity)?;
        self.vibrate(&[step], false).await
    }

    /// Convenience for a double-click vibration pattern
    ///
    /// Plays two identical clicks separated by `inter_click_time` seconds of
    /// silence.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidArgument`] for out-of-range values and
    /// [`BridgeError::PlatformUnavailable`] if no vibration service is
    /// available.
    pub async fn vibrate_double_click(
        &self,
        duration: f64,
        intensity: f64,
        inter_click_time: f64,
    ) -> Result<()> {
        let click = VibrationStep::new(duration, intensity)?;
        let space = VibrationStep::new(inter_click_time, 0.0)?;
        self.vibrate(&[click, space, click], false).await
    }

    /// Halt any in-progress vibration, including repeating patterns
    ///
    /// Unconditional and idempotent: calling with no active vibration is a
    /// no-op success.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::PlatformUnavailable`] if no vibration service
    /// is available.
    pub async fn cancel(&self) -> Result<()> {
        let vibrator = self
            .vibrator
            .as_ref()
            .ok_or(BridgeError::PlatformUnavailable)?;

        vibrator.cancel().await
    }

    /// Build the static device metadata snapshot
    ///
    /// The UUID is resolved on first call and memoized for the process
    /// lifetime; a v4 UUID is generated when the identity source has none.
    /// All other fields are read fresh on every call.
    ///
    /// # Errors
    ///
    /// Reserved for identity sources that can fail; the bundled sources
    /// always succeed.
    pub fn device_info(&self) -> Result<DeviceInfo> {
        let uuid = self
            .uuid
            .get_or_init(|| {
                self.identity
                    .uuid()
                    .unwrap_or_else(|| Uuid::new_v4().to_string())
            })
            .clone();

        Ok(DeviceInfo {
            uuid,
            os_version: self.identity.os_version(),
            platform: self.platform.label().to_string(),
            model: self.identity.model(),
            manufacturer: self.identity.manufacturer(),
            serial_number: self.identity.serial_number(),
            is_virtual: self.is_virtual(),
        })
    }

    /// Heuristic emulator detection
    ///
    /// True when the build fingerprint contains `"generic"` or the product
    /// name contains `"sdk"`.
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.identity
            .fingerprint()
            .contains(VIRTUAL_FINGERPRINT_MARKER)
            || self.identity.product().contains(VIRTUAL_PRODUCT_MARKER)
    }

    /// Dispatch entry point for the host runtime
    ///
    /// Resolves `action` against the closed action set and runs the matching
    /// operation, delivering the outcome (success payload or error) through
    /// `channel`. The return value only reports recognition: `true` whenever
    /// the action name was understood, even if the operation itself failed
    /// (the failure goes down the channel), and `false` for unknown names,
    /// in which case nothing is delivered and no platform call is made.
    pub async fn execute(&self, action: &str, args: &[Value], channel: &dyn ReplyChannel) -> bool {
        let Some(action) = Action::from_name(action) else {
            debug!("unrecognized action: {action}");
            return false;
        };

        let outcome = match action {
            Action::Vibrate => self.handle_vibrate(args).await,
            Action::Cancel => self.cancel().await.map(|()| empty_object()),
            Action::GetDeviceInfo => self
                .device_info()
                .and_then(|info| serde_json::to_value(info).map_err(Into::into)),
        };

        let reply = match outcome {
            Ok(payload) => Reply::Success(payload),
            Err(e) => {
                warn!("{} failed: {e}", action.name());
                Reply::Failure(e)
            }
        };

        channel.deliver(reply).await;
        true
    }

    /// Extract vibrate arguments and submit the waveform
    async fn handle_vibrate(&self, args: &[Value]) -> Result<Value> {
        info!("received vibrate action request");

        let request = parse_vibrate_args(args)?;
        debug!(
            "pattern spec: {} step(s), repeat: {}",
            request.pattern.len(),
            request.repeat
        );

        self.vibrate(&request.pattern, request.repeat).await?;
        Ok(empty_object())
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
