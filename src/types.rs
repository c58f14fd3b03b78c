use crate::{
    error::{BridgeError, Result},
    AMAZON_MANUFACTURER, AMAZON_PLATFORM_LABEL, ANDROID_PLATFORM_LABEL,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum amplitude value understood by the platform waveform primitive
pub const MAX_AMPLITUDE: u32 = 255;

/// Repeat index requesting a single, non-looping playback
pub const PLAY_ONCE_REPEAT_INDEX: i32 = -1;

/// Repeat index restarting looped playback from the first step
pub const LOOP_REPEAT_INDEX: i32 = 0;

/// A single timed vibration event with a normalized intensity
///
/// Steps are the building blocks of vibration patterns. The duration is
/// expressed in seconds and the intensity as a value from 0 (off) to 1
/// (strongest the hardware supports).
///
/// [`VibrationStep::new`] validates both ranges. Values deserialized from an
/// invocation envelope are not validated: the bridge forwards whatever the
/// host sent, and the platform decides what to do with out-of-range
/// amplitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VibrationStep {
    /// Duration of the vibration in seconds
    pub duration: f64,
    /// Intensity of the vibration from 0 (min) to 1 (max)
    pub intensity: f64,
}

impl VibrationStep {
    /// Create a validated vibration step
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidArgument`] if `duration` is negative or
    /// `intensity` is outside the `[0, 1]` range.
    pub fn new(duration: f64, intensity: f64) -> Result<Self> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(BridgeError::InvalidArgument(format!(
                "invalid duration: {duration}"
            )));
        }

        if !intensity.is_finite() || !(0.0..=1.0).contains(&intensity) {
            return Err(BridgeError::InvalidArgument(format!(
                "invalid intensity: {intensity}"
            )));
        }

        Ok(Self {
            duration,
            intensity,
        })
    }

    /// Duration converted to whole milliseconds, rounded half-up
    #[must_use]
    pub fn duration_millis(&self) -> u64 {
        (self.duration * 1000.0).round() as u64
    }

    /// Intensity scaled to the platform amplitude range, rounded half-up
    ///
    /// Intensities above 1.0 scale past [`MAX_AMPLITUDE`]; they are carried
    /// through unclamped for the platform to judge.
    #[must_use]
    pub fn amplitude(&self) -> u32 {
        (self.intensity * f64::from(MAX_AMPLITUDE)).round() as u32
    }
}

/// An ordered sequence of vibration steps with a repeat flag
///
/// Patterns are assembled incrementally. Consecutive additions at the same
/// intensity are consolidated into one longer step rather than appended, so a
/// pattern stays as short as its perceptible shape allows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VibrationPattern {
    elements: Vec<VibrationStep>,
    /// Whether playback restarts from the first step after the last
    pub repeat: bool,
}

impl VibrationPattern {
    /// Create an empty, non-repeating pattern
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty pattern with the given repeat flag
    #[must_use]
    pub const fn with_repeat(repeat: bool) -> Self {
        Self {
            elements: Vec::new(),
            repeat,
        }
    }

    /// The steps added so far, in playback order
    #[must_use]
    pub fn elements(&self) -> &[VibrationStep] {
        &self.elements
    }

    /// Number of steps in the pattern
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the pattern has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append a vibration of the specified duration and intensity
    ///
    /// When the previous element has the same intensity, its duration is
    /// extended instead of adding a new element.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidArgument`] for a negative duration or an
    /// intensity outside `[0, 1]`.
    pub fn add_vibration(&mut self, duration: f64, intensity: f64) -> Result<()> {
        let step = VibrationStep::new(duration, intensity)?;

        if let Some(last) = self.elements.last_mut() {
            if (last.intensity - step.intensity).abs() < f64::EPSILON {
                last.duration += step.duration;
                return Ok(());
            }
        }

        self.elements.push(step);
        Ok(())
    }

    /// Append a pause (zero intensity) of the specified duration
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidArgument`] for a negative duration.
    pub fn add_space(&mut self, duration: f64) -> Result<()> {
        self.add_vibration(duration, 0.0)
    }

    /// Remove all steps and reset the repeat flag
    pub fn clear(&mut self) {
        self.elements.clear();
        self.repeat = false;
    }

    /// Total duration of one playback of the pattern, in seconds
    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.elements.iter().map(|step| step.duration).sum()
    }
}

impl From<Vec<VibrationStep>> for VibrationPattern {
    fn from(elements: Vec<VibrationStep>) -> Self {
        Self {
            elements,
            repeat: false,
        }
    }
}

/// Parallel duration/amplitude sequences for the platform waveform primitive
///
/// This is the shape the platform call takes: one millisecond duration and
/// one amplitude per step, in step order, plus the index looped playback
/// restarts from ([`PLAY_ONCE_REPEAT_INDEX`] when not repeating).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waveform {
    /// Step durations in milliseconds
    pub durations: Vec<u64>,
    /// Step amplitudes in the 0–255 platform range (unclamped)
    pub amplitudes: Vec<u32>,
    /// Index looped playback restarts from, or -1 to play once
    pub repeat_index: i32,
}

impl Waveform {
    /// Convert a step sequence into platform units
    ///
    /// Each step is converted independently; order and length are preserved.
    #[must_use]
    pub fn from_steps(steps: &[VibrationStep], repeat: bool) -> Self {
        Self {
            durations: steps.iter().map(VibrationStep::duration_millis).collect(),
            amplitudes: steps.iter().map(VibrationStep::amplitude).collect(),
            repeat_index: if repeat {
                LOOP_REPEAT_INDEX
            } else {
                PLAY_ONCE_REPEAT_INDEX
            },
        }
    }

    /// Number of steps in the waveform
    #[must_use]
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Whether the waveform has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Whether playback loops until cancelled
    #[must_use]
    pub const fn repeats(&self) -> bool {
        self.repeat_index >= 0
    }
}

impl From<&VibrationPattern> for Waveform {
    fn from(pattern: &VibrationPattern) -> Self {
        Self::from_steps(pattern.elements(), pattern.repeat)
    }
}

/// Reported platform family of the device
///
/// Selected once at bridge construction from the manufacturer string; each
/// variant carries the label the host runtime expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// Stock Android device
    Android,
    /// Amazon Fire OS device (Android derivative)
    AmazonFireOs,
}

impl Platform {
    /// Determine the platform from the device manufacturer string
    #[must_use]
    pub fn from_manufacturer(manufacturer: &str) -> Self {
        if manufacturer == AMAZON_MANUFACTURER {
            Self::AmazonFireOs
        } else {
            Self::Android
        }
    }

    /// The label reported to the host runtime
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Android => ANDROID_PLATFORM_LABEL,
            Self::AmazonFireOs => AMAZON_PLATFORM_LABEL,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Static device metadata snapshot
///
/// Built on demand by the bridge; serializes with the wire keys the host
/// runtime expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device identifier, stable for the process lifetime
    pub uuid: String,
    /// Operating system version string
    #[serde(rename = "version")]
    pub os_version: String,
    /// Platform label (see [`Platform::label`])
    pub platform: String,
    /// Device model name
    pub model: String,
    /// Device manufacturer name
    pub manufacturer: String,
    /// Hardware serial number
    #[serde(rename = "serial")]
    pub serial_number: String,
    /// Whether the device appears to be an emulator
    #[serde(rename = "isVirtual")]
    pub is_virtual: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_conversion() {
        let step = VibrationStep::new(0.5, 1.0).unwrap();
        assert_eq!(step.duration_millis(), 500);
        assert_eq!(step.amplitude(), 255);

        let step = VibrationStep::new(0.2, 0.5).unwrap();
        assert_eq!(step.duration_millis(), 200);
        assert_eq!(step.amplitude(), 128);
    }

    #[test]
    fn test_step_validation() {
        assert!(VibrationStep::new(-0.1, 0.5).is_err());
        assert!(VibrationStep::new(0.1, -0.5).is_err());
        assert!(VibrationStep::new(0.1, 1.5).is_err());
        assert!(VibrationStep::new(0.1, f64::NAN).is_err());
        assert!(VibrationStep::new(0.0, 0.0).is_ok());
        assert!(VibrationStep::new(0.1, 1.0).is_ok());
    }

    #[test]
    fn test_out_of_range_intensity_passes_through() {
        // Wire-deserialized steps skip validation; the scaled amplitude must
        // survive unclamped.
        let step = VibrationStep {
            duration: 0.1,
            intensity: 2.0,
        };
        assert_eq!(step.amplitude(), 510);
    }

    #[test]
    fn test_waveform_preserves_order_and_length() {
        let steps = vec![
            VibrationStep::new(0.5, 1.0).unwrap(),
            VibrationStep::new(0.2, 0.5).unwrap(),
            VibrationStep::new(0.05, 0.0).unwrap(),
        ];

        let waveform = Waveform::from_steps(&steps, false);
        assert_eq!(waveform.durations, vec![500, 200, 50]);
        assert_eq!(waveform.amplitudes, vec![255, 128, 0]);
        assert_eq!(waveform.repeat_index, PLAY_ONCE_REPEAT_INDEX);
        assert!(!waveform.repeats());
        assert_eq!(waveform.len(), 3);
    }

    #[test]
    fn test_waveform_repeat_index() {
        let steps = vec![VibrationStep::new(0.1, 0.3).unwrap()];
        let waveform = Waveform::from_steps(&steps, true);
        assert_eq!(waveform.repeat_index, LOOP_REPEAT_INDEX);
        assert!(waveform.repeats());
    }

    #[test]
    fn test_pattern_consolidation() {
        let mut pattern = VibrationPattern::new();
        pattern.add_vibration(0.1, 0.8).unwrap();
        pattern.add_vibration(0.2, 0.8).unwrap();
        pattern.add_vibration(0.1, 0.4).unwrap();

        assert_eq!(pattern.len(), 2);
        assert!((pattern.elements()[0].duration - 0.3).abs() < 1e-9);
        assert!((pattern.elements()[1].duration - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_pattern_space_and_total_duration() {
        let mut pattern = VibrationPattern::new();
        pattern.add_vibration(0.25, 1.0).unwrap();
        pattern.add_space(0.1).unwrap();
        pattern.add_vibration(0.25, 1.0).unwrap();

        assert_eq!(pattern.len(), 3);
        assert!((pattern.elements()[1].intensity - 0.0).abs() < f64::EPSILON);
        assert!((pattern.total_duration() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_pattern_clear() {
        let mut pattern = VibrationPattern::with_repeat(true);
        pattern.add_vibration(0.1, 0.5).unwrap();
        pattern.clear();

        assert!(pattern.is_empty());
        assert!(!pattern.repeat);
    }

    #[test]
    fn test_platform_from_manufacturer() {
        assert_eq!(
            Platform::from_manufacturer("Amazon"),
            Platform::AmazonFireOs
        );
        assert_eq!(Platform::from_manufacturer("Google"), Platform::Android);
        assert_eq!(Platform::from_manufacturer("samsung"), Platform::Android);
        assert_eq!(Platform::from_manufacturer(""), Platform::Android);
        // Comparison is exact, not case-insensitive.
        assert_eq!(Platform::from_manufacturer("amazon"), Platform::Android);
    }

    #[test]
    fn test_platform_labels() {
        assert_eq!(Platform::AmazonFireOs.label(), AMAZON_PLATFORM_LABEL);
        assert_eq!(Platform::Android.label(), ANDROID_PLATFORM_LABEL);
        assert_eq!(format!("{}", Platform::AmazonFireOs), "amazon-fireos");
    }

    #[test]
    fn test_device_info_wire_keys() {
        let info = DeviceInfo {
            uuid: "abc123".to_string(),
            os_version: "14".to_string(),
            platform: Platform::Android.label().to_string(),
            model: "Pixel 8".to_string(),
            manufacturer: "Google".to_string(),
            serial_number: "XYZ".to_string(),
            is_virtual: false,
        };

        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["uuid"], "abc123");
        assert_eq!(value["version"], "14");
        assert_eq!(value["serial"], "XYZ");
        assert_eq!(value["isVirtual"], false);
        assert!(value.get("os_version").is_none());
    }
}
