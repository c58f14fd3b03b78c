use crate::{
    error::{BridgeError, Result},
    types::{VibrationPattern, VibrationStep},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

/// Format version written to and accepted from pattern files
pub const PATTERN_FORMAT_VERSION: u32 = 1;

/// Actions the bridge dispatch entry point recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Play a vibration pattern
    Vibrate,
    /// Halt any in-progress vibration
    Cancel,
    /// Report the static device metadata snapshot
    GetDeviceInfo,
}

impl Action {
    /// Resolve an action from its wire name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "vibrate" => Some(Self::Vibrate),
            "cancel" => Some(Self::Cancel),
            "getDeviceInfo" => Some(Self::GetDeviceInfo),
            _ => None,
        }
    }

    /// The wire name of this action
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vibrate => "vibrate",
            Self::Cancel => "cancel",
            Self::GetDeviceInfo => "getDeviceInfo",
        }
    }
}

/// A parsed vibrate invocation: the step sequence plus the repeat flag
///
/// Produced by [`parse_vibrate_args`]; one per invocation. Step values are
/// carried exactly as they arrived: extraction checks shape, not ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct VibrationRequest {
    /// Ordered vibration steps
    pub pattern: Vec<VibrationStep>,
    /// Whether playback loops until cancelled
    pub repeat: bool,
}

/// Extract a [`VibrationRequest`] from envelope arguments
///
/// Expects `args[0]` to be an array of `{duration, intensity}` objects and
/// `args[1]` to be a boolean. Fails before any platform call is made.
///
/// # Errors
///
/// Returns [`BridgeError::InvalidArgument`] when either argument is missing,
/// the pattern entries lack a field, or a value has the wrong type.
pub fn parse_vibrate_args(args: &[Value]) -> Result<VibrationRequest> {
    let pattern_value = args
        .first()
        .ok_or_else(|| BridgeError::InvalidArgument("missing vibration pattern".to_string()))?;

    let pattern: Vec<VibrationStep> = serde_json::from_value(pattern_value.clone())
        .map_err(|e| BridgeError::InvalidArgument(format!("malformed vibration pattern: {e}")))?;

    let repeat = args
        .get(1)
        .and_then(Value::as_bool)
        .ok_or_else(|| BridgeError::InvalidArgument("missing or non-boolean repeat flag".to_string()))?;

    Ok(VibrationRequest { pattern, repeat })
}

/// Outcome of a recognized invocation
///
/// The host runtime has separate success and error callback channels; this
/// union is the transport-neutral form a [`ReplyChannel`] delivers.
#[derive(Debug)]
pub enum Reply {
    /// Operation succeeded; payload is the success-callback argument
    Success(Value),
    /// Operation failed; the error is surfaced once, as-is
    Failure(BridgeError),
}

impl Reply {
    /// Success reply with an empty object payload
    #[must_use]
    pub fn empty_success() -> Self {
        Self::Success(Value::Object(serde_json::Map::new()))
    }

    /// Whether this reply is a success
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Asynchronous delivery channel for invocation replies
///
/// Decouples the bridge from the host runtime's callback mechanism: the host
/// adapter implements this once and the bridge never learns how replies reach
/// JavaScript.
#[async_trait]
pub trait ReplyChannel: Send + Sync {
    /// Deliver a reply to the invoker
    async fn deliver(&self, reply: Reply);
}

/// [`ReplyChannel`] backed by an unbounded tokio mpsc channel
pub struct MpscReplyChannel {
    sender: mpsc::UnboundedSender<Reply>,
}

impl MpscReplyChannel {
    /// Create a channel and the receiver end the host drains
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Reply>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl ReplyChannel for MpscReplyChannel {
    async fn deliver(&self, reply: Reply) {
        if self.sender.send(reply).is_err() {
            debug!("reply receiver dropped, discarding reply");
        }
    }
}

/// On-disk pattern representation
#[derive(Debug, Serialize, Deserialize)]
struct StoredPattern {
    #[serde(rename = "formatVersion")]
    format_version: u32,
    repeat: bool,
    elements: Vec<VibrationStep>,
}

fn round_three_places(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Serialize a pattern to its JSON file representation
///
/// Numeric values are rounded to three decimal places to keep exported files
/// free of long floating-point tails.
///
/// # Errors
///
/// Returns [`BridgeError::Json`] if serialization fails.
pub fn pattern_to_json(pattern: &VibrationPattern) -> Result<String> {
    let stored = StoredPattern {
        format_version: PATTERN_FORMAT_VERSION,
        repeat: pattern.repeat,
        elements: pattern
            .elements()
            .iter()
            .map(|step| VibrationStep {
                duration: round_three_places(step.duration),
                intensity: round_three_places(step.intensity),
            })
            .collect(),
    };

    Ok(serde_json::to_string(&stored)?)
}

/// Load a pattern from its JSON file representation
///
/// # Errors
///
/// Returns [`BridgeError::Json`] for malformed JSON and
/// [`BridgeError::UnsupportedPatternFormat`] when the file's `formatVersion`
/// is not [`PATTERN_FORMAT_VERSION`].
pub fn pattern_from_json(json: &str) -> Result<VibrationPattern> {
    let stored: StoredPattern = serde_json::from_str(json)?;

    if stored.format_version != PATTERN_FORMAT_VERSION {
        return Err(BridgeError::UnsupportedPatternFormat {
            version: stored.format_version,
        });
    }

    let mut pattern = VibrationPattern::from(stored.elements);
    pattern.repeat = stored.repeat;
    Ok(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_from_name() {
        assert_eq!(Action::from_name("vibrate"), Some(Action::Vibrate));
        assert_eq!(Action::from_name("cancel"), Some(Action::Cancel));
        assert_eq!(
            Action::from_name("getDeviceInfo"),
            Some(Action::GetDeviceInfo)
        );
        assert_eq!(Action::from_name("foo"), None);
        assert_eq!(Action::from_name("Vibrate"), None);
        assert_eq!(Action::from_name(""), None);
    }

    #[test]
    fn test_action_name_round_trip() {
        for action in [Action::Vibrate, Action::Cancel, Action::GetDeviceInfo] {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
    }

    #[test]
    fn test_parse_vibrate_args() {
        let args = vec![
            json!([
                { "duration": 0.5, "intensity": 1.0 },
                { "duration": 0.2, "intensity": 0.5 }
            ]),
            json!(false),
        ];

        let request = parse_vibrate_args(&args).unwrap();
        assert_eq!(request.pattern.len(), 2);
        assert!(!request.repeat);
        assert!((request.pattern[0].duration - 0.5).abs() < f64::EPSILON);
        assert!((request.pattern[1].intensity - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_vibrate_args_integer_numbers() {
        // Whole numbers arrive as JSON integers; they still parse as floats.
        let args = vec![json!([{ "duration": 1, "intensity": 1 }]), json!(true)];
        let request = parse_vibrate_args(&args).unwrap();
        assert!((request.pattern[0].duration - 1.0).abs() < f64::EPSILON);
        assert!(request.repeat);
    }

    #[test]
    fn test_parse_vibrate_args_passes_out_of_range_intensity() {
        let args = vec![json!([{ "duration": 0.1, "intensity": 3.5 }]), json!(false)];
        let request = parse_vibrate_args(&args).unwrap();
        assert!((request.pattern[0].intensity - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_vibrate_args_missing_field() {
        let args = vec![json!([{ "duration": 0.1 }]), json!(false)];
        let err = parse_vibrate_args(&args).unwrap_err();
        assert!(err.is_input_error());
        assert!(format!("{err}").contains("malformed vibration pattern"));
    }

    #[test]
    fn test_parse_vibrate_args_wrong_types() {
        let args = vec![
            json!([{ "duration": "long", "intensity": 0.5 }]),
            json!(false),
        ];
        assert!(parse_vibrate_args(&args).is_err());

        let args = vec![json!([{ "duration": 0.1, "intensity": 0.5 }]), json!("true")];
        assert!(parse_vibrate_args(&args).is_err());
    }

    #[test]
    fn test_parse_vibrate_args_missing_args() {
        assert!(parse_vibrate_args(&[]).is_err());
        assert!(parse_vibrate_args(&[json!([])]).is_err());
    }

    #[test]
    fn test_reply_empty_success() {
        let reply = Reply::empty_success();
        assert!(reply.is_success());
        if let Reply::Success(value) = reply {
            assert_eq!(value, json!({}));
        }
    }

    #[tokio::test]
    async fn test_mpsc_reply_channel_delivery() {
        let (channel, mut receiver) = MpscReplyChannel::new();
        channel.deliver(Reply::empty_success()).await;
        channel
            .deliver(Reply::Failure(BridgeError::PlatformUnavailable))
            .await;

        assert!(receiver.recv().await.unwrap().is_success());
        match receiver.recv().await.unwrap() {
            Reply::Failure(BridgeError::PlatformUnavailable) => {}
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mpsc_reply_channel_dropped_receiver() {
        let (channel, receiver) = MpscReplyChannel::new();
        drop(receiver);
        // Must not panic or error when the host side is gone.
        channel.deliver(Reply::empty_success()).await;
    }

    #[test]
    fn test_pattern_file_round_trip() {
        let mut pattern = VibrationPattern::with_repeat(true);
        pattern.add_vibration(0.25, 1.0).unwrap();
        pattern.add_space(0.1).unwrap();
        pattern.add_vibration(0.25, 0.5).unwrap();

        let json = pattern_to_json(&pattern).unwrap();
        let loaded = pattern_from_json(&json).unwrap();

        assert!(loaded.repeat);
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.elements(), pattern.elements());
    }

    #[test]
    fn test_pattern_file_rounds_to_three_decimals() {
        let mut pattern = VibrationPattern::new();
        pattern.add_vibration(0.123_456_7, 0.999_99).unwrap();

        let json = pattern_to_json(&pattern).unwrap();
        assert!(json.contains("0.123"));
        assert!(!json.contains("0.1234"));

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["formatVersion"], PATTERN_FORMAT_VERSION);
    }

    #[test]
    fn test_pattern_file_rejects_unknown_version() {
        let json = r#"{"formatVersion":2,"repeat":false,"elements":[]}"#;
        match pattern_from_json(json).unwrap_err() {
            BridgeError::UnsupportedPatternFormat { version } => assert_eq!(version, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pattern_file_malformed_json() {
        assert!(matches!(
            pattern_from_json("not json").unwrap_err(),
            BridgeError::Json(_)
        ));
    }
}
