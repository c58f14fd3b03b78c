use std::sync::Arc;
use tracing::info;

use buzzbridge::{
    platform::StaticIdentity, HapticBridge, MpscReplyChannel, Reply, Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("📱 Buzzbridge Device Info Example");

    // An emulator-looking identity; on a real device these values come from
    // the platform build properties.
    let identity = StaticIdentity {
        uuid: None,
        os_version: "14".to_string(),
        model: "sdk_gphone64_x86_64".to_string(),
        manufacturer: "Google".to_string(),
        serial_number: "EMULATOR1234".to_string(),
        fingerprint: "google/sdk_gphone64_x86_64/generic:14".to_string(),
        product: "sdk_gphone64_x86_64".to_string(),
    };

    // No vibrator handle: vibrate/cancel would fail, device info still works.
    let bridge = HapticBridge::new(None, Arc::new(identity));

    let info = bridge.device_info()?;
    info!("📊 Device snapshot:");
    info!("  UUID: {}", info.uuid);
    info!("  Platform: {}", info.platform);
    info!("  OS version: {}", info.os_version);
    info!("  Model: {}", info.model);
    info!("  Manufacturer: {}", info.manufacturer);
    info!("  Serial: {}", info.serial_number);
    info!("  Virtual: {}", info.is_virtual);

    // The same snapshot through the host envelope.
    let (channel, mut replies) = MpscReplyChannel::new();
    let handled = bridge.execute("getDeviceInfo", &[], &channel).await;
    info!("🔌 Envelope dispatch recognized: {handled}");

    match replies.recv().await {
        Some(Reply::Success(payload)) => info!("✅ Envelope payload: {payload}"),
        Some(Reply::Failure(e)) => info!("❌ Envelope failure: {e}"),
        None => info!("❌ No reply delivered"),
    }

    // UUID is memoized: a second snapshot reports the same identifier.
    let again = bridge.device_info()?;
    assert_eq!(info.uuid, again.uuid);
    info!("🔁 UUID stable across calls: {}", again.uuid);

    info!("🎉 Device info example completed!");
    Ok(())
}
