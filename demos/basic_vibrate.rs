use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

use buzzbridge::{
    platform::{NoopVibrator, StaticIdentity},
    HapticBridge, Result, VibrationPattern,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("📳 Buzzbridge Basic Vibration Example");

    // A no-op vibrator stands in for real hardware here; swap in a platform
    // implementation to feel the output.
    let bridge = HapticBridge::new(
        Some(Arc::new(NoopVibrator)),
        Arc::new(StaticIdentity::default()),
    );

    info!("⚡ One-shot click at full intensity...");
    bridge.vibrate_once(0.1, 1.0).await?;
    sleep(Duration::from_millis(200)).await;

    info!("⚡⚡ Double click...");
    bridge.vibrate_double_click(0.08, 0.8, 0.06).await?;
    sleep(Duration::from_millis(300)).await;

    info!("🔁 Repeating heartbeat pattern...");
    let mut heartbeat = VibrationPattern::with_repeat(true);
    heartbeat.add_vibration(0.12, 1.0)?;
    heartbeat.add_space(0.08)?;
    heartbeat.add_vibration(0.12, 0.6)?;
    heartbeat.add_space(0.5)?;
    bridge.play(&heartbeat).await?;

    sleep(Duration::from_secs(2)).await;

    info!("🛑 Cancelling...");
    bridge.cancel().await?;
    info!("✅ Cancelled");

    // Cancel is idempotent; a second call with nothing playing still succeeds.
    bridge.cancel().await?;

    info!("🎉 Basic vibration example completed!");
    Ok(())
}
