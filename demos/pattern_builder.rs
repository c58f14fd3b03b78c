use std::sync::Arc;
use tracing::info;

use buzzbridge::{
    platform::{NoopVibrator, StaticIdentity},
    protocol::{pattern_from_json, pattern_to_json},
    HapticBridge, Result, VibrationPattern,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("🛠️ Buzzbridge Pattern Builder Example");

    let mut pattern = VibrationPattern::new();

    // Equal-intensity additions consolidate into one longer step.
    pattern.add_vibration(0.1, 1.0)?;
    pattern.add_vibration(0.15, 1.0)?;
    pattern.add_space(0.2)?;
    pattern.add_vibration(0.3, 0.4)?;

    info!(
        "📊 Built pattern: {} step(s), {:.2}s total",
        pattern.len(),
        pattern.total_duration()
    );

    // Export to the versioned JSON file format and load it back.
    let json = pattern_to_json(&pattern)?;
    info!("💾 Exported pattern: {json}");

    let loaded = pattern_from_json(&json)?;
    assert_eq!(loaded.elements(), pattern.elements());
    info!("📂 Reloaded pattern matches the original");

    let bridge = HapticBridge::new(
        Some(Arc::new(NoopVibrator)),
        Arc::new(StaticIdentity::default()),
    );

    info!("▶️ Playing loaded pattern...");
    bridge.play(&loaded).await?;
    info!("✅ Submitted");

    info!("🎉 Pattern builder example completed!");
    Ok(())
}
