//! Live light-level estimation.
//!
//! A frame source hands over small downscaled RGBA samples; each sample's
//! luma-weighted mean brightness is scaled to an estimated illuminance and
//! bucketed into a category. The loop is a cancellable task so the camera
//! resource is always released on exit.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Side length of the downscaled sample square, in pixels.
pub const SAMPLE_DIM: usize = 64;
/// Bytes per RGBA sample the estimator expects.
pub const SAMPLE_BYTES: usize = SAMPLE_DIM * SAMPLE_DIM * 4;

/// Empirical scale from mean 8-bit luma to estimated lux.
const LUX_PER_LUMA: f64 = 40.0;

/// Category thresholds in estimated lux. Tunable constants, not protocol.
const PARTIAL_SHADE_LUX: u32 = 500;
const BRIGHT_INDIRECT_LUX: u32 = 2_500;
const DIRECT_SUN_LUX: u32 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCategory {
    LowLight,
    PartialShade,
    BrightIndirect,
    DirectSun,
}

impl LightCategory {
    pub fn from_lux(lux: u32) -> Self {
        if lux < PARTIAL_SHADE_LUX {
            Self::LowLight
        } else if lux < BRIGHT_INDIRECT_LUX {
            Self::PartialShade
        } else if lux < DIRECT_SUN_LUX {
            Self::BrightIndirect
        } else {
            Self::DirectSun
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::LowLight => "Poca Luz",
            Self::PartialShade => "Sombra Parcial",
            Self::BrightIndirect => "Luz Indirecta Brillante",
            Self::DirectSun => "Luz Solar Directa",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightReading {
    pub lux: u32,
    pub category: LightCategory,
}

#[derive(Debug, thiserror::Error)]
pub enum MeterError {
    /// The camera could not be acquired or a frame could not be read.
    #[error("cámara no disponible: {0}")]
    Camera(String),

    /// A frame sample was not the expected RGBA buffer.
    #[error("frame inválido: se esperaban {SAMPLE_BYTES} bytes, llegaron {0}")]
    BadFrame(usize),
}

/// Camera boundary: anything that can produce downscaled RGBA samples.
///
/// Implementations own the device handle; dropping the source releases it.
#[async_trait]
pub trait FrameSource: Send {
    /// Next RGBA sample, `SAMPLE_BYTES` long.
    async fn next_frame(&mut self) -> Result<Vec<u8>, MeterError>;
}

/// Estimate illuminance from one RGBA sample using the broadcast luma
/// weights (0.299 R + 0.587 G + 0.114 B), scaled by the empirical constant.
pub fn estimate_lux(rgba: &[u8]) -> Result<u32, MeterError> {
    if rgba.len() != SAMPLE_BYTES {
        return Err(MeterError::BadFrame(rgba.len()));
    }
    let sum: f64 = rgba
        .chunks_exact(4)
        .map(|px| 0.299 * f64::from(px[0]) + 0.587 * f64::from(px[1]) + 0.114 * f64::from(px[2]))
        .sum();
    let mean = sum / (SAMPLE_DIM * SAMPLE_DIM) as f64;
    Ok((mean * LUX_PER_LUMA).round() as u32)
}

pub fn read_sample(rgba: &[u8]) -> Result<LightReading, MeterError> {
    let lux = estimate_lux(rgba)?;
    Ok(LightReading {
        lux,
        category: LightCategory::from_lux(lux),
    })
}

/// Run the sampling loop until cancelled, all readers are gone, or the
/// source fails.
///
/// Publishes each reading on the watch channel. The source is consumed and
/// dropped on every exit path, so the camera is released deterministically.
pub async fn run_meter(
    mut source: impl FrameSource,
    tick: Duration,
    readings: watch::Sender<Option<LightReading>>,
    cancel: CancellationToken,
) -> Result<(), MeterError> {
    info!(tick_ms = tick.as_millis() as u64, "light meter started");
    let mut interval = tokio::time::interval(tick);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("light meter stopped");
                return Ok(());
            }
            _ = interval.tick() => {
                let frame = match source.next_frame().await {
                    Ok(frame) => frame,
                    Err(e) => {
                        warn!(error = %e, "light meter lost its frame source");
                        return Err(e);
                    }
                };
                let reading = read_sample(&frame)?;
                debug!(lux = reading.lux, category = ?reading.category, "light sample");
                if readings.send(Some(reading)).is_err() {
                    info!("light meter has no readers left, stopping");
                    return Ok(());
                }
            }
        }
    }
}
