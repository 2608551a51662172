// src/batch.rs
//! Parallel preprocessing of whole recording sets.

use rayon::prelude::*;
use tracing::info;

use crate::config::PreprocessingConfig;
use crate::error::{EcgError, EcgResult};
use crate::processing::{Preprocessor, QualityMetrics};

/// Preprocess every recording with one shared configuration, in parallel.
///
/// Output order matches input order. The first failing record (by index)
/// reported by any worker aborts the batch with its index in the message.
pub fn preprocess_batch(
    config: &PreprocessingConfig,
    signals: &[Vec<f32>],
) -> EcgResult<Vec<Vec<f32>>> {
    let preprocessor = Preprocessor::new(config.clone())?;
    let processed = signals
        .par_iter()
        .enumerate()
        .map(|(idx, signal)| {
            preprocessor
                .preprocess(signal)
                .map_err(|err| EcgError::processing(format!("record {idx}: {err}")))
        })
        .collect::<EcgResult<Vec<_>>>()?;
    info!(records = processed.len(), "batch preprocessing complete");
    Ok(processed)
}

/// Like [`preprocess_batch`], but pairs each cleaned recording with quality
/// metrics assessed on that cleaned output.
pub fn preprocess_batch_with_quality(
    config: &PreprocessingConfig,
    signals: &[Vec<f32>],
) -> EcgResult<Vec<(Vec<f32>, QualityMetrics)>> {
    let preprocessor = Preprocessor::new(config.clone())?;
    let processed = signals
        .par_iter()
        .enumerate()
        .map(|(idx, signal)| {
            preprocessor
                .preprocess_with_quality(signal)
                .map_err(|err| EcgError::processing(format!("record {idx}: {err}")))
        })
        .collect::<EcgResult<Vec<_>>>()?;
    info!(
        records = processed.len(),
        "batch preprocessing with quality complete"
    );
    Ok(processed)
}
