
// ================================================================================
// Integration and Testing
// File: tests/preprocessing_tests.rs
// ================================================================================

use ecg_prep::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;
    use std::io::Write;

    /// 500 Hz composite: ECG-band content at 1.2 Hz and 5 Hz, mains pickup
    /// at 50 Hz.
    fn composite_recording(len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = i as f32 / 500.0;
                0.8 * (2.0 * PI * 1.2 * t).sin()
                    + (2.0 * PI * 5.0 * t).sin()
                    + 0.3 * (2.0 * PI * 50.0 * t).sin()
            })
            .collect()
    }

    /// Single-bin amplitude via direct projection; exact for tones with an
    /// integer cycle count.
    fn tone_amplitude(signal: &[f32], freq: f32, sample_rate: f32) -> f32 {
        let mut re = 0.0f64;
        let mut im = 0.0f64;
        for (i, &x) in signal.iter().enumerate() {
            let angle = 2.0 * PI * freq * i as f32 / sample_rate;
            re += f64::from(x * angle.cos());
            im += f64::from(x * angle.sin());
        }
        let n = signal.len() as f64;
        (2.0 / n * (re * re + im * im).sqrt()) as f32
    }

    #[test]
    fn test_full_pipeline_output_shape_and_scale() {
        let preprocessor = Preprocessor::new(PreprocessingConfig::default()).unwrap();
        let raw = composite_recording(4000);

        let cleaned = preprocessor.preprocess(&raw).unwrap();

        assert_eq!(cleaned.len(), 5000);
        assert!(cleaned.iter().all(|x| x.is_finite()));
        // Z-score normalization leaves zero mean and unit spread.
        let mean = cleaned.iter().sum::<f32>() / cleaned.len() as f32;
        let var = cleaned.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / cleaned.len() as f32;
        assert!(mean.abs() < 1e-3, "mean {mean}");
        assert!((var.sqrt() - 1.0).abs() < 0.05, "std {}", var.sqrt());
    }

    #[test]
    fn test_pipeline_suppresses_mains_interference() {
        let preprocessor = Preprocessor::new(PreprocessingConfig::default()).unwrap();
        // Same length as the target so the frequency axis is unchanged.
        let raw = composite_recording(5000);

        let cleaned = preprocessor.preprocess(&raw).unwrap();

        let raw_ratio = tone_amplitude(&raw, 50.0, 500.0) / tone_amplitude(&raw, 5.0, 500.0);
        let cleaned_ratio =
            tone_amplitude(&cleaned, 50.0, 500.0) / tone_amplitude(&cleaned, 5.0, 500.0);
        assert!(raw_ratio > 0.25, "raw ratio {raw_ratio}");
        assert!(cleaned_ratio < 0.01, "cleaned ratio {cleaned_ratio}");
    }

    #[test]
    fn test_reference_scenario_exact_lengths_and_stats() {
        // Input already at the target length, so resampling is an identity
        // and the z-scored statistics survive to the output untouched.
        let raw: Vec<f32> = (0..5000)
            .map(|i| {
                let t = i as f32 / 500.0;
                (2.0 * PI * 1.2 * t).sin() + (2.0 * PI * 5.0 * t).sin()
            })
            .collect();
        let preprocessor = Preprocessor::new(PreprocessingConfig::default()).unwrap();

        let cleaned = preprocessor.preprocess(&raw).unwrap();
        assert_eq!(cleaned.len(), 5000);

        let mean = cleaned.iter().map(|&x| f64::from(x)).sum::<f64>() / 5000.0;
        let var = cleaned
            .iter()
            .map(|&x| (f64::from(x) - mean).powi(2))
            .sum::<f64>()
            / 5000.0;
        assert!(mean.abs() < 1e-6, "mean {mean}");
        assert!((var.sqrt() - 1.0).abs() < 1e-6, "std {}", var.sqrt());

        let metrics = preprocessor.assess_quality(&cleaned).unwrap();
        assert!(metrics.snr_db.is_finite());
        assert_eq!(
            metrics.label == QualityLabel::Good,
            metrics.snr_db > 20.0
        );
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let preprocessor = Preprocessor::new(PreprocessingConfig::default()).unwrap();
        let raw = composite_recording(3000);
        let first = preprocessor.preprocess(&raw).unwrap();
        let second = preprocessor.preprocess(&raw).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resampling_hits_configured_length() {
        let shrink = PreprocessingConfig {
            target_length: 1250,
            ..PreprocessingConfig::default()
        };
        let preprocessor = Preprocessor::new(shrink).unwrap();
        let raw = composite_recording(2500);
        assert_eq!(preprocessor.preprocess(&raw).unwrap().len(), 1250);

        let grow = PreprocessingConfig::default();
        let preprocessor = Preprocessor::new(grow).unwrap();
        assert_eq!(preprocessor.preprocess(&raw).unwrap().len(), 5000);
    }

    #[test]
    fn test_minmax_normalization_bounds() {
        let config = PreprocessingConfig {
            normalization: NormalizationMethod::MinMax,
            ..PreprocessingConfig::default()
        };
        let preprocessor = Preprocessor::new(config).unwrap();
        let cleaned = preprocessor.preprocess(&composite_recording(5000)).unwrap();

        let lo = cleaned.iter().cloned().fold(f32::INFINITY, f32::min);
        let hi = cleaned.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!(lo >= 0.0 && hi <= 1.0);
        assert!(lo < 1e-3 && hi > 1.0 - 1e-3);
    }

    #[test]
    fn test_quality_separates_clean_from_noisy() {
        let preprocessor = Preprocessor::new(PreprocessingConfig::default()).unwrap();

        let clean: Vec<f32> = (0..5000)
            .map(|i| (2.0 * PI * 5.0 * i as f32 / 500.0).sin())
            .collect();
        let noisy: Vec<f32> = clean
            .iter()
            .enumerate()
            .map(|(i, &x)| x + 2.0 * (2.0 * PI * 80.0 * i as f32 / 500.0).sin())
            .collect();

        let good = preprocessor.assess_quality(&clean).unwrap();
        let bad = preprocessor.assess_quality(&noisy).unwrap();

        assert_eq!(good.label, QualityLabel::Good);
        assert_eq!(bad.label, QualityLabel::Poor);
        assert!(good.snr_db > bad.snr_db);
    }

    #[test]
    fn test_quality_reports_baseline_wander() {
        let preprocessor = Preprocessor::new(PreprocessingConfig::default()).unwrap();
        let drifting: Vec<f32> = (0..5000)
            .map(|i| {
                let t = i as f32 / 500.0;
                (2.0 * PI * 5.0 * t).sin() + 3.0 * (2.0 * PI * 0.2 * t).sin()
            })
            .collect();
        let metrics = preprocessor.assess_quality(&drifting).unwrap();
        assert!(metrics.baseline_wander > 1.0, "{}", metrics.baseline_wander);
    }

    #[test]
    fn test_preprocess_with_quality_pairs_results() {
        let preprocessor = Preprocessor::new(PreprocessingConfig::default()).unwrap();
        let raw = composite_recording(4000);
        let (cleaned, metrics) = preprocessor.preprocess_with_quality(&raw).unwrap();
        assert_eq!(cleaned.len(), 5000);
        assert!(metrics.snr_db.is_finite());
        assert!(metrics.max_amplitude > 0.0);
    }

    #[test]
    fn test_invalid_config_is_rejected_at_construction() {
        let config = PreprocessingConfig {
            highcut: 300.0, // above Nyquist for 500 Hz
            ..PreprocessingConfig::default()
        };
        let err = Preprocessor::new(config).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_empty_signal_is_rejected() {
        let preprocessor = Preprocessor::new(PreprocessingConfig::default()).unwrap();
        let err = preprocessor.preprocess(&[]).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_toml_config_drives_pipeline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "target_length = 2000\nnormalization = \"minmax\"\nwavelet = \"sym4\""
        )
        .unwrap();

        let config = PreprocessingConfig::from_toml_path(file.path()).unwrap();
        let preprocessor = Preprocessor::new(config).unwrap();
        let cleaned = preprocessor.preprocess(&composite_recording(3000)).unwrap();

        assert_eq!(cleaned.len(), 2000);
        let hi = cleaned.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!(hi <= 1.0);
    }

    #[test]
    fn test_batch_preprocessing_preserves_order() {
        let config = PreprocessingConfig {
            target_length: 1000,
            ..PreprocessingConfig::default()
        };
        let signals: Vec<Vec<f32>> = (1..=4)
            .map(|k| {
                (0..2000)
                    .map(|i| (2.0 * PI * (3.0 * k as f32) * i as f32 / 500.0).sin())
                    .collect()
            })
            .collect();

        let batch = preprocess_batch(&config, &signals).unwrap();
        let preprocessor = Preprocessor::new(config).unwrap();

        assert_eq!(batch.len(), 4);
        for (signal, processed) in signals.iter().zip(&batch) {
            assert_eq!(*processed, preprocessor.preprocess(signal).unwrap());
        }
    }
}
