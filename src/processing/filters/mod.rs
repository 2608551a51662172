// src/processing/filters/mod.rs
//! IIR filter primitives and zero-phase application.
//!
//! Filters are realized as cascades of second-order sections (plus one
//! first-order section for odd orders), which stays numerically stable at
//! the orders and narrow bands used for ECG conditioning.

pub mod butterworth;
pub mod notch;

pub use butterworth::{bandpass, butterworth, BandType};
pub use notch::notch;

/// Single biquad section, Direct Form I.
#[derive(Debug, Clone)]
pub struct BiquadSection {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl BiquadSection {
    /// Section from normalized coefficients (a0 already divided out).
    pub fn new(b0: f32, b1: f32, b2: f32, a1: f32, a2: f32) -> Self {
        Self {
            b0,
            b1,
            b2,
            a1,
            a2,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;
        output
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// First-order section for odd filter orders.
#[derive(Debug, Clone)]
pub struct FirstOrderSection {
    b0: f32,
    b1: f32,
    a1: f32,
    x1: f32,
    y1: f32,
}

impl FirstOrderSection {
    /// Section from normalized coefficients.
    pub fn new(b0: f32, b1: f32, a1: f32) -> Self {
        Self {
            b0,
            b1,
            a1,
            x1: 0.0,
            y1: 0.0,
        }
    }

    fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 - self.a1 * self.y1;
        self.x1 = input;
        self.y1 = output;
        output
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}

/// Cascade of sections applied in sequence.
#[derive(Debug, Clone, Default)]
pub struct FilterCascade {
    biquads: Vec<BiquadSection>,
    first_order: Option<FirstOrderSection>,
}

impl FilterCascade {
    /// Cascade from explicit sections.
    pub fn new(biquads: Vec<BiquadSection>, first_order: Option<FirstOrderSection>) -> Self {
        Self {
            biquads,
            first_order,
        }
    }

    /// Append every section of `other` to this cascade.
    pub fn chain(mut self, other: FilterCascade) -> Self {
        self.biquads.extend(other.biquads);
        if self.first_order.is_none() {
            self.first_order = other.first_order;
        } else if let Some(section) = other.first_order {
            // Two first-order sections combine into one biquad-equivalent
            // path; keep them both by promoting the incoming one.
            self.biquads
                .push(BiquadSection::new(section.b0, section.b1, 0.0, section.a1, 0.0));
        }
        self
    }

    /// Run one sample through every section.
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let mut output = input;
        for section in &mut self.biquads {
            output = section.process(output);
        }
        if let Some(section) = &mut self.first_order {
            output = section.process(output);
        }
        output
    }

    /// Clear all delay-line state.
    pub fn reset(&mut self) {
        for section in &mut self.biquads {
            section.reset();
        }
        if let Some(section) = &mut self.first_order {
            section.reset();
        }
    }

    /// Number of sections in the cascade.
    pub fn section_count(&self) -> usize {
        self.biquads.len() + usize::from(self.first_order.is_some())
    }

    /// Equivalent single-filter order.
    pub fn effective_order(&self) -> usize {
        2 * self.biquads.len() + usize::from(self.first_order.is_some())
    }

    /// Causal forward pass over a whole signal.
    pub fn apply_forward(&mut self, signal: &[f32]) -> Vec<f32> {
        self.reset();
        signal.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Forward-backward (zero-phase) pass over a whole signal.
    ///
    /// The signal is extended at both ends by odd reflection before the
    /// forward pass, which suppresses the startup transient of each
    /// direction. Output length always equals input length.
    pub fn apply_zero_phase(&mut self, signal: &[f32]) -> Vec<f32> {
        let n = signal.len();
        if n == 0 {
            return Vec::new();
        }

        let pad = (3 * (self.effective_order() + 1)).min(n - 1);
        let mut extended = Vec::with_capacity(n + 2 * pad);
        for i in (1..=pad).rev() {
            extended.push(2.0 * signal[0] - signal[i]);
        }
        extended.extend_from_slice(signal);
        let last = signal[n - 1];
        for i in 1..=pad {
            extended.push(2.0 * last - signal[n - 1 - i]);
        }

        let mut forward = self.apply_forward(&extended);
        forward.reverse();
        let mut backward = self.apply_forward(&forward);
        backward.reverse();

        backward[pad..pad + n].to_vec()
    }
}
