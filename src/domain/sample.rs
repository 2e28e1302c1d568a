// ============================================================
// Layer 3 - Signal Sample
// ============================================================
// One vibration-signal example as the model sees it: a channel
// map of shape [1, width] plus its label.

/// The label of one row, shaped by the task mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Label {
    Scalar(f32),
    /// [fault_detection, location, diagnosis]
    Multi([f32; 3]),
}

impl Label {
    /// The value used as a class id. Multi-label rows contribute
    /// their fault-detection component.
    pub fn class_value(&self) -> f32 {
        match self {
            Label::Scalar(v) => *v,
            Label::Multi(v)  => v[0],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalSample {
    /// Channel-first signal, always a single channel.
    pub signal: Vec<Vec<f32>>,
    pub label:  Label,
}

impl SignalSample {
    /// Wrap a raw feature row with a leading channel dimension.
    pub fn new(features: Vec<f32>, label: Label) -> Self {
        Self { signal: vec![features], label }
    }

    /// [channels, width]
    pub fn shape(&self) -> [usize; 2] {
        [self.signal.len(), self.signal.first().map_or(0, Vec::len)]
    }
}
