//! Transform pipelines
//!
//! A pipeline is a validated chain of [`Stage`]s taking device values
//! in [0, 1] on one end and producing device values on the other, with
//! the profile connection space in the middle. Building one from a
//! pair of profiles is the job of [`builder::build_pipeline`].

pub mod builder;
pub mod stages;

pub use builder::build_pipeline;
pub use stages::Stage;

use crate::error::BuildError;

/// Widest channel count a pipeline endpoint can have (CMYK)
pub const MAX_CHANNELS: usize = 4;

/// A validated chain of processing stages
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Stage>,
    input_channels: usize,
    output_channels: usize,
}

impl Pipeline {
    /// Validate stage chaining and wrap the stages
    ///
    /// Every stage's input channel count must equal the previous
    /// stage's output channel count.
    pub fn new(stages: Vec<Stage>) -> Result<Self, BuildError> {
        let mut prev_out = None;
        for (i, stage) in stages.iter().enumerate() {
            if let Some(expected) = prev_out {
                if stage.input_channels() != expected {
                    return Err(BuildError::ComponentCountMismatch {
                        stage: i,
                        expected,
                        actual: stage.input_channels(),
                    });
                }
            }
            prev_out = Some(stage.output_channels());
        }

        let input_channels = stages.first().map_or(0, Stage::input_channels);
        let output_channels = prev_out.unwrap_or(0);

        Ok(Self {
            stages,
            input_channels,
            output_channels,
        })
    }

    pub fn input_channels(&self) -> usize {
        self.input_channels
    }

    pub fn output_channels(&self) -> usize {
        self.output_channels
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Evaluate one sample; `input` and `output` must cover the
    /// pipeline's channel counts
    pub fn eval(&self, input: &[f64], output: &mut [f64]) {
        let mut a = [0.0f64; MAX_CHANNELS];
        let mut b = [0.0f64; MAX_CHANNELS];
        a[..self.input_channels].copy_from_slice(&input[..self.input_channels]);

        for stage in &self.stages {
            stage.eval(&a[..stage.input_channels()], &mut b[..stage.output_channels()]);
            a = b;
        }

        output[..self.output_channels].copy_from_slice(&a[..self.output_channels]);
    }
}
