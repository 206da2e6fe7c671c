use std::time::Duration;

use super::grid::RawSeries;
use super::{ColorMode, Error, Heatmap};
use crate::config::Config;
use crate::trace::SampleProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GrowYBucket,
    ShrinkYBucket,
    GrowXBucket,
    ShrinkXBucket,
    ToggleColorMode,
    SetColorMode(ColorMode),
}

/// What a [`Command`] ended up touching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    /// Raw samples kept, grid rebuilt for a new Y bucket size.
    Regridded,
    /// Samples fetched again for a new X bucket size.
    Resampled,
    /// Only the color mode changed.
    Recolored,
}

/// Owns the heatmap and steps its bucket sizes in response to user input.
#[derive(Debug)]
pub struct Controller {
    heatmap: Heatmap,
    y_bucket_sizes: Vec<u32>,
    y_step: usize,
    x_bucket_step: Duration,
    min_x_bucket_size: Duration,
}

impl Controller {
    pub fn new(config: &Config, provider: &impl SampleProvider) -> Result<Self, Error> {
        let config = config.clone().sanitized();

        let y_step = match config
            .y_bucket_sizes
            .iter()
            .position(|size| *size == config.initial_y_bucket_size)
        {
            Some(step) => step,
            None => {
                log::warn!(
                    "Initial Y bucket size {} is not among {:?}, starting at {}",
                    config.initial_y_bucket_size,
                    config.y_bucket_sizes,
                    config.y_bucket_sizes[0]
                );
                0
            }
        };

        let x_bucket_size = config.initial_x_bucket_size();
        let raw = RawSeries::new(provider.sample(x_bucket_size))?;
        let heatmap = Heatmap::new(
            raw,
            config.max_y,
            x_bucket_size,
            config.y_bucket_sizes[y_step],
            config.color_mode,
        )?;

        Ok(Self {
            heatmap,
            x_bucket_step: config.x_bucket_step(),
            min_x_bucket_size: config.min_x_bucket_size(),
            y_bucket_sizes: config.y_bucket_sizes,
            y_step,
        })
    }

    pub fn heatmap(&self) -> &Heatmap {
        &self.heatmap
    }

    pub fn heatmap_mut(&mut self) -> &mut Heatmap {
        &mut self.heatmap
    }

    pub fn apply(
        &mut self,
        command: Command,
        provider: &impl SampleProvider,
    ) -> Result<Outcome, Error> {
        match command {
            Command::GrowYBucket => self.step_y(self.y_step.saturating_add(1)),
            Command::ShrinkYBucket => self.step_y(self.y_step.saturating_sub(1)),
            Command::GrowXBucket => {
                let size = self.heatmap.x_bucket_size().saturating_add(self.x_bucket_step);
                self.resample(size, provider)
            }
            Command::ShrinkXBucket => {
                let size = self
                    .heatmap
                    .x_bucket_size()
                    .saturating_sub(self.x_bucket_step)
                    .max(self.min_x_bucket_size);
                self.resample(size, provider)
            }
            Command::ToggleColorMode => {
                let mode = self.heatmap.color_mode().toggled();
                Ok(self.recolor(mode))
            }
            Command::SetColorMode(mode) => Ok(self.recolor(mode)),
        }
    }

    fn step_y(&mut self, step: usize) -> Result<Outcome, Error> {
        let step = step.min(self.y_bucket_sizes.len() - 1);
        if step == self.y_step {
            return Ok(Outcome::Unchanged);
        }

        self.heatmap.set_y_bucket_size(self.y_bucket_sizes[step])?;
        self.y_step = step;
        Ok(Outcome::Regridded)
    }

    fn resample(
        &mut self,
        x_bucket_size: Duration,
        provider: &impl SampleProvider,
    ) -> Result<Outcome, Error> {
        if x_bucket_size == self.heatmap.x_bucket_size() {
            return Ok(Outcome::Unchanged);
        }

        let raw = RawSeries::new(provider.sample(x_bucket_size))?;
        self.heatmap.set_data(raw, x_bucket_size)?;
        Ok(Outcome::Resampled)
    }

    fn recolor(&mut self, mode: ColorMode) -> Outcome {
        if mode == self.heatmap.color_mode() {
            return Outcome::Unchanged;
        }
        self.heatmap.set_color_mode(mode);
        Outcome::Recolored
    }
}
