//! Price tick and forecast vector representations.

use chrono::NaiveDateTime;

use crate::domain::error::TickpilotError;

/// A single observed price at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTick {
    pub timestamp: NaiveDateTime,
    pub price: f64,
}

/// Ordered sequence of predicted prices; index 0 is the nearest future step.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastVector(Vec<f64>);

impl ForecastVector {
    pub fn new(predictions: Vec<f64>) -> Self {
        Self(predictions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Mean of the first `horizon` predictions.
    ///
    /// Errors with [`TickpilotError::InsufficientForecastHorizon`] when fewer
    /// than `horizon` predictions are available.
    pub fn mean_over(&self, horizon: usize) -> Result<f64, TickpilotError> {
        let head = self.head(horizon)?;
        Ok(head.iter().sum::<f64>() / horizon as f64)
    }

    /// Sample standard deviation of the first `horizon` predictions.
    ///
    /// A horizon of 1 has no dispersion and yields 0.0.
    pub fn stddev_over(&self, horizon: usize) -> Result<f64, TickpilotError> {
        let head = self.head(horizon)?;
        if horizon < 2 {
            return Ok(0.0);
        }
        let mean = head.iter().sum::<f64>() / horizon as f64;
        let variance = head
            .iter()
            .map(|p| {
                let diff = p - mean;
                diff * diff
            })
            .sum::<f64>()
            / (horizon - 1) as f64;
        Ok(variance.sqrt())
    }

    fn head(&self, horizon: usize) -> Result<&[f64], TickpilotError> {
        if horizon == 0 || self.0.len() < horizon {
            return Err(TickpilotError::InsufficientForecastHorizon {
                have: self.0.len(),
                need: horizon,
            });
        }
        Ok(&self.0[..horizon])
    }
}
