//! Fuel pricing for delivery estimates.
//!
//! Cost is a fixed positive scaling of distance for a single query, which is
//! what lets the path finder minimise distance and report cost afterwards.

use crate::error::{Error, Result};

/// Validated fuel price and vehicle autonomy for one delivery query.
///
/// Both values are finite and strictly positive; [`FuelConfig::new`] is the
/// only way to build one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelConfig {
    liter_price: f64,
    autonomy: f64,
}

impl FuelConfig {
    /// Validate and build a fuel configuration.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfiguration`] when either value is not a
    /// finite number greater than zero.
    pub fn new(liter_price: f64, autonomy: f64) -> Result<Self> {
        validate_positive("liter_price", liter_price)?;
        validate_positive("autonomy", autonomy)?;
        Ok(Self {
            liter_price,
            autonomy,
        })
    }

    /// Fuel price per liter.
    pub fn liter_price(&self) -> f64 {
        self.liter_price
    }

    /// Distance the vehicle covers per liter.
    pub fn autonomy(&self) -> f64 {
        self.autonomy
    }

    /// Liters burned over `distance`.
    pub fn liters_for(&self, distance: f64) -> f64 {
        distance / self.autonomy
    }

    /// Monetary cost of covering `distance`: `distance / autonomy * liter_price`.
    ///
    /// No intermediate rounding is applied.
    pub fn cost_for(&self, distance: f64) -> f64 {
        self.liters_for(distance) * self.liter_price
    }
}

fn validate_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::InvalidConfiguration {
            message: format!("{field} must be finite"),
        });
    }
    if value <= 0.0 {
        return Err(Error::InvalidConfiguration {
            message: format!("{field} must be greater than zero, got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_follows_formula() {
        let fuel = FuelConfig::new(2.5, 10.0).unwrap();
        assert_eq!(fuel.cost_for(150.0), 150.0 / 10.0 * 2.5);
        assert_eq!(fuel.cost_for(150.0), 37.5);
        assert_eq!(fuel.liters_for(130.0), 13.0);
        assert_eq!(fuel.cost_for(130.0), fuel.liters_for(130.0) * fuel.liter_price());
        assert_eq!(fuel.cost_for(0.0), 0.0);
    }

    #[test]
    fn rejects_zero_autonomy() {
        let error = FuelConfig::new(2.5, 0.0).unwrap_err();
        assert!(matches!(error, Error::InvalidConfiguration { .. }));
        assert!(error.to_string().contains("autonomy"));
    }

    #[test]
    fn rejects_negative_price() {
        let error = FuelConfig::new(-1.0, 10.0).unwrap_err();
        assert!(error.to_string().contains("liter_price"));
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(FuelConfig::new(f64::NAN, 10.0).is_err());
        assert!(FuelConfig::new(2.5, f64::INFINITY).is_err());
    }
}
