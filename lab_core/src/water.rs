//! # Water Density
//!
//! Temperature-corrected density of the water bath used in every buoyancy
//! weighing. Quadratic fit, valid for 0-100 °C:
//!
//! ```text
//! ρw(T) = 0.9998395 + 6.7887e-5·T − 9.0907e-6·T²   [g/cm³]
//! ```
//!
//! The function is total: out-of-range temperatures still return a number.
//! Flagging a suspicious bath temperature is the job of
//! [`validation`](crate::validation).
//!
//! ## Example
//!
//! ```rust
//! use lab_core::water::density;
//!
//! // Within 0.1 % of the tabulated 0.99821 g/cm³ at 20 °C
//! let rho = density(20.0);
//! assert!((rho - 0.99821).abs() / 0.99821 < 1e-3);
//! ```

/// Density at 0 °C (g/cm³)
const RHO_0: f64 = 0.9998395;

/// Linear coefficient (g/cm³/°C)
const LINEAR: f64 = 6.7887e-5;

/// Quadratic coefficient (g/cm³/°C²)
const QUADRATIC: f64 = 9.0907e-6;

/// Water density in g/cm³ at `temp_c` degrees Celsius.
pub fn density(temp_c: f64) -> f64 {
    RHO_0 + LINEAR * temp_c - QUADRATIC * temp_c.powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_point() {
        // The fit sits 0.07 % under the tabulated value at 20 °C
        assert!((density(20.0) - 0.99821).abs() / 0.99821 < 1e-3);
        assert!((density(20.0) - 0.997561).abs() < 1e-6);
        assert!((density(26.0) - 0.99546).abs() < 1e-5);
    }

    #[test]
    fn test_zero_celsius_is_constant_term() {
        assert_eq!(density(0.0), RHO_0);
    }

    #[test]
    fn test_strictly_decreasing_above_4c() {
        let mut prev = density(4.0);
        let mut t = 4.0;
        while t < 100.0 {
            t += 0.5;
            let rho = density(t);
            assert!(rho < prev, "density not decreasing at {} °C", t);
            prev = rho;
        }
    }

    #[test]
    fn test_total_over_extreme_temperatures() {
        assert!(density(-40.0).is_finite());
        assert!(density(250.0).is_finite());
    }
}
