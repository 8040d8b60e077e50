//! Search geometry: center point parsing, radio-horizon radius estimation,
//! and the user-facing search parameters.

use std::fmt;

use crate::ValidationError;

/// Radio horizon constant for `d_km = K * sqrt(h_m)`.
const RADIO_HORIZON_KM_PER_SQRT_M: f64 = 3.57;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    /// Parse a combined `"lat, lon"` text field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedCoordinates`] unless the input is
    /// exactly two comma-separated numbers, and
    /// [`ValidationError::CoordinatesOutOfRange`] when either value falls
    /// outside the WGS84 range.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedCoordinates(raw.trim().to_owned());

        let mut parts = raw.split(',').map(str::trim);
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        let lat = lat.parse::<f64>().map_err(|_| malformed())?;
        let lon = lon.parse::<f64>().map_err(|_| malformed())?;

        if !lat.is_finite()
            || !lon.is_finite()
            || !(-90.0..=90.0).contains(&lat)
            || !(-180.0..=180.0).contains(&lon)
        {
            return Err(ValidationError::CoordinatesOutOfRange { lat, lon });
        }

        Ok(Self { lat, lon })
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}

/// Estimated radio coverage radius in meters for an antenna at `height_m`.
///
/// Returns `0.0` for NaN, infinite, or non-positive heights.
#[must_use]
pub fn estimate_radius_m(height_m: f64) -> f64 {
    if !height_m.is_finite() || height_m <= 0.0 {
        return 0.0;
    }
    RADIO_HORIZON_KM_PER_SQRT_M * height_m.sqrt() * 1000.0
}

/// Same as [`estimate_radius_m`] for raw text input; unparsable text yields `0.0`.
#[must_use]
pub fn estimate_radius_text(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .map_or(0.0, estimate_radius_m)
}

/// Hint text shown next to the height input.
#[must_use]
pub fn radius_hint(radius_m: f64) -> String {
    if radius_m <= 0.0 {
        return "enter an antenna height to estimate the radio horizon".to_owned();
    }
    format!(
        "~{:.1} km radio horizon ({radius_m:.0} m)",
        radius_m / 1000.0
    )
}

/// Inputs for one area search.
///
/// The manual radius, once set, overrides the height-derived radius until it
/// is cleared with an empty input.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParameters {
    pub center: LatLon,
    /// Antenna height in meters; NaN when the input was not numeric.
    pub height_m: f64,
    pub manual_radius_m: Option<f64>,
}

impl SearchParameters {
    /// Build parameters from the three raw text fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the coordinates or a non-empty
    /// manual radius cannot be parsed.
    pub fn parse(coords: &str, height: &str, manual_radius: &str) -> Result<Self, ValidationError> {
        let center = LatLon::parse(coords)?;
        let mut params = Self {
            center,
            height_m: f64::NAN,
            manual_radius_m: None,
        };
        params.set_height(height);
        params.set_manual_radius(manual_radius)?;
        Ok(params)
    }

    pub fn set_height(&mut self, raw: &str) {
        self.height_m = raw.trim().parse::<f64>().unwrap_or(f64::NAN);
    }

    /// Set or clear the manual radius. An empty string clears it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRadius`] for non-numeric input; the
    /// previous value is kept in that case.
    pub fn set_manual_radius(&mut self, raw: &str) -> Result<(), ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.manual_radius_m = None;
            return Ok(());
        }
        let value = trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ValidationError::InvalidRadius(trimmed.to_owned()))?;
        self.manual_radius_m = Some(value);
        Ok(())
    }

    #[must_use]
    pub fn derived_radius_m(&self) -> f64 {
        estimate_radius_m(self.height_m)
    }

    /// The radius the search will use: manual if present, else derived.
    #[must_use]
    pub fn radius_m(&self) -> f64 {
        self.manual_radius_m
            .unwrap_or_else(|| self.derived_radius_m())
    }

    /// [`Self::radius_m`], rejecting non-positive values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroRadius`] when the effective radius is not positive.
    pub fn search_radius_m(&self) -> Result<f64, ValidationError> {
        let radius = self.radius_m();
        if radius > 0.0 {
            Ok(radius)
        } else {
            Err(ValidationError::ZeroRadius)
        }
    }
}
