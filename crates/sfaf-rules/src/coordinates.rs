//! # Antenna Coordinates (fields 303 / 403)
//!
//! SFAF coordinates are written as `DDMMSS[N|S]DDDMMSS[E|W]` with no
//! separators, e.g. `303000N0865000W`. Degrees, minutes and seconds are
//! range-checked; parsing yields decimal degrees for downstream consumers.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why a coordinate value was rejected. The `Display` text is the validator
/// diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    /// Not the `DDMMSS[NS]DDDMMSS[EW]` shape.
    #[error("coordinates must be DDMMSS[N|S]DDDMMSS[E|W] with no separators (e.g., 303000N0865000W)")]
    Format,
    /// Latitude degrees above 90.
    #[error("latitude degrees must be 0-90, got {0}")]
    LatitudeDegrees(u32),
    /// Longitude degrees above 180.
    #[error("longitude degrees must be 0-180, got {0}")]
    LongitudeDegrees(u32),
    /// Minutes of 60 or more.
    #[error("minutes must be 0-59, got {0}")]
    Minutes(u32),
    /// Seconds of 60 or more.
    #[error("seconds must be 0-59, got {0}")]
    Seconds(u32),
    /// Whole-degree limit reached with non-zero minutes or seconds.
    #[error("{axis} must not exceed {max} degrees")]
    BeyondLimit {
        /// `latitude` or `longitude`.
        axis: &'static str,
        /// 90 or 180.
        max: u32,
    },
}

/// One axis in degrees, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dms {
    /// Whole degrees.
    pub degrees: u32,
    /// Minutes, `0..60`.
    pub minutes: u32,
    /// Seconds, `0..60`.
    pub seconds: u32,
    /// `N`, `S`, `E` or `W`.
    pub hemisphere: char,
}

impl Dms {
    /// Signed decimal degrees; south and west are negative.
    pub fn to_decimal(&self) -> f64 {
        let magnitude = f64::from(self.degrees)
            + f64::from(self.minutes) / 60.0
            + f64::from(self.seconds) / 3600.0;
        match self.hemisphere {
            'S' | 'W' => -magnitude,
            _ => magnitude,
        }
    }

    fn parse(digits: &str, hemisphere: char, max_degrees: u32) -> Result<Self, CoordinateError> {
        let split = digits.len() - 4;
        let number = |s: &str| s.parse::<u32>().map_err(|_| CoordinateError::Format);
        let degrees = number(&digits[..split])?;
        let minutes = number(&digits[split..split + 2])?;
        let seconds = number(&digits[split + 2..])?;

        if degrees > max_degrees {
            return Err(if max_degrees == 90 {
                CoordinateError::LatitudeDegrees(degrees)
            } else {
                CoordinateError::LongitudeDegrees(degrees)
            });
        }
        if minutes >= 60 {
            return Err(CoordinateError::Minutes(minutes));
        }
        if seconds >= 60 {
            return Err(CoordinateError::Seconds(seconds));
        }
        if degrees == max_degrees && (minutes > 0 || seconds > 0) {
            let axis = if max_degrees == 90 { "latitude" } else { "longitude" };
            return Err(CoordinateError::BeyondLimit { axis, max: max_degrees });
        }
        Ok(Self {
            degrees,
            minutes,
            seconds,
            hemisphere,
        })
    }
}

/// A parsed antenna position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinates {
    /// Latitude, hemisphere `N` or `S`.
    pub latitude: Dms,
    /// Longitude, hemisphere `E` or `W`.
    pub longitude: Dms,
}

impl Coordinates {
    /// `(latitude, longitude)` in signed decimal degrees.
    pub fn to_decimal(&self) -> (f64, f64) {
        (self.latitude.to_decimal(), self.longitude.to_decimal())
    }
}

impl FromStr for Coordinates {
    type Err = CoordinateError;

    /// Whitespace is ignored and letters are case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if compact.len() != 15 || !compact.is_ascii() {
            return Err(CoordinateError::Format);
        }

        let (lat_digits, rest) = compact.split_at(6);
        let (lat_hemi, rest) = rest.split_at(1);
        let (lon_digits, lon_hemi) = rest.split_at(7);

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        let lat_hemi = lat_hemi.chars().next().filter(|c| matches!(c, 'N' | 'S'));
        let lon_hemi = lon_hemi.chars().next().filter(|c| matches!(c, 'E' | 'W'));
        let (Some(lat_hemi), Some(lon_hemi)) = (lat_hemi, lon_hemi) else {
            return Err(CoordinateError::Format);
        };
        if !all_digits(lat_digits) || !all_digits(lon_digits) {
            return Err(CoordinateError::Format);
        }

        Ok(Self {
            latitude: Dms::parse(lat_digits, lat_hemi, 90)?,
            longitude: Dms::parse(lon_digits, lon_hemi, 180)?,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat = &self.latitude;
        let lon = &self.longitude;
        write!(
            f,
            "{:02}{:02}{:02}{}{:03}{:02}{:02}{}",
            lat.degrees, lat.minutes, lat.seconds, lat.hemisphere,
            lon.degrees, lon.minutes, lon.seconds, lon.hemisphere
        )
    }
}
