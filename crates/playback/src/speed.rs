//! Speed multiplier for time-based transitions.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::PlaybackError;

/// Positive multiplier applied to transition durations.
///
/// Speed never changes the number or order of steps, only how long each
/// transition takes. [`Speed::MAX`] collapses durations toward zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Speed(f64);

impl Speed {
    pub const QUARTER: Speed = Speed(0.25);
    pub const HALF: Speed = Speed(0.5);
    pub const NORMAL: Speed = Speed(1.0);
    pub const DOUBLE: Speed = Speed(2.0);
    pub const TRIPLE: Speed = Speed(3.0);
    pub const FIVE: Speed = Speed(5.0);
    pub const MAX: Speed = Speed(99_999.0);

    /// Slowest accepted multiplier.
    pub const MIN_MULTIPLIER: f64 = 0.01;

    /// The presets offered by the speed selector, slowest first.
    pub const PRESETS: [(&'static str, Speed); 7] = [
        ("0.25x", Self::QUARTER),
        ("0.5x", Self::HALF),
        ("Normal", Self::NORMAL),
        ("2x", Self::DOUBLE),
        ("3x", Self::TRIPLE),
        ("5x", Self::FIVE),
        ("Max", Self::MAX),
    ];

    pub fn new(multiplier: f64) -> Result<Self, PlaybackError> {
        if multiplier.is_finite() && multiplier >= Self::MIN_MULTIPLIER {
            Ok(Self(multiplier))
        } else {
            Err(PlaybackError::InvalidSpeed(multiplier.to_string()))
        }
    }

    pub fn multiplier(self) -> f64 {
        self.0
    }

    /// `base / multiplier`, saturating at [`Duration::MAX`].
    pub fn scale(self, base: Duration) -> Duration {
        Duration::try_from_secs_f64(base.as_secs_f64() / self.0).unwrap_or(Duration::MAX)
    }

    pub fn is_max(self) -> bool {
        self.0 >= Self::MAX.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl FromStr for Speed {
    type Err = PlaybackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        match text.as_str() {
            "max" => return Ok(Self::MAX),
            "normal" => return Ok(Self::NORMAL),
            _ => {}
        }
        let number = text.strip_suffix('x').unwrap_or(&text);
        number
            .parse::<f64>()
            .map_err(|_| PlaybackError::InvalidSpeed(s.to_owned()))
            .and_then(|m| Self::new(m).map_err(|_| PlaybackError::InvalidSpeed(s.to_owned())))
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Self::PRESETS.iter().find(|(_, speed)| speed == self) {
            Some((label, _)) => f.write_str(label),
            None => write!(f, "{}x", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("2x".parse::<Speed>().unwrap(), Speed::DOUBLE);
        assert_eq!("0.5".parse::<Speed>().unwrap(), Speed::HALF);
        assert_eq!(" Normal ".parse::<Speed>().unwrap(), Speed::NORMAL);
        assert_eq!("MAX".parse::<Speed>().unwrap(), Speed::MAX);
        assert_eq!("1.5x".parse::<Speed>().unwrap().multiplier(), 1.5);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(matches!("0".parse::<Speed>(), Err(PlaybackError::InvalidSpeed(_))));
        assert!(matches!("-2x".parse::<Speed>(), Err(PlaybackError::InvalidSpeed(_))));
        assert!(matches!("fast".parse::<Speed>(), Err(PlaybackError::InvalidSpeed(_))));
        assert!(Speed::new(f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_tiny_multiplier() {
        assert!(matches!("1e-300".parse::<Speed>(), Err(PlaybackError::InvalidSpeed(_))));
        assert!(matches!("0.001x".parse::<Speed>(), Err(PlaybackError::InvalidSpeed(_))));
        assert!(Speed::new(0.009).is_err());
        let slowest = Speed::new(Speed::MIN_MULTIPLIER).unwrap();
        let scaled = slowest.scale(Duration::from_secs(1));
        assert!(scaled > Duration::from_secs(99) && scaled <= Duration::from_secs(101));
    }

    #[test]
    fn test_scale_saturates() {
        let slowest = Speed::new(Speed::MIN_MULTIPLIER).unwrap();
        assert_eq!(slowest.scale(Duration::MAX), Duration::MAX);
    }

    #[test]
    fn test_scale() {
        let base = Duration::from_millis(1000);
        assert_eq!(Speed::NORMAL.scale(base), base);
        assert_eq!(Speed::DOUBLE.scale(base), Duration::from_millis(500));
        assert_eq!(Speed::QUARTER.scale(base), Duration::from_millis(4000));
        assert!(Speed::MAX.scale(base) < Duration::from_millis(1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Speed::NORMAL.to_string(), "Normal");
        assert_eq!(Speed::MAX.to_string(), "Max");
        assert_eq!(Speed::new(1.5).unwrap().to_string(), "1.5x");
    }
}
