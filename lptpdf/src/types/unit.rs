//! Linear measurements used for page geometry and their conversion into default user space
//! units.

use std::fmt::Display;
use std::str::FromStr;

/// Internal representation options for the [`Unit`] type. By default, the default user space unit
/// is 1/72th of an inch. `Inner` allows us to use other measurement units for the value and to
/// convert between them.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
enum Inner {
    /// Size expressed in millimeters.
    Mm(f64),

    /// Size expressed in centimeters.
    Cm(f64),

    /// Size expressed in inches.
    In(f64),
}

/// `Unit` represents a linear value (page size, margin, bar height, ...) that can be configured
/// in inches, centimeters or millimeters and is emitted into PDF syntax in default user space
/// units (1/72th of an inch).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Unit {
    inner: Inner,
}

impl Unit {
    /// Creates a new `Unit` from the specified number of millimeters.
    ///
    /// # Example
    ///
    /// ```
    /// # use lptpdf::types::unit::Unit;
    /// let unit = Unit::from_mm(25.4);
    /// assert_eq!(unit.into_user_unit(), 72.0);
    /// ```
    pub const fn from_mm(mm: f64) -> Self {
        Self {
            inner: Inner::Mm(mm),
        }
    }

    /// Creates a new `Unit` from the specified number of centimeters.
    ///
    /// # Example
    ///
    /// ```
    /// # use lptpdf::types::unit::Unit;
    /// let unit = Unit::from_cm(2.54);
    /// assert_eq!(unit.into_user_unit(), 72.0);
    /// ```
    pub const fn from_cm(cm: f64) -> Self {
        Self {
            inner: Inner::Cm(cm),
        }
    }

    /// Creates a new `Unit` from the specified number of inches.
    ///
    /// # Example
    ///
    /// ```
    /// # use lptpdf::types::unit::Unit;
    /// let unit = Unit::from_inch(1.0);
    /// assert_eq!(unit.into_user_unit(), 72.0);
    /// ```
    pub const fn from_inch(inch: f64) -> Self {
        Self {
            inner: Inner::In(inch),
        }
    }

    /// Converts the `Unit` into default user space units to be specified in a PDF document,
    /// regardless of how this `Unit` is currently internally represented.
    pub const fn into_user_unit(self) -> f64 {
        // by default 1 user space unit is 1/72th of an inch
        self.into_inches() * 72.0
    }

    /// Converts the `Unit` into inches, the measure all lineprinter pitch math is done in.
    pub const fn into_inches(self) -> f64 {
        match self.inner {
            Inner::Mm(mm) => mm / 25.4,
            Inner::Cm(cm) => cm / 2.54,
            Inner::In(inch) => inch,
        }
    }

    /// Whether the measurement is negative.
    pub const fn is_negative(self) -> bool {
        self.into_inches() < 0.0
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unit = self.into_user_unit();
        f.write_fmt(format_args!("{unit}"))
    }
}

impl FromStr for Unit {
    type Err = ParseUnitError;

    /// Parses a linear value with an optional unit suffix: `"0.5"` and `"0.5in"` are inches,
    /// `"12.7mm"` millimeters, `"1.27cm"` centimeters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (number, ctor): (&str, fn(f64) -> Unit) = if let Some(v) = s.strip_suffix("mm") {
            (v, Unit::from_mm)
        } else if let Some(v) = s.strip_suffix("cm") {
            (v, Unit::from_cm)
        } else if let Some(v) = s.strip_suffix("in") {
            (v, Unit::from_inch)
        } else {
            (s, Unit::from_inch)
        };

        number
            .trim()
            .parse::<f64>()
            .map(ctor)
            .map_err(|_| ParseUnitError {
                input: s.to_string(),
            })
    }
}

/// The input could not be read as a linear measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseUnitError {
    input: String,
}

impl Display for ParseUnitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "not a linear measurement: {:?}", self.input)
    }
}

impl std::error::Error for ParseUnitError {}
