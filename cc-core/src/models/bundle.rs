/// A consumption bundle: quantities of good 0 and good 1.
///
/// Both quantities must be finite and non-negative. A bundle with a zero
/// quantity is a valid point of the consumption set (it lies on an axis), but
/// Cobb-Douglas utility is only evaluated for strictly positive bundles; see
/// [`Preferences::utility`](crate::models::Preferences::utility).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "BundleDto", into = "BundleDto")
)]
pub struct Bundle {
    x0: f64,
    x1: f64,
}

impl Bundle {
    /// Creates a new bundle, validating both quantities
    pub fn new(x0: f64, x1: f64) -> Result<Self, BundleError> {
        Self::try_from(BundleDto { x0, x1 })
    }

    /// Creates a bundle without validation; the caller guarantees both
    /// quantities are finite and non-negative.
    pub(crate) fn new_unchecked(x0: f64, x1: f64) -> Self {
        Self { x0, x1 }
    }

    /// The quantity of good 0
    pub fn x0(&self) -> f64 {
        self.x0
    }

    /// The quantity of good 1
    pub fn x1(&self) -> f64 {
        self.x1
    }

    /// Whether both quantities are strictly positive, i.e. the bundle is in
    /// the interior of the consumption set
    pub fn is_interior(&self) -> bool {
        self.x0 > 0.0 && self.x1 > 0.0
    }
}

impl From<Bundle> for (f64, f64) {
    fn from(value: Bundle) -> Self {
        (value.x0, value.x1)
    }
}

/// DTO to ensure that we always validate when we deserialize from an untrusted source
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BundleDto {
    /// The quantity of good 0
    pub x0: f64,
    /// The quantity of good 1
    pub x1: f64,
}

impl From<Bundle> for BundleDto {
    fn from(value: Bundle) -> Self {
        Self {
            x0: value.x0,
            x1: value.x1,
        }
    }
}

impl TryFrom<BundleDto> for Bundle {
    type Error = BundleError;

    fn try_from(value: BundleDto) -> Result<Self, Self::Error> {
        let BundleDto { x0, x1 } = value;

        if x0.is_nan() || x1.is_nan() {
            return Err(BundleError::NaN);
        }
        if x0.is_infinite() || x1.is_infinite() {
            return Err(BundleError::Infinity);
        }
        if x0 < 0.0 || x1 < 0.0 {
            return Err(BundleError::Negative);
        }

        Ok(Self { x0, x1 })
    }
}

/// Errors that can occur when creating a Bundle
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum BundleError {
    /// Error when either quantity is NaN
    #[error("NaN value encountered")]
    NaN,
    /// Error when either quantity is infinite
    #[error("Quantities cannot be infinite")]
    Infinity,
    /// Error when either quantity is negative
    #[error("Quantities cannot be negative")]
    Negative,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bundle() {
        let bundle = Bundle::new(40.0, 60.0).unwrap();
        assert_eq!(bundle.x0(), 40.0);
        assert_eq!(bundle.x1(), 60.0);
        assert!(bundle.is_interior());
    }

    #[test]
    fn test_boundary_bundle() {
        let bundle = Bundle::new(0.0, 100.0).unwrap();
        assert!(!bundle.is_interior());
    }

    #[test]
    fn test_invalid_bundles() {
        assert_eq!(Bundle::new(f64::NAN, 1.0).unwrap_err(), BundleError::NaN);
        assert_eq!(
            Bundle::new(1.0, f64::INFINITY).unwrap_err(),
            BundleError::Infinity
        );
        assert_eq!(Bundle::new(-1.0, 1.0).unwrap_err(), BundleError::Negative);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Bundle = serde_json::from_str(r#"{"x0": 1.0, "x1": 2.0}"#).unwrap();
        assert_eq!(ok, Bundle::new(1.0, 2.0).unwrap());

        let err = serde_json::from_str::<Bundle>(r#"{"x0": -1.0, "x1": 2.0}"#);
        assert!(err.is_err());
    }
}
