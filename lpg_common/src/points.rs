use std::{
    fmt::Display,
    iter::Sum,
    ops::Add,
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

/// Number of stored units per whole point. Amounts are kept to two decimal places.
pub const POINTS_SCALE: i64 = 100;

//--------------------------------------       Points        ---------------------------------------------------------
/// A loyalty points amount, held as an integer number of hundredths of a point.
///
/// On the wire (JSON) a `Points` value is a plain decimal number, e.g. `729.98`, since that is what both the accrual
/// authority and API clients speak.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[sqlx(transparent)]
pub struct Points(i64);

op!(binary Points, Add, add);
op!(binary Points, Sub, sub);
op!(inplace Points, AddAssign, add_assign);
op!(inplace Points, SubAssign, sub_assign);
op!(unary Points, Neg, neg);

impl Sum for Points {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Value cannot be represented as a points amount: {0}")]
pub struct PointsConversionError(String);

impl From<i64> for Points {
    /// Interprets the value as hundredths of a point.
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<f64> for Points {
    type Error = PointsConversionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(PointsConversionError(format!("{value} is not a finite number")));
        }
        let scaled = (value * POINTS_SCALE as f64).round();
        if scaled > i64::MAX as f64 || scaled < i64::MIN as f64 {
            return Err(PointsConversionError(format!("{value} is out of range")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(scaled as i64))
    }
}

impl Display for Points {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = POINTS_SCALE.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / scale, abs % scale)
    }
}

impl Points {
    pub fn zero() -> Self {
        Self(0)
    }

    /// The raw value, in hundredths of a point.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_whole(points: i64) -> Self {
        Self(points * POINTS_SCALE)
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / POINTS_SCALE as f64
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl Serialize for Points {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Points {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Points::try_from(value).map_err(de::Error::custom)
    }
}
