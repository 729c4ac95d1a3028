// MIT License
//
// Copyright (c) 2019 Alasdair Armstrong
//
// Permission is hereby granted, free of charge, to any person
// obtaining a copy of this software and associated documentation
// files (the "Software"), to deal in the Software without
// restriction, including without limitation the rights to use, copy,
// modify, merge, publish, distribute, sublicense, and/or sell copies
// of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS
// BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN
// ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Plain value types carried across the solver boundary. These hold
//! no native handles and are valid forever, independent of any
//! session or model lifetime.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// An exact rational, always normalized: the denominator is positive
/// and shares no factor with the numerator, and zero is `0/1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    num: i128,
    den: i128,
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Rational {
    /// Fails with [`Error::NumeralOutOfRange`] if the reduced value
    /// cannot be represented, which only happens when a magnitude of
    /// exactly 2^127 survives reduction (e.g. `1 / i128::MIN`).
    pub fn new(num: i128, den: i128) -> Result<Self> {
        if den == 0 {
            return Err(Error::DivisionByZero);
        }
        let out_of_range = || Error::NumeralOutOfRange(format!("{}/{}", num, den));
        // Normalization runs on unsigned magnitudes so that
        // i128::MIN inputs cannot overflow a negation or abs.
        let negative = (num < 0) != (den < 0);
        let g = gcd(num.unsigned_abs(), den.unsigned_abs());
        let n = num.unsigned_abs() / g;
        let d = den.unsigned_abs() / g;
        let num = if negative && n == 1u128 << 127 {
            i128::MIN
        } else {
            let n = i128::try_from(n).map_err(|_| out_of_range())?;
            if negative {
                -n
            } else {
                n
            }
        };
        let den = i128::try_from(d).map_err(|_| out_of_range())?;
        Ok(Rational { num, den })
    }

    pub fn num(self) -> i128 {
        self.num
    }

    pub fn den(self) -> i128 {
        self.den
    }

    pub fn is_integer(self) -> bool {
        self.den == 1
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Rational { num: n as i128, den: 1 }
    }
}

/// Parses Z3's rational rendering, either `n` or `n/d`.
impl FromStr for Rational {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let out_of_range = || Error::NumeralOutOfRange(s.to_string());
        match s.split_once('/') {
            None => {
                let num = s.trim().parse().map_err(|_| out_of_range())?;
                Ok(Rational { num, den: 1 })
            }
            Some((num, den)) => {
                let num = num.trim().parse().map_err(|_| out_of_range())?;
                let den = den.trim().parse().map_err(|_| out_of_range())?;
                Rational::new(num, den).map_err(|_| out_of_range())
            }
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// The components of a floating-point numeral: sign bit, unbiased
/// exponent, and significand without the hidden bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FpParts {
    pub sign: bool,
    pub exponent: i64,
    pub significand: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        let q = Rational::new(2, 4).unwrap();
        assert_eq!((q.num(), q.den()), (1, 2));

        let q = Rational::new(3, -9).unwrap();
        assert_eq!((q.num(), q.den()), (-1, 3));

        let q = Rational::new(0, -5).unwrap();
        assert_eq!((q.num(), q.den()), (0, 1));
        assert!(q.is_integer());
    }

    #[test]
    fn extreme_magnitudes_normalize_or_fail_cleanly() {
        // Reduction keeps these representable.
        assert_eq!(Rational::new(i128::MIN, i128::MIN).unwrap(), Rational::from(1));
        assert_eq!(
            Rational::new(i128::MIN, 2).unwrap(),
            Rational::new(i128::MIN / 2, 1).unwrap()
        );
        let q = Rational::new(2, i128::MIN).unwrap();
        assert_eq!((q.num(), q.den()), (-1, 1 << 126));

        // A surviving magnitude of 2^127 does not fit and must be an
        // error, not an overflow.
        assert_eq!(
            Rational::new(1, i128::MIN),
            Err(Error::NumeralOutOfRange(format!("1/{}", i128::MIN)))
        );
        assert_eq!(
            Rational::new(i128::MIN, -1),
            Err(Error::NumeralOutOfRange(format!("{}/-1", i128::MIN)))
        );
        assert!(format!("1/{}", i128::MIN).parse::<Rational>().is_err());
    }

    #[test]
    fn zero_denominator_is_rejected() {
        assert_eq!(Rational::new(1, 0), Err(Error::DivisionByZero));
    }

    #[test]
    fn equal_after_reduction() {
        assert_eq!(Rational::new(1, 3).unwrap(), Rational::new(-2, -6).unwrap());
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("5".parse::<Rational>().unwrap(), Rational::from(5));
        assert_eq!("-1/3".parse::<Rational>().unwrap(), Rational::new(-1, 3).unwrap());
        // Z3 puts the sign on the numerator but spaces can appear.
        assert_eq!("1 / 2".parse::<Rational>().unwrap(), Rational::new(1, 2).unwrap());

        assert_eq!(Rational::new(-22, 7).unwrap().to_string(), "-22/7");
        assert_eq!(Rational::from(-4).to_string(), "-4");
        assert!("1/0".parse::<Rational>().is_err());
        assert!("x".parse::<Rational>().is_err());
    }
}
