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

use std::error::Error as StdError;
use std::fmt;

/// Every fallible operation in this crate fails with one of these
/// kinds. All failures are synchronous and none are retried
/// internally; an Unknown result from the solver is reported, not
/// retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The native environment or one of its objects could not be
    /// constructed.
    EngineInit(&'static str),
    /// A model was accessed after the solver state that produced it
    /// changed, or after its solver was dropped.
    UseAfterFree(&'static str),
    /// `get_model` requires a `check` since the last state-changing
    /// solver operation.
    NotChecked,
    NotSatisfiable,
    UnknownStatus,
    /// `reason_unknown` is only meaningful while the last check
    /// returned Unknown.
    NotUnknown,
    ScopeUnderflow { depth: u32, requested: u32 },
    /// The evaluated term is not a concrete numeral of the expected
    /// sort. Carries the term rendered by Z3.
    NotANumeral(String),
    /// The numeral is concrete but does not fit the requested host
    /// type.
    NumeralOutOfRange(String),
    /// A batch constructor was given an empty argument list.
    EmptyArgs(&'static str),
    /// A batch constructor was given a list whose length does not
    /// match the expected sort.
    BadLength { expected: usize, actual: usize },
    DivisionByZero,
    /// An error code reported by Z3 itself, surfaced as-is.
    Engine(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;
        match self {
            EngineInit(what) => write!(f, "Failed to initialize {}", what),
            UseAfterFree(what) => write!(f, "{} has been invalidated", what),
            NotChecked => write!(f, "get_model requires check() since the last solver mutation"),
            NotSatisfiable => write!(f, "Cannot get model: solver status is Unsat"),
            UnknownStatus => write!(f, "Cannot get model: solver status is Unknown"),
            NotUnknown => write!(f, "reason_unknown requires a check() that returned Unknown"),
            ScopeUnderflow { depth, requested } => {
                write!(f, "Cannot pop {} scopes at depth {}", requested, depth)
            }
            NotANumeral(term) => write!(f, "Term {} is not a numeral of the expected sort", term),
            NumeralOutOfRange(term) => write!(f, "Numeral {} does not fit the requested type", term),
            EmptyArgs(what) => write!(f, "{} requires at least one argument", what),
            BadLength { expected, actual } => {
                write!(f, "Expected {} elements, got {}", expected, actual)
            }
            DivisionByZero => write!(f, "Division by zero"),
            Engine(msg) => write!(f, "Z3 error: {}", msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        None
    }
}

pub type Result<T> = std::result::Result<T, Error>;
