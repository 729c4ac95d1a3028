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

//! smtkit is a typed facade over the Z3 SMT solver's C API.
//!
//! Formulas are built as trees of typed expression handles whose Rust
//! types encode their SMT sorts, so combining a [`expr::Bv`] of width 8
//! with one of width 16, or an [`expr::Int`] with a [`expr::Real`], is
//! rejected by the compiler rather than reported by Z3 at runtime. All
//! native objects are reference counted by Z3 itself; on this side each
//! handle lives in an RAII guard that performs exactly one increment
//! when created and one decrement when dropped, and every handle
//! borrows the [`context::Context`] that created it, so no expression,
//! solver, or model can outlive its context.
//!
//! ```
//! use smtkit::context::{Config, Context};
//! use smtkit::expr::{Int, Sorted};
//! use smtkit::solver::{SmtResult, Solver};
//!
//! let cfg = Config::new().unwrap();
//! let ctx = Context::new(cfg).unwrap();
//!
//! let x: Int = ctx.declare("x");
//! let y: Int = ctx.declare("y");
//!
//! let mut solver = Solver::new(&ctx);
//! solver.assert(&(x.clone() + y.clone())._eq(&Int::lit(&ctx, 10)));
//! solver.assert(&(x.clone() - y.clone())._eq(&Int::lit(&ctx, 2)));
//! assert!(solver.check() == SmtResult::Sat);
//!
//! let model = solver.get_model().unwrap();
//! assert_eq!(model.get_int(&x).unwrap(), 6);
//! assert_eq!(model.get_int(&y).unwrap(), 4);
//! ```

pub mod ast;
pub mod context;
pub mod error;
pub mod expr;
pub mod log;
pub mod model;
pub mod solver;
pub mod value;
