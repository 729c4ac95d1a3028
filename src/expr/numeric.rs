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

//! Mathematical integer and exact rational expressions. Z3's
//! arithmetic term constructors are shared between the two sorts, but
//! on this side `Int` and `Real` are distinct types and never mix in
//! one operation.
//!
//! ```compile_fail
//! use smtkit::context::{Config, Context};
//! use smtkit::expr::{Int, Real};
//!
//! let ctx = Context::new(Config::new().unwrap()).unwrap();
//! let n: Int = ctx.declare("n");
//! let r: Real = ctx.declare("r");
//! let _ = n + r; // distinct sorts do not type-check
//! ```

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

use crate::ast::{Ast, Sort};
use crate::context::Context;
use crate::expr::Sorted;
use crate::value::Rational;

macro_rules! numeric_binop {
    ($ty:ident, $trait_name:ident, $fn_name:ident, $mk:ident) => {
        impl<'ctx> $trait_name for $ty<'ctx> {
            type Output = $ty<'ctx>;
            fn $fn_name(self, rhs: $ty<'ctx>) -> $ty<'ctx> {
                $ty { ast: self.ast.$mk(&rhs.ast) }
            }
        }

        impl<'ctx> $trait_name<&$ty<'ctx>> for $ty<'ctx> {
            type Output = $ty<'ctx>;
            fn $fn_name(self, rhs: &$ty<'ctx>) -> $ty<'ctx> {
                $ty { ast: self.ast.$mk(&rhs.ast) }
            }
        }

        impl<'ctx> $trait_name<$ty<'ctx>> for &$ty<'ctx> {
            type Output = $ty<'ctx>;
            fn $fn_name(self, rhs: $ty<'ctx>) -> $ty<'ctx> {
                $ty { ast: self.ast.$mk(&rhs.ast) }
            }
        }

        impl<'ctx> $trait_name<&$ty<'ctx>> for &$ty<'ctx> {
            type Output = $ty<'ctx>;
            fn $fn_name(self, rhs: &$ty<'ctx>) -> $ty<'ctx> {
                $ty { ast: self.ast.$mk(&rhs.ast) }
            }
        }
    };
}

macro_rules! numeric_type {
    ($ty:ident, $sort_fn:ident) => {
        #[derive(Clone)]
        pub struct $ty<'ctx> {
            ast: Ast<'ctx>,
        }

        impl<'ctx> Sorted<'ctx> for $ty<'ctx> {
            fn sort(ctx: &'ctx Context) -> Sort<'ctx> {
                Sort::$sort_fn(ctx)
            }

            fn from_ast(ast: Ast<'ctx>) -> Self {
                $ty { ast }
            }

            fn ast(&self) -> &Ast<'ctx> {
                &self.ast
            }
        }

        impl<'ctx> $ty<'ctx> {
            pub fn lt(&self, rhs: &$ty<'ctx>) -> crate::expr::Bool<'ctx> {
                crate::expr::Bool::from_ast(self.ast.mk_lt(&rhs.ast))
            }

            pub fn le(&self, rhs: &$ty<'ctx>) -> crate::expr::Bool<'ctx> {
                crate::expr::Bool::from_ast(self.ast.mk_le(&rhs.ast))
            }

            pub fn gt(&self, rhs: &$ty<'ctx>) -> crate::expr::Bool<'ctx> {
                crate::expr::Bool::from_ast(self.ast.mk_gt(&rhs.ast))
            }

            pub fn ge(&self, rhs: &$ty<'ctx>) -> crate::expr::Bool<'ctx> {
                crate::expr::Bool::from_ast(self.ast.mk_ge(&rhs.ast))
            }
        }

        numeric_binop!($ty, Add, add, mk_add);
        numeric_binop!($ty, Sub, sub, mk_sub);
        numeric_binop!($ty, Mul, mul, mk_mul);
        numeric_binop!($ty, Div, div, mk_div);

        impl<'ctx> Neg for $ty<'ctx> {
            type Output = $ty<'ctx>;
            fn neg(self) -> $ty<'ctx> {
                $ty { ast: self.ast.mk_unary_minus() }
            }
        }

        impl<'ctx> Neg for &$ty<'ctx> {
            type Output = $ty<'ctx>;
            fn neg(self) -> $ty<'ctx> {
                $ty { ast: self.ast.mk_unary_minus() }
            }
        }

        impl<'ctx> fmt::Display for $ty<'ctx> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                self.ast.fmt(f)
            }
        }
    };
}

numeric_type!(Int, int);
numeric_type!(Real, real);

numeric_binop!(Int, Rem, rem, mk_mod);

impl<'ctx> Int<'ctx> {
    pub fn lit(ctx: &'ctx Context, v: i64) -> Self {
        Int { ast: Ast::mk_int_i64(ctx, v) }
    }

    /// An integer numeral of arbitrary magnitude, written in decimal.
    pub fn numeral(ctx: &'ctx Context, s: &str) -> Self {
        Int { ast: Ast::mk_numeral_str(ctx, s, &Sort::int(ctx)) }
    }
}

impl<'ctx> Real<'ctx> {
    pub fn lit(ctx: &'ctx Context, num: i32, den: i32) -> Self {
        Real { ast: Ast::mk_real_frac(ctx, num, den) }
    }

    /// An exact rational numeral. The value round-trips exactly
    /// through [`crate::model::Model::get_real`].
    pub fn from_rational(ctx: &'ctx Context, q: &Rational) -> Self {
        Real { ast: Ast::mk_numeral_str(ctx, &q.to_string(), &Sort::real(ctx)) }
    }
}

macro_rules! int_scalar_binop {
    ($trait_name:ident, $fn_name:ident, $mk:ident) => {
        impl<'ctx> $trait_name<i64> for Int<'ctx> {
            type Output = Int<'ctx>;
            fn $fn_name(self, rhs: i64) -> Int<'ctx> {
                let rhs = Ast::mk_int_i64(self.ast.ctx(), rhs);
                Int { ast: self.ast.$mk(&rhs) }
            }
        }

        impl<'ctx> $trait_name<i64> for &Int<'ctx> {
            type Output = Int<'ctx>;
            fn $fn_name(self, rhs: i64) -> Int<'ctx> {
                let rhs = Ast::mk_int_i64(self.ast.ctx(), rhs);
                Int { ast: self.ast.$mk(&rhs) }
            }
        }
    };
}

int_scalar_binop!(Add, add, mk_add);
int_scalar_binop!(Sub, sub, mk_sub);
int_scalar_binop!(Mul, mul, mk_mul);
