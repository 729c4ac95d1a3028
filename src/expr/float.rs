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

//! IEEE floating-point expressions. The format is part of the type:
//! `EB` exponent bits and `SB` significand bits (hidden bit
//! included), so [`Float32`] is `Float<8, 24>` and [`Float64`] is
//! `Float<11, 53>`, and mixing formats in one operation is a compile
//! error:
//!
//! ```compile_fail
//! use smtkit::context::{Config, Context};
//! use smtkit::expr::{Float32, Float64};
//!
//! let ctx = Context::new(Config::new().unwrap()).unwrap();
//! let single: Float32 = ctx.declare("single");
//! let double: Float64 = ctx.declare("double");
//! let _ = single + double; // mixed formats do not type-check
//! ```
//!
//! Arithmetic rounds to nearest, ties to even.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::ast::{Ast, Sort};
use crate::context::Context;
use crate::expr::{Bool, Sorted};

#[derive(Clone)]
pub struct Float<'ctx, const EB: u32, const SB: u32> {
    ast: Ast<'ctx>,
}

pub type Float32<'ctx> = Float<'ctx, 8, 24>;
pub type Float64<'ctx> = Float<'ctx, 11, 53>;

impl<'ctx, const EB: u32, const SB: u32> Sorted<'ctx> for Float<'ctx, EB, SB> {
    fn sort(ctx: &'ctx Context) -> Sort<'ctx> {
        Sort::float(ctx, EB, SB)
    }

    fn from_ast(ast: Ast<'ctx>) -> Self {
        Float { ast }
    }

    fn ast(&self) -> &Ast<'ctx> {
        &self.ast
    }
}

impl<'ctx, const EB: u32, const SB: u32> Float<'ctx, EB, SB> {
    /// A numeral of this format, converted (rounding if necessary)
    /// from an `f64`.
    pub fn lit(ctx: &'ctx Context, v: f64) -> Self {
        Float { ast: Ast::mk_fpa_f64(ctx, v, &Self::sort(ctx)) }
    }

    /// IEEE equality: distinct from [`Sorted::_eq`] term equality in
    /// its treatment of NaN and signed zeros.
    pub fn fp_eq(&self, rhs: &Self) -> Bool<'ctx> {
        Bool::from_ast(self.ast.mk_fpa_eq(&rhs.ast))
    }

    pub fn lt(&self, rhs: &Self) -> Bool<'ctx> {
        Bool::from_ast(self.ast.mk_fpa_lt(&rhs.ast))
    }

    pub fn le(&self, rhs: &Self) -> Bool<'ctx> {
        Bool::from_ast(self.ast.mk_fpa_leq(&rhs.ast))
    }

    pub fn gt(&self, rhs: &Self) -> Bool<'ctx> {
        Bool::from_ast(self.ast.mk_fpa_gt(&rhs.ast))
    }

    pub fn ge(&self, rhs: &Self) -> Bool<'ctx> {
        Bool::from_ast(self.ast.mk_fpa_geq(&rhs.ast))
    }
}

macro_rules! float_binop {
    ($trait_name:ident, $fn_name:ident, $mk:ident) => {
        impl<'ctx, const EB: u32, const SB: u32> $trait_name for Float<'ctx, EB, SB> {
            type Output = Float<'ctx, EB, SB>;
            fn $fn_name(self, rhs: Float<'ctx, EB, SB>) -> Float<'ctx, EB, SB> {
                Float { ast: self.ast.$mk(&rhs.ast) }
            }
        }

        impl<'ctx, const EB: u32, const SB: u32> $trait_name<&Float<'ctx, EB, SB>>
            for Float<'ctx, EB, SB>
        {
            type Output = Float<'ctx, EB, SB>;
            fn $fn_name(self, rhs: &Float<'ctx, EB, SB>) -> Float<'ctx, EB, SB> {
                Float { ast: self.ast.$mk(&rhs.ast) }
            }
        }

        impl<'ctx, const EB: u32, const SB: u32> $trait_name<Float<'ctx, EB, SB>>
            for &Float<'ctx, EB, SB>
        {
            type Output = Float<'ctx, EB, SB>;
            fn $fn_name(self, rhs: Float<'ctx, EB, SB>) -> Float<'ctx, EB, SB> {
                Float { ast: self.ast.$mk(&rhs.ast) }
            }
        }

        impl<'ctx, const EB: u32, const SB: u32> $trait_name<&Float<'ctx, EB, SB>>
            for &Float<'ctx, EB, SB>
        {
            type Output = Float<'ctx, EB, SB>;
            fn $fn_name(self, rhs: &Float<'ctx, EB, SB>) -> Float<'ctx, EB, SB> {
                Float { ast: self.ast.$mk(&rhs.ast) }
            }
        }
    };
}

float_binop!(Add, add, mk_fpa_add);
float_binop!(Sub, sub, mk_fpa_sub);
float_binop!(Mul, mul, mk_fpa_mul);
float_binop!(Div, div, mk_fpa_div);

impl<'ctx, const EB: u32, const SB: u32> Neg for Float<'ctx, EB, SB> {
    type Output = Float<'ctx, EB, SB>;
    fn neg(self) -> Float<'ctx, EB, SB> {
        Float { ast: self.ast.mk_fpa_neg() }
    }
}

impl<'ctx, const EB: u32, const SB: u32> Neg for &Float<'ctx, EB, SB> {
    type Output = Float<'ctx, EB, SB>;
    fn neg(self) -> Float<'ctx, EB, SB> {
        Float { ast: self.ast.mk_fpa_neg() }
    }
}

impl<'ctx, const EB: u32, const SB: u32> fmt::Display for Float<'ctx, EB, SB> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.ast.fmt(f)
    }
}
