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

//! Fixed-width bit vector expressions. The width is a const generic
//! parameter, so `Bv<8>` and `Bv<16>` are different types and every
//! operator below is only defined between equal widths:
//!
//! ```compile_fail
//! use smtkit::context::{Config, Context};
//! use smtkit::expr::Bv;
//!
//! let ctx = Context::new(Config::new().unwrap()).unwrap();
//! let narrow: Bv<8> = ctx.declare("narrow");
//! let wide: Bv<16> = ctx.declare("wide");
//! let _ = narrow & wide; // mismatched widths do not type-check
//! ```

use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Mul, Neg, Not, Shl, Shr, Sub};

use crate::ast::{Ast, Sort};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::expr::{Bool, Sorted};

#[derive(Clone, Debug)]
pub struct Bv<'ctx, const N: u32> {
    ast: Ast<'ctx>,
}

impl<'ctx, const N: u32> Sorted<'ctx> for Bv<'ctx, N> {
    fn sort(ctx: &'ctx Context) -> Sort<'ctx> {
        Sort::bitvec(ctx, N)
    }

    fn from_ast(ast: Ast<'ctx>) -> Self {
        Bv { ast }
    }

    fn ast(&self) -> &Ast<'ctx> {
        &self.ast
    }
}

impl<'ctx, const N: u32> Bv<'ctx, N> {
    /// A bit vector numeral from the low `N` bits of `bits`.
    pub fn lit(ctx: &'ctx Context, bits: u64) -> Self {
        Bv { ast: Ast::mk_bv_u64(ctx, N, bits) }
    }

    /// A bit vector numeral from explicit bits, least significant
    /// first. The slice length must be exactly `N`.
    pub fn from_bits(ctx: &'ctx Context, bits: &[bool]) -> Result<Self> {
        if bits.len() != N as usize {
            return Err(Error::BadLength { expected: N as usize, actual: bits.len() });
        }
        Ok(Bv { ast: Ast::mk_bv_bits(ctx, bits) })
    }
}

macro_rules! bv_binop {
    ($trait_name:ident, $fn_name:ident, $mk:ident) => {
        impl<'ctx, const N: u32> $trait_name for Bv<'ctx, N> {
            type Output = Bv<'ctx, N>;
            fn $fn_name(self, rhs: Bv<'ctx, N>) -> Bv<'ctx, N> {
                Bv { ast: self.ast.$mk(&rhs.ast) }
            }
        }

        impl<'ctx, const N: u32> $trait_name<&Bv<'ctx, N>> for Bv<'ctx, N> {
            type Output = Bv<'ctx, N>;
            fn $fn_name(self, rhs: &Bv<'ctx, N>) -> Bv<'ctx, N> {
                Bv { ast: self.ast.$mk(&rhs.ast) }
            }
        }

        impl<'ctx, const N: u32> $trait_name<Bv<'ctx, N>> for &Bv<'ctx, N> {
            type Output = Bv<'ctx, N>;
            fn $fn_name(self, rhs: Bv<'ctx, N>) -> Bv<'ctx, N> {
                Bv { ast: self.ast.$mk(&rhs.ast) }
            }
        }

        impl<'ctx, const N: u32> $trait_name<&Bv<'ctx, N>> for &Bv<'ctx, N> {
            type Output = Bv<'ctx, N>;
            fn $fn_name(self, rhs: &Bv<'ctx, N>) -> Bv<'ctx, N> {
                Bv { ast: self.ast.$mk(&rhs.ast) }
            }
        }
    };
}

bv_binop!(Add, add, mk_bvadd);
bv_binop!(Sub, sub, mk_bvsub);
bv_binop!(Mul, mul, mk_bvmul);
bv_binop!(BitAnd, bitand, mk_bvand);
bv_binop!(BitOr, bitor, mk_bvor);
bv_binop!(BitXor, bitxor, mk_bvxor);
bv_binop!(Shl, shl, mk_bvshl);
bv_binop!(Shr, shr, mk_bvlshr);

impl<'ctx, const N: u32> Not for Bv<'ctx, N> {
    type Output = Bv<'ctx, N>;
    fn not(self) -> Bv<'ctx, N> {
        Bv { ast: self.ast.mk_bvnot() }
    }
}

impl<'ctx, const N: u32> Not for &Bv<'ctx, N> {
    type Output = Bv<'ctx, N>;
    fn not(self) -> Bv<'ctx, N> {
        Bv { ast: self.ast.mk_bvnot() }
    }
}

impl<'ctx, const N: u32> Neg for Bv<'ctx, N> {
    type Output = Bv<'ctx, N>;
    fn neg(self) -> Bv<'ctx, N> {
        Bv { ast: self.ast.mk_bvneg() }
    }
}

impl<'ctx, const N: u32> Neg for &Bv<'ctx, N> {
    type Output = Bv<'ctx, N>;
    fn neg(self) -> Bv<'ctx, N> {
        Bv { ast: self.ast.mk_bvneg() }
    }
}

macro_rules! bv_method_binop {
    ($fn_name:ident, $mk:ident, $doc:expr) => {
        #[doc = $doc]
        pub fn $fn_name(&self, rhs: &Bv<'ctx, N>) -> Bv<'ctx, N> {
            Bv { ast: self.ast.$mk(&rhs.ast) }
        }
    };
}

macro_rules! bv_method_cmp {
    ($fn_name:ident, $mk:ident, $doc:expr) => {
        #[doc = $doc]
        pub fn $fn_name(&self, rhs: &Bv<'ctx, N>) -> Bool<'ctx> {
            Bool::from_ast(self.ast.$mk(&rhs.ast))
        }
    };
}

impl<'ctx, const N: u32> Bv<'ctx, N> {
    bv_method_binop!(udiv, mk_bvudiv, "Unsigned division.");
    bv_method_binop!(sdiv, mk_bvsdiv, "Signed (two's complement) division.");
    bv_method_binop!(urem, mk_bvurem, "Unsigned remainder.");
    bv_method_binop!(srem, mk_bvsrem, "Signed remainder (sign follows the dividend).");
    bv_method_binop!(smod, mk_bvsmod, "Signed modulus (sign follows the divisor).");
    bv_method_binop!(ashr, mk_bvashr, "Arithmetic shift right.");

    bv_method_cmp!(ult, mk_bvult, "Unsigned less-than.");
    bv_method_cmp!(ule, mk_bvule, "Unsigned less-or-equal.");
    bv_method_cmp!(ugt, mk_bvugt, "Unsigned greater-than.");
    bv_method_cmp!(uge, mk_bvuge, "Unsigned greater-or-equal.");
    bv_method_cmp!(slt, mk_bvslt, "Signed less-than.");
    bv_method_cmp!(sle, mk_bvsle, "Signed less-or-equal.");
    bv_method_cmp!(sgt, mk_bvsgt, "Signed greater-than.");
    bv_method_cmp!(sge, mk_bvsge, "Signed greater-or-equal.");
}

impl<'ctx, const N: u32> fmt::Display for Bv<'ctx, N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.ast.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Config;
    use crate::solver::{SmtResult, Solver};

    fn ctx() -> Context {
        Context::new(Config::new().unwrap()).unwrap()
    }

    fn holds(ctx: &Context, prop: &Bool) -> bool {
        let mut solver = Solver::new(ctx);
        solver.assert(&!prop);
        solver.check() == SmtResult::Unsat
    }

    #[test]
    fn arithmetic_wraps_at_width() {
        let ctx = ctx();
        let sum = Bv::<8>::lit(&ctx, 0xFF) + Bv::<8>::lit(&ctx, 1);
        assert!(holds(&ctx, &sum._eq(&Bv::lit(&ctx, 0))));
    }

    #[test]
    fn signed_and_unsigned_comparison_differ() {
        let ctx = ctx();
        // 0xFF is 255 unsigned but -1 signed.
        let all_ones = Bv::<8>::lit(&ctx, 0xFF);
        let one = Bv::<8>::lit(&ctx, 1);
        assert!(holds(&ctx, &one.ult(&all_ones)));
        assert!(holds(&ctx, &all_ones.slt(&one)));
    }

    #[test]
    fn shift_right_is_logical() {
        let ctx = ctx();
        let x = Bv::<8>::lit(&ctx, 0x80);
        assert!(holds(&ctx, &(x.clone() >> Bv::lit(&ctx, 7))._eq(&Bv::lit(&ctx, 1))));
        assert!(holds(&ctx, &x.ashr(&Bv::lit(&ctx, 7))._eq(&Bv::lit(&ctx, 0xFF))));
    }

    #[test]
    fn from_bits_length_must_match_width() {
        let ctx = ctx();
        assert_eq!(
            Bv::<8>::from_bits(&ctx, &[true; 9]).unwrap_err(),
            Error::BadLength { expected: 8, actual: 9 }
        );
    }
}
