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

//! RAII guards for Z3's reference-counted handles. Every [`Ast`] and
//! [`Sort`] performs exactly one `Z3_inc_ref` when constructed or
//! cloned and exactly one `Z3_dec_ref` when dropped, so ref-count
//! pairing is enforced by ownership rather than by a tracking set.

use std::ffi::{CStr, CString};
use std::fmt;

use libc::c_uint;
use z3_sys::*;

use crate::context::Context;
use crate::error::{Error, Result};

pub(crate) fn c_str_to_string(s: Z3_string) -> String {
    if s.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(s).to_string_lossy().into_owned() }
    }
}

/// An interior NUL cannot cross the C boundary; the string ends
/// there.
pub(crate) fn c_string(s: &str) -> CString {
    let bytes = s.as_bytes();
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    // The prefix contains no NUL, so this cannot fail.
    CString::new(&bytes[..end]).unwrap()
}

/// A native sort handle. Sorts are AST nodes in Z3's ref-counting
/// scheme, hence the `Z3_sort_to_ast` dance on retain and release.
pub struct Sort<'ctx> {
    pub(crate) z3_sort: Z3_sort,
    ctx: &'ctx Context,
}

impl<'ctx> Sort<'ctx> {
    fn wrap(ctx: &'ctx Context, z3_sort: Z3_sort) -> Self {
        unsafe {
            Z3_inc_ref(ctx.z3_ctx, Z3_sort_to_ast(ctx.z3_ctx, z3_sort));
        }
        ctx.note_retained();
        Sort { z3_sort, ctx }
    }

    pub fn boolean(ctx: &'ctx Context) -> Self {
        Sort::wrap(ctx, unsafe { Z3_mk_bool_sort(ctx.z3_ctx) })
    }

    pub fn int(ctx: &'ctx Context) -> Self {
        Sort::wrap(ctx, unsafe { Z3_mk_int_sort(ctx.z3_ctx) })
    }

    pub fn real(ctx: &'ctx Context) -> Self {
        Sort::wrap(ctx, unsafe { Z3_mk_real_sort(ctx.z3_ctx) })
    }

    pub fn bitvec(ctx: &'ctx Context, width: u32) -> Self {
        Sort::wrap(ctx, unsafe { Z3_mk_bv_sort(ctx.z3_ctx, width as c_uint) })
    }

    pub fn float(ctx: &'ctx Context, ebits: u32, sbits: u32) -> Self {
        Sort::wrap(ctx, unsafe { Z3_mk_fpa_sort(ctx.z3_ctx, ebits as c_uint, sbits as c_uint) })
    }

    pub fn array(ctx: &'ctx Context, domain: &Sort<'ctx>, range: &Sort<'ctx>) -> Self {
        Sort::wrap(ctx, unsafe { Z3_mk_array_sort(ctx.z3_ctx, domain.z3_sort, range.z3_sort) })
    }
}

impl<'ctx> Drop for Sort<'ctx> {
    fn drop(&mut self) {
        unsafe {
            let ctx = self.ctx.z3_ctx;
            Z3_dec_ref(ctx, Z3_sort_to_ast(ctx, self.z3_sort))
        }
        self.ctx.note_released();
    }
}

/// A native AST handle. Cloning increments the native count; the
/// typed expression wrappers in [`crate::expr`] are thin newtypes
/// around this guard.
#[derive(Debug)]
pub struct Ast<'ctx> {
    pub(crate) z3_ast: Z3_ast,
    ctx: &'ctx Context,
}

impl<'ctx> Clone for Ast<'ctx> {
    fn clone(&self) -> Self {
        Ast::wrap(self.ctx, self.z3_ast)
    }
}

impl<'ctx> Drop for Ast<'ctx> {
    fn drop(&mut self) {
        unsafe { Z3_dec_ref(self.ctx.z3_ctx, self.z3_ast) }
        self.ctx.note_released();
    }
}

impl<'ctx> fmt::Display for Ast<'ctx> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = unsafe { Z3_ast_to_string(self.ctx.z3_ctx, self.z3_ast) };
        write!(f, "{}", c_str_to_string(s))
    }
}

macro_rules! z3_unary_op {
    ($i:ident, $arg:ident) => {
        unsafe {
            let z3_ast = $i($arg.ctx.z3_ctx, $arg.z3_ast);
            Ast::wrap($arg.ctx, z3_ast)
        }
    };
}

macro_rules! z3_binary_op {
    ($i:ident, $lhs:ident, $rhs:ident) => {
        unsafe {
            let z3_ast = $i($lhs.ctx.z3_ctx, $lhs.z3_ast, $rhs.z3_ast);
            Ast::wrap($lhs.ctx, z3_ast)
        }
    };
}

macro_rules! z3_vararg_op {
    ($i:ident, $lhs:ident, $rhs:ident) => {
        unsafe {
            let args = [$lhs.z3_ast, $rhs.z3_ast];
            let z3_ast = $i($lhs.ctx.z3_ctx, 2, args.as_ptr());
            Ast::wrap($lhs.ctx, z3_ast)
        }
    };
}

macro_rules! z3_fpa_rounded_op {
    ($i:ident, $lhs:ident, $rhs:ident) => {
        unsafe {
            let rm = Z3_mk_fpa_round_nearest_ties_to_even($lhs.ctx.z3_ctx);
            Z3_inc_ref($lhs.ctx.z3_ctx, rm);
            let z3_ast = $i($lhs.ctx.z3_ctx, rm, $lhs.z3_ast, $rhs.z3_ast);
            let result = Ast::wrap($lhs.ctx, z3_ast);
            Z3_dec_ref($lhs.ctx.z3_ctx, rm);
            result
        }
    };
}

impl<'ctx> Ast<'ctx> {
    /// Retains a raw handle freshly returned by a `Z3_mk_*` call.
    /// Must be called exactly once per raw handle per guard.
    pub(crate) fn wrap(ctx: &'ctx Context, z3_ast: Z3_ast) -> Self {
        unsafe {
            Z3_inc_ref(ctx.z3_ctx, z3_ast);
        }
        ctx.note_retained();
        Ast { z3_ast, ctx }
    }

    pub(crate) fn ctx(&self) -> &'ctx Context {
        self.ctx
    }

    pub(crate) fn mk_bool(ctx: &'ctx Context, b: bool) -> Self {
        unsafe {
            let z3_ast = if b { Z3_mk_true(ctx.z3_ctx) } else { Z3_mk_false(ctx.z3_ctx) };
            Ast::wrap(ctx, z3_ast)
        }
    }

    pub(crate) fn mk_int_i64(ctx: &'ctx Context, v: i64) -> Self {
        unsafe {
            let sort = Sort::int(ctx);
            Ast::wrap(ctx, Z3_mk_int64(ctx.z3_ctx, v, sort.z3_sort))
        }
    }

    pub(crate) fn mk_real_frac(ctx: &'ctx Context, num: i32, den: i32) -> Self {
        unsafe { Ast::wrap(ctx, Z3_mk_real(ctx.z3_ctx, num, den)) }
    }

    pub(crate) fn mk_numeral_str(ctx: &'ctx Context, s: &str, sort: &Sort<'ctx>) -> Self {
        let s = c_string(s);
        unsafe { Ast::wrap(ctx, Z3_mk_numeral(ctx.z3_ctx, s.as_ptr(), sort.z3_sort)) }
    }

    pub(crate) fn mk_bv_u64(ctx: &'ctx Context, sz: u32, bits: u64) -> Self {
        unsafe {
            let sort = Sort::bitvec(ctx, sz);
            Ast::wrap(ctx, Z3_mk_unsigned_int64(ctx.z3_ctx, bits, sort.z3_sort))
        }
    }

    pub(crate) fn mk_bv_bits(ctx: &'ctx Context, bits: &[bool]) -> Self {
        unsafe {
            let z3_ast = Z3_mk_bv_numeral(ctx.z3_ctx, bits.len() as c_uint, bits.as_ptr());
            Ast::wrap(ctx, z3_ast)
        }
    }

    pub(crate) fn mk_fpa_f64(ctx: &'ctx Context, v: f64, sort: &Sort<'ctx>) -> Self {
        unsafe { Ast::wrap(ctx, Z3_mk_fpa_numeral_double(ctx.z3_ctx, v, sort.z3_sort)) }
    }

    pub(crate) fn mk_const_array(ctx: &'ctx Context, domain: &Sort<'ctx>, default: &Ast<'ctx>) -> Self {
        unsafe { Ast::wrap(ctx, Z3_mk_const_array(ctx.z3_ctx, domain.z3_sort, default.z3_ast)) }
    }

    pub(crate) fn mk_not(&self) -> Self {
        z3_unary_op!(Z3_mk_not, self)
    }

    pub(crate) fn mk_eq(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_eq, self, rhs)
    }

    pub(crate) fn mk_and(&self, rhs: &Ast<'ctx>) -> Self {
        z3_vararg_op!(Z3_mk_and, self, rhs)
    }

    pub(crate) fn mk_or(&self, rhs: &Ast<'ctx>) -> Self {
        z3_vararg_op!(Z3_mk_or, self, rhs)
    }

    pub(crate) fn mk_xor(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_xor, self, rhs)
    }

    pub(crate) fn mk_implies(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_implies, self, rhs)
    }

    pub(crate) fn mk_iff(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_iff, self, rhs)
    }

    pub(crate) fn ite(&self, then_ast: &Ast<'ctx>, else_ast: &Ast<'ctx>) -> Self {
        unsafe {
            let z3_ast = Z3_mk_ite(self.ctx.z3_ctx, self.z3_ast, then_ast.z3_ast, else_ast.z3_ast);
            Ast::wrap(self.ctx, z3_ast)
        }
    }

    pub(crate) fn mk_many(
        op: unsafe extern "C" fn(Z3_context, c_uint, *const Z3_ast) -> Z3_ast,
        ctx: &'ctx Context,
        args: &[&Ast<'ctx>],
    ) -> Self {
        let raw: Vec<Z3_ast> = args.iter().map(|a| a.z3_ast).collect();
        unsafe {
            let z3_ast = op(ctx.z3_ctx, raw.len() as c_uint, raw.as_ptr());
            Ast::wrap(ctx, z3_ast)
        }
    }

    pub(crate) fn mk_add(&self, rhs: &Ast<'ctx>) -> Self {
        z3_vararg_op!(Z3_mk_add, self, rhs)
    }

    pub(crate) fn mk_sub(&self, rhs: &Ast<'ctx>) -> Self {
        z3_vararg_op!(Z3_mk_sub, self, rhs)
    }

    pub(crate) fn mk_mul(&self, rhs: &Ast<'ctx>) -> Self {
        z3_vararg_op!(Z3_mk_mul, self, rhs)
    }

    pub(crate) fn mk_div(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_div, self, rhs)
    }

    pub(crate) fn mk_mod(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_mod, self, rhs)
    }

    pub(crate) fn mk_unary_minus(&self) -> Self {
        z3_unary_op!(Z3_mk_unary_minus, self)
    }

    pub(crate) fn mk_lt(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_lt, self, rhs)
    }

    pub(crate) fn mk_le(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_le, self, rhs)
    }

    pub(crate) fn mk_gt(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_gt, self, rhs)
    }

    pub(crate) fn mk_ge(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_ge, self, rhs)
    }

    pub(crate) fn mk_bvnot(&self) -> Self {
        z3_unary_op!(Z3_mk_bvnot, self)
    }

    pub(crate) fn mk_bvneg(&self) -> Self {
        z3_unary_op!(Z3_mk_bvneg, self)
    }

    pub(crate) fn mk_bvand(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvand, self, rhs)
    }

    pub(crate) fn mk_bvor(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvor, self, rhs)
    }

    pub(crate) fn mk_bvxor(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvxor, self, rhs)
    }

    pub(crate) fn mk_bvadd(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvadd, self, rhs)
    }

    pub(crate) fn mk_bvsub(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvsub, self, rhs)
    }

    pub(crate) fn mk_bvmul(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvmul, self, rhs)
    }

    pub(crate) fn mk_bvudiv(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvudiv, self, rhs)
    }

    pub(crate) fn mk_bvsdiv(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvsdiv, self, rhs)
    }

    pub(crate) fn mk_bvurem(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvurem, self, rhs)
    }

    pub(crate) fn mk_bvsrem(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvsrem, self, rhs)
    }

    pub(crate) fn mk_bvsmod(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvsmod, self, rhs)
    }

    pub(crate) fn mk_bvult(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvult, self, rhs)
    }

    pub(crate) fn mk_bvslt(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvslt, self, rhs)
    }

    pub(crate) fn mk_bvule(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvule, self, rhs)
    }

    pub(crate) fn mk_bvsle(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvsle, self, rhs)
    }

    pub(crate) fn mk_bvuge(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvuge, self, rhs)
    }

    pub(crate) fn mk_bvsge(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvsge, self, rhs)
    }

    pub(crate) fn mk_bvugt(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvugt, self, rhs)
    }

    pub(crate) fn mk_bvsgt(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvsgt, self, rhs)
    }

    pub(crate) fn mk_bvshl(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvshl, self, rhs)
    }

    pub(crate) fn mk_bvlshr(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvlshr, self, rhs)
    }

    pub(crate) fn mk_bvashr(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_bvashr, self, rhs)
    }

    pub(crate) fn extract(&self, hi: u32, lo: u32) -> Self {
        unsafe {
            let z3_ast = Z3_mk_extract(self.ctx.z3_ctx, hi, lo, self.z3_ast);
            Ast::wrap(self.ctx, z3_ast)
        }
    }

    pub(crate) fn mk_fpa_add(&self, rhs: &Ast<'ctx>) -> Self {
        z3_fpa_rounded_op!(Z3_mk_fpa_add, self, rhs)
    }

    pub(crate) fn mk_fpa_sub(&self, rhs: &Ast<'ctx>) -> Self {
        z3_fpa_rounded_op!(Z3_mk_fpa_sub, self, rhs)
    }

    pub(crate) fn mk_fpa_mul(&self, rhs: &Ast<'ctx>) -> Self {
        z3_fpa_rounded_op!(Z3_mk_fpa_mul, self, rhs)
    }

    pub(crate) fn mk_fpa_div(&self, rhs: &Ast<'ctx>) -> Self {
        z3_fpa_rounded_op!(Z3_mk_fpa_div, self, rhs)
    }

    pub(crate) fn mk_fpa_neg(&self) -> Self {
        z3_unary_op!(Z3_mk_fpa_neg, self)
    }

    pub(crate) fn mk_fpa_eq(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_fpa_eq, self, rhs)
    }

    pub(crate) fn mk_fpa_lt(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_fpa_lt, self, rhs)
    }

    pub(crate) fn mk_fpa_leq(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_fpa_leq, self, rhs)
    }

    pub(crate) fn mk_fpa_gt(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_fpa_gt, self, rhs)
    }

    pub(crate) fn mk_fpa_geq(&self, rhs: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_fpa_geq, self, rhs)
    }

    pub(crate) fn mk_select(&self, index: &Ast<'ctx>) -> Self {
        z3_binary_op!(Z3_mk_select, self, index)
    }

    pub(crate) fn mk_store(&self, index: &Ast<'ctx>, value: &Ast<'ctx>) -> Self {
        unsafe {
            let z3_ast = Z3_mk_store(self.ctx.z3_ctx, self.z3_ast, index.z3_ast, value.z3_ast);
            Ast::wrap(self.ctx, z3_ast)
        }
    }

    pub(crate) fn is_numeral(&self) -> bool {
        unsafe { Z3_is_numeral_ast(self.ctx.z3_ctx, self.z3_ast) }
    }

    /// Z3's decimal rendering of a numeral, e.g. `-5` or `1/3`.
    pub(crate) fn numeral_string(&self) -> Result<String> {
        if !self.is_numeral() {
            return Err(Error::NotANumeral(self.to_string()));
        }
        let s = unsafe { Z3_get_numeral_string(self.ctx.z3_ctx, self.z3_ast) };
        Ok(c_str_to_string(s))
    }

    pub(crate) fn get_numeral_u64(&self) -> Result<u64> {
        let mut v: u64 = 0;
        unsafe {
            if Z3_get_numeral_uint64(self.ctx.z3_ctx, self.z3_ast, &mut v) {
                Ok(v)
            } else if self.is_numeral() {
                Err(Error::NumeralOutOfRange(self.to_string()))
            } else {
                Err(Error::NotANumeral(self.to_string()))
            }
        }
    }

    pub(crate) fn bool_value(&self) -> Option<bool> {
        unsafe {
            let v = Z3_get_bool_value(self.ctx.z3_ctx, self.z3_ast);
            if v == Z3_L_TRUE {
                Some(true)
            } else if v == Z3_L_FALSE {
                Some(false)
            } else {
                None
            }
        }
    }
}
