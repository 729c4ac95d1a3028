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

//! Model snapshots. A [`Model`] wraps a native model handle and stays
//! usable only while its solver's generation counter still matches
//! the value captured at creation; after any solver state change
//! every accessor fails with [`Error::UseAfterFree`]. The one
//! exception is [`Display`](std::fmt::Display), which renders the
//! `<invalidated>` sentinel instead of failing so that diagnostics
//! and logging can never themselves blow up.

use std::cell::Cell;
use std::fmt;
use std::ptr;
use std::rc::Rc;

use libc::c_int;
use z3_sys::*;

use crate::ast::{c_str_to_string, Ast};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::expr::{Bool, Bv, Float, Int, Real, Sorted};
use crate::value::{FpParts, Rational};

#[derive(Debug)]
pub struct Model<'ctx> {
    z3_model: Z3_model,
    ctx: &'ctx Context,
    created_at: u64,
    generation: Rc<Cell<u64>>,
}

impl<'ctx> Model<'ctx> {
    pub(crate) fn new(ctx: &'ctx Context, z3_model: Z3_model, generation: Rc<Cell<u64>>) -> Self {
        unsafe {
            Z3_model_inc_ref(ctx.z3_ctx, z3_model);
        }
        Model { z3_model, ctx, created_at: generation.get(), generation }
    }

    /// A model is live until its solver mutates or drops; the
    /// transition is one-way.
    pub fn is_valid(&self) -> bool {
        self.created_at == self.generation.get()
    }

    fn guard(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::UseAfterFree("model"))
        }
    }

    fn eval_ast(&self, ast: &Ast<'ctx>, completion: bool) -> Result<Ast<'ctx>> {
        unsafe {
            let mut result: Z3_ast = ptr::null_mut();
            if !Z3_model_eval(self.ctx.z3_ctx, self.z3_model, ast.z3_ast, completion, &mut result) {
                return Err(self.ctx.error_msg());
            }
            Ok(Ast::wrap(self.ctx, result))
        }
    }

    /// Evaluates `expr` under this assignment. With `completion` the
    /// engine picks an arbitrary concrete value for unconstrained
    /// sub-terms; without it they stay symbolic in the result.
    pub fn eval<T: Sorted<'ctx>>(&self, expr: &T, completion: bool) -> Result<T> {
        self.guard()?;
        Ok(T::from_ast(self.eval_ast(expr.ast(), completion)?))
    }

    pub fn get_bool(&self, expr: &Bool<'ctx>) -> Result<bool> {
        let evaluated = self.eval(expr, true)?;
        evaluated.ast().bool_value().ok_or_else(|| Error::NotANumeral(evaluated.to_string()))
    }

    /// The exact integer value of `expr`, via Z3's decimal rendering
    /// so arbitrary magnitudes up to `i128` survive unchanged.
    pub fn get_int(&self, expr: &Int<'ctx>) -> Result<i128> {
        let evaluated = self.eval(expr, true)?;
        let s = evaluated.ast().numeral_string()?;
        s.parse().map_err(|_| Error::NumeralOutOfRange(s))
    }

    /// The exact rational value of `expr`. No floating approximation
    /// is involved at any point.
    pub fn get_real(&self, expr: &Real<'ctx>) -> Result<Rational> {
        let evaluated = self.eval(expr, true)?;
        evaluated.ast().numeral_string()?.parse()
    }

    /// Bit vector value for widths up to 64.
    pub fn get_bv_u64<const N: u32>(&self, expr: &Bv<'ctx, N>) -> Result<u64> {
        let evaluated = self.eval(expr, true)?;
        evaluated.ast().get_numeral_u64()
    }

    /// Bit vector value of any width, least significant bit first.
    /// Wide vectors are evaluated in 64-bit slices.
    pub fn get_bv_bits<const N: u32>(&self, expr: &Bv<'ctx, N>) -> Result<Vec<bool>> {
        self.guard()?;
        let size = N as usize;
        let mut result = vec![false; size];
        let mut i = 0;
        while i < size {
            let hi = std::cmp::min(size, i + 64);
            let slice = expr.ast().extract((hi - 1) as u32, i as u32);
            let v = self.eval_ast(&slice, true)?.get_numeral_u64()?;
            for j in i..hi {
                result[j] = (v >> (j - i)) & 1 == 1;
            }
            i += 64;
        }
        Ok(result)
    }

    /// The sign, unbiased exponent, and significand (hidden bit
    /// excluded) of a floating-point value.
    pub fn get_float<const EB: u32, const SB: u32>(
        &self,
        expr: &Float<'ctx, EB, SB>,
    ) -> Result<FpParts> {
        let evaluated = self.eval(expr, true)?;
        let ast = evaluated.ast();
        unsafe {
            let mut sign: c_int = 0;
            let mut exponent: i64 = 0;
            let mut significand: u64 = 0;
            let ok = Z3_fpa_get_numeral_sign(self.ctx.z3_ctx, ast.z3_ast, &mut sign)
                && Z3_fpa_get_numeral_exponent_int64(self.ctx.z3_ctx, ast.z3_ast, &mut exponent, false)
                && Z3_fpa_get_numeral_significand_uint64(self.ctx.z3_ctx, ast.z3_ast, &mut significand);
            if !ok {
                return Err(Error::NotANumeral(evaluated.to_string()));
            }
            Ok(FpParts { sign: sign != 0, exponent, significand })
        }
    }
}

impl<'ctx> Drop for Model<'ctx> {
    fn drop(&mut self) {
        unsafe {
            Z3_model_dec_ref(self.ctx.z3_ctx, self.z3_model);
        }
    }
}

/// Never fails: an invalidated model renders as `<invalidated>` so
/// that logging code cannot crash on a dead snapshot.
impl<'ctx> fmt::Display for Model<'ctx> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "<invalidated>");
        }
        let s = unsafe { Z3_model_to_string(self.ctx.z3_ctx, self.z3_model) };
        write!(f, "{}", c_str_to_string(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Config;
    use crate::expr::Float64;
    use crate::solver::{SmtResult, Solver};

    fn ctx() -> Context {
        Context::new(Config::new().unwrap()).unwrap()
    }

    fn sat_model<'ctx>(solver: &mut Solver<'ctx>) -> Rc<Model<'ctx>> {
        assert!(solver.check() == SmtResult::Sat);
        solver.get_model().unwrap()
    }

    #[test]
    fn int_numeral_round_trip() {
        let ctx = ctx();
        let x: Int = ctx.declare("x");
        let mut solver = Solver::new(&ctx);
        solver.assert(&x._eq(&Int::lit(&ctx, -42)));
        let model = sat_model(&mut solver);
        assert_eq!(model.get_int(&x).unwrap(), -42);
    }

    #[test]
    fn big_int_numeral_round_trip() {
        let ctx = ctx();
        let x: Int = ctx.declare("x");
        let big = "123456789012345678901234567890";
        let mut solver = Solver::new(&ctx);
        solver.assert(&x._eq(&Int::numeral(&ctx, big)));
        let model = sat_model(&mut solver);
        assert_eq!(model.get_int(&x).unwrap(), big.parse::<i128>().unwrap());
    }

    #[test]
    fn bool_value_round_trip() {
        let ctx = ctx();
        let p: Bool = ctx.declare("p");
        let mut solver = Solver::new(&ctx);
        solver.assert(&p.iff(&Bool::lit(&ctx, true)));
        let model = sat_model(&mut solver);
        assert!(model.get_bool(&p).unwrap());
    }

    #[test]
    fn rational_round_trip_is_exact() {
        let ctx = ctx();
        let r: Real = ctx.declare("r");
        let mut solver = Solver::new(&ctx);
        solver.assert(&r._eq(&Real::lit(&ctx, 1, 3)));
        let model = sat_model(&mut solver);
        assert_eq!(model.get_real(&r).unwrap(), Rational::new(1, 3).unwrap());
    }

    #[test]
    fn rational_from_value_round_trip() {
        let ctx = ctx();
        let q = Rational::new(-22, 7).unwrap();
        let r: Real = ctx.declare("r");
        let mut solver = Solver::new(&ctx);
        solver.assert(&r._eq(&Real::from_rational(&ctx, &q)));
        let model = sat_model(&mut solver);
        assert_eq!(model.get_real(&r).unwrap(), q);
    }

    #[test]
    fn bv_round_trip() {
        let ctx = ctx();
        let v: Bv<16> = ctx.declare("v");
        let mut solver = Solver::new(&ctx);
        solver.assert(&v._eq(&Bv::lit(&ctx, 0xBEEF)));
        let model = sat_model(&mut solver);
        assert_eq!(model.get_bv_u64(&v).unwrap(), 0xBEEF);
    }

    #[test]
    fn wide_bv_round_trip() {
        let ctx = ctx();
        let mut bits = vec![false; 100];
        bits[0] = true;
        bits[63] = true;
        bits[64] = true;
        bits[99] = true;

        let v: Bv<100> = ctx.declare("v");
        let mut solver = Solver::new(&ctx);
        solver.assert(&v._eq(&Bv::from_bits(&ctx, &bits).unwrap()));
        let model = sat_model(&mut solver);
        assert_eq!(model.get_bv_bits(&v).unwrap(), bits);
    }

    #[test]
    fn float_parts_round_trip() {
        let ctx = ctx();
        let f: Float64 = ctx.declare("f");
        let mut solver = Solver::new(&ctx);
        solver.assert(&f.fp_eq(&Float::lit(&ctx, 1.5)));
        let model = sat_model(&mut solver);
        let parts = model.get_float(&f).unwrap();
        // 1.5 = 1.1b * 2^0: fraction is the top bit of 52.
        assert_eq!(parts, FpParts { sign: false, exponent: 0, significand: 1 << 51 });
    }

    #[test]
    fn eval_without_completion_leaves_free_terms_symbolic() {
        let ctx = ctx();
        let x: Int = ctx.declare("x");
        let mut solver = Solver::new(&ctx);
        let model = sat_model(&mut solver);

        let free = model.eval(&x, false).unwrap();
        assert!(!free.ast().is_numeral());

        let completed = model.eval(&x, true).unwrap();
        assert!(completed.ast().is_numeral());
    }

    #[test]
    fn display_of_invalidated_model_is_sentinel() {
        let ctx = ctx();
        let x: Int = ctx.declare("x");
        let mut solver = Solver::new(&ctx);
        solver.assert(&x._eq(&Int::lit(&ctx, 7)));
        let model = sat_model(&mut solver);
        assert!(!model.to_string().is_empty());

        solver.reset();
        // Data accessors fail, the display path must not.
        assert_eq!(model.get_int(&x).unwrap_err(), Error::UseAfterFree("model"));
        assert_eq!(model.to_string(), "<invalidated>");
    }

    #[test]
    fn non_numeral_extraction_is_rejected() {
        let ctx = ctx();
        let x: Int = ctx.declare("x");
        match x.ast().numeral_string() {
            Err(Error::NotANumeral(_)) => (),
            other => panic!("expected NotANumeral, got {:?}", other),
        }
    }
}
