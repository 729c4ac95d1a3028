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

//! Array expressions over arbitrary index and value sorts. An
//! N-dimensional array is a nesting `Array<I1, Array<I2, V>>`, and
//! the fixed-arity select/store helpers thread their indices through
//! the nesting one level at a time. Index sorts are checked at
//! compile time:
//!
//! ```compile_fail
//! use smtkit::context::{Config, Context};
//! use smtkit::expr::{Array, Int, Real, Sorted};
//!
//! let ctx = Context::new(Config::new().unwrap()).unwrap();
//! let a: Array<Int, Int> = ctx.declare("a");
//! let r: Real = ctx.declare("r");
//! let _ = a.select(&r); // Real is not the index sort of a
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::ast::{Ast, Sort};
use crate::context::Context;
use crate::expr::Sorted;

pub struct Array<'ctx, D, R> {
    ast: Ast<'ctx>,
    _sorts: PhantomData<(D, R)>,
}

impl<'ctx, D, R> Clone for Array<'ctx, D, R> {
    fn clone(&self) -> Self {
        Array { ast: self.ast.clone(), _sorts: PhantomData }
    }
}

impl<'ctx, D: Sorted<'ctx>, R: Sorted<'ctx>> Sorted<'ctx> for Array<'ctx, D, R> {
    fn sort(ctx: &'ctx Context) -> Sort<'ctx> {
        Sort::array(ctx, &D::sort(ctx), &R::sort(ctx))
    }

    fn from_ast(ast: Ast<'ctx>) -> Self {
        Array { ast, _sorts: PhantomData }
    }

    fn ast(&self) -> &Ast<'ctx> {
        &self.ast
    }
}

impl<'ctx, D: Sorted<'ctx>, R: Sorted<'ctx>> Array<'ctx, D, R> {
    /// The constant array mapping every index to `default`.
    pub fn constant(ctx: &'ctx Context, default: &R) -> Self {
        Array { ast: Ast::mk_const_array(ctx, &D::sort(ctx), default.ast()), _sorts: PhantomData }
    }

    pub fn select(&self, index: &D) -> R {
        R::from_ast(self.ast.mk_select(index.ast()))
    }

    /// The array equal to `self` except that `index` maps to `value`.
    pub fn store(&self, index: &D, value: &R) -> Self {
        Array { ast: self.ast.mk_store(index.ast(), value.ast()), _sorts: PhantomData }
    }
}

impl<'ctx, I1, I2, V> Array<'ctx, I1, Array<'ctx, I2, V>>
where
    I1: Sorted<'ctx>,
    I2: Sorted<'ctx>,
    V: Sorted<'ctx>,
{
    pub fn select2(&self, i: &I1, j: &I2) -> V {
        self.select(i).select(j)
    }

    pub fn store2(&self, i: &I1, j: &I2, value: &V) -> Self {
        let inner = self.select(i);
        self.store(i, &inner.store(j, value))
    }
}

impl<'ctx, I1, I2, I3, V> Array<'ctx, I1, Array<'ctx, I2, Array<'ctx, I3, V>>>
where
    I1: Sorted<'ctx>,
    I2: Sorted<'ctx>,
    I3: Sorted<'ctx>,
    V: Sorted<'ctx>,
{
    pub fn select3(&self, i: &I1, j: &I2, k: &I3) -> V {
        self.select(i).select(j).select(k)
    }

    pub fn store3(&self, i: &I1, j: &I2, k: &I3, value: &V) -> Self {
        let level1 = self.select(i);
        let level2 = level1.select(j);
        self.store(i, &level1.store(j, &level2.store(k, value)))
    }
}

impl<'ctx, D, R> fmt::Display for Array<'ctx, D, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.ast.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Config;
    use crate::expr::{Bv, Int};
    use crate::solver::{SmtResult, Solver};

    fn ctx() -> Context {
        Context::new(Config::new().unwrap()).unwrap()
    }

    #[test]
    fn constant_array_selects_default_everywhere() {
        let ctx = ctx();
        let a = Array::<Int, Int>::constant(&ctx, &Int::lit(&ctx, 42));
        let i: Int = ctx.declare("i");

        let mut solver = Solver::new(&ctx);
        solver.assert(&a.select(&i)._neq(&Int::lit(&ctx, 42)));
        assert_eq!(solver.check(), SmtResult::Unsat);
    }

    #[test]
    fn store_then_select_same_index() {
        let ctx = ctx();
        let a: Array<Bv<8>, Int> = ctx.declare("a");
        let k = Bv::<8>::lit(&ctx, 3);
        let stored = a.store(&k, &Int::lit(&ctx, 7));

        let mut solver = Solver::new(&ctx);
        solver.assert(&stored.select(&k)._eq(&Int::lit(&ctx, 7)));
        assert_eq!(solver.check(), SmtResult::Sat);
        solver.reset();
        solver.assert(&stored.select(&k)._neq(&Int::lit(&ctx, 7)));
        assert_eq!(solver.check(), SmtResult::Unsat);
    }

    #[test]
    fn store_leaves_other_indices_alone() {
        let ctx = ctx();
        let a: Array<Int, Int> = ctx.declare("a");
        let stored = a.store(&Int::lit(&ctx, 0), &Int::lit(&ctx, 1));
        let other = Int::lit(&ctx, 5);

        let mut solver = Solver::new(&ctx);
        solver.assert(&stored.select(&other)._neq(&a.select(&other)));
        assert_eq!(solver.check(), SmtResult::Unsat);
    }

    #[test]
    fn nested_store_and_select() {
        let ctx = ctx();
        let grid: Array<Int, Array<Int, Int>> = ctx.declare("grid");
        let (i, j) = (Int::lit(&ctx, 1), Int::lit(&ctx, 2));
        let stored = grid.store2(&i, &j, &Int::lit(&ctx, 9));

        let mut solver = Solver::new(&ctx);
        solver.assert(&stored.select2(&i, &j)._neq(&Int::lit(&ctx, 9)));
        assert_eq!(solver.check(), SmtResult::Unsat);
    }
}
