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

//! Boolean-sort formulas. Solver assertions are always [`Bool`]. The
//! `&`, `|`, `^`, and `!` operators build the propositional
//! connectives; implication, iff, if-then-else, and the batch
//! conjunction/disjunction constructors are methods.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use z3_sys::{Z3_mk_and, Z3_mk_or};

use crate::ast::{Ast, Sort};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::expr::Sorted;

/// A formula of boolean sort. Solver assertions are always `Bool`.
#[derive(Clone, Debug)]
pub struct Bool<'ctx> {
    ast: Ast<'ctx>,
}

impl<'ctx> Sorted<'ctx> for Bool<'ctx> {
    fn sort(ctx: &'ctx Context) -> Sort<'ctx> {
        Sort::boolean(ctx)
    }

    fn from_ast(ast: Ast<'ctx>) -> Self {
        Bool { ast }
    }

    fn ast(&self) -> &Ast<'ctx> {
        &self.ast
    }
}

impl<'ctx> Bool<'ctx> {
    pub fn lit(ctx: &'ctx Context, b: bool) -> Self {
        Bool { ast: Ast::mk_bool(ctx, b) }
    }

    pub fn implies(&self, rhs: &Bool<'ctx>) -> Bool<'ctx> {
        Bool { ast: self.ast.mk_implies(&rhs.ast) }
    }

    pub fn iff(&self, rhs: &Bool<'ctx>) -> Bool<'ctx> {
        Bool { ast: self.ast.mk_iff(&rhs.ast) }
    }

    /// If-then-else over any sort: both branches must have the same
    /// expression type, which the compiler enforces.
    pub fn ite<T: Sorted<'ctx>>(&self, then_expr: &T, else_expr: &T) -> T {
        T::from_ast(self.ast.ite(then_expr.ast(), else_expr.ast()))
    }

    /// Conjunction of a whole slice at once.
    pub fn and_all(args: &[Bool<'ctx>]) -> Result<Bool<'ctx>> {
        match args.first() {
            None => Err(Error::EmptyArgs("and_all")),
            Some(first) => {
                let asts: Vec<&Ast<'ctx>> = args.iter().map(|b| &b.ast).collect();
                Ok(Bool { ast: Ast::mk_many(Z3_mk_and, first.ctx(), &asts) })
            }
        }
    }

    pub fn or_all(args: &[Bool<'ctx>]) -> Result<Bool<'ctx>> {
        match args.first() {
            None => Err(Error::EmptyArgs("or_all")),
            Some(first) => {
                let asts: Vec<&Ast<'ctx>> = args.iter().map(|b| &b.ast).collect();
                Ok(Bool { ast: Ast::mk_many(Z3_mk_or, first.ctx(), &asts) })
            }
        }
    }
}

macro_rules! bool_binop {
    ($trait_name:ident, $fn_name:ident, $mk:ident) => {
        impl<'ctx> $trait_name for Bool<'ctx> {
            type Output = Bool<'ctx>;
            fn $fn_name(self, rhs: Bool<'ctx>) -> Bool<'ctx> {
                Bool { ast: self.ast.$mk(&rhs.ast) }
            }
        }

        impl<'ctx> $trait_name<&Bool<'ctx>> for Bool<'ctx> {
            type Output = Bool<'ctx>;
            fn $fn_name(self, rhs: &Bool<'ctx>) -> Bool<'ctx> {
                Bool { ast: self.ast.$mk(&rhs.ast) }
            }
        }

        impl<'ctx> $trait_name<Bool<'ctx>> for &Bool<'ctx> {
            type Output = Bool<'ctx>;
            fn $fn_name(self, rhs: Bool<'ctx>) -> Bool<'ctx> {
                Bool { ast: self.ast.$mk(&rhs.ast) }
            }
        }

        impl<'ctx> $trait_name<&Bool<'ctx>> for &Bool<'ctx> {
            type Output = Bool<'ctx>;
            fn $fn_name(self, rhs: &Bool<'ctx>) -> Bool<'ctx> {
                Bool { ast: self.ast.$mk(&rhs.ast) }
            }
        }
    };
}

bool_binop!(BitAnd, bitand, mk_and);
bool_binop!(BitOr, bitor, mk_or);
bool_binop!(BitXor, bitxor, mk_xor);

impl<'ctx> Not for Bool<'ctx> {
    type Output = Bool<'ctx>;
    fn not(self) -> Bool<'ctx> {
        Bool { ast: self.ast.mk_not() }
    }
}

impl<'ctx> Not for &Bool<'ctx> {
    type Output = Bool<'ctx>;
    fn not(self) -> Bool<'ctx> {
        Bool { ast: self.ast.mk_not() }
    }
}

impl<'ctx> fmt::Display for Bool<'ctx> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.ast.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Config;
    use crate::expr::{distinct, Int};
    use crate::solver::{SmtResult, Solver};

    fn ctx() -> Context {
        Context::new(Config::new().unwrap()).unwrap()
    }

    #[test]
    fn modus_ponens() {
        let ctx = ctx();
        let p: Bool = ctx.declare("p");
        let q: Bool = ctx.declare("q");

        let mut solver = Solver::new(&ctx);
        solver.assert(&p.implies(&q));
        solver.assert(&p);
        solver.assert(&!q);
        assert!(solver.check() == SmtResult::Unsat);
    }

    #[test]
    fn ite_selects_branch() {
        let ctx = ctx();
        let picked = Bool::lit(&ctx, true).ite(&Int::lit(&ctx, 1), &Int::lit(&ctx, 2));

        let mut solver = Solver::new(&ctx);
        solver.assert(&picked._neq(&Int::lit(&ctx, 1)));
        assert!(solver.check() == SmtResult::Unsat);
    }

    #[test]
    fn batch_connectives_reject_empty_input() {
        assert_eq!(Bool::and_all(&[]).unwrap_err(), Error::EmptyArgs("and_all"));
        assert_eq!(Bool::or_all(&[]).unwrap_err(), Error::EmptyArgs("or_all"));
        assert_eq!(distinct::<Bool>(&[]).unwrap_err(), Error::EmptyArgs("distinct"));
    }

    #[test]
    fn distinct_over_three_values() {
        let ctx = ctx();
        let xs: Vec<Int> = (0..3).map(|i| ctx.declare(&format!("x{}", i))).collect();

        let mut solver = Solver::new(&ctx);
        solver.assert(&distinct(&xs).unwrap());
        for x in &xs {
            solver.assert(&x.ge(&Int::lit(&ctx, 0)));
            solver.assert(&x.lt(&Int::lit(&ctx, 3)));
        }
        assert!(solver.check() == SmtResult::Sat);

        // A fourth distinct value cannot fit in [0, 3).
        let extra: Int = ctx.declare("extra");
        let mut all = xs.clone();
        all.push(extra.clone());
        solver.assert(&distinct(&all).unwrap());
        solver.assert(&extra.ge(&Int::lit(&ctx, 0)));
        solver.assert(&extra.lt(&Int::lit(&ctx, 3)));
        assert!(solver.check() == SmtResult::Unsat);
    }
}
