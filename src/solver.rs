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

//! The solving context. A [`Solver`] accumulates boolean constraints,
//! runs the native decision procedure, and hands out [`Model`]
//! snapshots of satisfying assignments.
//!
//! Model invalidation is a single generation counter shared between a
//! solver and the models it has produced: every state-changing
//! operation bumps the counter before the native call returns, and a
//! model is live exactly while the counter still has the value it was
//! created under. No stale model can ever be observed as live.

use std::cell::Cell;
use std::rc::Rc;

use libc::c_uint;
use z3_sys::*;

use crate::ast::c_str_to_string;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::expr::{Bool, Sorted};
use crate::model::Model;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmtResult {
    Sat,
    Unsat,
    Unknown,
}

use SmtResult::*;

/// A native solver bound to a [`Context`]. Single-threaded by
/// construction (the generation counter is `Rc<Cell>`), matching the
/// native engine's own thread-safety contract.
///
/// ```
/// use smtkit::context::{Config, Context};
/// use smtkit::expr::Bool;
/// use smtkit::solver::{SmtResult, Solver};
///
/// let ctx = Context::new(Config::new().unwrap()).unwrap();
/// let mut solver = Solver::new(&ctx);
/// let p: Bool = ctx.declare("p");
/// solver.assert(&p);
/// assert!(solver.check() == SmtResult::Sat);
/// ```
pub struct Solver<'ctx> {
    z3_solver: Z3_solver,
    ctx: &'ctx Context,
    depth: u32,
    status: Option<SmtResult>,
    generation: Rc<Cell<u64>>,
    model: Option<Rc<Model<'ctx>>>,
}

impl<'ctx> Solver<'ctx> {
    fn from_raw(ctx: &'ctx Context, z3_solver: Z3_solver) -> Self {
        unsafe {
            Z3_solver_inc_ref(ctx.z3_ctx, z3_solver);
        }
        Solver {
            z3_solver,
            ctx,
            depth: 0,
            status: None,
            generation: Rc::new(Cell::new(0)),
            model: None,
        }
    }

    /// A general-purpose solver supporting all theories and tactics.
    pub fn new(ctx: &'ctx Context) -> Self {
        Solver::from_raw(ctx, unsafe { Z3_mk_solver(ctx.z3_ctx) })
    }

    /// An incremental solver limited to the core theories; cheaper to
    /// create and often faster for plain satisfiability queries.
    pub fn simple(ctx: &'ctx Context) -> Self {
        Solver::from_raw(ctx, unsafe { Z3_mk_simple_solver(ctx.z3_ctx) })
    }

    /// Any model handed out earlier is dead from here on, eagerly,
    /// before the state change it reacts to becomes visible.
    fn invalidate_model(&mut self) {
        self.generation.set(self.generation.get() + 1);
        if self.model.take().is_some() {
            crate::log!(crate::log::SOLVER, "invalidated cached model");
        }
    }

    pub fn assert(&mut self, constraint: &Bool<'ctx>) {
        self.invalidate_model();
        self.status = None;
        unsafe {
            Z3_solver_assert(self.ctx.z3_ctx, self.z3_solver, constraint.ast().z3_ast);
        }
    }

    pub fn check(&mut self) -> SmtResult {
        self.invalidate_model();
        let result = unsafe { Z3_solver_check(self.ctx.z3_ctx, self.z3_solver) };
        let result = if result == Z3_L_TRUE {
            Sat
        } else if result == Z3_L_FALSE {
            Unsat
        } else {
            Unknown
        };
        crate::log!(crate::log::SOLVER, format!("check-sat: {:?}", result));
        self.status = Some(result);
        result
    }

    /// Opens a backtracking scope.
    pub fn push(&mut self) {
        self.invalidate_model();
        self.status = None;
        unsafe {
            Z3_solver_push(self.ctx.z3_ctx, self.z3_solver);
        }
        self.depth += 1;
    }

    /// Closes `n` backtracking scopes, dropping every assertion made
    /// inside them.
    pub fn pop(&mut self, n: u32) -> Result<()> {
        if n > self.depth {
            return Err(Error::ScopeUnderflow { depth: self.depth, requested: n });
        }
        self.invalidate_model();
        self.status = None;
        unsafe {
            Z3_solver_pop(self.ctx.z3_ctx, self.z3_solver, n as c_uint);
        }
        self.depth -= n;
        Ok(())
    }

    /// Drops all assertions and scopes.
    pub fn reset(&mut self) {
        self.invalidate_model();
        self.status = None;
        unsafe {
            Z3_solver_reset(self.ctx.z3_ctx, self.z3_solver);
        }
        self.depth = 0;
    }

    /// The satisfying assignment from the last [`check`]. Requires
    /// that a check has run since the last state change and that it
    /// returned [`Sat`]. The snapshot is cached: calling this twice
    /// with no intervening mutation returns the same model instance.
    ///
    /// [`check`]: Solver::check
    pub fn get_model(&mut self) -> Result<Rc<Model<'ctx>>> {
        match self.status {
            None => return Err(Error::NotChecked),
            Some(Unsat) => return Err(Error::NotSatisfiable),
            Some(Unknown) => return Err(Error::UnknownStatus),
            Some(Sat) => (),
        }
        if let Some(model) = &self.model {
            return Ok(model.clone());
        }
        let z3_model = unsafe { Z3_solver_get_model(self.ctx.z3_ctx, self.z3_solver) };
        if z3_model.is_null() {
            return Err(self.ctx.error_msg());
        }
        let model = Rc::new(Model::new(self.ctx, z3_model, self.generation.clone()));
        self.model = Some(model.clone());
        Ok(model)
    }

    /// Why the last check was inconclusive. Only meaningful while
    /// status is [`Unknown`].
    pub fn reason_unknown(&self) -> Result<String> {
        if self.status != Some(Unknown) {
            return Err(Error::NotUnknown);
        }
        let s = unsafe { Z3_solver_get_reason_unknown(self.ctx.z3_ctx, self.z3_solver) };
        Ok(c_str_to_string(s))
    }

    /// Current backtracking depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Result of the last check, if no state change happened since.
    pub fn status(&self) -> Option<SmtResult> {
        self.status
    }
}

impl<'ctx> Drop for Solver<'ctx> {
    fn drop(&mut self) {
        // Models may outlive the solver; they die with it.
        self.invalidate_model();
        unsafe {
            Z3_solver_dec_ref(self.ctx.z3_ctx, self.z3_solver);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Config;
    use crate::expr::{Int, Sorted};

    fn ctx() -> Context {
        Context::new(Config::new().unwrap()).unwrap()
    }

    #[test]
    fn solve_linear_system() {
        let ctx = ctx();
        let x: Int = ctx.declare("x");
        let y: Int = ctx.declare("y");

        let mut solver = Solver::new(&ctx);
        solver.assert(&(&x + &y)._eq(&Int::lit(&ctx, 10)));
        solver.assert(&(&x - &y)._eq(&Int::lit(&ctx, 2)));
        assert!(solver.check() == Sat);

        let model = solver.get_model().unwrap();
        assert_eq!(model.get_int(&x).unwrap(), 6);
        assert_eq!(model.get_int(&y).unwrap(), 4);
    }

    #[test]
    fn unsat_has_no_model() {
        let ctx = ctx();
        let mut solver = Solver::new(&ctx);
        solver.assert(&Bool::lit(&ctx, false));
        assert!(solver.check() == Unsat);
        assert_eq!(solver.get_model().unwrap_err(), Error::NotSatisfiable);
    }

    #[test]
    fn get_model_requires_check() {
        let ctx = ctx();
        let mut solver = Solver::new(&ctx);
        assert_eq!(solver.get_model().unwrap_err(), Error::NotChecked);

        // A successful check followed by a mutation counts as
        // not-checked again.
        assert!(solver.check() == Sat);
        solver.assert(&Bool::lit(&ctx, true));
        assert_eq!(solver.get_model().unwrap_err(), Error::NotChecked);
    }

    #[test]
    fn model_is_cached_until_invalidated() {
        let ctx = ctx();
        let x: Int = ctx.declare("x");
        let mut solver = Solver::new(&ctx);
        solver.assert(&x._eq(&Int::lit(&ctx, 3)));
        assert!(solver.check() == Sat);

        let first = solver.get_model().unwrap();
        let second = solver.get_model().unwrap();
        assert!(Rc::ptr_eq(&first, &second));

        assert!(solver.check() == Sat);
        let third = solver.get_model().unwrap();
        assert!(!Rc::ptr_eq(&first, &third));
    }

    #[test]
    fn mutation_invalidates_outstanding_model() {
        let ctx = ctx();
        let x: Int = ctx.declare("x");
        let mut solver = Solver::new(&ctx);
        solver.assert(&x._eq(&Int::lit(&ctx, 3)));
        assert!(solver.check() == Sat);

        let model = solver.get_model().unwrap();
        assert!(model.is_valid());
        solver.assert(&Bool::lit(&ctx, true));
        assert!(!model.is_valid());
        assert_eq!(model.get_int(&x).unwrap_err(), Error::UseAfterFree("model"));
    }

    #[test]
    fn push_and_pop_restore_state() {
        let ctx = ctx();
        let x: Int = ctx.declare("x");
        let mut solver = Solver::new(&ctx);
        solver.assert(&x.gt(&Int::lit(&ctx, 5)));
        assert!(solver.check() == Sat);

        solver.push();
        assert_eq!(solver.depth(), 1);
        solver.assert(&x.lt(&Int::lit(&ctx, 0)));
        assert!(solver.check() == Unsat);

        solver.pop(1).unwrap();
        assert_eq!(solver.depth(), 0);
        assert!(solver.check() == Sat);
    }

    #[test]
    fn pop_beyond_depth_is_rejected() {
        let ctx = ctx();
        let mut solver = Solver::new(&ctx);
        solver.push();
        assert_eq!(solver.pop(2).unwrap_err(), Error::ScopeUnderflow { depth: 1, requested: 2 });
        // The failed pop must not have touched the native solver.
        assert_eq!(solver.depth(), 1);
        solver.pop(1).unwrap();
    }

    #[test]
    fn reset_clears_assertions_and_scopes() {
        let ctx = ctx();
        let mut solver = Solver::new(&ctx);
        solver.push();
        solver.assert(&Bool::lit(&ctx, false));
        assert!(solver.check() == Unsat);

        solver.reset();
        assert_eq!(solver.depth(), 0);
        assert_eq!(solver.status(), None);
        assert!(solver.check() == Sat);
    }

    #[test]
    fn solver_drop_invalidates_model() {
        let ctx = ctx();
        let x: Int = ctx.declare("x");
        let mut solver = Solver::new(&ctx);
        solver.assert(&x._eq(&Int::lit(&ctx, 1)));
        assert!(solver.check() == Sat);
        let model = solver.get_model().unwrap();
        drop(solver);
        assert!(!model.is_valid());
        assert_eq!(model.get_int(&x).unwrap_err(), Error::UseAfterFree("model"));
    }

    #[test]
    fn reason_unknown_requires_unknown_status() {
        let ctx = ctx();
        let mut solver = Solver::new(&ctx);
        assert!(solver.check() == Sat);
        assert_eq!(solver.reason_unknown().unwrap_err(), Error::NotUnknown);
    }

    #[test]
    fn simple_solver_checks_sat() {
        let ctx = ctx();
        let x: Int = ctx.declare("x");
        let mut solver = Solver::simple(&ctx);
        solver.assert(&x.gt(&Int::lit(&ctx, 0)));
        assert!(solver.check() == Sat);
    }
}
