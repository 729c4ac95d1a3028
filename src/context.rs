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

//! The reasoning session. A [`Context`] owns the native Z3
//! environment; every expression, solver, and model borrows the
//! context that created it, so the borrow checker guarantees the
//! environment outlives everything derived from it. Dropping a
//! context while any derived handle is live is a compile error, not
//! a runtime check:
//!
//! ```compile_fail
//! use smtkit::context::{Config, Context};
//! use smtkit::expr::Int;
//! use smtkit::solver::Solver;
//!
//! let ctx = Context::new(Config::new().unwrap()).unwrap();
//! let x: Int = ctx.declare("x");
//! let mut solver = Solver::new(&ctx);
//! drop(ctx); // x and solver still borrow the context
//! solver.check();
//! ```

use std::cell::Cell;

use z3_sys::*;

use crate::ast::{c_string, Ast};
use crate::error::{Error, Result};
use crate::expr::Sorted;

/// Configuration handed to [`Context::new`]. Wraps `Z3_config`;
/// `Z3_del_config` is called when it is dropped.
pub struct Config {
    z3_cfg: Z3_config,
}

impl Config {
    pub fn new() -> Result<Self> {
        let z3_cfg = unsafe { Z3_mk_config() };
        if z3_cfg.is_null() {
            return Err(Error::EngineInit("Z3 configuration"));
        }
        Ok(Config { z3_cfg })
    }

    pub fn set_param_value(&self, id: &str, value: &str) {
        let id = c_string(id);
        let value = c_string(value);
        unsafe { Z3_set_param_value(self.z3_cfg, id.as_ptr(), value.as_ptr()) }
    }
}

impl Drop for Config {
    fn drop(&mut self) {
        unsafe { Z3_del_config(self.z3_cfg) }
    }
}

/// A Z3 environment created in reference-counted mode
/// (`Z3_mk_context_rc`). All AST nodes live in exactly one context,
/// and the context must not be shared between threads: the native
/// engine is not reentrant, and the diagnostic handle counter is a
/// plain [`Cell`].
#[derive(Debug)]
pub struct Context {
    pub(crate) z3_ctx: Z3_context,
    live_asts: Cell<usize>,
}

impl Context {
    pub fn new(cfg: Config) -> Result<Self> {
        let z3_ctx = unsafe { Z3_mk_context_rc(cfg.z3_cfg) };
        if z3_ctx.is_null() {
            return Err(Error::EngineInit("Z3 context"));
        }
        Ok(Context { z3_ctx, live_asts: Cell::new(0) })
    }

    /// Updates a parameter on an already-created context, e.g.
    /// `("timeout", "1000")`.
    pub fn update_param(&self, id: &str, value: &str) {
        let id = c_string(id);
        let value = c_string(value);
        unsafe { Z3_update_param_value(self.z3_ctx, id.as_ptr(), value.as_ptr()) }
    }

    /// Declares a fresh uninterpreted constant of the sort encoded by
    /// `T`. The sort handle is resolved at compile time from the
    /// expression type, so
    ///
    /// ```
    /// # use smtkit::context::{Config, Context};
    /// # use smtkit::expr::{Bv, Int};
    /// # let ctx = Context::new(Config::new().unwrap()).unwrap();
    /// let x: Int = ctx.declare("x");
    /// let v: Bv<32> = ctx.declare("v");
    /// ```
    ///
    /// needs no runtime sort argument at all. A name containing an
    /// interior NUL byte is truncated at the NUL.
    pub fn declare<'ctx, T: Sorted<'ctx>>(&'ctx self, name: &str) -> T {
        let sort = T::sort(self);
        let name = c_string(name);
        unsafe {
            let sym = Z3_mk_string_symbol(self.z3_ctx, name.as_ptr());
            let z3_ast = Z3_mk_const(self.z3_ctx, sym, sort.z3_sort);
            T::from_ast(Ast::wrap(self, z3_ast))
        }
    }

    /// Number of AST handles currently retained through this context.
    /// Purely diagnostic: ownership lives in the individual guards,
    /// not in the context.
    pub fn live_asts(&self) -> usize {
        self.live_asts.get()
    }

    pub(crate) fn note_retained(&self) {
        self.live_asts.set(self.live_asts.get() + 1);
    }

    pub(crate) fn note_released(&self) {
        self.live_asts.set(self.live_asts.get() - 1);
    }

    pub(crate) fn error_msg(&self) -> Error {
        unsafe {
            let code = Z3_get_error_code(self.z3_ctx);
            let msg = Z3_get_error_msg(self.z3_ctx, code);
            Error::Engine(crate::ast::c_str_to_string(msg))
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        crate::log!(
            crate::log::REFCOUNT,
            format!("deleting context with {} live ast handles", self.live_asts.get())
        );
        unsafe { Z3_del_context(self.z3_ctx) }
    }
}

/// Calls `Z3_finalize_memory`, which reclaims everything Z3 has ever
/// allocated. Useful before process exit to check for handle leaks.
///
/// # Safety
///
/// No [`Context`] may exist or be created afterwards.
pub unsafe fn finalize_memory() {
    Z3_finalize_memory()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Int, Sorted};
    use crate::solver::{SmtResult, Solver};

    #[test]
    fn declare_truncates_names_at_interior_nul() {
        let ctx = Context::new(Config::new().unwrap()).unwrap();
        let x: Int = ctx.declare("x\0ignored");
        assert_eq!(x.to_string(), "x");

        let y: Int = ctx.declare("x");
        let mut solver = Solver::new(&ctx);
        solver.assert(&x._eq(&Int::lit(&ctx, 1)));
        solver.assert(&y._eq(&Int::lit(&ctx, 2)));
        // Same symbol, so the two constraints contradict.
        assert!(solver.check() == SmtResult::Unsat);
    }

    #[test]
    fn live_handle_count_tracks_guards() {
        let ctx = Context::new(Config::new().unwrap()).unwrap();
        assert_eq!(ctx.live_asts(), 0);
        let x: Int = ctx.declare("x");
        assert!(ctx.live_asts() > 0);
        drop(x);
        assert_eq!(ctx.live_asts(), 0);
    }
}
