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

//! Typed expression handles. Each expression type is a newtype over
//! an [`Ast`] guard whose Rust type encodes its SMT sort, so sort
//! mismatches are compile errors. The [`Sorted`] trait is the bridge
//! between the two worlds: it resolves the native sort handle for a
//! type and re-attaches the type to a raw handle coming back from Z3.

use z3_sys::Z3_mk_distinct;

use crate::ast::{Ast, Sort};
use crate::context::Context;
use crate::error::{Error, Result};

mod array;
mod bitvec;
mod boolean;
mod float;
mod numeric;

pub use self::array::Array;
pub use self::bitvec::Bv;
pub use self::boolean::Bool;
pub use self::float::{Float, Float32, Float64};
pub use self::numeric::{Int, Real};

/// Implemented by every concrete expression type. `sort` builds the
/// native sort handle corresponding to the host type, and `from_ast`
/// wraps a raw handle back into the typed world; generic code such as
/// [`Context::declare`] and [`crate::model::Model::eval`] is written
/// once against these two operations and monomorphized per sort.
pub trait Sorted<'ctx>: Sized {
    fn sort(ctx: &'ctx Context) -> Sort<'ctx>;
    fn from_ast(ast: Ast<'ctx>) -> Self;
    fn ast(&self) -> &Ast<'ctx>;

    fn ctx(&self) -> &'ctx Context {
        self.ast().ctx()
    }

    /// The formula `self = other`. Only defined between expressions
    /// of the same sort; use [`Bool`] connectives for logic.
    fn _eq(&self, other: &Self) -> Bool<'ctx> {
        Bool::from_ast(self.ast().mk_eq(other.ast()))
    }

    fn _neq(&self, other: &Self) -> Bool<'ctx> {
        Bool::from_ast(self.ast().mk_eq(other.ast()).mk_not())
    }
}

/// The formula asserting that all arguments are pairwise distinct.
pub fn distinct<'ctx, T: Sorted<'ctx>>(args: &[T]) -> Result<Bool<'ctx>> {
    match args.first() {
        None => Err(Error::EmptyArgs("distinct")),
        Some(first) => {
            let asts: Vec<&Ast<'ctx>> = args.iter().map(|a| a.ast()).collect();
            Ok(Bool::from_ast(Ast::mk_many(Z3_mk_distinct, first.ctx(), &asts)))
        }
    }
}
