mod scope_stack;
mod symbol_pass;
mod type_pass;

use syntax::{Program, ClassDef, FuncDef, SynTy, SynTyKind, Ty, TyKind, ScopeOwner};
use common::Ref;
use std::ops::DerefMut;
use crate::{scope_stack::ScopeStack, symbol_pass::SymbolPass, type_pass::TypePass};

// scope build + name/type resolution, the Check half of the pipeline
// inputs are assumed semantically valid, so nothing is reported here; the pass only links
// declarations to uses (scopes, parent_ref, var, func_ref) and caches every expression's static type
pub fn work<'a>(p: &'a Program<'a>) {
  let mut s = SymbolPass(Resolver { scopes: ScopeStack::new(p), cur_class: None });
  s.program(p);
  let mut t = TypePass(s.0);
  t.program(p);
}

pub(crate) struct Resolver<'a> {
  pub scopes: ScopeStack<'a>,
  pub cur_class: Option<&'a ClassDef<'a>>,
}

impl<'a> Resolver<'a> {
  // is_arr can be helpful if you want the type of array while only having its element type (to avoid cloning other fields)
  pub fn ty(&self, s: &SynTy<'a>, is_arr: bool) -> Ty<'a> {
    let kind = match &s.kind {
      SynTyKind::Int => TyKind::Int,
      SynTyKind::Bool => TyKind::Bool,
      SynTyKind::String => TyKind::String,
      SynTyKind::Void => TyKind::Void,
      SynTyKind::Named(name) => match self.scopes.lookup_class(name) {
        Some(c) => TyKind::Object(Ref(c)),
        None => unreachable!("`{}` names no class; interface-typed variables take no part in codegen", name),
      }
    };
    Ty { arr: s.arr + (is_arr as u32), kind }
  }

  // the vtable offset of a method and its slot lookup both go through the extends chain,
  // so resolution of a member name inside class `c` is just c.lookup (see ClassDef::lookup)
  pub fn lookup_func(&self, c: &'a ClassDef<'a>, name: &'a str) -> Option<&'a FuncDef<'a>> {
    match c.lookup(name) {
      Some(syntax::Symbol::Func(f)) => Some(f),
      _ => None,
    }
  }
}

trait ResolverTrait<'a> {
  fn scoped<F: FnMut(&mut Self) -> R, R>(&mut self, s: ScopeOwner<'a>, f: F) -> R;
}

impl<'a, T: DerefMut<Target = Resolver<'a>>> ResolverTrait<'a> for T {
  fn scoped<F: FnMut(&mut Self) -> R, R>(&mut self, s: ScopeOwner<'a>, mut f: F) -> R {
    self.deref_mut().scopes.open(s);
    let ret = f(self);
    self.deref_mut().scopes.close();
    ret
  }
}
