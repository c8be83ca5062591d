use crate::{Block, ClassDef, FuncDef, InterfaceDef, VarDef, Program};
use common::HashMap;
use std::cell::{RefMut, Ref};

pub type Scope<'a> = HashMap<&'a str, Symbol<'a>>;

#[derive(Copy, Clone)]
pub enum Symbol<'a> {
  Var(&'a VarDef<'a>),
  Func(&'a FuncDef<'a>),
  Class(&'a ClassDef<'a>),
  Interface(&'a InterfaceDef<'a>),
}

impl<'a> Symbol<'a> {
  pub fn name(&self) -> &'a str {
    match self {
      Symbol::Var(v) => v.name,
      Symbol::Func(f) => f.name,
      Symbol::Class(c) => c.name,
      Symbol::Interface(i) => i.name,
    }
  }
}

#[derive(Copy, Clone)]
pub enum ScopeOwner<'a> {
  Local(&'a Block<'a>),
  Param(&'a FuncDef<'a>),
  Class(&'a ClassDef<'a>),
  Global(&'a Program<'a>),
}

impl<'a> ScopeOwner<'a> {
  // boilerplate code...
  pub fn scope(&self) -> Ref<'a, Scope<'a>> {
    use ScopeOwner::*;
    match self { Local(x) => x.scope.borrow(), Param(x) => x.scope.borrow(), Class(x) => x.scope.borrow(), Global(x) => x.scope.borrow(), }
  }

  pub fn scope_mut(&self) -> RefMut<'a, Scope<'a>> {
    use ScopeOwner::*;
    match self { Local(x) => x.scope.borrow_mut(), Param(x) => x.scope.borrow_mut(), Class(x) => x.scope.borrow_mut(), Global(x) => x.scope.borrow_mut(), }
  }

  pub fn is_class(&self) -> bool { if let ScopeOwner::Class(_) = self { true } else { false } }
}
