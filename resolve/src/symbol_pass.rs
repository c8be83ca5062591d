use crate::{Resolver, ResolverTrait};
use syntax::{ast::*, Symbol, ScopeOwner};
use std::ops::{Deref, DerefMut};

pub(crate) struct SymbolPass<'a>(pub Resolver<'a>);

// some boilerplate code...
impl<'a> Deref for SymbolPass<'a> {
  type Target = Resolver<'a>;
  fn deref(&self) -> &Self::Target { &self.0 }
}

impl<'a> DerefMut for SymbolPass<'a> {
  fn deref_mut(&mut self) -> &mut Self::Target { &mut self.0 }
}

impl<'a> SymbolPass<'a> {
  pub fn program(&mut self, p: &'a Program<'a>) {
    // the global scope sits at the stack bottom, already open
    for &d in &p.decl {
      match d {
        TopDef::VarDef(v) => {
          self.scopes.declare(Symbol::Var(v));
          v.owner.set(Some(self.scopes.cur_owner()));
        }
        TopDef::FuncDef(f) => self.scopes.declare(Symbol::Func(f)),
        TopDef::ClassDef(c) => self.scopes.declare(Symbol::Class(c)),
        TopDef::InterfaceDef(i) => self.scopes.declare(Symbol::Interface(i)),
      }
    }
    // parent_ref must be linked before any class scope is opened, open() walks it
    for &d in &p.decl {
      if let TopDef::ClassDef(c) = d {
        if let Some(name) = c.parent {
          c.parent_ref.set(self.scopes.lookup_class(name));
        }
      }
    }
    for &d in &p.decl {
      match d {
        TopDef::FuncDef(f) => self.func_def(f),
        TopDef::ClassDef(c) => self.class_def(c),
        _ => {}
      }
    }
  }

  fn class_def(&mut self, c: &'a ClassDef<'a>) {
    self.scoped(ScopeOwner::Class(c), |s| for &f in &c.field {
      match f {
        FieldDef::FuncDef(f) => {
          f.class.set(Some(c));
          s.scopes.declare(Symbol::Func(f));
          s.func_def(f);
        }
        FieldDef::VarDef(v) => {
          s.scopes.declare(Symbol::Var(v));
          v.owner.set(Some(s.scopes.cur_owner()));
        }
      }
    });
  }

  fn func_def(&mut self, f: &'a FuncDef<'a>) {
    self.scoped(ScopeOwner::Param(f), |s| {
      for &v in &f.param {
        s.scopes.declare(Symbol::Var(v));
        v.owner.set(Some(s.scopes.cur_owner()));
      }
      s.block(&f.body);
    });
  }

  fn block(&mut self, b: &'a Block<'a>) {
    self.scoped(ScopeOwner::Local(b), |s| {
      for &v in &b.decl {
        s.scopes.declare(Symbol::Var(v));
        v.owner.set(Some(s.scopes.cur_owner()));
      }
      for st in &b.stmt { s.stmt(st); }
    });
  }

  fn stmt(&mut self, s: &'a Stmt<'a>) {
    use StmtKind::*;
    match &s.kind {
      If(i) => {
        self.stmt(&i.on_true);
        if let Some(of) = &i.on_false { self.stmt(of); }
      }
      While(w) => self.stmt(&w.body),
      For(f) => self.stmt(&f.body),
      Block(b) => self.block(b),
      _ => {}
    }
  }
}
