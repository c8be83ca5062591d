use crate::{Resolver, ResolverTrait};
use syntax::{ast::*, ty::*, Symbol, ScopeOwner};
use common::{Ref, BinOp, UnOp, LENGTH};
use std::ops::{Deref, DerefMut};

pub(crate) struct TypePass<'a>(pub Resolver<'a>);

// some boilerplate code...
impl<'a> Deref for TypePass<'a> {
  type Target = Resolver<'a>;
  fn deref(&self) -> &Self::Target { &self.0 }
}

impl<'a> DerefMut for TypePass<'a> {
  fn deref_mut(&mut self) -> &mut Self::Target { &mut self.0 }
}

impl<'a> TypePass<'a> {
  pub fn program(&mut self, p: &'a Program<'a>) {
    // signatures and field/global types first, so uses resolve no matter the declaration order
    for &d in &p.decl {
      match d {
        TopDef::VarDef(v) => v.ty.set(self.ty(&v.syn_ty, false)),
        TopDef::FuncDef(f) => self.signature(f),
        TopDef::ClassDef(c) => for &fd in &c.field {
          match fd {
            FieldDef::FuncDef(f) => self.signature(f),
            FieldDef::VarDef(v) => v.ty.set(self.ty(&v.syn_ty, false)),
          }
        }
        TopDef::InterfaceDef(i) => for &f in &i.member { self.signature(f); }
      }
    }
    for &d in &p.decl {
      match d {
        TopDef::FuncDef(f) => self.func_def(f),
        TopDef::ClassDef(c) => {
          self.cur_class = Some(c);
          self.scoped(ScopeOwner::Class(c), |s| for &fd in &c.field {
            if let FieldDef::FuncDef(f) = fd { s.func_def(f); }
          });
          self.cur_class = None;
        }
        _ => {}
      }
    }
  }

  fn signature(&mut self, f: &'a FuncDef<'a>) {
    f.ret_ty.set(self.ty(&f.ret, false));
    for v in &f.param { v.ty.set(self.ty(&v.syn_ty, false)); }
  }

  fn func_def(&mut self, f: &'a FuncDef<'a>) {
    self.scoped(ScopeOwner::Param(f), |s| s.block(&f.body));
  }

  fn block(&mut self, b: &'a Block<'a>) {
    self.scoped(ScopeOwner::Local(b), |s| {
      for v in &b.decl { v.ty.set(s.ty(&v.syn_ty, false)); }
      for st in &b.stmt { s.stmt(st); }
    });
  }

  fn stmt(&mut self, s: &'a Stmt<'a>) {
    use StmtKind::*;
    match &s.kind {
      ExprEval(e) => { self.expr(e); }
      If(i) => {
        self.expr(&i.cond);
        self.stmt(&i.on_true);
        if let Some(of) = &i.on_false { self.stmt(of); }
      }
      While(w) => {
        self.expr(&w.cond);
        self.stmt(&w.body);
      }
      For(f) => {
        if let Some(i) = &f.init { self.expr(i); }
        self.expr(&f.cond);
        if let Some(u) = &f.update { self.expr(u); }
        self.stmt(&f.body);
      }
      Return(r) => { if let Some(e) = r { self.expr(e); } }
      Print(args) => for e in args { self.expr(e); }
      Break(_) => {}
      Block(b) => self.block(b),
    }
  }

  fn expr(&mut self, e: &'a Expr<'a>) -> Ty<'a> {
    use ExprKind::*;
    let ty = match &e.kind {
      IntLit(_) => Ty::int(),
      BoolLit(_) => Ty::bool(),
      StringLit(_) => Ty::string(),
      DoubleLit(_) => Ty::error(), // doubles never reach lowering, tacgen refuses them
      NullLit(_) => Ty::null(),
      VarSel(v) => self.var_sel(v),
      IndexSel(i) => {
        let arr = self.expr(&i.arr);
        self.expr(&i.idx);
        Ty { arr: arr.arr - 1, kind: arr.kind }
      }
      Call(c) => self.call(c),
      Unary(u) => {
        self.expr(&u.r);
        match u.op { UnOp::Neg => Ty::int(), UnOp::Not => Ty::bool() }
      }
      Binary(b) => {
        self.expr(&b.l);
        self.expr(&b.r);
        use BinOp::*;
        match b.op { Add | Sub | Mul | Div | Mod => Ty::int(), _ => Ty::bool() }
      }
      Assign(a) => {
        let dst = self.expr(&a.dst);
        self.expr(&a.src);
        dst
      }
      This(_) => Ty::mk_obj(self.cur_class.unwrap()),
      ReadInt(_) => Ty::int(),
      ReadLine(_) => Ty::string(),
      NewClass(n) => {
        let c = self.scopes.lookup_class(n.name).unwrap();
        n.class.set(Some(c));
        Ty::mk_obj(c)
      }
      NewArray(n) => {
        self.expr(&n.len);
        self.ty(&n.elem, true)
      }
    };
    e.ty.set(ty);
    ty
  }

  fn var_sel(&mut self, v: &'a VarSel<'a>) -> Ty<'a> {
    match &v.owner {
      Some(o) => {
        let o_t = self.expr(o);
        match o_t {
          Ty { arr: 0, kind: TyKind::Object(Ref(c)) } => match c.lookup(v.name) {
            Some(Symbol::Var(var)) => {
              v.var.set(Some(var));
              var.ty.get()
            }
            _ => unreachable!("`{}` should name a field of class {}, semantic checks let invalid programs nowhere near here", v.name, c.name),
          }
          _ => unreachable!("field selection on a non-object should have been rejected before codegen"),
        }
      }
      None => match self.scopes.lookup(v.name) {
        Some(Symbol::Var(var)) => {
          v.var.set(Some(var));
          var.ty.get()
        }
        _ => unreachable!("`{}` should name a variable in scope", v.name),
      }
    }
  }

  fn call(&mut self, c: &'a Call<'a>) -> Ty<'a> {
    if let Some(o) = &c.owner {
      let o_t = self.expr(o);
      // arr.length() is the one call that resolves to no FuncDef
      if o_t.is_arr() && c.name == LENGTH {
        return Ty::int();
      }
      for a in &c.arg { self.expr(a); }
      let cd = match o_t {
        Ty { arr: 0, kind: TyKind::Object(Ref(cd)) } => cd,
        _ => unreachable!("method call on a non-object should have been rejected before codegen"),
      };
      let f = self.lookup_func(cd, c.name).unwrap();
      c.func_ref.set(Some(f));
      f.ret_ty.get()
    } else {
      for a in &c.arg { self.expr(a); }
      // inside a class the whole extends chain is on the stack, so this finds inherited methods too
      match self.scopes.lookup(c.name) {
        Some(Symbol::Func(f)) => {
          c.func_ref.set(Some(f));
          f.ret_ty.get()
        }
        _ => unreachable!("`{}` should name a function in scope", c.name),
      }
    }
  }
}
