use syntax::{ast::*, ty::*};
use common::BinOp::*;
use tac::VAR_SIZE;

// the frame byte footprint of every node: each temporary an emit path mints counts
// VAR_SIZE, each block local counts its own slot; FuncDef sums its body once and the
// total goes into BeginFunc, so these functions must stay in lockstep with emission

pub(crate) fn block(b: &Block) -> i32 {
  b.decl.len() as i32 * VAR_SIZE + b.stmt.iter().map(stmt).sum::<i32>()
}

pub(crate) fn stmt(s: &Stmt) -> i32 {
  use StmtKind::*;
  match &s.kind {
    ExprEval(e) => expr(e),
    If(i) => expr(&i.cond) + stmt(&i.on_true) + i.on_false.as_ref().map(stmt).unwrap_or(0),
    While(w) => expr(&w.cond) + stmt(&w.body),
    For(f) => f.init.as_ref().map(expr).unwrap_or(0) + expr(&f.cond)
      + f.update.as_ref().map(expr).unwrap_or(0) + stmt(&f.body),
    Return(r) => r.as_ref().map(expr).unwrap_or(0),
    Print(args) => args.iter().map(expr).sum::<i32>(),
    Break(_) => 0,
    Block(b) => block(b),
  }
}

pub(crate) fn expr(e: &Expr) -> i32 {
  use ExprKind::*;
  match &e.kind {
    IntLit(_) | BoolLit(_) | StringLit(_) | NullLit(_) => VAR_SIZE,
    DoubleLit(_) => 0, // never emitted
    VarSel(v) => var_sel(v),
    // 8 for the bounds check, 3 for the address, 1 for the loaded element
    IndexSel(i) => expr(&i.arr) + expr(&i.idx) + 12 * VAR_SIZE,
    Call(c) => call(c),
    // Neg is 0-x (constant + result), Not is the diamond (preset + the constant it overwrites with)
    Unary(u) => expr(&u.r) + 2 * VAR_SIZE,
    Binary(b) => expr(&b.l) + expr(&b.r) + binary_own(b),
    Assign(a) => assign(a),
    This(_) => 0,
    ReadInt(_) | ReadLine(_) => VAR_SIZE,
    NewClass(_) => 5 * VAR_SIZE,
    NewArray(n) => expr(&n.len) + 9 * VAR_SIZE,
  }
}

fn var_sel(v: &VarSel) -> i32 {
  match &v.owner {
    Some(o) => expr(o) + VAR_SIZE,
    // a bare name is free when it has storage, one load when it is a field of `this`
    None => if is_field(v) { VAR_SIZE } else { 0 },
  }
}

fn is_field(v: &VarSel) -> bool {
  v.var.get().unwrap().owner.get().unwrap().is_class()
}

fn assign(a: &Assign) -> i32 {
  match &a.dst.kind {
    // the store paths mint no temp of their own (the element store re-loads, hence the same 12)
    ExprKind::VarSel(v) => expr(&a.src) + v.owner.as_ref().map(|o| expr(o)).unwrap_or(0),
    ExprKind::IndexSel(i) => expr(&a.src) + expr(&i.arr) + expr(&i.idx) + 12 * VAR_SIZE,
    _ => expr(&a.dst) + expr(&a.src),
  }
}

fn binary_own(b: &Binary) -> i32 {
  let string = b.l.ty.get() == Ty::string() && b.r.ty.get() == Ty::string();
  (match b.op {
    Eq if string => 1,
    Ne if string => 3,
    Add | Sub | Mul | Div | Mod | Lt | Eq | And | Or | Gt => 1,
    Le | Ge => 3,
    Ne => 3,
  }) * VAR_SIZE
}

fn call(c: &Call) -> i32 {
  if let Some(o) = &c.owner {
    if o.ty.get().is_arr() {
      // arr.length() is a single header load
      return expr(o) + VAR_SIZE;
    }
  }
  let f = c.func_ref.get().unwrap();
  let args = c.arg.iter().map(expr).sum::<i32>();
  let ret = if f.ret_ty.get() != Ty::void() { VAR_SIZE } else { 0 };
  if f.is_method() {
    // vtable word and function address, plus the receiver when it is written out
    c.owner.as_ref().map(|o| expr(o)).unwrap_or(0) + args + 2 * VAR_SIZE + ret
  } else {
    args + ret
  }
}
