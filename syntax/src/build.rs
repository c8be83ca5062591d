// construction helpers for ast nodes, the surface a front end (or a test) targets
// all nodes get NO_LOC; a real parser would thread source locations through instead

use crate::{ast::*, ty::*};
use common::{NO_LOC, BinOp, UnOp};

// save a little typing than writing "Default::default()"
fn dft<T: Default>() -> T { T::default() }

pub fn program<'a>(alloc: &'a ASTAlloc<'a>, decl: Vec<TopDef<'a>>) -> &'a Program<'a> {
  alloc.program.alloc(Program { decl, scope: dft() })
}

pub fn class<'a>(alloc: &'a ASTAlloc<'a>, name: &'a str, parent: Option<&'a str>, field: Vec<FieldDef<'a>>) -> &'a ClassDef<'a> {
  class_implements(alloc, name, parent, vec![], field)
}

pub fn class_implements<'a>(alloc: &'a ASTAlloc<'a>, name: &'a str, parent: Option<&'a str>, implements: Vec<&'a str>, field: Vec<FieldDef<'a>>) -> &'a ClassDef<'a> {
  alloc.class.alloc(ClassDef { loc: NO_LOC, name, parent, implements, field, parent_ref: dft(), scope: dft() })
}

pub fn interface<'a>(alloc: &'a ASTAlloc<'a>, name: &'a str, member: Vec<&'a FuncDef<'a>>) -> &'a InterfaceDef<'a> {
  alloc.interface.alloc(InterfaceDef { loc: NO_LOC, name, member })
}

pub fn func<'a>(alloc: &'a ASTAlloc<'a>, name: &'a str, ret: SynTy<'a>, param: Vec<&'a VarDef<'a>>, body: Block<'a>) -> &'a FuncDef<'a> {
  alloc.func.alloc(FuncDef { loc: NO_LOC, name, ret, param, body, ret_ty: dft(), class: dft(), scope: dft() })
}

pub fn var_def<'a>(alloc: &'a ASTAlloc<'a>, name: &'a str, syn_ty: SynTy<'a>) -> &'a VarDef<'a> {
  alloc.var.alloc(VarDef { loc: NO_LOC, name, syn_ty, ty: dft(), owner: dft() })
}

pub fn block<'a>(decl: Vec<&'a VarDef<'a>>, stmt: Vec<Stmt<'a>>) -> Block<'a> {
  Block { loc: NO_LOC, decl, stmt, scope: dft() }
}

// types

pub fn int_ty<'a>() -> SynTy<'a> { SynTy { loc: NO_LOC, arr: 0, kind: SynTyKind::Int } }

pub fn bool_ty<'a>() -> SynTy<'a> { SynTy { loc: NO_LOC, arr: 0, kind: SynTyKind::Bool } }

pub fn string_ty<'a>() -> SynTy<'a> { SynTy { loc: NO_LOC, arr: 0, kind: SynTyKind::String } }

pub fn void_ty<'a>() -> SynTy<'a> { SynTy { loc: NO_LOC, arr: 0, kind: SynTyKind::Void } }

pub fn named_ty<'a>(name: &'a str) -> SynTy<'a> { SynTy { loc: NO_LOC, arr: 0, kind: SynTyKind::Named(name) } }

pub fn array_ty<'a>(elem: SynTy<'a>) -> SynTy<'a> { SynTy { loc: elem.loc, arr: elem.arr + 1, kind: elem.kind } }

// statements

pub fn stmt<'a>(kind: impl Into<StmtKind<'a>>) -> Stmt<'a> { Stmt { loc: NO_LOC, kind: kind.into() } }

pub fn eval(e: Expr) -> Stmt { stmt(StmtKind::ExprEval(e)) }

pub fn if_<'a>(cond: Expr<'a>, on_true: Stmt<'a>, on_false: Option<Stmt<'a>>) -> Stmt<'a> {
  stmt(Box::new(If { cond, on_true, on_false }))
}

pub fn while_<'a>(cond: Expr<'a>, body: Stmt<'a>) -> Stmt<'a> {
  stmt(While { cond, body: Box::new(body) })
}

pub fn for_<'a>(init: Option<Expr<'a>>, cond: Expr<'a>, update: Option<Expr<'a>>, body: Stmt<'a>) -> Stmt<'a> {
  stmt(For { init, cond, update, body: Box::new(body) })
}

pub fn ret(e: Option<Expr>) -> Stmt { stmt(StmtKind::Return(e)) }

pub fn print(args: Vec<Expr>) -> Stmt { stmt(StmtKind::Print(args)) }

pub fn break_<'a>() -> Stmt<'a> { stmt(Break) }

pub fn block_stmt(b: Block) -> Stmt { stmt(StmtKind::Block(b)) }

// expressions

pub fn expr<'a>(kind: impl Into<ExprKind<'a>>) -> Expr<'a> { Expr { loc: NO_LOC, ty: dft(), kind: kind.into() } }

pub fn int<'a>(v: i32) -> Expr<'a> { expr(v) }

pub fn bool_<'a>(v: bool) -> Expr<'a> { expr(v) }

pub fn str_<'a>(s: &'a str) -> Expr<'a> { expr(s) }

pub fn null<'a>() -> Expr<'a> { expr(NullLit) }

pub fn this<'a>() -> Expr<'a> { expr(This) }

pub fn read_int<'a>() -> Expr<'a> { expr(ReadInt) }

pub fn read_line<'a>() -> Expr<'a> { expr(ReadLine) }

pub fn var<'a>(name: &'a str) -> Expr<'a> {
  expr(VarSel { owner: None, name, var: dft() })
}

pub fn sel<'a>(owner: Expr<'a>, name: &'a str) -> Expr<'a> {
  expr(VarSel { owner: Some(Box::new(owner)), name, var: dft() })
}

pub fn index<'a>(arr: Expr<'a>, idx: Expr<'a>) -> Expr<'a> {
  expr(IndexSel { arr: Box::new(arr), idx: Box::new(idx) })
}

pub fn binary<'a>(op: BinOp, l: Expr<'a>, r: Expr<'a>) -> Expr<'a> {
  expr(Binary { op, l: Box::new(l), r: Box::new(r) })
}

pub fn unary<'a>(op: UnOp, r: Expr<'a>) -> Expr<'a> {
  expr(Unary { op, r: Box::new(r) })
}

pub fn assign<'a>(dst: Expr<'a>, src: Expr<'a>) -> Expr<'a> {
  expr(Assign { dst: Box::new(dst), src: Box::new(src) })
}

pub fn call<'a>(name: &'a str, arg: Vec<Expr<'a>>) -> Expr<'a> {
  expr(Call { owner: None, name, arg, func_ref: dft() })
}

pub fn method<'a>(owner: Expr<'a>, name: &'a str, arg: Vec<Expr<'a>>) -> Expr<'a> {
  expr(Call { owner: Some(Box::new(owner)), name, arg, func_ref: dft() })
}

pub fn new_class<'a>(name: &'a str) -> Expr<'a> {
  expr(NewClass { name, class: dft() })
}

pub fn new_array<'a>(elem: SynTy<'a>, len: Expr<'a>) -> Expr<'a> {
  expr(NewArray { elem, len: Box::new(len) })
}
