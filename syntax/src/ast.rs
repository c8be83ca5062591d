use crate::{ty::*, symbol::*};
use common::{Loc, BinOp, UnOp};
use typed_arena::Arena;
use std::cell::{Cell, RefCell};

#[derive(Default)]
pub struct ASTAlloc<'a> {
  pub(crate) class: Arena<ClassDef<'a>>,
  pub(crate) interface: Arena<InterfaceDef<'a>>,
  pub(crate) func: Arena<FuncDef<'a>>,
  pub(crate) var: Arena<VarDef<'a>>,
  pub(crate) program: Arena<Program<'a>>,
}

// all Cell<Option<ref to ast node>> below are initialized by the resolve pass
// and consumed by the lowering pass; the parser leaves them unset

pub struct Program<'a> {
  pub decl: Vec<TopDef<'a>>,
  pub scope: RefCell<Scope<'a>>,
}

#[derive(derive_more::From, Copy, Clone)]
pub enum TopDef<'a> {
  VarDef(&'a VarDef<'a>),
  FuncDef(&'a FuncDef<'a>),
  ClassDef(&'a ClassDef<'a>),
  InterfaceDef(&'a InterfaceDef<'a>),
}

pub struct ClassDef<'a> {
  pub loc: Loc,
  pub name: &'a str,
  pub parent: Option<&'a str>,
  // implemented interfaces are parsed and recorded, but impose nothing on codegen
  pub implements: Vec<&'a str>,
  pub field: Vec<FieldDef<'a>>,
  pub parent_ref: Cell<Option<&'a ClassDef<'a>>>,
  pub scope: RefCell<Scope<'a>>,
}

impl<'a> ClassDef<'a> {
  // will recursively lookup in all its parent
  pub fn lookup(&self, name: &str) -> Option<Symbol<'a>> {
    let mut c = self;
    loop {
      match c.scope.borrow().get(name) {
        Some(&symbol) => break Some(symbol),
        None => match c.parent_ref.get() {
          Some(p) => c = p,
          None => break None,
        }
      }
    }
  }
}

#[derive(derive_more::From, Copy, Clone)]
pub enum FieldDef<'a> {
  FuncDef(&'a FuncDef<'a>),
  VarDef(&'a VarDef<'a>),
}

pub struct InterfaceDef<'a> {
  pub loc: Loc,
  pub name: &'a str,
  // method signatures only; an interface member never has a body emitted
  pub member: Vec<&'a FuncDef<'a>>,
}

pub struct FuncDef<'a> {
  pub loc: Loc,
  pub name: &'a str,
  pub ret: SynTy<'a>,
  pub param: Vec<&'a VarDef<'a>>,
  pub body: Block<'a>,
  pub ret_ty: Cell<Ty<'a>>,
  // set during resolution for class members, stays None for free functions
  pub class: Cell<Option<&'a ClassDef<'a>>>,
  pub scope: RefCell<Scope<'a>>,
}

impl<'a> FuncDef<'a> {
  pub fn is_method(&self) -> bool { self.class.get().is_some() }
}

pub struct VarDef<'a> {
  pub loc: Loc,
  pub name: &'a str,
  pub syn_ty: SynTy<'a>,
  pub ty: Cell<Ty<'a>>,
  pub owner: Cell<Option<ScopeOwner<'a>>>,
}

// decaf declares locals at block head, so a block owns both a decl list and a stmt list
pub struct Block<'a> {
  pub loc: Loc,
  pub decl: Vec<&'a VarDef<'a>>,
  pub stmt: Vec<Stmt<'a>>,
  pub scope: RefCell<Scope<'a>>,
}

pub struct Stmt<'a> {
  pub loc: Loc,
  pub kind: StmtKind<'a>,
}

#[derive(derive_more::From)]
pub enum StmtKind<'a> {
  ExprEval(Expr<'a>),
  If(Box<If<'a>>),
  While(While<'a>),
  For(For<'a>),
  Return(Option<Expr<'a>>),
  Print(Vec<Expr<'a>>),
  Break(Break),
  Block(Block<'a>),
}

pub struct If<'a> {
  pub cond: Expr<'a>,
  pub on_true: Stmt<'a>,
  pub on_false: Option<Stmt<'a>>,
}

pub struct While<'a> {
  pub cond: Expr<'a>,
  pub body: Box<Stmt<'a>>,
}

pub struct For<'a> {
  pub init: Option<Expr<'a>>,
  pub cond: Expr<'a>,
  pub update: Option<Expr<'a>>,
  pub body: Box<Stmt<'a>>,
}

pub struct Expr<'a> {
  pub loc: Loc,
  pub ty: Cell<Ty<'a>>,
  pub kind: ExprKind<'a>,
}

#[derive(derive_more::From)]
pub enum ExprKind<'a> {
  VarSel(VarSel<'a>),
  IndexSel(IndexSel<'a>),
  IntLit(i32),
  BoolLit(bool),
  StringLit(&'a str),
  // doubles survive parsing so the front end stays total, codegen refuses them
  DoubleLit(f64),
  NullLit(NullLit),
  Call(Call<'a>),
  Unary(Unary<'a>),
  Binary(Binary<'a>),
  Assign(Assign<'a>),
  This(This),
  ReadInt(ReadInt),
  ReadLine(ReadLine),
  NewClass(NewClass<'a>),
  NewArray(NewArray<'a>),
}

pub struct VarSel<'a> {
  pub owner: Option<Box<Expr<'a>>>,
  pub name: &'a str,
  pub var: Cell<Option<&'a VarDef<'a>>>,
}

pub struct IndexSel<'a> {
  pub arr: Box<Expr<'a>>,
  pub idx: Box<Expr<'a>>,
}

pub struct Call<'a> {
  pub owner: Option<Box<Expr<'a>>>,
  pub name: &'a str,
  pub arg: Vec<Expr<'a>>,
  pub func_ref: Cell<Option<&'a FuncDef<'a>>>,
}

pub struct Binary<'a> {
  pub op: BinOp,
  pub l: Box<Expr<'a>>,
  pub r: Box<Expr<'a>>,
}

pub struct Unary<'a> {
  pub op: UnOp,
  pub r: Box<Expr<'a>>,
}

pub struct Assign<'a> {
  pub dst: Box<Expr<'a>>,
  pub src: Box<Expr<'a>>,
}

pub struct NewClass<'a> {
  pub name: &'a str,
  pub class: Cell<Option<&'a ClassDef<'a>>>,
}

pub struct NewArray<'a> {
  pub elem: SynTy<'a>,
  pub len: Box<Expr<'a>>,
}

// some unit struct, they exist just to make match pattern consistent(all patterns are like Xxx(x))
pub struct Break;

pub struct NullLit;

pub struct This;

pub struct ReadInt;

pub struct ReadLine;
