use crate::ClassDef;
use common::{Loc, Ref};
use std::fmt;

#[derive(Eq, PartialEq)]
pub enum SynTyKind<'a> {
  Int,
  Bool,
  String,
  Void,
  Named(&'a str),
}

#[derive(Eq, PartialEq)]
pub struct SynTy<'a> {
  pub loc: Loc,
  pub arr: u32,
  pub kind: SynTyKind<'a>,
}

#[derive(Clone, Copy, Eq, PartialEq)]
pub enum TyKind<'a> {
  Int,
  Bool,
  String,
  Void,
  Null,
  Error,
  Object(Ref<'a, ClassDef<'a>>),
}

impl Default for TyKind<'_> {
  fn default() -> Self { TyKind::Error }
}

// arr > 0 <-> is array; for void type, arr can only be 0
#[derive(Clone, Copy, Eq, PartialEq, Default)]
pub struct Ty<'a> {
  pub arr: u32,
  pub kind: TyKind<'a>,
}

impl<'a> Ty<'a> {
  // why don't use const items?
  // it seems that const items can only have type Ty<'static>, which can NOT be casted to Ty<'a>
  pub const fn error() -> Ty<'a> { Ty { arr: 0, kind: TyKind::Error } }
  pub const fn null() -> Ty<'a> { Ty { arr: 0, kind: TyKind::Null } }
  pub const fn int() -> Ty<'a> { Ty { arr: 0, kind: TyKind::Int } }
  pub const fn bool() -> Ty<'a> { Ty { arr: 0, kind: TyKind::Bool } }
  pub const fn void() -> Ty<'a> { Ty { arr: 0, kind: TyKind::Void } }
  pub const fn string() -> Ty<'a> { Ty { arr: 0, kind: TyKind::String } }

  pub fn mk_obj(c: &'a ClassDef<'a>) -> Ty<'a> { Ty { arr: 0, kind: TyKind::Object(Ref(c)) } }

  pub fn is_arr(&self) -> bool { self.arr > 0 }
}

impl fmt::Debug for Ty<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match &self.kind {
      TyKind::Int => write!(f, "int"),
      TyKind::Bool => write!(f, "bool"),
      TyKind::String => write!(f, "string"),
      TyKind::Void => write!(f, "void"),
      TyKind::Null => write!(f, "null"),
      TyKind::Error => write!(f, "error"), // only the pre-resolution default, should not be printed
      TyKind::Object(c) => write!(f, "class {}", c.name),
    }?;
    for _ in 0..self.arr { write!(f, "[]")?; }
    Ok(())
  }
}
