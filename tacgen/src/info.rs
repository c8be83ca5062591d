use syntax::FuncDef;
use tac::Location;
use common::IndexMap;

// these structs work like extra fields attached to ast nodes, keyed by node identity;
// they carry everything the layout pass decides and the lowering pass consumes

#[derive(Clone)]
pub(crate) enum VarInfo {
  // a variable with storage of its own: global, parameter or block local
  Loc(Location),
  // byte offset of a field inside its object
  Field(i32),
}

pub(crate) struct FuncInfo {
  pub label: String,
  // byte offset of the method's slot in the vtable, meaningless for free functions
  pub off: i32,
  pub is_method: bool,
}

pub(crate) struct ClassInfo<'a> {
  // bytes of all fields, inherited included; the vtable-pointer header word is not counted,
  // new has to allocate one extra word in front
  pub obj_bytes: i32,
  // keys are method names in slot order; an override replaces its base's entry in place
  pub vtbl: IndexMap<&'a str, &'a FuncDef<'a>>,
}
