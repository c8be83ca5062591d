pub mod codegen;

pub use codegen::{CodeGen, FuncHandle};

use common::BinOp;
use std::fmt::{self, Debug};

// everything in the target machine model is word sized
pub const VAR_SIZE: i32 = 4;
// the first parameter sits just above the saved fp/ra pair
pub const OFFSET_TO_FIRST_PARAM: i32 = 4;
// locals and temporaries grow downwards from here
pub const OFFSET_TO_FIRST_LOCAL: i32 = -8;
// object word 0 is the vtable pointer, fields follow
pub const OFFSET_TO_FIRST_FIELD: i32 = 4;
pub const OFFSET_TO_FIRST_METHOD: i32 = 0;
pub const OFFSET_TO_FIRST_GLOBAL: i32 = 0;

// the escapes stay escapes in the tac text, the downstream assembler expands them
pub const INDEX_OUT_OF_BOUNDS: &str = r"Decaf runtime error: Array subscript out of bounds\n";
pub const ARRAY_SIZE_NOT_POSITIVE: &str = r"Decaf runtime error: Array size is <= 0\n";

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Segment { Gp, Fp }

// an operand descriptor: which segment, the byte offset inside it, and the name the
// tac text spells it with; a plain value object, cloned freely and never aliased
#[derive(Clone, Eq, PartialEq)]
pub struct Location {
  pub seg: Segment,
  pub off: i32,
  pub name: String,
}

impl Location {
  pub fn gp(off: i32, name: impl Into<String>) -> Location {
    Location { seg: Segment::Gp, off, name: name.into() }
  }

  pub fn fp(off: i32, name: impl Into<String>) -> Location {
    Location { seg: Segment::Fp, off, name: name.into() }
  }
}

// operands print by name only, offsets are a simulator concern
impl Debug for Location {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.name)
  }
}

pub enum Tac {
  LoadIntConst { dst: Location, val: i32 },
  LoadStrConst { dst: Location, val: String },
  // dst holds the address of a code or vtable label
  LoadLabel { dst: Location, label: String },
  Assign { dst: Location, src: Location },
  Load { dst: Location, base: Location, off: i32 },
  Store { base: Location, off: i32, src: Location },
  // only the primitive subset of BinOp appears here, CodeGen::binary enforces it
  Bin { op: BinOp, dst: Location, l: Location, r: Location },
  Label { label: String },
  Goto { label: String },
  IfZ { cond: Location, label: String },
  // frame is patched in once the function's local byte count is known
  BeginFunc { frame: i32 },
  EndFunc,
  Ret { val: Option<Location> },
  PushParam { src: Location },
  PopParams { bytes: i32 },
  LCall { label: String, dst: Option<Location> },
  ACall { addr: Location, dst: Option<Location> },
  // dispatch table, one label per slot in slot order
  VTable { class: String, method: Vec<String> },
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BuiltIn { Alloc, StringEqual, PrintInt, PrintString, PrintBool, ReadInteger, ReadLine, Halt }

impl BuiltIn {
  pub fn label(self) -> &'static str {
    use BuiltIn::*;
    match self {
      Alloc => "_Alloc", StringEqual => "_StringEqual", PrintInt => "_PrintInt", PrintString => "_PrintString",
      PrintBool => "_PrintBool", ReadInteger => "_ReadInteger", ReadLine => "_ReadLine", Halt => "_Halt",
    }
  }

  pub fn has_ret(self) -> bool {
    use BuiltIn::*;
    match self { Alloc | StringEqual | ReadInteger | ReadLine => true, PrintInt | PrintString | PrintBool | Halt => false }
  }
}

// the finished instruction stream; vtable records sit inline where GenVTable placed them
#[derive(Default)]
pub struct TacProgram {
  pub code: Vec<Tac>,
}
