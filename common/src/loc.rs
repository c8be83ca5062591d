use std::fmt;

// Loc(line, column), counting from 1
// so 0 is invalid for both, and Loc(0, 0) means NO_LOC
// codegen never reports positions, but the ast still carries them for the front end's sake
#[derive(Copy, Clone, Eq, PartialEq, Default)]
pub struct Loc(pub u32, pub u32);

pub const NO_LOC: Loc = Loc(0, 0);

impl fmt::Debug for Loc {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "({},{})", self.0, self.1)
  }
}
