pub mod test_util;

pub use test_util::*;

use syntax::Program;
use tac::TacProgram;
use common::IndentPrinter;

// the driver surface: an external front end hands over a semantically valid ast,
// check() links it up and emit() lowers it; compile() is the whole pipeline ending
// in the serialized instruction stream

pub fn check<'a>(p: &'a Program<'a>) {
  resolve::work(p);
}

pub fn emit<'a>(p: &'a Program<'a>) -> TacProgram {
  tacgen::work(p)
}

pub fn compile<'a>(p: &'a Program<'a>) -> String {
  check(p);
  let tp = emit(p);
  let mut pr = IndentPrinter::default();
  print::tac::program(&tp, &mut pr);
  pr.finish()
}
