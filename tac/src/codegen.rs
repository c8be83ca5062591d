use crate::*;
use common::BinOp;

// a write-only sink: an append-only instruction buffer, two fresh-name counters and
// the frame bump allocator; this is all the mutable state a compilation carries
#[derive(Default)]
pub struct CodeGen {
  pub code: Vec<Tac>,
  next_temp: u32,
  next_label: u32,
  // next free fp slot of the function being emitted
  cur_off: i32,
}

// index of a BeginFunc in the buffer; set_frame_size takes it by value, so a
// function's frame can be patched at most once
pub struct FuncHandle(usize);

impl CodeGen {
  // temporaries and block locals draw slots from the same downward counter,
  // which guarantees them distinct offsets within one frame
  fn frame_slot(&mut self) -> i32 {
    (self.cur_off, self.cur_off -= VAR_SIZE).0
  }

  fn temp(&mut self) -> Location {
    let name = format!("_tmp{}", (self.next_temp, self.next_temp += 1).0);
    let off = self.frame_slot();
    Location::fp(off, name)
  }

  // a named local slot for a block-scoped variable
  pub fn local(&mut self, name: &str) -> Location {
    let off = self.frame_slot();
    Location::fp(off, name)
  }

  pub fn load_int_const(&mut self, val: i32) -> Location {
    let dst = self.temp();
    self.code.push(Tac::LoadIntConst { dst: dst.clone(), val });
    dst
  }

  pub fn load_str_const(&mut self, val: &str) -> Location {
    let dst = self.temp();
    self.code.push(Tac::LoadStrConst { dst: dst.clone(), val: val.into() });
    dst
  }

  pub fn load_label(&mut self, label: &str) -> Location {
    let dst = self.temp();
    self.code.push(Tac::LoadLabel { dst: dst.clone(), label: label.into() });
    dst
  }

  pub fn assign(&mut self, dst: &Location, src: &Location) {
    self.code.push(Tac::Assign { dst: dst.clone(), src: src.clone() });
  }

  pub fn load(&mut self, base: &Location, off: i32) -> Location {
    let dst = self.temp();
    self.code.push(Tac::Load { dst: dst.clone(), base: base.clone(), off });
    dst
  }

  pub fn store(&mut self, base: &Location, off: i32, src: &Location) {
    self.code.push(Tac::Store { base: base.clone(), off, src: src.clone() });
  }

  pub fn binary(&mut self, op: BinOp, l: &Location, r: &Location) -> Location {
    use BinOp::*;
    match op {
      Add | Sub | Mul | Div | Mod | Lt | Eq | And | Or => {}
      _ => unreachable!("`{}` is not a tac primitive, lowering should have synthesized it", op.to_op_str()),
    }
    let dst = self.temp();
    self.code.push(Tac::Bin { op, dst: dst.clone(), l: l.clone(), r: r.clone() });
    dst
  }

  pub fn new_label(&mut self) -> String {
    format!("_L{}", (self.next_label, self.next_label += 1).0)
  }

  pub fn mark_label(&mut self, label: &str) {
    self.code.push(Tac::Label { label: label.into() });
  }

  pub fn if_z(&mut self, cond: &Location, label: &str) {
    self.code.push(Tac::IfZ { cond: cond.clone(), label: label.into() });
  }

  pub fn goto(&mut self, label: &str) {
    self.code.push(Tac::Goto { label: label.into() });
  }

  pub fn begin_func(&mut self) -> FuncHandle {
    self.cur_off = OFFSET_TO_FIRST_LOCAL;
    self.code.push(Tac::BeginFunc { frame: 0 });
    FuncHandle(self.code.len() - 1)
  }

  pub fn set_frame_size(&mut self, h: FuncHandle, bytes: i32) {
    match &mut self.code[h.0] {
      Tac::BeginFunc { frame } => *frame = bytes,
      _ => unreachable!("a FuncHandle can only point at a BeginFunc"),
    }
  }

  pub fn end_func(&mut self) {
    self.code.push(Tac::EndFunc);
  }

  pub fn ret(&mut self, val: Option<&Location>) {
    self.code.push(Tac::Ret { val: val.cloned() });
  }

  pub fn push_param(&mut self, src: &Location) {
    self.code.push(Tac::PushParam { src: src.clone() });
  }

  pub fn pop_params(&mut self, bytes: i32) {
    // calls without parameters have nothing to pop
    if bytes > 0 { self.code.push(Tac::PopParams { bytes }); }
  }

  pub fn lcall(&mut self, label: &str, has_ret: bool) -> Option<Location> {
    let dst = if has_ret { Some(self.temp()) } else { None };
    self.code.push(Tac::LCall { label: label.into(), dst: dst.clone() });
    dst
  }

  pub fn acall(&mut self, addr: &Location, has_ret: bool) -> Option<Location> {
    let dst = if has_ret { Some(self.temp()) } else { None };
    self.code.push(Tac::ACall { addr: addr.clone(), dst: dst.clone() });
    dst
  }

  // runtime library call: push the arguments right to left, call, pop them again
  pub fn builtin(&mut self, b: BuiltIn, args: &[&Location]) -> Option<Location> {
    for a in args.iter().rev() { self.push_param(a); }
    let dst = self.lcall(b.label(), b.has_ret());
    self.pop_params(args.len() as i32 * VAR_SIZE);
    dst
  }

  pub fn vtable(&mut self, class: &str, method: Vec<String>) {
    self.code.push(Tac::VTable { class: class.into(), method });
  }

  pub fn finish(self) -> TacProgram {
    TacProgram { code: self.code }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use common::BinOp;

  #[test]
  fn fresh_names_are_monotonic() {
    let mut cg = CodeGen::default();
    cg.begin_func();
    let t0 = cg.load_int_const(1);
    let t1 = cg.load_int_const(2);
    assert_eq!(t0.name, "_tmp0");
    assert_eq!(t1.name, "_tmp1");
    cg.end_func();
    // a second function keeps counting, names stay unique for the whole compilation
    cg.begin_func();
    let t2 = cg.load_int_const(3);
    assert_eq!(t2.name, "_tmp2");
    assert_eq!(cg.new_label(), "_L0");
    assert_eq!(cg.new_label(), "_L1");
  }

  #[test]
  fn temp_slots_descend_from_first_local() {
    let mut cg = CodeGen::default();
    cg.begin_func();
    let a = cg.local("a");
    let t = cg.load_int_const(0);
    assert_eq!((a.seg, a.off), (Segment::Fp, -8));
    assert_eq!((t.seg, t.off), (Segment::Fp, -12));
    // a new function starts over
    cg.begin_func();
    let t = cg.load_int_const(0);
    assert_eq!(t.off, -8);
  }

  #[test]
  fn begin_func_frame_is_patched() {
    let mut cg = CodeGen::default();
    let h = cg.begin_func();
    cg.set_frame_size(h, 24);
    cg.end_func();
    match &cg.code[0] {
      Tac::BeginFunc { frame } => assert_eq!(*frame, 24),
      _ => panic!("expected BeginFunc"),
    }
  }

  #[test]
  fn builtin_pushes_and_pops() {
    let mut cg = CodeGen::default();
    cg.begin_func();
    let n = cg.load_int_const(16);
    let ret = cg.builtin(BuiltIn::Alloc, &[&n]);
    assert!(ret.is_some());
    let shapes = cg.code.iter().map(|t| match t {
      Tac::PushParam { .. } => "push",
      Tac::LCall { label, .. } if label == "_Alloc" => "call",
      Tac::PopParams { bytes: 4 } => "pop",
      _ => "other",
    }).collect::<Vec<_>>();
    assert_eq!(shapes, ["other", "other", "push", "call", "pop"]);
  }

  #[test]
  fn halt_takes_no_params() {
    let mut cg = CodeGen::default();
    cg.begin_func();
    assert!(cg.builtin(BuiltIn::Halt, &[]).is_none());
    assert!(cg.code.iter().all(|t| match t { Tac::PushParam { .. } | Tac::PopParams { .. } => false, _ => true }));
  }

  #[test]
  #[should_panic]
  fn non_primitive_op_is_rejected() {
    let mut cg = CodeGen::default();
    cg.begin_func();
    let l = cg.load_int_const(1);
    let r = cg.load_int_const(2);
    cg.binary(BinOp::Ne, &l, &r);
  }
}
