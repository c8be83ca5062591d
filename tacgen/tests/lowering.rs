use syntax::{build, ASTAlloc, Program};
use common::{BinOp::*, UnOp, IndentPrinter};
use tac::{Tac, Location, Segment};
use std::collections::HashSet;

fn tac_of<'a>(p: &'a Program<'a>) -> String {
  resolve::work(p);
  let tp = tacgen::work(p);
  let mut pr = IndentPrinter::default();
  print::tac::program(&tp, &mut pr);
  pr.finish()
}

fn code_of<'a>(p: &'a Program<'a>) -> Vec<Tac> {
  resolve::work(p);
  tacgen::work(p).code
}

// every temp an emit path mints and every block local must land in a distinct frame slot,
// and their total must be exactly what BeginFunc reserved
fn check_frames(code: &[Tac]) {
  let mut i = 0;
  while i < code.len() {
    if let Tac::BeginFunc { frame } = &code[i] {
      let mut slots = HashSet::new();
      let mut j = i + 1;
      loop {
        if let Tac::EndFunc = &code[j] { break; }
        for loc in operands(&code[j]) {
          if loc.seg == Segment::Fp && loc.off <= -8 { slots.insert(loc.off); }
        }
        j += 1;
      }
      assert_eq!(slots.len() as i32 * 4, *frame, "BeginFunc reserved a frame unequal to the slots actually touched");
      i = j;
    }
    i += 1;
  }
}

fn operands(t: &Tac) -> Vec<&Location> {
  use Tac::*;
  match t {
    LoadIntConst { dst, .. } | LoadStrConst { dst, .. } | LoadLabel { dst, .. } => vec![dst],
    Assign { dst, src } => vec![dst, src],
    Load { dst, base, .. } => vec![dst, base],
    Store { base, src, .. } => vec![base, src],
    Bin { dst, l, r, .. } => vec![dst, l, r],
    IfZ { cond, .. } => vec![cond],
    Ret { val } => val.iter().collect(),
    PushParam { src } => vec![src],
    LCall { dst, .. } => dst.iter().collect(),
    ACall { addr, dst } => dst.iter().chain(Some(addr)).collect(),
    Label { .. } | Goto { .. } | BeginFunc { .. } | EndFunc | PopParams { .. } | VTable { .. } => vec![],
  }
}

#[test]
fn print_of_constant_sum() {
  let a = ASTAlloc::default();
  let main = build::func(&a, "main", build::int_ty(), vec![], build::block(vec![], vec![
    build::print(vec![build::binary(Add, build::int(1), build::int(2))]),
  ]));
  let p = build::program(&a, vec![main.into()]);
  expect_tac(&tac_of(p), "\
main:
    BeginFunc 12;
    _tmp0 = 1;
    _tmp1 = 2;
    _tmp2 = _tmp0 + _tmp1;
    PushParam _tmp2;
    LCall _PrintInt;
    PopParams 4;
    Return;
    EndFunc;
");
}

#[test]
fn local_assign_and_print() {
  let a = ASTAlloc::default();
  let va = build::var_def(&a, "a", build::int_ty());
  let main = build::func(&a, "main", build::int_ty(), vec![], build::block(vec![va], vec![
    build::eval(build::assign(build::var("a"), build::int(5))),
    build::print(vec![build::var("a")]),
  ]));
  let p = build::program(&a, vec![main.into()]);
  expect_tac(&tac_of(p), "\
main:
    BeginFunc 8;
    _tmp0 = 5;
    a = _tmp0;
    PushParam a;
    LCall _PrintInt;
    PopParams 4;
    Return;
    EndFunc;
");
}

#[test]
fn first_local_sits_at_minus_8() {
  let a = ASTAlloc::default();
  let va = build::var_def(&a, "a", build::int_ty());
  let main = build::func(&a, "main", build::int_ty(), vec![], build::block(vec![va], vec![
    build::eval(build::assign(build::var("a"), build::int(5))),
  ]));
  let p = build::program(&a, vec![main.into()]);
  let code = code_of(p);
  let dst = code.iter().find_map(|t| match t {
    Tac::Assign { dst, .. } if dst.name == "a" => Some(dst.clone()),
    _ => None,
  }).unwrap();
  assert_eq!((dst.seg, dst.off), (Segment::Fp, -8));
}

#[test]
fn new_array_and_length() {
  let a = ASTAlloc::default();
  let va = build::var_def(&a, "a", build::array_ty(build::int_ty()));
  let main = build::func(&a, "main", build::int_ty(), vec![], build::block(vec![], vec![
    build::eval(build::assign(build::var("a"), build::new_array(build::int_ty(), build::int(3)))),
    build::print(vec![build::method(build::var("a"), "length", vec![])]),
  ]));
  let p = build::program(&a, vec![va.into(), main.into()]);
  expect_tac(&tac_of(p), "\
main:
    BeginFunc 44;
    _tmp0 = 3;
    _tmp1 = 0;
    _tmp2 = _tmp0 < _tmp1;
    _tmp3 = _tmp0 == _tmp1;
    _tmp4 = _tmp2 || _tmp3;
    _tmp5 = \"Decaf runtime error: Array size is <= 0\\n\";
    IfZ _tmp4 Goto _L0;
    PushParam _tmp5;
    LCall _PrintString;
    PopParams 4;
    LCall _Halt;
_L0:
    _tmp6 = 4;
    _tmp7 = _tmp0 * _tmp6;
    _tmp8 = _tmp7 + _tmp6;
    PushParam _tmp8;
    _tmp9 = LCall _Alloc;
    PopParams 4;
    *(_tmp9) = _tmp0;
    a = _tmp9;
    _tmp10 = *(a);
    PushParam _tmp10;
    LCall _PrintInt;
    PopParams 4;
    Return;
    EndFunc;
");
}

#[test]
fn global_variable_lives_in_gp_segment() {
  let a = ASTAlloc::default();
  let g0 = build::var_def(&a, "g0", build::int_ty());
  let g1 = build::var_def(&a, "g1", build::int_ty());
  let main = build::func(&a, "main", build::int_ty(), vec![], build::block(vec![], vec![
    build::eval(build::assign(build::var("g1"), build::int(7))),
  ]));
  let p = build::program(&a, vec![g0.into(), g1.into(), main.into()]);
  let code = code_of(p);
  let dst = code.iter().find_map(|t| match t {
    Tac::Assign { dst, .. } if dst.name == "g1" => Some(dst.clone()),
    _ => None,
  }).unwrap();
  // globals are laid out in declaration order, one word apiece, from offset 0
  assert_eq!((dst.seg, dst.off), (Segment::Gp, 4));
}

#[test]
fn for_with_break() {
  let a = ASTAlloc::default();
  let vi = build::var_def(&a, "i", build::int_ty());
  let vn = build::var_def(&a, "n", build::int_ty());
  let main = build::func(&a, "main", build::int_ty(), vec![], build::block(vec![vi, vn], vec![
    build::for_(
      Some(build::assign(build::var("i"), build::int(0))),
      build::binary(Lt, build::var("i"), build::var("n")),
      Some(build::assign(build::var("i"), build::binary(Add, build::var("i"), build::int(1)))),
      build::if_(build::binary(Eq, build::var("i"), build::int(5)), build::break_(), None),
    ),
  ]));
  let p = build::program(&a, vec![main.into()]);
  expect_tac(&tac_of(p), "\
main:
    BeginFunc 32;
    _tmp0 = 0;
    i = _tmp0;
_L0:
    _tmp1 = i < n;
    IfZ _tmp1 Goto _L1;
    _tmp2 = 5;
    _tmp3 = i == _tmp2;
    IfZ _tmp3 Goto _L2;
    Goto _L1;
    Goto _L3;
_L2:
_L3:
    _tmp4 = 1;
    _tmp5 = i + _tmp4;
    i = _tmp5;
    Goto _L0;
_L1:
    Return;
    EndFunc;
");
}

#[test]
fn break_exits_the_innermost_loop() {
  let a = ASTAlloc::default();
  let main = build::func(&a, "main", build::void_ty(), vec![], build::block(vec![], vec![
    build::while_(build::bool_(true),
      build::while_(build::bool_(true), build::break_())),
  ]));
  let p = build::program(&a, vec![main.into()]);
  let out = tac_of(p);
  // outer loop owns _L0/_L1, inner owns _L2/_L3; the break must jump to _L3
  let break_goto = out.lines().find(|l| l.trim() == "Goto _L3;");
  assert!(break_goto.is_some(), "break should target the inner bottom label:\n{}", out);
  let inner_backedge = out.lines().position(|l| l.trim() == "Goto _L2;").unwrap();
  let break_pos = out.lines().position(|l| l.trim() == "Goto _L3;").unwrap();
  assert!(break_pos < inner_backedge);
}

#[test]
fn while_shape() {
  let a = ASTAlloc::default();
  let vi = build::var_def(&a, "i", build::int_ty());
  let main = build::func(&a, "main", build::void_ty(), vec![], build::block(vec![vi], vec![
    build::while_(build::binary(Lt, build::var("i"), build::int(10)),
      build::eval(build::assign(build::var("i"), build::binary(Add, build::var("i"), build::int(1))))),
  ]));
  let p = build::program(&a, vec![main.into()]);
  expect_tac(&tac_of(p), "\
main:
    BeginFunc 20;
_L0:
    _tmp0 = 10;
    _tmp1 = i < _tmp0;
    IfZ _tmp1 Goto _L1;
    _tmp2 = 1;
    _tmp3 = i + _tmp2;
    i = _tmp3;
    Goto _L0;
_L1:
    Return;
    EndFunc;
");
}

#[test]
fn if_else_shape() {
  let a = ASTAlloc::default();
  let vb = build::var_def(&a, "b", build::bool_ty());
  let main = build::func(&a, "main", build::void_ty(), vec![], build::block(vec![vb], vec![
    build::if_(build::var("b"),
      build::print(vec![build::int(1)]),
      Some(build::print(vec![build::int(2)]))),
  ]));
  let p = build::program(&a, vec![main.into()]);
  expect_tac(&tac_of(p), "\
main:
    BeginFunc 12;
    IfZ b Goto _L0;
    _tmp0 = 1;
    PushParam _tmp0;
    LCall _PrintInt;
    PopParams 4;
    Goto _L1;
_L0:
    _tmp1 = 2;
    PushParam _tmp1;
    LCall _PrintInt;
    PopParams 4;
_L1:
    Return;
    EndFunc;
");
}

#[test]
fn relational_synthesis() {
  let a = ASTAlloc::default();
  let vx = build::var_def(&a, "x", build::int_ty());
  let vy = build::var_def(&a, "y", build::int_ty());
  let vb = build::var_def(&a, "b", build::bool_ty());
  let main = build::func(&a, "main", build::void_ty(), vec![], build::block(vec![vx, vy, vb], vec![
    build::eval(build::assign(build::var("b"), build::binary(Le, build::var("x"), build::var("y")))),
    build::eval(build::assign(build::var("b"), build::binary(Gt, build::var("x"), build::var("y")))),
    build::eval(build::assign(build::var("b"), build::binary(Ge, build::var("x"), build::var("y")))),
  ]));
  let p = build::program(&a, vec![main.into()]);
  expect_tac(&tac_of(p), "\
main:
    BeginFunc 40;
    _tmp0 = x < y;
    _tmp1 = x == y;
    _tmp2 = _tmp0 || _tmp1;
    b = _tmp2;
    _tmp3 = y < x;
    b = _tmp3;
    _tmp4 = y < x;
    _tmp5 = x == y;
    _tmp6 = _tmp4 || _tmp5;
    b = _tmp6;
    Return;
    EndFunc;
");
}

#[test]
fn not_equal_and_not_are_diamonds() {
  let a = ASTAlloc::default();
  let vx = build::var_def(&a, "x", build::int_ty());
  let vy = build::var_def(&a, "y", build::int_ty());
  let vb = build::var_def(&a, "b", build::bool_ty());
  let main = build::func(&a, "main", build::void_ty(), vec![], build::block(vec![vx, vy, vb], vec![
    build::eval(build::assign(build::var("b"), build::binary(Ne, build::var("x"), build::var("y")))),
    build::eval(build::assign(build::var("b"), build::unary(UnOp::Not, build::var("b")))),
  ]));
  let p = build::program(&a, vec![main.into()]);
  expect_tac(&tac_of(p), "\
main:
    BeginFunc 32;
    _tmp0 = x == y;
    _tmp1 = 1;
    _tmp2 = 0;
    IfZ _tmp0 Goto _L0;
    _tmp1 = _tmp2;
_L0:
    b = _tmp1;
    _tmp3 = 1;
    _tmp4 = 0;
    IfZ b Goto _L1;
    _tmp3 = _tmp4;
_L1:
    b = _tmp3;
    Return;
    EndFunc;
");
}

#[test]
fn unary_minus_is_zero_minus() {
  let a = ASTAlloc::default();
  let vx = build::var_def(&a, "x", build::int_ty());
  let vy = build::var_def(&a, "y", build::int_ty());
  let main = build::func(&a, "main", build::void_ty(), vec![], build::block(vec![vx, vy], vec![
    build::eval(build::assign(build::var("y"), build::unary(UnOp::Neg, build::var("x")))),
  ]));
  let p = build::program(&a, vec![main.into()]);
  expect_tac(&tac_of(p), "\
main:
    BeginFunc 16;
    _tmp0 = 0;
    _tmp1 = _tmp0 - x;
    y = _tmp1;
    Return;
    EndFunc;
");
}

#[test]
fn string_equality_goes_through_the_runtime() {
  let a = ASTAlloc::default();
  let vs = build::var_def(&a, "s", build::string_ty());
  let vt = build::var_def(&a, "t", build::string_ty());
  let vb = build::var_def(&a, "b", build::bool_ty());
  let main = build::func(&a, "main", build::void_ty(), vec![], build::block(vec![vs, vt, vb], vec![
    build::eval(build::assign(build::var("b"), build::binary(Eq, build::var("s"), build::var("t")))),
    build::eval(build::assign(build::var("b"), build::binary(Ne, build::var("s"), build::var("t")))),
  ]));
  let p = build::program(&a, vec![main.into()]);
  expect_tac(&tac_of(p), "\
main:
    BeginFunc 28;
    PushParam t;
    PushParam s;
    _tmp0 = LCall _StringEqual;
    PopParams 8;
    b = _tmp0;
    PushParam t;
    PushParam s;
    _tmp1 = LCall _StringEqual;
    PopParams 8;
    _tmp2 = 1;
    _tmp3 = 0;
    IfZ _tmp1 Goto _L0;
    _tmp2 = _tmp3;
_L0:
    b = _tmp2;
    Return;
    EndFunc;
");
}

#[test]
fn array_read_and_write_are_bounds_checked() {
  let a = ASTAlloc::default();
  let va = build::var_def(&a, "a", build::array_ty(build::int_ty()));
  let vx = build::var_def(&a, "x", build::int_ty());
  let main = build::func(&a, "main", build::void_ty(), vec![], build::block(vec![va, vx], vec![
    build::eval(build::assign(build::var("x"), build::index(build::var("a"), build::int(2)))),
    build::eval(build::assign(build::index(build::var("a"), build::int(1)), build::var("x"))),
  ]));
  let p = build::program(&a, vec![main.into()]);
  let out = tac_of(p);
  // one check per access
  assert_eq!(out.matches("Decaf runtime error: Array subscript out of bounds").count(), 2);
  assert_eq!(out.matches("LCall _Halt;").count(), 2);
  // read loads past the header word, write stores there and re-loads
  assert!(out.contains("_tmp12 = *(_tmp11 + 4);"));
  assert!(out.contains("*(_tmp24 + 4) = x;"));
  assert!(out.contains("_tmp25 = *(_tmp24 + 4);"));
  check_frames(&code_of(p));
}

#[test]
fn read_builtins() {
  let a = ASTAlloc::default();
  let vx = build::var_def(&a, "x", build::int_ty());
  let vs = build::var_def(&a, "s", build::string_ty());
  let main = build::func(&a, "main", build::void_ty(), vec![], build::block(vec![vx, vs], vec![
    build::eval(build::assign(build::var("x"), build::read_int())),
    build::eval(build::assign(build::var("s"), build::read_line())),
    build::print(vec![build::var("s"), build::var("x")]),
  ]));
  let p = build::program(&a, vec![main.into()]);
  expect_tac(&tac_of(p), "\
main:
    BeginFunc 16;
    _tmp0 = LCall _ReadInteger;
    x = _tmp0;
    _tmp1 = LCall _ReadLine;
    s = _tmp1;
    PushParam s;
    LCall _PrintString;
    PopParams 4;
    PushParam x;
    LCall _PrintInt;
    PopParams 4;
    Return;
    EndFunc;
");
}

#[test]
fn free_function_params_start_at_offset_4() {
  let a = ASTAlloc::default();
  let pa = build::var_def(&a, "a", build::int_ty());
  let pb = build::var_def(&a, "b", build::int_ty());
  let f = build::func(&a, "add", build::int_ty(), vec![pa, pb], build::block(vec![], vec![
    build::ret(Some(build::binary(Add, build::var("a"), build::var("b")))),
  ]));
  let p = build::program(&a, vec![f.into()]);
  let code = code_of(p);
  let bin = code.iter().find_map(|t| match t {
    Tac::Bin { l, r, .. } => Some((l.clone(), r.clone())),
    _ => None,
  }).unwrap();
  assert_eq!((bin.0.seg, bin.0.off), (Segment::Fp, 4));
  assert_eq!((bin.1.seg, bin.1.off), (Segment::Fp, 8));
}

#[test]
fn call_pushes_args_right_to_left() {
  let a = ASTAlloc::default();
  let pa = build::var_def(&a, "a", build::int_ty());
  let pb = build::var_def(&a, "b", build::int_ty());
  let f = build::func(&a, "sub", build::int_ty(), vec![pa, pb], build::block(vec![], vec![
    build::ret(Some(build::binary(Sub, build::var("a"), build::var("b")))),
  ]));
  let main = build::func(&a, "main", build::int_ty(), vec![], build::block(vec![], vec![
    build::print(vec![build::call("sub", vec![build::int(7), build::int(3)])]),
  ]));
  let p = build::program(&a, vec![f.into(), main.into()]);
  expect_tac(&tac_of(p), "\
sub:
    BeginFunc 4;
    _tmp0 = a - b;
    Return _tmp0;
    EndFunc;
main:
    BeginFunc 12;
    _tmp1 = 7;
    _tmp2 = 3;
    PushParam _tmp2;
    PushParam _tmp1;
    _tmp3 = LCall sub;
    PopParams 8;
    PushParam _tmp3;
    LCall _PrintInt;
    PopParams 4;
    Return;
    EndFunc;
");
}

#[test]
fn return_of_a_literal() {
  let a = ASTAlloc::default();
  let one = build::func(&a, "one", build::int_ty(), vec![], build::block(vec![], vec![
    build::ret(Some(build::int(1))),
  ]));
  let main = build::func(&a, "main", build::void_ty(), vec![], build::block(vec![], vec![
    build::print(vec![build::bool_(true)]),
  ]));
  let p = build::program(&a, vec![one.into(), main.into()]);
  expect_tac(&tac_of(p), "\
one:
    BeginFunc 4;
    _tmp0 = 1;
    Return _tmp0;
    EndFunc;
main:
    BeginFunc 4;
    _tmp1 = 1;
    PushParam _tmp1;
    LCall _PrintBool;
    PopParams 4;
    Return;
    EndFunc;
");
}

#[test]
fn frame_sizes_match_the_slots_in_use() {
  let a = ASTAlloc::default();
  let va = build::var_def(&a, "a", build::array_ty(build::int_ty()));
  let vi = build::var_def(&a, "i", build::int_ty());
  let main = build::func(&a, "main", build::void_ty(), vec![], build::block(vec![va, vi], vec![
    build::eval(build::assign(build::var("a"), build::new_array(build::int_ty(), build::int(4)))),
    build::for_(
      Some(build::assign(build::var("i"), build::int(0))),
      build::binary(Lt, build::var("i"), build::method(build::var("a"), "length", vec![])),
      Some(build::assign(build::var("i"), build::binary(Add, build::var("i"), build::int(1)))),
      build::eval(build::assign(build::index(build::var("a"), build::var("i")), build::binary(Mul, build::var("i"), build::var("i")))),
    ),
    build::print(vec![build::index(build::var("a"), build::int(2))]),
  ]));
  let p = build::program(&a, vec![main.into()]);
  check_frames(&code_of(p));
}

fn expect_tac(out: &str, ans: &str) {
  assert_eq!(out, ans, "produced tac differs from the expected listing");
}
