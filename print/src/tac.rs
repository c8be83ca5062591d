use tac::{Tac, TacProgram, Location};
use common::{IndentPrinter, IgnoreResult};
use std::fmt::Write;

// the textual flush of the instruction buffer, in appearance order: labels and vtable
// records flush left, everything else indented one level
pub fn program(pr: &TacProgram, p: &mut IndentPrinter) {
  for t in &pr.code {
    match t {
      Tac::Label { .. } | Tac::VTable { .. } => write_tac(t, p),
      _ => p.indent(|p| write_tac(t, p)),
    }
  }
}

fn mem_str(base: &Location, off: i32) -> String {
  if off == 0 { format!("*({:?})", base) } else { format!("*({:?} {} {})", base, if off >= 0 { '+' } else { '-' }, off.abs()) }
}

pub fn write_tac(t: &Tac, p: &mut IndentPrinter) {
  use Tac::*;
  match t {
    LoadIntConst { dst, val } => write!(p, "{:?} = {};", dst, val),
    LoadStrConst { dst, val } => write!(p, "{:?} = \"{}\";", dst, val),
    LoadLabel { dst, label } => write!(p, "{:?} = {};", dst, label),
    Assign { dst, src } => write!(p, "{:?} = {:?};", dst, src),
    Load { dst, base, off } => write!(p, "{:?} = {};", dst, mem_str(base, *off)),
    Store { base, off, src } => write!(p, "{} = {:?};", mem_str(base, *off), src),
    Bin { op, dst, l, r } => write!(p, "{:?} = {:?} {} {:?};", dst, l, op.to_op_str(), r),
    Label { label } => write!(p, "{}:", label),
    Goto { label } => write!(p, "Goto {};", label),
    IfZ { cond, label } => write!(p, "IfZ {:?} Goto {};", cond, label),
    BeginFunc { frame } => write!(p, "BeginFunc {};", frame),
    EndFunc => write!(p, "EndFunc;"),
    Ret { val } => match val {
      Some(v) => write!(p, "Return {:?};", v),
      None => write!(p, "Return;"),
    },
    PushParam { src } => write!(p, "PushParam {:?};", src),
    PopParams { bytes } => write!(p, "PopParams {};", bytes),
    LCall { label, dst } => match dst {
      Some(d) => write!(p, "{:?} = LCall {};", d, label),
      None => write!(p, "LCall {};", label),
    },
    ACall { addr, dst } => match dst {
      Some(d) => write!(p, "{:?} = ACall {:?};", d, addr),
      None => write!(p, "ACall {:?};", addr),
    },
    VTable { class, method } => {
      write!(p, "VTable {} =", class).ignore();
      p.indent(|p| for m in method { write!(p, "{},", m).ignore(); });
      write!(p, ";")
    }
  }.ignore();
}

#[cfg(test)]
mod tests {
  use super::*;
  use tac::{CodeGen, BuiltIn};
  use common::BinOp;

  #[test]
  fn instruction_spelling() {
    let mut cg = CodeGen::default();
    cg.mark_label("main");
    let h = cg.begin_func();
    let a = cg.load_int_const(1);
    let b = cg.load_int_const(2);
    let c = cg.binary(BinOp::Add, &a, &b);
    cg.builtin(BuiltIn::PrintInt, &[&c]);
    cg.ret(None);
    cg.set_frame_size(h, 12);
    cg.end_func();
    let mut p = IndentPrinter::default();
    program(&cg.finish(), &mut p);
    let expect = "\
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
";
    assert_eq!(p.finish(), expect);
  }

  #[test]
  fn vtable_block() {
    let mut cg = CodeGen::default();
    cg.vtable("C", vec!["C.get".into(), "C.set".into()]);
    let mut p = IndentPrinter::default();
    program(&cg.finish(), &mut p);
    assert_eq!(p.finish(), "VTable C =\n    C.get,\n    C.set,\n;\n");
  }

  #[test]
  fn memory_operands() {
    let mut cg = CodeGen::default();
    cg.begin_func();
    let base = cg.load_int_const(0);
    let v = cg.load(&base, 0);
    cg.store(&base, 4, &v);
    let mut p = IndentPrinter::default();
    program(&cg.finish(), &mut p);
    let out = p.finish();
    assert!(out.contains("_tmp1 = *(_tmp0);"));
    assert!(out.contains("*(_tmp0 + 4) = _tmp1;"));
  }
}
