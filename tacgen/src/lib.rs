mod info;
mod mem;

use syntax::{ast::*, ty::*};
use tac::*;
use common::{Ref, HashMap, IndexMap, BinOp, UnOp, THIS};
use crate::info::*;

#[derive(Default)]
struct TacGen<'a> {
  cg: CodeGen,
  // bottom labels of the loops currently being emitted, break jumps to the top entry
  loop_stk: Vec<String>,
  // `*_info` work like extra fields on ast nodes, their meaning is described in info.rs
  var_info: HashMap<Ref<'a, VarDef<'a>>, VarInfo>,
  func_info: HashMap<Ref<'a, FuncDef<'a>>, FuncInfo>,
  class_info: HashMap<Ref<'a, ClassDef<'a>>, ClassInfo<'a>>,
}

pub fn work<'a>(p: &'a Program<'a>) -> TacProgram {
  TacGen::default().program(p)
}

impl<'a> TacGen<'a> {
  fn program(mut self, p: &'a Program<'a>) -> TacProgram {
    // layout must be complete for every class before any lowering starts,
    // NewClass / field access / dispatch all read cached offsets
    for &d in &p.decl {
      if let TopDef::ClassDef(c) = d { self.resolve_layout(c); }
    }
    let mut off = OFFSET_TO_FIRST_GLOBAL;
    for &d in &p.decl {
      match d {
        TopDef::VarDef(v) => {
          self.var_info.insert(Ref(v), VarInfo::Loc(Location::gp(off, v.name)));
          off += VAR_SIZE;
        }
        TopDef::FuncDef(f) => {
          self.func_info.insert(Ref(f), FuncInfo { label: f.name.into(), off: 0, is_method: false });
        }
        _ => {}
      }
    }
    for &d in &p.decl {
      match d {
        TopDef::FuncDef(f) => self.func_def(f),
        TopDef::ClassDef(c) => self.class_def(c),
        // interfaces declare, they never emit
        _ => {}
      }
    }
    self.cg.finish()
  }

  fn class_def(&mut self, c: &'a ClassDef<'a>) {
    for &f in &c.field {
      if let FieldDef::FuncDef(f) = f { self.func_def(f); }
    }
    let method = self.class_info[&Ref(c)].vtbl.iter()
      .map(|(_, &f)| self.func_info[&Ref(f)].label.clone()).collect();
    self.cg.vtable(c.name, method);
  }

  fn func_def(&mut self, f: &'a FuncDef<'a>) {
    let (label, is_method) = {
      let fi = &self.func_info[&Ref(f)];
      (fi.label.clone(), fi.is_method)
    };
    // parameter 0 is the hidden receiver for methods, formals shift one slot up
    let mut off = OFFSET_TO_FIRST_PARAM + if is_method { VAR_SIZE } else { 0 };
    for &v in &f.param {
      self.var_info.insert(Ref(v), VarInfo::Loc(Location::fp(off, v.name)));
      off += VAR_SIZE;
    }
    self.cg.mark_label(&label);
    let h = self.cg.begin_func();
    self.cg.set_frame_size(h, mem::block(&f.body));
    self.block(&f.body);
    // decaf allows control to fall off the end of any function
    if !ends_with_return(&f.body) { self.cg.ret(None); }
    self.cg.end_func();
  }

  fn block(&mut self, b: &Block<'a>) {
    for &v in &b.decl {
      let loc = self.cg.local(v.name);
      self.var_info.insert(Ref(v), VarInfo::Loc(loc));
    }
    for s in &b.stmt { self.stmt(s); }
  }

  fn stmt(&mut self, s: &Stmt<'a>) {
    use StmtKind::*;
    match &s.kind {
      ExprEval(e) => { self.expr(e); }
      If(i) => {
        let cond = self.expr(&i.cond);
        let (els, bot) = (self.cg.new_label(), self.cg.new_label());
        self.cg.if_z(&cond, &els);
        self.stmt(&i.on_true);
        self.cg.goto(&bot);
        self.cg.mark_label(&els);
        if let Some(of) = &i.on_false { self.stmt(of); }
        self.cg.mark_label(&bot);
      }
      While(w) => {
        let (top, bot) = (self.cg.new_label(), self.cg.new_label());
        self.loop_stk.push(bot.clone());
        self.cg.mark_label(&top);
        let cond = self.expr(&w.cond);
        self.cg.if_z(&cond, &bot);
        self.stmt(&w.body);
        self.cg.goto(&top);
        self.cg.mark_label(&bot);
        self.loop_stk.pop();
      }
      For(f) => {
        let (top, bot) = (self.cg.new_label(), self.cg.new_label());
        self.loop_stk.push(bot.clone());
        if let Some(i) = &f.init { self.expr(i); }
        self.cg.mark_label(&top);
        let cond = self.expr(&f.cond);
        self.cg.if_z(&cond, &bot);
        self.stmt(&f.body);
        if let Some(u) = &f.update { self.expr(u); }
        self.cg.goto(&top);
        self.cg.mark_label(&bot);
        self.loop_stk.pop();
      }
      Return(r) => {
        let val = r.as_ref().map(|e| self.expr(e));
        self.cg.ret(val.as_ref());
      }
      Print(args) => for e in args {
        let val = self.expr(e);
        let b = match e.ty.get() {
          t if t == Ty::int() => BuiltIn::PrintInt,
          t if t == Ty::bool() => BuiltIn::PrintBool,
          t if t == Ty::string() => BuiltIn::PrintString,
          t => unreachable!("Print cannot accept type {:?}, semantic checks should have rejected it", t),
        };
        self.cg.builtin(b, &[&val]);
      }
      Break(_) => {
        let bot = self.loop_stk.last().unwrap().clone();
        self.cg.goto(&bot);
      }
      Block(b) => self.block(b),
    }
  }

  fn expr(&mut self, e: &Expr<'a>) -> Location {
    use ExprKind::*;
    match &e.kind {
      IntLit(v) => self.cg.load_int_const(*v),
      BoolLit(v) => self.cg.load_int_const(*v as i32),
      StringLit(s) => self.cg.load_str_const(s),
      DoubleLit(_) => unreachable!("doubles are unsupported, the front end should have rejected them"),
      NullLit(_) => self.cg.load_int_const(0),
      VarSel(v) => self.var_sel(v),
      IndexSel(i) => {
        let addr = self.index_addr(i);
        self.cg.load(&addr, VAR_SIZE)
      }
      Call(c) => self.call(c),
      Unary(u) => match u.op {
        UnOp::Neg => {
          let r = self.expr(&u.r);
          let zero = self.cg.load_int_const(0);
          self.cg.binary(BinOp::Sub, &zero, &r)
        }
        UnOp::Not => {
          let r = self.expr(&u.r);
          self.flip(&r)
        }
      }
      Binary(b) => self.binary(b),
      Assign(a) => self.assign(a),
      This(_) => self.this_loc(),
      ReadInt(_) => self.cg.builtin(BuiltIn::ReadInteger, &[]).unwrap(),
      ReadLine(_) => self.cg.builtin(BuiltIn::ReadLine, &[]).unwrap(),
      NewClass(n) => self.new_class(n),
      NewArray(n) => self.new_array(n),
    }
  }

  fn binary(&mut self, b: &Binary<'a>) -> Location {
    use BinOp::*;
    let (l, r) = (self.expr(&b.l), self.expr(&b.r));
    let string = b.l.ty.get() == Ty::string() && b.r.ty.get() == Ty::string();
    match b.op {
      Eq if string => self.cg.builtin(BuiltIn::StringEqual, &[&l, &r]).unwrap(),
      Ne if string => {
        let eq = self.cg.builtin(BuiltIn::StringEqual, &[&l, &r]).unwrap();
        self.flip(&eq)
      }
      Add | Sub | Mul | Div | Mod | Lt | Eq | And | Or => self.cg.binary(b.op, &l, &r),
      // the remaining comparisons are spelled with <, == and ||
      Gt => self.cg.binary(Lt, &r, &l),
      Le => {
        let lt = self.cg.binary(Lt, &l, &r);
        let eq = self.cg.binary(Eq, &l, &r);
        self.cg.binary(Or, &lt, &eq)
      }
      Ge => {
        let lt = self.cg.binary(Lt, &r, &l);
        let eq = self.cg.binary(Eq, &l, &r);
        self.cg.binary(Or, &lt, &eq)
      }
      Ne => {
        let eq = self.cg.binary(Eq, &l, &r);
        self.flip(&eq)
      }
    }
  }

  fn assign(&mut self, a: &Assign<'a>) -> Location {
    match &a.dst.kind {
      ExprKind::VarSel(v) => {
        let val = self.expr(&a.src);
        self.var_sel_store(v, &val)
      }
      ExprKind::IndexSel(i) => {
        let val = self.expr(&a.src);
        let addr = self.index_addr(i);
        self.cg.store(&addr, VAR_SIZE, &val);
        self.cg.load(&addr, VAR_SIZE)
      }
      _ => {
        let dst = self.expr(&a.dst);
        let val = self.expr(&a.src);
        self.cg.assign(&dst, &val);
        dst
      }
    }
  }

  fn var_sel(&mut self, v: &VarSel<'a>) -> Location {
    let var = v.var.get().unwrap();
    match &v.owner {
      Some(o) => {
        let base = self.expr(o);
        let off = self.field_off(var);
        self.cg.load(&base, off)
      }
      None => match self.var_info[&Ref(var)].clone() {
        VarInfo::Loc(loc) => loc,
        // a variable with no storage of its own is an implicit field of `this`
        VarInfo::Field(off) => {
          let this = self.this_loc();
          self.cg.load(&this, off)
        }
      }
    }
  }

  fn var_sel_store(&mut self, v: &VarSel<'a>, val: &Location) -> Location {
    let var = v.var.get().unwrap();
    match &v.owner {
      Some(o) => {
        let base = self.expr(o);
        let off = self.field_off(var);
        self.cg.store(&base, off, val);
        val.clone()
      }
      None => match self.var_info[&Ref(var)].clone() {
        VarInfo::Loc(loc) => {
          self.cg.assign(&loc, val);
          loc
        }
        VarInfo::Field(off) => {
          let this = self.this_loc();
          self.cg.store(&this, off, val);
          val.clone()
        }
      }
    }
  }

  fn call(&mut self, c: &Call<'a>) -> Location {
    if let Some(o) = &c.owner {
      if o.ty.get().is_arr() {
        // arr.length() reads the header word where the element count lives
        let arr = self.expr(o);
        return self.cg.load(&arr, 0);
      }
    }
    let f = c.func_ref.get().unwrap();
    let has_ret = f.ret_ty.get() != Ty::void();
    if self.func_info[&Ref(f)].is_method {
      let base = match &c.owner {
        Some(o) => self.expr(o),
        None => self.this_loc(),
      };
      // after the receiver, actuals go right to left, in evaluation and on the param stack alike
      let arg = c.arg.iter().rev().map(|a| self.expr(a)).collect::<Vec<_>>();
      for a in &arg { self.cg.push_param(a); }
      self.cg.push_param(&base);
      let off = self.func_info[&Ref(f)].off;
      let vtbl = self.cg.load(&base, 0);
      let faddr = self.cg.load(&vtbl, off);
      let ret = self.cg.acall(&faddr, has_ret);
      self.cg.pop_params((c.arg.len() as i32 + 1) * VAR_SIZE);
      // a void call has no value, valid programs never read this location
      ret.unwrap_or_else(|| Location::fp(0, "_void"))
    } else {
      let arg = c.arg.iter().map(|a| self.expr(a)).collect::<Vec<_>>();
      for a in arg.iter().rev() { self.cg.push_param(a); }
      let label = self.func_info[&Ref(f)].label.clone();
      let ret = self.cg.lcall(&label, has_ret);
      self.cg.pop_params(c.arg.len() as i32 * VAR_SIZE);
      ret.unwrap_or_else(|| Location::fp(0, "_void"))
    }
  }

  fn new_class(&mut self, n: &NewClass<'a>) -> Location {
    let c = n.class.get().unwrap();
    let fields = self.class_info[&Ref(c)].obj_bytes;
    let fields = self.cg.load_int_const(fields);
    let header = self.cg.load_int_const(VAR_SIZE);
    let total = self.cg.binary(BinOp::Add, &header, &fields);
    let obj = self.cg.builtin(BuiltIn::Alloc, &[&total]).unwrap();
    // word 0 points at the dispatch table, spelled as the class label
    let vtbl = self.cg.load_label(c.name);
    self.cg.store(&obj, 0, &vtbl);
    obj
  }

  fn new_array(&mut self, n: &NewArray<'a>) -> Location {
    let len = self.expr(&n.len);
    let zero = self.cg.load_int_const(0);
    let neg = self.cg.binary(BinOp::Lt, &len, &zero);
    let empty = self.cg.binary(BinOp::Eq, &len, &zero);
    let bad = self.cg.binary(BinOp::Or, &neg, &empty);
    let msg = self.cg.load_str_const(ARRAY_SIZE_NOT_POSITIVE);
    let ok = self.cg.new_label();
    self.cg.if_z(&bad, &ok);
    self.cg.builtin(BuiltIn::PrintString, &[&msg]);
    self.cg.builtin(BuiltIn::Halt, &[]);
    self.cg.mark_label(&ok);
    let vs = self.cg.load_int_const(VAR_SIZE);
    let elems = self.cg.binary(BinOp::Mul, &len, &vs);
    let total = self.cg.binary(BinOp::Add, &elems, &vs);
    let arr = self.cg.builtin(BuiltIn::Alloc, &[&total]).unwrap();
    // word 0 holds the element count
    self.cg.store(&arr, 0, &len);
    arr
  }
}

impl<'a> TacGen<'a> {
  fn this_loc(&self) -> Location {
    Location::fp(OFFSET_TO_FIRST_PARAM, THIS)
  }

  // boolean complement as a branch diamond: preset 1, overwrite with 0 unless cond is zero;
  // != and ! both end in this shape since neither is a tac primitive
  fn flip(&mut self, cond: &Location) -> Location {
    let ret = self.cg.load_int_const(1);
    let zero = self.cg.load_int_const(0);
    let done = self.cg.new_label();
    self.cg.if_z(cond, &done);
    self.cg.assign(&ret, &zero);
    self.cg.mark_label(&done);
    ret
  }

  fn field_off(&self, var: &'a VarDef<'a>) -> i32 {
    match self.var_info[&Ref(var)] {
      VarInfo::Field(off) => off,
      _ => unreachable!("selection through a base must reach a field"),
    }
  }

  // evaluates base and subscript, emits the bounds check (crash unless 0 <= idx < length),
  // and returns base + idx * VAR_SIZE; the element sits one word past that, behind the header
  fn index_addr(&mut self, i: &IndexSel<'a>) -> Location {
    let (arr, idx) = (self.expr(&i.arr), self.expr(&i.idx));
    let zero = self.cg.load_int_const(0);
    let neg = self.cg.binary(BinOp::Lt, &idx, &zero);
    let len = self.cg.load(&arr, 0);
    let big = self.cg.binary(BinOp::Lt, &len, &idx);
    let end = self.cg.binary(BinOp::Eq, &len, &idx);
    let over = self.cg.binary(BinOp::Or, &big, &end);
    let bad = self.cg.binary(BinOp::Or, &neg, &over);
    let msg = self.cg.load_str_const(INDEX_OUT_OF_BOUNDS);
    let ok = self.cg.new_label();
    self.cg.if_z(&bad, &ok);
    self.cg.builtin(BuiltIn::PrintString, &[&msg]);
    self.cg.builtin(BuiltIn::Halt, &[]);
    self.cg.mark_label(&ok);
    let vs = self.cg.load_int_const(VAR_SIZE);
    let off = self.cg.binary(BinOp::Mul, &idx, &vs);
    self.cg.binary(BinOp::Add, &arr, &off)
  }
}

impl<'a> TacGen<'a> {
  // assigns field offsets and vtable slots for `c`, parent first; memoized, so shared
  // bases are laid out exactly once no matter the declaration order
  // relies on the absence of cyclic inheritance, which semantic analysis guarantees
  fn resolve_layout(&mut self, c: &'a ClassDef<'a>) {
    if self.class_info.contains_key(&Ref(c)) { return; }
    let (mut obj_bytes, mut vtbl) = if let Some(p) = c.parent_ref.get() {
      self.resolve_layout(p);
      let p = &self.class_info[&Ref(p)];
      (p.obj_bytes, p.vtbl.clone())
    } else { (0, IndexMap::default()) };
    for &f in &c.field {
      match f {
        FieldDef::FuncDef(f) => {
          let label = format!("{}.{}", c.name, f.name);
          if let Some((idx, _, slot)) = vtbl.get_full_mut(f.name) {
            // overriding reuses the slot of the base method
            self.func_info.insert(Ref(f), FuncInfo { label, off: OFFSET_TO_FIRST_METHOD + idx as i32 * VAR_SIZE, is_method: true });
            *slot = f;
          } else {
            self.func_info.insert(Ref(f), FuncInfo { label, off: OFFSET_TO_FIRST_METHOD + vtbl.len() as i32 * VAR_SIZE, is_method: true });
            vtbl.insert(f.name, f);
          }
        }
        FieldDef::VarDef(v) => {
          self.var_info.insert(Ref(v), VarInfo::Field(OFFSET_TO_FIRST_FIELD + obj_bytes));
          obj_bytes += VAR_SIZE;
        }
      }
    }
    self.class_info.insert(Ref(c), ClassInfo { obj_bytes, vtbl });
  }
}

fn ends_with_return(b: &Block) -> bool {
  match b.stmt.last() {
    Some(Stmt { kind: StmtKind::Return(_), .. }) => true,
    _ => false,
  }
}
