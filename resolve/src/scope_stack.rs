use syntax::{ScopeOwner, Symbol, ClassDef, Program};

pub(crate) struct ScopeStack<'a> {
  stack: Vec<ScopeOwner<'a>>,
}

impl<'a> ScopeStack<'a> {
  pub fn new(p: &'a Program<'a>) -> ScopeStack<'a> {
    ScopeStack { stack: vec![ScopeOwner::Global(p)] }
  }

  // walk from the innermost scope outwards; class scopes sit on the stack with
  // their whole extends chain below them, so this covers inherited members too
  pub fn lookup(&self, name: &str) -> Option<Symbol<'a>> {
    for owner in self.stack.iter().rev() {
      if let Some(&symbol) = owner.scope().get(name) {
        return Some(symbol);
      }
    }
    None
  }

  pub fn declare(&mut self, symbol: Symbol<'a>) {
    self.stack.last().unwrap().scope_mut().insert(symbol.name(), symbol);
  }

  pub fn cur_owner(&self) -> ScopeOwner<'a> {
    *self.stack.last().unwrap()
  }

  pub fn open(&mut self, owner: ScopeOwner<'a>) {
    if let ScopeOwner::Class(c) = owner {
      if let Some(p) = c.parent_ref.get() {
        self.open(ScopeOwner::Class(p));
      }
    }
    self.stack.push(owner);
  }

  pub fn close(&mut self) {
    let owner = self.stack.pop().unwrap();
    if let ScopeOwner::Class(_) = owner {
      // all owners remaining on the stack except the bottom are parents of the class
      for _ in 1..self.stack.len() { self.stack.pop(); }
    }
  }

  pub fn lookup_class(&self, name: &str) -> Option<&'a ClassDef<'a>> {
    match self.stack[0].scope().get(name) {
      Some(Symbol::Class(c)) => Some(*c),
      _ => None,
    }
  }
}
