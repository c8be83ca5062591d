use std::{hash::{Hash, Hasher}, ops::Deref};

// comparing reference by their pointer value (this is 100% safe rust)
// the lowering passes use it to key side tables by ast node identity
pub struct Ref<'a, T>(pub &'a T);

impl<T> Clone for Ref<'_, T> {
  fn clone(&self) -> Self { Self(self.0) }
}

impl<T> Copy for Ref<'_, T> {}

impl<T> PartialEq for Ref<'_, T> {
  fn eq(&self, other: &Self) -> bool {
    self.0 as *const T == other.0 as *const T
  }
}

impl<T> Eq for Ref<'_, T> {}

impl<T> Hash for Ref<'_, T> {
  fn hash<H: Hasher>(&self, state: &mut H) {
    (self.0 as *const T).hash(state)
  }
}

impl<T> Deref for Ref<'_, T> {
  type Target = T;

  fn deref(&self) -> &Self::Target { self.0 }
}
