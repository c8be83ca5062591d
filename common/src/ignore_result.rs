// writing to an in-memory printer cannot fail, but write! still returns a Result
// and rustc warns about 'unused result which must be used'; .ignore() suppresses that
pub trait IgnoreResult: Sized {
  fn ignore(self) {}
}

impl<V, E> IgnoreResult for Result<V, E> {}
