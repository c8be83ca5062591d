use std::fmt;
use colored::*;

// comparing emitted tac against an expected listing, reporting the first line that differs;
// tests panic with the Debug rendering of a failed ResultKind

pub enum ResultKind {
  Pass,
  Fail { first_diff: usize, out: String, ans: String },
}

impl ResultKind {
  pub fn new(out: &str, ans: &str) -> ResultKind {
    let (mut out_lines, mut ans_lines) = (out.lines(), ans.lines());
    let mut first_diff = 1;
    // it seems there is no builtin iter function that implement "zip and pad the shorter one"
    loop {
      match (out_lines.next(), ans_lines.next()) {
        (None, None) => break ResultKind::Pass,
        (out, ans) => {
          let (out, ans) = (out.unwrap_or(""), ans.unwrap_or(""));
          if out != ans {
            break ResultKind::Fail { first_diff, out: out.to_owned(), ans: ans.to_owned() };
          }
        }
      }
      first_diff += 1;
    }
  }

  pub fn is_pass(&self) -> bool {
    if let ResultKind::Pass = self { true } else { false }
  }
}

impl fmt::Debug for ResultKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
    match self {
      ResultKind::Pass => write!(f, "{}", "Pass".green()),
      ResultKind::Fail { first_diff, out, ans } => {
        writeln!(f, "{}: {}", "Fail".red(), format!("first different line on {}", first_diff).yellow())?;
        writeln!(f, "{}", format!("your line: \"{}\"", out).yellow())?;
        write!(f, "{}", format!("ans  line: \"{}\"", ans).yellow())
      }
    }
  }
}

// assert that the produced tac matches the expected listing exactly
pub fn expect_tac(out: &str, ans: &str) {
  let r = ResultKind::new(out, ans);
  if !r.is_pass() { panic!("{:?}\nfull output:\n{}", r, out); }
}
