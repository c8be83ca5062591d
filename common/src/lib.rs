pub mod loc;
pub mod ignore_result;
pub mod indent_printer;
pub mod r#ref;
pub mod op;

pub use crate::{loc::*, ignore_result::*, indent_printer::*, r#ref::*, op::*};
use hashbrown::hash_map::DefaultHashBuilder;

pub const LENGTH: &str = "length";
pub const THIS: &str = "this";
const INDENT: u32 = 4;
const INDENT_STR: &str = "    ";

// DefaultHashBuilder is the default hash of hashbrown, seems faster than RandomState (the default hash of IndexMap & std HashMap)
// place these type alias here just for convenience
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, DefaultHashBuilder>;
pub type HashMap<K, V> = std::collections::HashMap<K, V>;
