//! An active bottom-up chart parser for context-free grammars with
//! atomic-feature agreement, over either a linear sentence or a word
//! lattice.
//!
//! ```
//! use std::rc::Rc;
//! use latchart::Grammar;
//!
//! let grammar: Rc<Grammar> = Rc::new(
//!   "S(num) -> Np(num) Vp(num) ;\nNp(num:sg) -> dog ;\nVp(num:sg) -> sleeps ;"
//!     .parse()
//!     .unwrap(),
//! );
//! let chart = latchart::parse_sentence(grammar, "dog sleeps");
//! assert_eq!(chart.solutions(&latchart::Category::new("S")).len(), 1);
//! ```

pub mod category;
pub mod chart;
pub mod edge;
pub mod error;
pub mod fsm;
pub mod grammar_text;
pub mod rules;
pub mod tree;

pub use category::Category;
pub use chart::Chart;
pub use edge::Edge;
pub use error::GrammarError;
pub use fsm::{InputFsm, LatticeInput, LinearInput};
pub use rules::{Constraints, Grammar, Rule};
pub use tree::Tree;

use std::rc::Rc;

/// Parses a whitespace-tokenized sentence against `grammar` and returns
/// the resulting chart, closed under the fundamental rule.
pub fn parse_sentence(grammar: Rc<Grammar>, sentence: &str) -> Chart {
  parse_lattice(grammar, &LinearInput::from_sentence(sentence))
}

/// Parses an arbitrary acyclic input FSM (a lattice, or a `LinearInput`)
/// against `grammar` and returns the resulting chart.
pub fn parse_lattice(grammar: Rc<Grammar>, fsm: &dyn InputFsm) -> Chart {
  let uses_features = grammar.uses_features();
  Chart::parse(grammar, fsm, uses_features)
}
