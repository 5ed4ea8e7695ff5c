//! Error type for the grammar/lexicon text collaborator.
//!
//! The core chart-parsing engine (`chart`, `edge`, `rules`, `fsm`, `tree`)
//! has no fallible entry points: per the parser's error-handling policy,
//! a grammar that cannot combine with an input simply yields zero
//! solutions, which is observable, not exceptional. Only turning grammar
//! *text* into `Rule`s can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrammarError {
  #[error("parse error at byte {offset}: {message}")]
  Syntax { offset: usize, message: String },

  #[error("empty ruleset")]
  Empty,

  #[error("rule {rule}: production {production} cannot carry features on a terminal")]
  FeaturedTerminal { rule: String, production: String },
}
