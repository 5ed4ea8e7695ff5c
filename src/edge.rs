//! The edge datatype: an assertion over a span of the input FSM, plus the
//! subsumption/equivalence discipline the chart uses to stay closed.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::category::Category;
use crate::rules::Constraints;

/// An assertion that `[left, right]` can be (or is becoming) a `label`
/// constituent, still needing the categories in `needed` (in order) as
/// further daughters. Complete iff `needed` is empty.
///
/// `PartialEq`/`Eq`/`Hash` are hand-written to implement spec.md's chart
/// *equivalence*: `label`, `left`, `right`, and `needed` must match;
/// `constraints` is bookkeeping for percolation and plays no part in
/// identity, so two edges that differ only in `constraints` are the same
/// edge for chart purposes.
#[derive(Debug, Clone)]
pub struct Edge {
  pub label: Category,
  pub left: usize,
  pub right: usize,
  pub needed: Vec<Category>,
  pub constraints: Constraints,
}

impl Edge {
  pub fn complete(label: Category, left: usize, right: usize) -> Self {
    Self {
      label,
      left,
      right,
      needed: Vec::new(),
      constraints: Constraints::empty(),
    }
  }

  pub fn partial(label: Category, left: usize, right: usize, needed: Vec<Category>, constraints: Constraints) -> Self {
    Self {
      label,
      left,
      right,
      needed,
      constraints,
    }
  }

  pub fn is_complete(&self) -> bool {
    self.needed.is_empty()
  }

  pub fn is_partial(&self) -> bool {
    !self.is_complete()
  }

  /// Applies the fundamental rule: `self` is a partial edge whose next
  /// needed category has just been satisfied by `daughter`. Percolates
  /// `daughter`'s bindings up to the mother (for keys in `mother_keys`
  /// also declared reentrant on the consumed position) and rightward into
  /// the categories still needed (for keys each later position declares
  /// reentrant), then drops the consumed position from `needed` and
  /// `constraints`. The caller is responsible for checking
  /// `self.needed[0].compatible(&daughter.label)` first.
  pub fn combine_with_daughter(&self, daughter: &Edge) -> Edge {
    debug_assert!(self.is_partial(), "only a partial edge has a daughter to consume");
    debug_assert!(!self.constraints.rhs_keys.is_empty());

    let consumed_keys = &self.constraints.rhs_keys[0];

    let mother_transfer: Vec<&String> = self.constraints.mother_keys.iter().filter(|k| consumed_keys.contains(*k)).collect();
    let new_label = self.label.extendc(mother_transfer, &daughter.label);

    let remaining_rhs_keys = &self.constraints.rhs_keys[1..];
    let new_needed: Vec<Category> = self.needed[1..]
      .iter()
      .zip(remaining_rhs_keys.iter())
      .map(|(cat, keys)| {
        let transfer: Vec<&String> = keys.iter().filter(|k| consumed_keys.contains(*k)).collect();
        cat.extendc(transfer, &daughter.label)
      })
      .collect();

    Edge {
      label: new_label,
      left: self.left,
      right: daughter.right,
      needed: new_needed,
      constraints: Constraints {
        mother_keys: self.constraints.mother_keys.clone(),
        rhs_keys: remaining_rhs_keys.to_vec(),
      },
    }
  }

  /// `self` is strictly less general than `other`: same span, same
  /// `needed` length, `self`'s label and every `needed[i]` are at least
  /// as specific as `other`'s, and at least one of them is strictly so.
  pub fn less_general_than(&self, other: &Edge) -> bool {
    if self.left != other.left || self.right != other.right {
      return false;
    }
    if self.needed.len() != other.needed.len() {
      return false;
    }
    if !self.label.refines_or_equal(&other.label) {
      return false;
    }
    if !self
      .needed
      .iter()
      .zip(other.needed.iter())
      .all(|(a, b)| a.refines_or_equal(b))
    {
      return false;
    }
    self != other
  }
}

impl PartialEq for Edge {
  fn eq(&self, other: &Self) -> bool {
    self.label == other.label && self.left == other.left && self.right == other.right && self.needed == other.needed
  }
}

impl Eq for Edge {}

impl Hash for Edge {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.label.hash(state);
    self.left.hash(state);
    self.right.hash(state);
    self.needed.hash(state);
  }
}

impl fmt::Display for Edge {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {} ->", self.left, self.right, self.label)?;
    if self.needed.is_empty() {
      write!(f, " .")?;
    } else {
      write!(f, " . ")?;
      for (i, n) in self.needed.iter().enumerate() {
        if i > 0 {
          write!(f, " ")?;
        }
        write!(f, "{}", n)?;
      }
    }
    Ok(())
  }
}
