//! Rules and the grammar container that groups them by left-hand name.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::category::Category;

/// Per-position re-entrancy sets for one rule: which feature names are
/// declared re-entrant on the mother (position 0, conceptually) and on
/// each right-hand daughter. A plain `k:v` binding inside a `Category`
/// is not a re-entrancy and never appears here -- only bare names like
/// the `num` in `S(num) -> Np(num) Vp(num)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraints {
  pub mother_keys: Rc<BTreeSet<String>>,
  pub rhs_keys: Vec<Rc<BTreeSet<String>>>,
}

impl Constraints {
  pub fn new(mother_keys: BTreeSet<String>, rhs_keys: Vec<BTreeSet<String>>) -> Self {
    Self {
      mother_keys: Rc::new(mother_keys),
      rhs_keys: rhs_keys.into_iter().map(Rc::new).collect(),
    }
  }

  pub fn empty() -> Self {
    Self {
      mother_keys: Rc::new(BTreeSet::new()),
      rhs_keys: Vec::new(),
    }
  }
}

/// `lhs -> rhs[0] rhs[1] ... rhs[n-1]`. Lexical rules have `rhs.len() ==
/// 1`, with `rhs[0]` a bare-name `Category` standing for a terminal
/// symbol (see `SPEC_FULL.md` §9: terminals are categories with no
/// bindings, not a separate enum variant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
  pub lhs: Category,
  pub rhs: Vec<Category>,
  pub constraints: Constraints,
}

impl Rule {
  /// Builds a rule from its mother, daughters, and the full re-entrancy
  /// sets declared in the source text (one set per rhs position plus one
  /// for the mother). Per spec.md's invariant, a re-entrancy name that
  /// appears only on the mother is a no-op and is discarded.
  pub fn new(lhs: Category, rhs: Vec<Category>, mother_keys: BTreeSet<String>, rhs_keys: Vec<BTreeSet<String>>) -> Self {
    assert_eq!(rhs.len(), rhs_keys.len(), "rhs_keys must have one entry per daughter");
    let referenced: BTreeSet<String> = rhs_keys.iter().flatten().cloned().collect();
    let mother_keys: BTreeSet<String> = mother_keys.into_iter().filter(|k| referenced.contains(k)).collect();
    Self {
      lhs,
      rhs,
      constraints: Constraints::new(mother_keys, rhs_keys),
    }
  }

  pub fn len(&self) -> usize {
    self.rhs.len()
  }
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ->", self.lhs)?;
    for d in &self.rhs {
      write!(f, " {}", d)?;
    }
    Ok(())
  }
}

/// A grammar: all rules, indexed both by mother name (for prediction
/// bookkeeping elsewhere) and by the name of their left-corner daughter
/// (for `Chart::spawn`'s restricted scan).
#[derive(Debug)]
pub struct Grammar {
  pub rules: Vec<Rc<Rule>>,
  by_left_corner: HashMap<String, Vec<Rc<Rule>>>,
  nonterminals: HashSet<String>,
}

impl Grammar {
  pub fn new(rules: Vec<Rule>) -> Self {
    let nonterminals: HashSet<String> = rules.iter().map(|r| r.lhs.name().to_string()).collect();
    let rules: Vec<Rc<Rule>> = rules.into_iter().map(Rc::new).collect();

    let mut by_left_corner: HashMap<String, Vec<Rc<Rule>>> = HashMap::new();
    for rule in &rules {
      let lc_name = rule.rhs[0].name().to_string();
      by_left_corner.entry(lc_name).or_default().push(rule.clone());
    }

    Self {
      rules,
      by_left_corner,
      nonterminals,
    }
  }

  pub fn is_nonterminal(&self, name: &str) -> bool {
    self.nonterminals.contains(name)
  }

  /// Whether any rule in this grammar declares a re-entrancy or a literal
  /// feature binding. Purely informational -- the chart algorithm itself
  /// doesn't branch on it -- but useful for logging and for the cli's
  /// `--no-fs` display mode.
  pub fn uses_features(&self) -> bool {
    self.rules.iter().any(|r| {
      !r.constraints.mother_keys.is_empty()
        || r.constraints.rhs_keys.iter().any(|k| !k.is_empty())
        || r.lhs.bindings().next().is_some()
        || r.rhs.iter().any(|c| c.bindings().next().is_some())
    })
  }

  /// Candidate rules for `Chart::spawn(lc, _)`: a conservative superset
  /// of rules whose first daughter is `compat`-compatible with `lc`,
  /// narrowed by daughter name before the full feature check runs.
  pub fn left_corner_candidates(&self, lc_name: &str) -> &[Rc<Rule>] {
    self.by_left_corner.get(lc_name).map(Vec::as_slice).unwrap_or(&[])
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cat(name: &str) -> Category {
    Category::new(name)
  }

  #[test]
  fn mother_only_reentrancy_is_discarded() {
    let rule = Rule::new(
      cat("S"),
      vec![cat("Np"), cat("Vp")],
      ["num".to_string()].into_iter().collect(),
      vec![BTreeSet::new(), BTreeSet::new()],
    );
    assert!(rule.constraints.mother_keys.is_empty());
  }

  #[test]
  fn shared_reentrancy_is_kept() {
    let rule = Rule::new(
      cat("S"),
      vec![cat("Np"), cat("Vp")],
      ["num".to_string()].into_iter().collect(),
      vec![["num".to_string()].into_iter().collect(), BTreeSet::new()],
    );
    assert!(rule.constraints.mother_keys.contains("num"));
  }

  #[test]
  fn left_corner_index_groups_by_first_daughter_name() {
    let g = Grammar::new(vec![
      Rule::new(cat("S"), vec![cat("Np"), cat("Vp")], BTreeSet::new(), vec![BTreeSet::new(), BTreeSet::new()]),
      Rule::new(cat("Np"), vec![cat("dog")], BTreeSet::new(), vec![BTreeSet::new()]),
    ]);
    assert_eq!(g.left_corner_candidates("Np").len(), 1);
    assert_eq!(g.left_corner_candidates("dog").len(), 1);
    assert!(g.left_corner_candidates("Vp").is_empty());
    assert!(g.is_nonterminal("S"));
    assert!(!g.is_nonterminal("dog"));
  }

  #[test]
  fn uses_features_detects_reentrancy() {
    let plain = Grammar::new(vec![Rule::new(cat("S"), vec![cat("Np"), cat("Vp")], BTreeSet::new(), vec![BTreeSet::new(), BTreeSet::new()])]);
    assert!(!plain.uses_features());

    let agreeing = Grammar::new(vec![Rule::new(
      cat("S"),
      vec![cat("Np"), cat("Vp")],
      ["num".to_string()].into_iter().collect(),
      vec![["num".to_string()].into_iter().collect(), ["num".to_string()].into_iter().collect()],
    )]);
    assert!(agreeing.uses_features());
  }
}
