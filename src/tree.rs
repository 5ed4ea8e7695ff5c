//! Parse forest reconstruction: a lazy, restartable tree enumerator and a
//! memoised closed-form count, both walking `Chart::prev` the same way.

use std::collections::HashMap;
use std::fmt;

use crate::category::Category;
use crate::chart::{Chart, PrevEntry};
use crate::edge::Edge;

/// One parse: a labelled node with an ordered list of daughters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
  pub label: Category,
  pub children: Vec<Tree>,
}

impl fmt::Display for Tree {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.fmt_indented(f, 0)
  }
}

impl Tree {
  fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    if self.children.len() == 1 && self.children[0].children.is_empty() {
      return writeln!(f, "{pad}{} {}", self.label, self.children[0].label);
    }
    writeln!(f, "{pad}{}", self.label)?;
    for child in &self.children {
      child.fmt_indented(f, depth + 1)?;
    }
    Ok(())
  }
}

/// Every parse tree rooted at the complete edge `edge`. Restartable: each
/// call walks `chart.prev` fresh, so callers can take a prefix (e.g. the
/// first tree) without paying for the rest. Not defined for a partial
/// edge, which isn't a constituent -- that yields no trees.
pub fn trees<'c>(chart: &'c Chart, edge: &Edge) -> Box<dyn Iterator<Item = Tree> + 'c> {
  if !edge.is_complete() {
    return Box::new(std::iter::empty());
  }
  let label = edge.label.clone();
  Box::new(sequences(chart, edge.clone()).map(move |children| Tree {
    label: label.clone(),
    children,
  }))
}

/// Every way to realize the daughters `edge` has already consumed, as an
/// ordered `Vec<Tree>`. An edge with no recorded derivation -- an axiom
/// terminal, or a freshly predicted zero-width edge that hasn't consumed
/// anything yet -- contributes exactly one, empty, sequence.
fn sequences<'c>(chart: &'c Chart, edge: Edge) -> Box<dyn Iterator<Item = Vec<Tree>> + 'c> {
  let prevs: Vec<PrevEntry> = chart.prev(&edge).iter().cloned().collect();
  if prevs.is_empty() {
    return Box::new(std::iter::once(Vec::new()));
  }
  Box::new(prevs.into_iter().flat_map(move |(sister, daughter)| {
    sequences(chart, sister).flat_map(move |seq| {
      let daughter = daughter.clone();
      trees(chart, &daughter).map(move |dt| {
        let mut extended = seq.clone();
        extended.push(dt);
        extended
      })
    })
  }))
}

/// The number of distinct parse trees rooted at `edge`, memoised. Shares
/// the recurrence `sequences` walks lazily: 1 for an edge with no
/// recorded derivation, otherwise the sum, over every `(sister,
/// daughter)` pair, of the product of their counts. On a grammar with
/// unbounded ambiguity (e.g. fully right- or left-branching coordination)
/// this grows like the Catalan numbers in sentence length.
pub fn count(chart: &Chart, edge: &Edge, memo: &mut HashMap<Edge, u128>) -> u128 {
  if let Some(&cached) = memo.get(edge) {
    return cached;
  }
  let prevs = chart.prev(edge);
  let total = if prevs.is_empty() {
    1
  } else {
    prevs
      .iter()
      .map(|(sister, daughter)| {
        debug_assert!(daughter.right <= edge.right, "daughter must not exceed its mother's span");
        count(chart, sister, memo) * count(chart, daughter, memo)
      })
      .sum()
  };
  memo.insert(edge.clone(), total);
  total
}
