//! The chart: an agenda-driven, active bottom-up parser over an input FSM.
//!
//! Seeded with one complete edge per FSM arc, it runs the fundamental rule
//! to exhaustion, keeping the chart closed under subsumption so that a more
//! specific edge never survives alongside a more general one that already
//! covers it, and a more general edge absorbs the derivations of whatever
//! it replaces.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::category::Category;
use crate::edge::Edge;
use crate::fsm::InputFsm;
use crate::rules::Grammar;

/// A `(sister, daughter)` pair recording one way `key` (the edge it's
/// filed under) was derived: `sister` was the partial edge that consumed
/// `daughter` via the fundamental rule to produce `key`, or `daughter` is
/// a bare lexical edge with `sister` the zero-width edge predicted from
/// its rule. Tree enumeration and counting (`tree.rs`) walk this map;
/// an edge absent from it is an axiom (a terminal seeded straight from an
/// FSM arc).
pub type PrevEntry = (Edge, Edge);

/// The chart. `completes` is bucketed by left boundary (span start),
/// `partials` by right boundary (span end, i.e. where they still need a
/// daughter to begin) -- this is exactly what the fundamental rule needs
/// to look up when a new edge of the opposite kind arrives at the
/// matching junction.
pub struct Chart {
  pub completes: Vec<Vec<Edge>>,
  pub partials: Vec<Vec<Edge>>,
  prev: HashMap<Edge, HashSet<PrevEntry>>,
  agenda: Vec<Edge>,
  grammar: Rc<Grammar>,
  using_features: bool,
  n: usize,
}

impl Chart {
  /// Builds an empty chart over `state_count` states with no edges yet.
  pub fn empty(grammar: Rc<Grammar>, state_count: usize, using_features: bool) -> Self {
    Self {
      completes: vec![Vec::new(); state_count],
      partials: vec![Vec::new(); state_count],
      prev: HashMap::new(),
      agenda: Vec::new(),
      grammar,
      using_features,
      n: state_count,
    }
  }

  /// Seeds the chart from `fsm`'s arcs and runs the agenda to exhaustion.
  pub fn parse(grammar: Rc<Grammar>, fsm: &dyn InputFsm, using_features: bool) -> Self {
    let mut chart = Self::empty(grammar, fsm.state_count(), using_features);
    for (src, word, dst) in fsm.arcs() {
      trace!(word = %word, src, dst, "seeding terminal edge");
      let edge = Edge::complete(Category::new(word), src, dst);
      chart.incorporate(edge, None);
    }
    chart.run();
    debug!(
      completes = chart.completes.iter().map(Vec::len).sum::<usize>(),
      partials = chart.partials.iter().map(Vec::len).sum::<usize>(),
      "chart closed"
    );
    chart
  }

  pub fn n(&self) -> usize {
    self.n
  }

  pub fn using_features(&self) -> bool {
    self.using_features
  }

  /// All edges spanning the whole input whose label matches `top`, i.e.
  /// every complete parse of the input as `top`.
  pub fn solutions(&self, top: &Category) -> Vec<&Edge> {
    if self.n == 0 {
      return Vec::new();
    }
    self.completes[0]
      .iter()
      .filter(|e| e.right == self.n - 1 && self.categories_match(&e.label, top))
      .collect()
  }

  /// The "category match" predicate (spec.md §4.3): plain name equality
  /// when this chart was built without features, full compatibility
  /// (subsumption-checked binding overlap) when built with them.
  fn categories_match(&self, a: &Category, b: &Category) -> bool {
    if self.using_features {
      a.compatible(b)
    } else {
      a.name() == b.name()
    }
  }

  /// The recorded `(sister, daughter)` derivations of `edge`. Empty for an
  /// axiom (a terminal edge seeded straight from the input FSM).
  pub fn prev(&self, edge: &Edge) -> &HashSet<PrevEntry> {
    static EMPTY: std::sync::OnceLock<HashSet<PrevEntry>> = std::sync::OnceLock::new();
    self.prev.get(edge).unwrap_or_else(|| EMPTY.get_or_init(HashSet::new))
  }

  pub fn edges(&self) -> impl Iterator<Item = &Edge> {
    self.completes.iter().flatten().chain(self.partials.iter().flatten())
  }

  /// Convenience forwarders to `tree::trees`/`tree::count`, so callers
  /// don't need to import the `tree` module just to walk a solution.
  pub fn trees<'c>(&'c self, edge: &Edge) -> Box<dyn Iterator<Item = crate::tree::Tree> + 'c> {
    crate::tree::trees(self, edge)
  }

  pub fn count(&self, edge: &Edge, memo: &mut HashMap<Edge, u128>) -> u128 {
    crate::tree::count(self, edge, memo)
  }

  fn run(&mut self) {
    while let Some(edge) = self.agenda.pop() {
      if edge.is_complete() {
        self.spawn(&edge);
        self.pair_with_partials(&edge);
      } else {
        self.pair_with_completes(&edge);
      }
    }
  }

  /// Predicts every rule whose left-corner daughter matches `lc`,
  /// inserting a zero-width partial edge (the dotted rule, nothing
  /// consumed yet) at `lc`'s start. The fundamental rule then combines it
  /// with `lc` itself, and anything else already or later filed at that
  /// junction, via the ordinary agenda loop.
  fn spawn(&mut self, lc: &Edge) {
    let candidates = self.grammar.left_corner_candidates(lc.label.name()).to_vec();
    for rule in candidates {
      if !self.categories_match(&lc.label, &rule.rhs[0]) {
        continue;
      }
      trace!(rule = %rule, "spawning predicted edge");
      let predicted = Edge::partial(rule.lhs.clone(), lc.left, lc.left, rule.rhs.clone(), rule.constraints.clone());
      self.incorporate(predicted, None);
    }
  }

  /// Fundamental rule, partial-driven direction: `partial` just entered
  /// the chart; look for completes already filed at its right boundary.
  fn pair_with_completes(&mut self, partial: &Edge) {
    let candidates = self.completes[partial.right].clone();
    for daughter in candidates {
      if !self.categories_match(&partial.needed[0], &daughter.label) {
        continue;
      }
      let combined = partial.combine_with_daughter(&daughter);
      self.incorporate(combined, Some((partial.clone(), daughter)));
    }
  }

  /// Fundamental rule, complete-driven direction: `complete` just entered
  /// the chart; look for partials already filed at its left boundary.
  fn pair_with_partials(&mut self, complete: &Edge) {
    let candidates = self.partials[complete.left].clone();
    for sister in candidates {
      if !self.categories_match(&sister.needed[0], &complete.label) {
        continue;
      }
      let combined = sister.combine_with_daughter(complete);
      self.incorporate(combined, Some((sister.clone(), complete.clone())));
    }
  }

  /// Files `edge` into the chart, implementing the membership/subsumption
  /// discipline:
  ///
  /// - **Present** (an equivalent edge is already filed): no change but
  ///   the new `prev_pair`, if any, is merged into the existing edge's
  ///   derivation set.
  /// - **Subsumed** (an existing edge is less general than `edge`... no,
  ///   more general than `edge`, i.e. `edge` is redundant): `edge` is
  ///   dropped and its derivation folds into the subsumer.
  /// - **Generalises** (`edge` is less general than -- more general than
  ///   -- one or more existing edges): those are removed, their
  ///   derivations fold into `edge`, and `edge` is filed and agenda'd.
  /// - **Incomparable/Absent**: `edge` is filed alongside whatever's
  ///   already there, agenda'd fresh.
  fn incorporate(&mut self, edge: Edge, prev_pair: Option<PrevEntry>) {
    let idx = if edge.is_complete() { edge.left } else { edge.right };

    if let Some(existing) = self.bucket(edge.is_complete(), idx).iter().find(|e| **e == edge).cloned() {
      trace!(edge = %existing, "present");
      self.record_prev(existing, prev_pair);
      return;
    }

    if let Some(subsumer) = self
      .bucket(edge.is_complete(), idx)
      .iter()
      .find(|g| edge.less_general_than(g))
      .cloned()
    {
      trace!(edge = %edge, subsumer = %subsumer, "subsumed");
      self.record_prev(subsumer, prev_pair);
      return;
    }

    let (generalised, kept): (Vec<Edge>, Vec<Edge>) =
      self.bucket_mut(edge.is_complete(), idx).drain(..).partition(|e| e.less_general_than(&edge));
    *self.bucket_mut(edge.is_complete(), idx) = kept;

    let mut merged: HashSet<PrevEntry> = HashSet::new();
    for g in &generalised {
      trace!(generalised = %g, by = %edge, "replaced by more general edge");
      if let Some(set) = self.prev.remove(g) {
        merged.extend(set);
      }
    }
    if let Some(pair) = prev_pair {
      merged.insert(pair);
    }
    if !merged.is_empty() {
      self.prev.insert(edge.clone(), merged);
    }

    trace!(edge = %edge, "filed");
    self.bucket_mut(edge.is_complete(), idx).push(edge.clone());
    self.agenda.push(edge);
  }

  fn bucket(&self, complete: bool, idx: usize) -> &[Edge] {
    if complete { &self.completes[idx] } else { &self.partials[idx] }
  }

  fn bucket_mut(&mut self, complete: bool, idx: usize) -> &mut Vec<Edge> {
    if complete { &mut self.completes[idx] } else { &mut self.partials[idx] }
  }

  fn record_prev(&mut self, key: Edge, pair: Option<PrevEntry>) {
    if let Some(pair) = pair {
      self.prev.entry(key).or_default().insert(pair);
    }
  }
}
