//! Input finite-state machines: the abstract arc enumerator the chart
//! seeds itself from. Linear word sequences and general acyclic lattices
//! are both instances.

/// One transition: `src`, the terminal symbol it's labelled with, `dst`.
pub type Arc = (usize, String, usize);

/// A contract for feeding words into the chart. `arcs()` must enumerate
/// every transition in the machine; the graph must be acyclic, or the
/// chart's agenda is unbounded (spec.md §4.1, §7).
pub trait InputFsm {
  fn final_state(&self) -> usize;
  fn arcs(&self) -> Vec<Arc>;

  /// Number of states, `0 ..= final_state()`.
  fn state_count(&self) -> usize {
    self.final_state() + 1
  }
}

/// `[w0, w1, ..., w(n-1)]` as the linear FSM `0 -w0-> 1 -w1-> 2 -> ... -> n`.
#[derive(Debug, Clone)]
pub struct LinearInput {
  words: Vec<String>,
}

impl LinearInput {
  pub fn new(words: Vec<String>) -> Self {
    Self { words }
  }

  /// Convenience constructor splitting a sentence on ASCII whitespace,
  /// mirroring how the cli demo and the teacher's `cli` binary read a
  /// line of input.
  pub fn from_sentence(sentence: &str) -> Self {
    Self::new(sentence.split_whitespace().map(str::to_string).collect())
  }
}

impl InputFsm for LinearInput {
  fn final_state(&self) -> usize {
    self.words.len()
  }

  fn arcs(&self) -> Vec<Arc> {
    self
      .words
      .iter()
      .enumerate()
      .map(|(i, w)| (i, w.clone(), i + 1))
      .collect()
  }
}

/// A general acyclic word lattice: arcs are given directly, already
/// renumbered onto a contiguous `0 ..= final_state` state space. Cycles
/// are not checked for here (spec.md §7 leaves that unspecified); callers
/// that need a hard guarantee should check `has_cycle` themselves.
#[derive(Debug, Clone)]
pub struct LatticeInput {
  arcs: Vec<Arc>,
  final_state: usize,
}

impl LatticeInput {
  pub fn new(arcs: Vec<Arc>) -> Self {
    let final_state = arcs.iter().map(|(_, _, dst)| *dst).max().unwrap_or(0);
    Self { arcs, final_state }
  }

  /// A cheap acyclicity check: Kahn's algorithm over the arc set. Not
  /// required by the core (spec.md treats cyclic input as unspecified),
  /// but offered so callers can opt into rejecting malformed lattices up
  /// front rather than relying on an edge-count limit.
  pub fn has_cycle(&self) -> bool {
    use std::collections::HashMap;

    let n = self.state_count();
    let mut indegree = vec![0usize; n];
    let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::new();
    for (src, _, dst) in &self.arcs {
      indegree[*dst] += 1;
      adjacency.entry(*src).or_default().push(*dst);
    }

    let mut queue: Vec<usize> = (0..n).filter(|&s| indegree[s] == 0).collect();
    let mut visited = 0;
    while let Some(s) = queue.pop() {
      visited += 1;
      if let Some(next) = adjacency.get(&s) {
        for &d in next {
          indegree[d] -= 1;
          if indegree[d] == 0 {
            queue.push(d);
          }
        }
      }
    }
    visited != n
  }
}

impl InputFsm for LatticeInput {
  fn final_state(&self) -> usize {
    self.final_state
  }

  fn arcs(&self) -> Vec<Arc> {
    self.arcs.clone()
  }
}
