//! Integration tests grounded directly on the concrete scenarios used to
//! validate this design: an English agreement grammar exercising
//! percolation and number clash, an ambiguous coordination grammar
//! exercising the Catalan blowup, a cyclic lattice, and a lattice with a
//! relative clause and alternate-spelling word confusions.

use std::collections::HashMap;
use std::rc::Rc;

use latchart::{parse_lattice, parse_sentence, tree, Category, Grammar, LatticeInput};

const AGREEMENT_GRAMMAR: &str = r#"
  S(num) -> Np(num) Vp(num) ;
  S -> S conj S ;
  Np(num:pl) -> Det N(num:pl) ;
  Np(num:sg) -> Det N(num:sg) ;
  Np(num:pl) -> they ;
  N(num:pl) -> pigeons ;
  N(num:sg) -> pigeon ;
  N(num:sg) -> sheep ;
  N(num:pl) -> sheep ;
  Vp(num:pl) -> Aux Participle ;
  Vp(num:sg) -> V(num:sg) ;
  Vp(num:pl) -> V(num:pl) ;
  Aux -> are ;
  Participle -> punished ;
  V(num:sg) -> suffers ;
  V(num:pl) -> suffer ;
  conj -> and ;
  Det -> the ;
"#;

fn agreement_grammar() -> Rc<Grammar> {
  Rc::new(AGREEMENT_GRAMMAR.parse().expect("agreement grammar must parse"))
}

fn top() -> Category {
  Category::new("S")
}

#[test]
fn scenario_1_coordinated_clause_has_one_reading_shaped_s_conj_s() {
  let grammar = agreement_grammar();
  let chart = parse_sentence(grammar, "the pigeons are punished and they suffer");
  let solutions = chart.solutions(&top());
  assert_eq!(solutions.len(), 1);

  let edge = solutions[0].clone();
  let trees: Vec<_> = tree::trees(&chart, &edge).collect();
  assert_eq!(trees.len(), 1);

  let root = &trees[0];
  assert_eq!(root.label.name(), "S");
  assert_eq!(root.children.len(), 3);
  assert_eq!(root.children[0].label.name(), "S");
  assert_eq!(root.children[1].label.name(), "conj");
  assert_eq!(root.children[2].label.name(), "S");
}

#[test]
fn scenario_2_repeated_coordination_grows_catalan() {
  let grammar = agreement_grammar();
  let expected = [1u128, 1, 2, 5, 14, 42, 132, 429];
  for (k, &want) in expected.iter().enumerate() {
    let mut sentence = "the pigeons are punished".to_string();
    for _ in 0..k {
      sentence.push_str(" and they suffer");
    }
    let chart = parse_sentence(grammar.clone(), &sentence);
    let solutions = chart.solutions(&top());
    assert_eq!(solutions.len(), 1, "k={k}");
    let mut memo = HashMap::new();
    let got = tree::count(&chart, &solutions[0], &mut memo);
    assert_eq!(got, want, "k={k}");
  }
}

#[test]
fn scenario_3_singular_agreement() {
  let grammar = agreement_grammar();
  let chart = parse_sentence(grammar, "the sheep suffers");
  let solutions = chart.solutions(&top());
  assert_eq!(solutions.len(), 1);
  assert_eq!(solutions[0].label.get("num"), Some("sg"));

  let parsed = tree::trees(&chart, solutions[0]).next().unwrap();
  let vp = parsed.children.iter().find(|c| c.label.name() == "Vp").unwrap();
  assert_eq!(vp.label.get("num"), Some("sg"));
}

#[test]
fn scenario_4_number_clash_has_no_parse() {
  let grammar = agreement_grammar();
  let chart = parse_sentence(grammar, "the pigeon suffer");
  assert!(chart.solutions(&top()).is_empty());
}

#[test]
fn scenario_5_invariant_noun_percolates_from_the_verb() {
  let grammar = agreement_grammar();
  let chart = parse_sentence(grammar, "the sheep suffer");
  let solutions = chart.solutions(&top());
  assert_eq!(solutions.len(), 1);
  assert_eq!(solutions[0].label.get("num"), Some("pl"));
}

#[test]
fn scenario_6_cyclic_lattice_is_detectable_up_front() {
  let lattice = LatticeInput::new(vec![
    (0, "stuart".to_string(), 1),
    (2, "and".to_string(), 0),
    (1, "suffers".to_string(), 2),
  ]);
  assert!(lattice.has_cycle(), "a conformant implementation may reject this lattice before parsing");
}

const RELATIVE_CLAUSE_GRAMMAR: &str = r#"
  SImp -> show me Np ;
  Np -> Det N ;
  Np -> Np Relp ;
  Relp -> where S ;
  S -> Np is Pn ;
  Det -> a | the ;
  N -> movie ;
  N -> director ;
  N -> direct or ;
  N -> dye rector ;
  Pn -> clint eastwood ;
  Pn -> clint is wood ;
  Pn -> clint east wood ;
"#;

#[test]
fn scenario_7_lattice_with_relative_clause_and_spelling_variants() {
  let grammar: Rc<Grammar> = Rc::new(RELATIVE_CLAUSE_GRAMMAR.parse().expect("relative clause grammar must parse"));

  let arcs = vec![
    (0, "show".to_string(), 1),
    (1, "me".to_string(), 2),
    (2, "a".to_string(), 3),
    (3, "movie".to_string(), 4),
    (4, "where".to_string(), 5),
    (5, "the".to_string(), 6),
    (6, "director".to_string(), 8),
    (6, "direct".to_string(), 7),
    (7, "or".to_string(), 8),
    (6, "dye".to_string(), 7),
    (7, "rector".to_string(), 8),
    (8, "is".to_string(), 9),
    (9, "clint".to_string(), 10),
    (10, "eastwood".to_string(), 12),
    (10, "is".to_string(), 11),
    (11, "wood".to_string(), 12),
    (10, "east".to_string(), 11),
    (11, "wood".to_string(), 12),
  ];
  let lattice = LatticeInput::new(arcs);
  assert!(!lattice.has_cycle());

  let chart = parse_lattice(grammar, &lattice);
  let solutions = chart.solutions(&Category::new("SImp"));
  assert!(!solutions.is_empty(), "expected at least one SImp reading spanning the whole lattice");

  let found = solutions.iter().any(|edge| {
    tree::trees(&chart, *edge).any(|t| {
      t.children.len() == 3
        && t.children[2].label.name() == "Np"
        && t.children[2].children.len() == 2
        && t.children[2].children[1].label.name() == "Relp"
    })
  });
  assert!(found, "expected the show-me-a-movie-where reading among the solutions");
}

#[test]
fn catalan_property_on_unbounded_right_coordination() {
  // S -> S S | S -> w, on w^n: T(S) should equal the (n-1)th Catalan number.
  let grammar: Rc<Grammar> = Rc::new("S -> S S ;\nS -> w ;".parse().expect("catalan grammar must parse"));

  fn catalan(n: usize) -> u128 {
    let mut c = vec![0u128; n + 1];
    c[0] = 1;
    for i in 1..=n {
      let mut total = 0u128;
      for j in 0..i {
        total += c[j] * c[i - 1 - j];
      }
      c[i] = total;
    }
    c[n]
  }

  for n in 1..=8usize {
    let sentence = vec!["w"; n].join(" ");
    let chart = parse_sentence(grammar.clone(), &sentence);
    let solutions = chart.solutions(&Category::new("S"));
    assert_eq!(solutions.len(), 1, "n={n}");
    let mut memo = HashMap::new();
    let got = tree::count(&chart, &solutions[0], &mut memo);
    assert_eq!(got, catalan(n - 1), "n={n}");
  }
}
