//! The grammar/lexicon text format: the one place in this crate that can
//! fail. Everything downstream (`Category`, `Rule`, `Grammar`, `Chart`)
//! takes already-validated values and has no fallible entry points.
//!
//! ```text
//! // comments run to end of line
//! S(num) -> Np(num) Vp(num) ;
//! Np -> dog | dogs | cat | cats ;
//! Np(num:sg) -> dog ;
//! Np(num:pl) -> dogs ;
//! ```
//!
//! A parenthesized `name` with no colon (`Np(num)`) declares `num` as a
//! re-entrancy shared between that position and every other position in
//! the same alternative that also names it; `name:value` (`Np(num:sg)`)
//! is a literal binding on that one category. `LHS -> A | B ;` is
//! sugar for two rules sharing `LHS`. A single bare symbol on the right
//! (`Np -> dog ;`) is a terminal iff it never appears as an LHS anywhere
//! in the grammar -- terminals are plain words, so a symbol used only as
//! a terminal may not carry a feature list.

use std::collections::BTreeSet;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::category::Category;
use crate::error::GrammarError;
use crate::rules::{Grammar, Rule};

lazy_static! {
  static ref TOKEN: Regex = Regex::new(
    r"(?x)
      //[^\n]*                 # comment
    | (?P<arrow>->)
    | (?P<pipe>\|)
    | (?P<semi>;)
    | (?P<lparen>\()
    | (?P<rparen>\))
    | (?P<comma>,)
    | (?P<colon>:)
    | (?P<ident>[A-Za-z_][A-Za-z0-9_']*)
    "
  )
  .unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
  Arrow,
  Pipe,
  Semi,
  LParen,
  RParen,
  Comma,
  Colon,
  Ident(String),
}

struct Lexer {
  tokens: Vec<(Tok, usize)>,
  pos: usize,
}

impl Lexer {
  fn new(input: &str) -> Result<Self, GrammarError> {
    let mut tokens = Vec::new();
    let mut cursor = 0;
    for m in TOKEN.find_iter(input) {
      if m.start() != cursor {
        let gap = input[cursor..m.start()].trim();
        if !gap.is_empty() {
          return Err(GrammarError::Syntax {
            offset: cursor,
            message: format!("unexpected input {gap:?}"),
          });
        }
      }
      cursor = m.end();
      let text = m.as_str();
      if text.starts_with("//") {
        continue;
      }
      let tok = match text {
        "->" => Tok::Arrow,
        "|" => Tok::Pipe,
        ";" => Tok::Semi,
        "(" => Tok::LParen,
        ")" => Tok::RParen,
        "," => Tok::Comma,
        ":" => Tok::Colon,
        ident => Tok::Ident(ident.to_string()),
      };
      tokens.push((tok, m.start()));
    }
    if cursor != input.len() {
      let gap = input[cursor..].trim();
      if !gap.is_empty() {
        return Err(GrammarError::Syntax {
          offset: cursor,
          message: format!("unexpected trailing input {gap:?}"),
        });
      }
    }
    Ok(Self { tokens, pos: 0 })
  }

  fn peek(&self) -> Option<&Tok> {
    self.tokens.get(self.pos).map(|(t, _)| t)
  }

  fn offset(&self) -> usize {
    self.tokens.get(self.pos).map(|(_, o)| *o).unwrap_or_else(|| self.tokens.last().map(|(_, o)| *o + 1).unwrap_or(0))
  }

  fn next(&mut self) -> Option<Tok> {
    let tok = self.tokens.get(self.pos).map(|(t, _)| t.clone());
    if tok.is_some() {
      self.pos += 1;
    }
    tok
  }

  fn expect(&mut self, want: &Tok, what: &str) -> Result<(), GrammarError> {
    match self.next() {
      Some(ref t) if t == want => Ok(()),
      _ => Err(GrammarError::Syntax {
        offset: self.offset(),
        message: format!("expected {what}"),
      }),
    }
  }

  fn expect_ident(&mut self, what: &str) -> Result<String, GrammarError> {
    match self.next() {
      Some(Tok::Ident(name)) => Ok(name),
      _ => Err(GrammarError::Syntax {
        offset: self.offset(),
        message: format!("expected {what}"),
      }),
    }
  }
}

/// One category occurrence as written: its bare name, any literal
/// `k:v` bindings, and any bare re-entrancy names.
struct Occurrence {
  name: String,
  literal: Vec<(String, String)>,
  reentrant: BTreeSet<String>,
}

fn parse_occurrence(lexer: &mut Lexer) -> Result<Occurrence, GrammarError> {
  let name = lexer.expect_ident("a category name")?;
  let mut literal = Vec::new();
  let mut reentrant = BTreeSet::new();
  if matches!(lexer.peek(), Some(Tok::LParen)) {
    lexer.next();
    loop {
      let key = lexer.expect_ident("a feature name")?;
      if matches!(lexer.peek(), Some(Tok::Colon)) {
        lexer.next();
        let value = lexer.expect_ident("a feature value")?;
        literal.push((key, value));
      } else {
        reentrant.insert(key);
      }
      match lexer.next() {
        Some(Tok::Comma) => continue,
        Some(Tok::RParen) => break,
        _ => {
          return Err(GrammarError::Syntax {
            offset: lexer.offset(),
            message: "expected ',' or ')' in feature list".to_string(),
          });
        }
      }
    }
  }
  Ok(Occurrence { name, literal, reentrant })
}

fn occurrence_to_category(occ: &Occurrence) -> Category {
  Category::with_bindings(occ.name.clone(), occ.literal.iter().cloned())
}

/// One `LHS -> production ;` alternative, fully parsed.
struct RawRule {
  lhs: Category,
  mother_keys: BTreeSet<String>,
  rhs: Vec<Category>,
  rhs_keys: Vec<BTreeSet<String>>,
}

fn parse_statement(lexer: &mut Lexer) -> Result<Vec<RawRule>, GrammarError> {
  let lhs_occ = parse_occurrence(lexer)?;
  lexer.expect(&Tok::Arrow, "'->'")?;

  let mut alternatives = Vec::new();
  loop {
    let mut rhs = Vec::new();
    let mut rhs_keys = Vec::new();
    loop {
      let occ = parse_occurrence(lexer)?;
      rhs_keys.push(occ.reentrant.clone());
      rhs.push(occurrence_to_category(&occ));
      if matches!(lexer.peek(), Some(Tok::Pipe) | Some(Tok::Semi)) {
        break;
      }
    }
    alternatives.push(RawRule {
      lhs: occurrence_to_category(&lhs_occ),
      mother_keys: lhs_occ.reentrant.clone(),
      rhs,
      rhs_keys,
    });
    match lexer.next() {
      Some(Tok::Pipe) => continue,
      Some(Tok::Semi) => break,
      _ => {
        return Err(GrammarError::Syntax {
          offset: lexer.offset(),
          message: "expected '|' or ';'".to_string(),
        });
      }
    }
  }
  Ok(alternatives)
}

/// Parses a full grammar/lexicon text into a `Grammar`.
pub fn parse(input: &str) -> Result<Grammar, GrammarError> {
  let mut lexer = Lexer::new(input)?;
  let mut raw_rules = Vec::new();
  while lexer.peek().is_some() {
    raw_rules.extend(parse_statement(&mut lexer)?);
  }
  if raw_rules.is_empty() {
    return Err(GrammarError::Empty);
  }

  let rules: Vec<Rule> = raw_rules
    .into_iter()
    .map(|raw| Rule::new(raw.lhs, raw.rhs, raw.mother_keys, raw.rhs_keys))
    .collect();
  let grammar = Grammar::new(rules);

  for rule in &grammar.rules {
    for daughter in &rule.rhs {
      let bound = daughter.bindings().next().is_some();
      if bound && !grammar.is_nonterminal(daughter.name()) {
        return Err(GrammarError::FeaturedTerminal {
          rule: format!("{} -> ...", rule.lhs),
          production: daughter.to_string(),
        });
      }
    }
  }

  Ok(grammar)
}

impl FromStr for Grammar {
  type Err = GrammarError;

  fn from_str(input: &str) -> Result<Self, Self::Err> {
    parse(input)
  }
}
