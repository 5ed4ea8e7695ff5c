//! Atomic-feature categories: an LHS/RHS symbol plus a finite map of
//! feature name -> atomic value bindings.

use std::collections::BTreeMap;
use std::fmt;

/// A syntactic category: a name (`S`, `Np`, `Vp`, ...) plus a set of
/// `feature: value` bindings. Two categories with the same name but
/// different bindings are different categories, not unification variants
/// of each other -- there is no unification here, only subsumption.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category {
  name: String,
  bindings: BTreeMap<String, String>,
}

impl Category {
  /// A bare category with no feature bindings, e.g. a terminal symbol.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      bindings: BTreeMap::new(),
    }
  }

  pub fn with_bindings<I, K, V>(name: impl Into<String>, bindings: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    Self {
      name: name.into(),
      bindings: bindings.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.bindings.get(key).map(String::as_str)
  }

  pub fn bindings(&self) -> impl Iterator<Item = (&str, &str)> {
    self.bindings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// Returns a new category with `key` bound to `value`, overwriting any
  /// existing binding for `key`.
  pub fn extend(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
    let mut bindings = self.bindings.clone();
    bindings.insert(key.into(), value.into());
    Self {
      name: self.name.clone(),
      bindings,
    }
  }

  /// Returns a new category with, for every `k` in `keys` that is bound in
  /// `source`, `k` bound to `source`'s value. Keys absent from `source`
  /// are left untouched.
  pub fn extendc<'a, I>(&self, keys: I, source: &Category) -> Self
  where
    I: IntoIterator<Item = &'a String>,
  {
    let mut out = self.clone();
    for k in keys {
      if let Some(v) = source.get(k) {
        out = out.extend(k.clone(), v.to_string());
      }
    }
    out
  }

  /// `self` is strictly less general ("more specific") than `other`: same
  /// name, not equal, and `self`'s bindings are a strict superset of
  /// `other`'s.
  pub fn less_general_than(&self, other: &Category) -> bool {
    self.name == other.name && self != other && self.refines(other)
  }

  /// `self`'s bindings are a (possibly non-strict) superset of `other`'s,
  /// under the same name. Used to build `less_general_than` and edge
  /// subsumption without duplicating the superset walk.
  fn refines(&self, other: &Category) -> bool {
    self.name == other.name
      && other
        .bindings
        .iter()
        .all(|(k, v)| self.bindings.get(k) == Some(v))
  }

  pub(crate) fn refines_or_equal(&self, other: &Category) -> bool {
    self.refines(other)
  }

  /// Two categories are compatible iff their names match and no feature
  /// name is bound to conflicting values in the two maps. Missing
  /// bindings on either side never conflict.
  pub fn compatible(&self, other: &Category) -> bool {
    if self.name != other.name {
      return false;
    }
    self
      .bindings
      .iter()
      .all(|(k, v)| other.bindings.get(k).is_none_or(|v2| v2 == v))
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name)?;
    if !self.bindings.is_empty() {
      write!(f, "(")?;
      for (i, (k, v)) in self.bindings.iter().enumerate() {
        if i > 0 {
          write!(f, ",")?;
        }
        write!(f, "{}:{}", k, v)?;
      }
      write!(f, ")")?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn equality_ignores_insertion_order() {
    let a = Category::with_bindings("N", [("num", "sg"), ("case", "nom")]);
    let b = Category::with_bindings("N", [("case", "nom"), ("num", "sg")]);
    assert_eq!(a, b);
  }

  #[test]
  fn less_general_requires_strict_superset() {
    let plain = Category::new("N");
    let sg = plain.extend("num", "sg");
    assert!(sg.less_general_than(&plain));
    assert!(!plain.less_general_than(&sg));
    assert!(!sg.less_general_than(&sg));
  }

  #[test]
  fn less_general_false_on_name_mismatch() {
    let n = Category::new("N").extend("num", "sg");
    let v = Category::new("V").extend("num", "sg");
    assert!(!n.less_general_than(&v));
  }

  #[test]
  fn compatible_ignores_unshared_keys() {
    let a = Category::new("N").extend("num", "sg");
    let b = Category::new("N").extend("case", "nom");
    assert!(a.compatible(&b));
  }

  #[test]
  fn compatible_rejects_conflicting_values() {
    let a = Category::new("N").extend("num", "sg");
    let b = Category::new("N").extend("num", "pl");
    assert!(!a.compatible(&b));
  }

  #[test]
  fn extend_overwrites_existing_binding() {
    let a = Category::new("N").extend("num", "sg").extend("num", "pl");
    assert_eq!(a.get("num"), Some("pl"));
  }

  #[test]
  fn extendc_copies_only_present_keys() {
    let target = Category::new("S");
    let source = Category::new("Np").extend("num", "pl");
    let keys = vec!["num".to_string(), "case".to_string()];
    let extended = target.extendc(&keys, &source);
    assert_eq!(extended.get("num"), Some("pl"));
    assert_eq!(extended.get("case"), None);
  }
}
