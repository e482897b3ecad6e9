use crate::math::Real;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A named material tag. Identity is by name; the only role a material
/// plays is selecting a [`ContactRule`] for a pair of touching bodies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Material {
    name: String,
}

impl Material {
    /// Creates a new material with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the material name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default")
    }
}

/// Friction and restitution coefficients applied when two bodies touch
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ContactRule {
    /// Coefficient of friction, 0-1
    pub friction: Real,

    /// Coefficient of restitution (bounciness), 0-1
    pub restitution: Real,
}

impl Default for ContactRule {
    fn default() -> Self {
        Self {
            friction: 0.3,
            restitution: 0.0,
        }
    }
}

/// Lookup table of pair-specific contact rules, keyed by unordered
/// material-name pair, with a default rule for unregistered pairs
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ContactTable {
    default_rule: ContactRule,
    rules: Vec<(String, String, ContactRule)>,
}

impl ContactTable {
    /// Creates a table with the given default rule and no pair rules
    pub fn new(default_rule: ContactRule) -> Self {
        Self {
            default_rule,
            rules: Vec::new(),
        }
    }

    /// Returns the default rule
    pub fn default_rule(&self) -> ContactRule {
        self.default_rule
    }

    /// Registers a rule for a material pair. The pair is unordered;
    /// registering (a, b) also covers (b, a). A later registration for
    /// the same pair replaces the earlier one.
    pub fn add_rule(&mut self, a: &Material, b: &Material, rule: ContactRule) {
        let (lo, hi) = Self::ordered(a.name(), b.name());
        if let Some(existing) = self
            .rules
            .iter_mut()
            .find(|(ra, rb, _)| ra == lo && rb == hi)
        {
            existing.2 = rule;
        } else {
            self.rules.push((lo.to_string(), hi.to_string(), rule));
        }
    }

    /// Looks up the rule for a material pair, falling back to the default
    pub fn lookup(&self, a: &Material, b: &Material) -> ContactRule {
        let (lo, hi) = Self::ordered(a.name(), b.name());
        self.rules
            .iter()
            .find(|(ra, rb, _)| ra == lo && rb == hi)
            .map(|(_, _, rule)| *rule)
            .unwrap_or(self.default_rule)
    }

    fn ordered<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}
