//! # Security Policy Resolver
//!
//! Derives role names and security expressions for synthesized operations.
//!
//! A [`SecurityPolicy`] is a role pattern plus an inclusivity rule:
//!
//! - `role_pattern` is a template with the tokens `{METHOD}`, `{ENTITY}` and `{NAME}`
//!   (default [`DEFAULT_ROLE_PATTERN`]). The substituted result is upper-cased.
//! - `inclusive_relations = true` makes every relation operation require the
//!   relation's role **and** the base resource's role; `false` requires only the
//!   relation's role.
//!
//! ```
//! use brrtcrud::security::{AccessKind, SecurityPolicy};
//!
//! let policy = SecurityPolicy::default();
//! assert_eq!(policy.role("READ", "Order", "Order"), "ROLE_READ_ORDER");
//!
//! let expr = policy.relation_expression("shop.OrderModel", "shop.ProductEntity", AccessKind::Update, AccessKind::Update);
//! assert_eq!(expr.to_string(), "hasRole('ROLE_UPDATE_PRODUCT') and hasRole('ROLE_UPDATE_ORDER')");
//! ```

use crate::naming::{normalize_entity_name, simple_name, substitute, DEFAULT_ENTITY_SUFFIXES};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role pattern used when none is configured.
pub const DEFAULT_ROLE_PATTERN: &str = "ROLE_{METHOD}_{ENTITY}";

/// Access kind an operation requires, substituted for `{METHOD}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessKind {
    Create,
    Read,
    Update,
    Delete,
}

impl AccessKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessKind::Create => "CREATE",
            AccessKind::Read => "READ",
            AccessKind::Update => "UPDATE",
            AccessKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_entity_suffixes() -> Vec<String> {
    DEFAULT_ENTITY_SUFFIXES.iter().map(|s| s.to_string()).collect()
}

fn default_inclusive() -> bool {
    true
}

fn default_pattern() -> String {
    DEFAULT_ROLE_PATTERN.to_string()
}

/// Role naming convention and inclusivity rule for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityPolicy {
    /// Template with `{METHOD}`, `{ENTITY}` and `{NAME}` tokens
    #[serde(default = "default_pattern")]
    pub role_pattern: String,
    /// Conjoin the base resource role with every relation role
    #[serde(default = "default_inclusive")]
    pub inclusive_relations: bool,
    /// Suffixes stripped from entity names before `{ENTITY}` substitution
    #[serde(skip, default = "default_entity_suffixes")]
    pub entity_suffixes: Vec<String>,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ROLE_PATTERN, true)
    }
}

impl SecurityPolicy {
    pub fn new(role_pattern: impl Into<String>, inclusive_relations: bool) -> Self {
        Self {
            role_pattern: role_pattern.into(),
            inclusive_relations,
            entity_suffixes: default_entity_suffixes(),
        }
    }

    /// Replace the suffix list used by `{ENTITY}` normalization.
    pub fn with_entity_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.entity_suffixes = suffixes;
        self
    }

    /// Substitute the pattern tokens and upper-case the result.
    pub fn role(&self, method: &str, entity: &str, name: &str) -> String {
        let entity = normalize_entity_name(entity, &self.entity_suffixes);
        substitute(
            &self.role_pattern,
            &[("METHOD", method), ("ENTITY", &entity), ("NAME", name)],
        )
        .to_uppercase()
    }

    /// Expression for a plain resource operation.
    pub fn expression(&self, entity_type: &str, access: AccessKind) -> SecurityExpression {
        let entity = simple_name(entity_type);
        SecurityExpression {
            required_roles: vec![self.role(access.as_str(), entity, entity)],
        }
    }

    /// Expression for a relation operation.
    ///
    /// The relation role comes first; the base role is appended only when
    /// `inclusive_relations` is set.
    pub fn relation_expression(
        &self,
        entity_type: &str,
        related_type: &str,
        access: AccessKind,
        base_access: AccessKind,
    ) -> SecurityExpression {
        let related = simple_name(related_type);
        let mut required_roles = vec![self.role(access.as_str(), related, related)];
        if self.inclusive_relations {
            let entity = simple_name(entity_type);
            required_roles.push(self.role(base_access.as_str(), entity, entity));
        }
        SecurityExpression { required_roles }
    }
}

/// Conjunction of role requirements attached to an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityExpression {
    pub required_roles: Vec<String>,
}

impl SecurityExpression {
    /// Number of role checks in the conjunction.
    pub fn len(&self) -> usize {
        self.required_roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.required_roles.is_empty()
    }
}

impl fmt::Display for SecurityExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, role) in self.required_roles.iter().enumerate() {
            if index > 0 {
                f.write_str(" and ")?;
            }
            write!(f, "hasRole('{role}')")?;
        }
        Ok(())
    }
}
