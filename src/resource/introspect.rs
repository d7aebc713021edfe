use super::types::{FieldDecl, Marker, Member, MethodDecl, TypeDecl};
use crate::naming::{is_qualified, simple_name};
use std::collections::HashMap;

/// Read access to declared types and their markers
///
/// The resolvers never touch a catalog directly; they go through this trait so
/// any host (a parsed catalog, a source scanner, a test fixture) can feed them.
/// Implementations must return members in declaration order.
pub trait ResourceIntrospector {
    /// Every declared type, in declaration order
    fn types(&self) -> &[TypeDecl];

    /// Type with the given fully qualified id
    fn type_named(&self, id: &str) -> Option<&TypeDecl>;

    /// Fields of a type; empty when the type is unknown
    fn fields(&self, type_id: &str) -> &[FieldDecl] {
        self.type_named(type_id)
            .map(|t| t.fields.as_slice())
            .unwrap_or_default()
    }

    /// Methods of a type; empty when the type is unknown
    fn methods(&self, type_id: &str) -> &[MethodDecl] {
        self.type_named(type_id)
            .map(|t| t.methods.as_slice())
            .unwrap_or_default()
    }

    /// Markers declared on a member
    fn markers_on<'a>(&'a self, member: Member<'a>) -> &'a [Marker] {
        member.markers()
    }

    /// Every declared type whose simple name equals `name`, in declaration order
    fn types_with_simple_name(&self, name: &str) -> Vec<&TypeDecl> {
        self.types()
            .iter()
            .filter(|t| simple_name(&t.id) == name)
            .collect()
    }

    /// Resolve a type reference: an exact id first, then a unique simple name
    /// when the reference is unqualified
    fn resolve_type(&self, reference: &str) -> Option<&TypeDecl> {
        if let Some(ty) = self.type_named(reference) {
            return Some(ty);
        }
        if is_qualified(reference) {
            return None;
        }
        let mut candidates = self.types_with_simple_name(reference);
        if candidates.len() == 1 {
            candidates.pop()
        } else {
            None
        }
    }
}

/// Catalog-backed [`ResourceIntrospector`]
#[derive(Debug, Clone, Default)]
pub struct DeclaredTypes {
    types: Vec<TypeDecl>,
    index: HashMap<String, usize>,
}

impl DeclaredTypes {
    /// Index the types; a later declaration with a duplicate id shadows nothing,
    /// the first one wins.
    pub fn new(types: Vec<TypeDecl>) -> Self {
        let mut index = HashMap::with_capacity(types.len());
        for (position, ty) in types.iter().enumerate() {
            index.entry(ty.id.clone()).or_insert(position);
        }
        Self { types, index }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl ResourceIntrospector for DeclaredTypes {
    fn types(&self) -> &[TypeDecl] {
        &self.types
    }

    fn type_named(&self, id: &str) -> Option<&TypeDecl> {
        self.index.get(id).and_then(|&i| self.types.get(i))
    }
}
