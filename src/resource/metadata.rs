use super::introspect::ResourceIntrospector;
use super::types::{find_marker, MarkerValues, Member, TypeDecl};
use crate::error::ConfigurationError;
use crate::naming::{
    capitalize, is_qualified, normalize_entity_name, pluralize, qualify, simple_name, substitute,
    to_snake_case,
};
use crate::settings::{normalize_wrapper, CollaboratorRefs, Settings};
use serde::Serialize;

/// Type-level marker declaring a resource
pub const RESOURCE_MARKER: &str = "CrudResource";
/// Field-level marker naming the identifier
pub const ID_MARKER: &str = "Id";
/// Method-level marker naming the identifier accessor
pub const ID_ACCESSOR_MARKER: &str = "IdAccessor";

/// Identifier type used when nothing better is known
pub const DEFAULT_ID_TYPE: &str = "i32";
pub const DEFAULT_ID_NAME: &str = "id";
pub const DEFAULT_ID_ACCESSOR: &str = "getId";

/// How to identify instances of a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub type_id: String,
    pub name: String,
    pub accessor: String,
}

impl Default for Identifier {
    fn default() -> Self {
        Self {
            type_id: DEFAULT_ID_TYPE.to_string(),
            name: DEFAULT_ID_NAME.to_string(),
            accessor: DEFAULT_ID_ACCESSOR.to_string(),
        }
    }
}

/// Resolve the identifier of `ty` from its `Id` field and `IdAccessor` methods.
///
/// Returns `None` when the type carries neither marker; callers fall back to
/// [`Identifier::default`].
pub fn resolve_identifier(
    introspector: &dyn ResourceIntrospector,
    ty: &TypeDecl,
) -> Option<Identifier> {
    let mut identifier = Identifier::default();
    let mut found = false;

    for field in introspector.fields(&ty.id) {
        let markers = introspector.markers_on(Member::Field(ty, field));
        if find_marker(markers, ID_MARKER).is_some() {
            identifier.type_id = field.ty.clone();
            if !field.name.eq_ignore_ascii_case(DEFAULT_ID_NAME) {
                identifier.accessor = format!("get{}", capitalize(&field.name));
                identifier.name = field.name.clone();
            }
            found = true;
            break;
        }
    }

    for method in introspector.methods(&ty.id) {
        let member = Member::Method(ty, method);
        if let Some(marker) = find_marker(introspector.markers_on(member), ID_ACCESSOR_MARKER) {
            let values = marker.values(member.location());
            let names = values.text("name").unwrap_or(DEFAULT_ID_NAME);
            if names == identifier.name {
                identifier.accessor = method.name.clone();
                found = true;
                break;
            }
        }
    }

    found.then_some(identifier)
}

/// Request, single-response and list-response shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DtoShapes {
    pub request: String,
    pub single: String,
    pub list: String,
}

impl DtoShapes {
    /// Every shape is the resource type itself
    pub fn plain(resource_type_id: &str) -> Self {
        Self {
            request: resource_type_id.to_string(),
            single: resource_type_id.to_string(),
            list: resource_type_id.to_string(),
        }
    }
}

/// Primitive fields of a resource configuration, everything but relations,
/// routes and security
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMetadata {
    pub declaring_type_id: String,
    pub controller_name: String,
    pub resource_type_id: String,
    pub id: Identifier,
    pub route_base_path: String,
    pub shapes: DtoShapes,
    pub using_dto: bool,
    pub response_wrapper_type: Option<String>,
    pub collaborators: CollaboratorRefs,
    pub with_relations: bool,
}

/// Resolve a shape reference written in a marker
///
/// Qualified ids are taken as written. A simple name is resolved against the
/// declared types: one match yields its id, none keeps the name as an
/// external type, several is an error.
pub fn resolve_shape(
    introspector: &dyn ResourceIntrospector,
    resource: &str,
    reference: &str,
) -> Result<String, ConfigurationError> {
    if is_qualified(reference) || introspector.type_named(reference).is_some() {
        return Ok(reference.to_string());
    }
    let candidates = introspector.types_with_simple_name(reference);
    match candidates.as_slice() {
        [] => Ok(reference.to_string()),
        [only] => Ok(only.id.clone()),
        many => Err(ConfigurationError::AmbiguousDto {
            resource: resource.to_string(),
            name: reference.to_string(),
            candidates: many.iter().map(|t| t.id.clone()).collect(),
        }),
    }
}

/// Resolve the three DTO shapes
///
/// - single: `dtoConfig/value` → `dto` → resource type
/// - list: `dtoConfig/list` → `dtoConfig/value` → `dto` → single
/// - request: `dtoConfig/request` → `dtoConfig/value` → `dto` → single
pub fn resolve_dto_shapes(
    introspector: &dyn ResourceIntrospector,
    values: &MarkerValues,
    resource_type_id: &str,
) -> Result<DtoShapes, ConfigurationError> {
    let resource = values.location();
    let lookup = |keys: &[&str]| -> Result<Option<String>, ConfigurationError> {
        values
            .first_of(keys)
            .map(|reference| resolve_shape(introspector, resource, reference))
            .transpose()
    };

    let single = lookup(&["dtoConfig/value", "dto"])?.unwrap_or_else(|| resource_type_id.to_string());
    let list = lookup(&["dtoConfig/list", "dtoConfig/value", "dto"])?.unwrap_or_else(|| single.clone());
    let request =
        lookup(&["dtoConfig/request", "dtoConfig/value", "dto"])?.unwrap_or_else(|| single.clone());

    Ok(DtoShapes {
        request,
        single,
        list,
    })
}

/// Default base path for an entity: `shop.OrderLineModel` → `/order-lines`
pub fn default_base_path(resource_type_id: &str, suffixes: &[String]) -> String {
    let name = normalize_entity_name(simple_name(resource_type_id), suffixes);
    format!("/{}", pluralize(&to_snake_case(&name)).replace('_', "-"))
}

/// Leading slash, no trailing slash
pub fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Controller name from `className` or the settings pattern
pub fn controller_name(declaring_type_id: &str, values: &MarkerValues, settings: &Settings) -> String {
    let name = match values.text("className") {
        Some(explicit) => explicit.to_string(),
        None => {
            let simple = simple_name(declaring_type_id);
            let normalized = simple.replace("Controller", "");
            substitute(
                &settings.class_name_pattern,
                &[
                    ("PREFIX", &settings.class_name_prefix),
                    ("NAME_NORMALIZED", &normalized),
                    ("NAME", simple),
                ],
            )
        }
    };
    qualify(&name, declaring_type_id)
}

fn collaborators(values: &MarkerValues, settings: &Settings) -> CollaboratorRefs {
    let mut refs = settings.collaborators.clone();
    let overrides = [
        ("dataAccessor", &mut refs.data_accessor),
        ("dataMapper", &mut refs.data_mapper),
        ("dataMerger", &mut refs.data_merger),
        ("searchFilterBuilder", &mut refs.search_filter_builder),
        ("referenceResolver", &mut refs.reference_resolver),
    ];
    for (key, slot) in overrides {
        if let Some(value) = values.text(key) {
            *slot = value.to_string();
        }
    }
    refs
}

/// Resolve the primitive fields of a resource from its marker values
///
/// Fails when `entity` is unset, names an undeclared type, or a DTO reference
/// is ambiguous.
pub fn resolve_metadata(
    introspector: &dyn ResourceIntrospector,
    declaring: &TypeDecl,
    values: &MarkerValues,
    settings: &Settings,
) -> Result<ResourceMetadata, ConfigurationError> {
    let entity = values
        .text("entity")
        .ok_or_else(|| ConfigurationError::MissingEntity {
            resource: declaring.id.clone(),
        })?;
    let entity_decl =
        introspector
            .resolve_type(entity)
            .ok_or_else(|| ConfigurationError::UnknownType {
                resource: declaring.id.clone(),
                type_id: entity.to_string(),
            })?;
    let resource_type_id = entity_decl.id.clone();

    let mut id = resolve_identifier(introspector, entity_decl).unwrap_or_default();
    if let Some(explicit) = values.text("id") {
        id.type_id = explicit.to_string();
    }

    let route_base_path = match values.first_of(&["value", "path"]) {
        Some(path) => normalize_base_path(path),
        None => default_base_path(&resource_type_id, &settings.entity_suffixes),
    };

    let shapes = resolve_dto_shapes(introspector, values, &resource_type_id)?;
    let using_dto = [&shapes.single, &shapes.list, &shapes.request]
        .iter()
        .any(|shape| **shape != resource_type_id);

    let response_wrapper_type = match values.text("wrapper") {
        Some(explicit) => normalize_wrapper(Some(explicit)),
        None => settings.data_wrapper.clone(),
    };

    Ok(ResourceMetadata {
        declaring_type_id: declaring.id.clone(),
        controller_name: controller_name(&declaring.id, values, settings),
        resource_type_id,
        id,
        route_base_path,
        shapes,
        using_dto,
        response_wrapper_type,
        collaborators: collaborators(values, settings),
        with_relations: values.flag("withRelations", true)?,
    })
}
