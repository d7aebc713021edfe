use super::introspect::ResourceIntrospector;
use super::metadata::{resolve_identifier, resolve_shape, Identifier};
use super::types::{find_marker, FieldDecl, Marker, MarkerValues, Member, TypeDecl};
use crate::error::ConfigurationError;
use crate::linter::LintIssue;
use crate::naming::{capitalize, normalize_entity_name, simple_name, singularize};
use crate::settings::Settings;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Field-level marker declaring a relation explicitly
pub const RELATION_MARKER: &str = "Relation";
/// Method-level marker binding a method to one or more accessor slots
pub const RELATION_ACCESSOR_MARKER: &str = "RelationAccessor";
/// Persistence-mapping markers that imply a relation
pub const PERSISTENCE_MARKERS: [&str; 3] = ["OneToMany", "ManyToMany", "ManyToOne"];

/// Generic types whose first argument is the element of a MULTIPLE relation
const COLLECTION_TYPES: [&str; 10] = [
    "List",
    "Set",
    "Collection",
    "Iterable",
    "Vec",
    "HashSet",
    "BTreeSet",
    "VecDeque",
    "LinkedList",
    "SortedSet",
];

/// Generic types transparently unwrapped to their argument
const OPTIONAL_TYPES: [&str; 2] = ["Option", "Optional"];

#[allow(clippy::expect_used)]
static GENERIC_TYPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_][\w:.]*)\s*<\s*(.+)\s*>\s*$")
        .expect("generic type regex should be valid")
});

/// Relation cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Cardinality {
    Single,
    Multiple,
}

impl Cardinality {
    /// Parse the `type` value of a `Relation` marker; `REFLECT` (infer) yields `Ok(None)`
    fn parse_override(values: &MarkerValues, raw: &str) -> Result<Option<Self>, ConfigurationError> {
        match raw.rsplit('.').next().unwrap_or(raw).to_ascii_uppercase().as_str() {
            "SINGLE" => Ok(Some(Cardinality::Single)),
            "MULTIPLE" => Ok(Some(Cardinality::Multiple)),
            "REFLECT" => Ok(None),
            _ => Err(values.invalid("type", raw)),
        }
    }
}

/// Accessor slot a method can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessorKind {
    Get,
    Set,
    Add,
    Remove,
}

impl AccessorKind {
    pub const ALL: [AccessorKind; 4] = [
        AccessorKind::Get,
        AccessorKind::Set,
        AccessorKind::Add,
        AccessorKind::Remove,
    ];

    /// Marker key holding an explicit override for this slot
    pub fn key(&self) -> &'static str {
        match self {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
            AccessorKind::Add => "add",
            AccessorKind::Remove => "remove",
        }
    }

    /// Parse `ADD`, `add` or `AccessorType.ADD`
    pub fn parse(raw: &str) -> Option<Self> {
        let name = raw.rsplit('.').next().unwrap_or(raw).trim();
        AccessorKind::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(name))
    }
}

/// Method names used to read and modify a relation on the owning entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessors {
    pub get: String,
    pub set: String,
    pub add: String,
    pub remove: String,
}

impl Accessors {
    /// `get<Name>`, `set<Name>`, `add<Singular>`, `remove<Singular>`
    pub fn conventional(relation_name: &str) -> Self {
        let plural = capitalize(relation_name);
        let singular = capitalize(&singularize(relation_name));
        Self {
            get: format!("get{plural}"),
            set: format!("set{plural}"),
            add: format!("add{singular}"),
            remove: format!("remove{singular}"),
        }
    }

    pub fn slot(&self, kind: AccessorKind) -> &str {
        match kind {
            AccessorKind::Get => &self.get,
            AccessorKind::Set => &self.set,
            AccessorKind::Add => &self.add,
            AccessorKind::Remove => &self.remove,
        }
    }

    fn slot_mut(&mut self, kind: AccessorKind) -> &mut String {
        match kind {
            AccessorKind::Get => &mut self.get,
            AccessorKind::Set => &mut self.set,
            AccessorKind::Add => &mut self.add,
            AccessorKind::Remove => &mut self.remove,
        }
    }

    /// Accessors the synthesized operations call for a cardinality
    pub fn required_for(&self, cardinality: Cardinality) -> Vec<&str> {
        match cardinality {
            Cardinality::Single => vec![self.get.as_str(), self.set.as_str()],
            Cardinality::Multiple => vec![
                self.get.as_str(),
                self.add.as_str(),
                self.remove.as_str(),
            ],
        }
    }
}

/// One discovered relation of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationDescriptor {
    pub relation_name: String,
    pub cardinality: Cardinality,
    pub related_type_id: String,
    /// Related DTO, or `related_type_id` when the relation uses none
    pub related_response_shape: String,
    pub related_id_type_id: String,
    pub related_id_accessor_name: String,
    pub accessors: Accessors,
}

impl RelationDescriptor {
    pub fn using_dto(&self) -> bool {
        self.related_response_shape != self.related_type_id
    }

    /// Capitalized singular relation name: `products` → `Product`
    pub fn singular_name(&self) -> String {
        capitalize(&singularize(&self.relation_name))
    }
}

/// Relations of one entity plus the warnings raised while resolving them
#[derive(Debug, Clone, Default)]
pub struct RelationScan {
    pub relations: Vec<RelationDescriptor>,
    pub issues: Vec<LintIssue>,
}

/// Cardinality and element type implied by a type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeShape {
    pub cardinality: Cardinality,
    pub element: String,
}

/// Split generic arguments on top-level commas
fn generic_arguments(args: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, ch) in args.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(args[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    out.push(args[start..].trim());
    out
}

/// Infer cardinality from a type expression
///
/// `List<T>`, `Vec<T>`, `Set<T>` and the other known collections (and `T[]`)
/// are MULTIPLE with element `T`. `Option<T>` is unwrapped. Anything else is
/// SINGLE with the expression itself as the element.
pub fn parse_type_expression(expr: &str) -> TypeShape {
    let expr = expr.trim();
    if let Some(element) = expr.strip_suffix("[]") {
        return TypeShape {
            cardinality: Cardinality::Multiple,
            element: element.trim().to_string(),
        };
    }
    if let Some(captures) = GENERIC_TYPE_REGEX.captures(expr) {
        let outer = simple_name(&captures[1]).to_string();
        let args = generic_arguments(&captures[2]);
        if let Some(first) = args.first() {
            if COLLECTION_TYPES.contains(&outer.as_str()) {
                return TypeShape {
                    cardinality: Cardinality::Multiple,
                    element: parse_type_expression(first).element,
                };
            }
            if OPTIONAL_TYPES.contains(&outer.as_str()) {
                return parse_type_expression(first);
            }
        }
    }
    TypeShape {
        cardinality: Cardinality::Single,
        element: expr.to_string(),
    }
}

/// Discover a DTO for `related_type_id` by naming convention
///
/// `shop.ProductEntity` → any declared type named `ProductDto` (under
/// `dto_namespace` when set). Exactly one match is required; otherwise the
/// related type itself is returned.
pub fn discover_dto(
    introspector: &dyn ResourceIntrospector,
    related_type_id: &str,
    settings: &Settings,
) -> String {
    let name = format!(
        "{}{}",
        normalize_entity_name(simple_name(related_type_id), &settings.entity_suffixes),
        settings.dto_suffix
    );
    let candidates: Vec<_> = introspector
        .types_with_simple_name(&name)
        .into_iter()
        .filter(|t| match &settings.dto_namespace {
            Some(namespace) => t.id.starts_with(namespace.as_str()),
            None => true,
        })
        .collect();
    match candidates.as_slice() {
        [only] => only.id.clone(),
        _ => related_type_id.to_string(),
    }
}

/// Where a relation was declared
enum RelationSource<'a> {
    Explicit(&'a Marker),
    Persistence(&'a Marker),
}

impl<'a> RelationSource<'a> {
    /// Explicit markers win over persistence markers on the same member
    fn detect(markers: &'a [Marker]) -> Option<Self> {
        if let Some(marker) = find_marker(markers, RELATION_MARKER) {
            return Some(RelationSource::Explicit(marker));
        }
        markers
            .iter()
            .find(|m| PERSISTENCE_MARKERS.contains(&m.name.as_str()))
            .map(RelationSource::Persistence)
    }
}

/// Inputs shared by the accessor resolvers
struct AccessorContext<'a> {
    introspector: &'a dyn ResourceIntrospector,
    relation_name: &'a str,
    explicit: Option<&'a MarkerValues>,
    related: Option<&'a TypeDecl>,
    owner: &'a TypeDecl,
}

type AccessorResolver = fn(&AccessorContext<'_>, AccessorKind) -> Option<String>;

/// Resolvers in priority order; the first hit fills the slot, otherwise the
/// naming convention stands.
const ACCESSOR_RESOLVERS: [AccessorResolver; 2] = [explicit_accessor, marked_accessor];

fn explicit_accessor(ctx: &AccessorContext<'_>, kind: AccessorKind) -> Option<String> {
    ctx.explicit
        .and_then(|values| values.text(kind.key()))
        .map(str::to_string)
}

/// A `RelationAccessor` method naming this relation and listing `kind`,
/// searched on the related type first, then on the owner
fn marked_accessor(ctx: &AccessorContext<'_>, kind: AccessorKind) -> Option<String> {
    let mut owners = Vec::with_capacity(2);
    if let Some(related) = ctx.related {
        owners.push(related);
    }
    if ctx.related.map(|r| r.id != ctx.owner.id).unwrap_or(true) {
        owners.push(ctx.owner);
    }
    owners.into_iter().find_map(|ty| {
        ctx.introspector.methods(&ty.id).iter().find_map(|method| {
            let member = Member::Method(ty, method);
            let marker = find_marker(ctx.introspector.markers_on(member), RELATION_ACCESSOR_MARKER)?;
            let values = marker.values(member.location());
            let names_relation = values.text("name") == Some(ctx.relation_name);
            let lists_kind = values
                .list("type")
                .into_iter()
                .filter_map(AccessorKind::parse)
                .any(|k| k == kind);
            (names_relation && lists_kind).then(|| method.name.clone())
        })
    })
}

fn resolve_accessors(ctx: &AccessorContext<'_>) -> Accessors {
    let mut accessors = Accessors::conventional(ctx.relation_name);
    for kind in AccessorKind::ALL {
        if let Some(name) = ACCESSOR_RESOLVERS.iter().find_map(|resolve| resolve(ctx, kind)) {
            *accessors.slot_mut(kind) = name;
        }
    }
    accessors
}

/// Build one descriptor; resolution problems become warnings, never errors
fn build_descriptor(
    introspector: &dyn ResourceIntrospector,
    owner: &TypeDecl,
    field: &FieldDecl,
    source: &RelationSource<'_>,
    location: &str,
    settings: &Settings,
    issues: &mut Vec<LintIssue>,
) -> RelationDescriptor {
    let (marker, explicit) = match source {
        RelationSource::Explicit(marker) => (*marker, true),
        RelationSource::Persistence(marker) => (*marker, false),
    };
    let values = marker.values(location);
    let explicit_values = explicit.then_some(&values);

    let relation_name = values
        .text("name")
        .filter(|_| explicit)
        .unwrap_or(&field.name)
        .to_string();

    let shape = parse_type_expression(&field.ty);
    let cardinality = match explicit_values.and_then(|v| v.text("type")) {
        Some(raw) => match Cardinality::parse_override(&values, raw) {
            Ok(Some(cardinality)) => cardinality,
            Ok(None) => shape.cardinality,
            Err(invalid) => {
                issues.push(
                    LintIssue::warning(
                        location,
                        "invalid_relation_type",
                        format!("{invalid}; inferring the cardinality from the field type"),
                    )
                    .with_suggestion("Use SINGLE, MULTIPLE or REFLECT"),
                );
                shape.cardinality
            }
        },
        None => shape.cardinality,
    };

    let related_reference = if explicit {
        values.text("entity")
    } else {
        values.text("targetEntity")
    }
    .unwrap_or(&shape.element)
    .to_string();
    let related = introspector.resolve_type(&related_reference);
    let related_type_id = related
        .map(|t| t.id.clone())
        .unwrap_or_else(|| related_reference.clone());

    let identifier = match related {
        Some(ty) => resolve_identifier(introspector, ty).unwrap_or_else(|| {
            issues.push(
                LintIssue::warning(
                    location,
                    "missing_related_identifier",
                    format!("'{related_type_id}' declares no Id field or IdAccessor method, using defaults"),
                )
                .with_suggestion("Mark the identifier field with an Id marker"),
            );
            Identifier::default()
        }),
        None => {
            issues.push(LintIssue::warning(
                location,
                "unresolved_related_type",
                format!("Related type '{related_type_id}' is not declared, using default identifier"),
            ));
            Identifier::default()
        }
    };

    let explicit_dto = explicit_values.and_then(|v| v.text("dto"));
    let related_response_shape = match explicit_dto {
        Some(reference) => match resolve_shape(introspector, &owner.id, reference) {
            Ok(shape) => shape,
            Err(err) => {
                issues.push(LintIssue::warning(location, "ambiguous_relation_dto", err.to_string()));
                discover_dto(introspector, &related_type_id, settings)
            }
        },
        None => discover_dto(introspector, &related_type_id, settings),
    };

    let accessors = resolve_accessors(&AccessorContext {
        introspector,
        relation_name: &relation_name,
        explicit: explicit_values,
        related,
        owner,
    });

    RelationDescriptor {
        relation_name,
        cardinality,
        related_type_id,
        related_response_shape,
        related_id_type_id: identifier.type_id,
        related_id_accessor_name: identifier.accessor,
        accessors,
    }
}

/// Scan the fields of `entity` and build one descriptor per relation
///
/// Fields are visited in declaration order. A field qualifies when it carries a
/// `Relation` marker or a persistence-mapping marker. Two fields resolving to
/// the same relation name is a configuration error.
pub fn build_relations(
    introspector: &dyn ResourceIntrospector,
    entity: &TypeDecl,
    settings: &Settings,
) -> Result<RelationScan, ConfigurationError> {
    let mut scan = RelationScan::default();

    for field in introspector.fields(&entity.id) {
        let member = Member::Field(entity, field);
        let Some(source) = RelationSource::detect(introspector.markers_on(member)) else {
            continue;
        };
        let location = member.location();
        let descriptor = build_descriptor(
            introspector,
            entity,
            field,
            &source,
            &location,
            settings,
            &mut scan.issues,
        );

        if scan
            .relations
            .iter()
            .any(|r| r.relation_name == descriptor.relation_name)
        {
            return Err(ConfigurationError::DuplicateRelation {
                resource: entity.id.clone(),
                relation: descriptor.relation_name,
            });
        }

        tracing::debug!(
            entity = %entity.id,
            relation = %descriptor.relation_name,
            cardinality = ?descriptor.cardinality,
            related = %descriptor.related_type_id,
            "relation discovered"
        );
        scan.relations.push(descriptor);
    }

    for issue in &scan.issues {
        tracing::warn!(location = %issue.location, kind = %issue.kind, "{}", issue.message);
    }
    Ok(scan)
}
