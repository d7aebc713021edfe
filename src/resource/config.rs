use super::introspect::ResourceIntrospector;
use super::metadata::{resolve_metadata, DEFAULT_ID_ACCESSOR, DEFAULT_ID_TYPE, RESOURCE_MARKER};
use super::relations::{build_relations, RelationDescriptor};
use super::routes::ExistingRoutes;
use super::types::{Member, MarkerValues, TypeDecl};
use crate::error::ConfigurationError;
use crate::linter::LintIssue;
use crate::naming::{qualify, simple_name};
use crate::security::{SecurityPolicy, DEFAULT_ROLE_PATTERN};
use crate::settings::{CollaboratorRefs, Settings};
use serde::Serialize;

/// Type-level marker attaching a security policy to a resource
pub const SECURITY_MARKER: &str = "CrudSecurity";

/// Everything the synthesizers need to know about one resource
///
/// Built once by [`assemble`] and only ever borrowed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceConfiguration {
    /// Fully qualified name of the synthesized controller
    pub controller_name: String,
    pub resource_type_id: String,
    pub id_type_id: String,
    pub id_accessor_name: String,
    /// Mount point of every operation, leading slash, no trailing slash
    pub route_base_path: String,
    pub request_shape: String,
    pub single_response_shape: String,
    pub list_response_shape: String,
    /// Any of the three shapes differs from the resource type
    pub using_dto: bool,
    /// Enclosing response type; `None` responds with bare shapes
    pub response_wrapper_type: Option<String>,
    pub collaborators: CollaboratorRefs,
    pub existing_routes: ExistingRoutes,
    /// Unique by name, in declaration order
    pub relations: Vec<RelationDescriptor>,
    pub security_policy: Option<SecurityPolicy>,
    /// Default page size for search
    pub page_size: u32,
}

impl ResourceConfiguration {
    /// Configuration with every optional part at its default: no DTO, no
    /// wrapper, no relations, no security, no existing routes.
    pub fn new(resource_type_id: impl Into<String>, route_base_path: impl Into<String>) -> Self {
        let resource_type_id = resource_type_id.into();
        Self {
            controller_name: qualify(
                &format!("Generated{}Controller", simple_name(&resource_type_id)),
                &resource_type_id,
            ),
            id_type_id: DEFAULT_ID_TYPE.to_string(),
            id_accessor_name: DEFAULT_ID_ACCESSOR.to_string(),
            route_base_path: route_base_path.into(),
            request_shape: resource_type_id.clone(),
            single_response_shape: resource_type_id.clone(),
            list_response_shape: resource_type_id.clone(),
            resource_type_id,
            using_dto: false,
            response_wrapper_type: None,
            collaborators: CollaboratorRefs::default(),
            existing_routes: ExistingRoutes::new(),
            relations: Vec::new(),
            security_policy: None,
            page_size: 20,
        }
    }

    pub fn relation(&self, name: &str) -> Option<&RelationDescriptor> {
        self.relations.iter().find(|r| r.relation_name == name)
    }

    /// Inbound payloads need mapping to the resource type
    pub fn maps_request(&self) -> bool {
        self.request_shape != self.resource_type_id
    }

    /// Single responses need mapping from the resource type
    pub fn maps_single(&self) -> bool {
        self.single_response_shape != self.resource_type_id
    }

    /// List and page items need mapping from the resource type
    pub fn maps_list(&self) -> bool {
        self.list_response_shape != self.resource_type_id
    }

    pub fn is_wrapped(&self) -> bool {
        self.response_wrapper_type.is_some()
    }

    /// `{base}/{id}`
    pub fn item_path(&self) -> String {
        format!("{}/{{id}}", self.route_base_path)
    }

    /// `{base}/search`
    pub fn search_path(&self) -> String {
        format!("{}/search", self.route_base_path)
    }

    /// `{base}/{id}/{relation}`
    pub fn relation_path(&self, relation: &RelationDescriptor) -> String {
        format!("{}/{}", self.item_path(), relation.relation_name)
    }

    /// `{base}/{id}/{relation}/{relationId}`
    pub fn relation_item_path(&self, relation: &RelationDescriptor) -> String {
        format!("{}/{{relationId}}", self.relation_path(relation))
    }
}

/// One `CrudResource` marker and the type declaring it
#[derive(Debug, Clone)]
pub struct ResourceDeclaration<'a> {
    pub declaring: &'a TypeDecl,
    pub values: MarkerValues,
}

impl ResourceDeclaration<'_> {
    /// Declaring type plus entity, for log lines and reports
    pub fn label(&self) -> String {
        match self.values.text("entity") {
            Some(entity) => format!("{} ({entity})", self.declaring.id),
            None => self.declaring.id.clone(),
        }
    }
}

/// Every resource declared in the catalog, in declaration order
///
/// The marker is repeatable: a type carrying two `CrudResource` markers
/// declares two resources.
pub fn discover_resources(introspector: &dyn ResourceIntrospector) -> Vec<ResourceDeclaration<'_>> {
    let mut declarations = Vec::new();
    for ty in introspector.types() {
        let member = Member::Type(ty);
        for marker in introspector.markers_on(member) {
            if marker.name == RESOURCE_MARKER {
                declarations.push(ResourceDeclaration {
                    declaring: ty,
                    values: marker.values(member.location()),
                });
            }
        }
    }
    declarations
}

/// An assembled configuration plus the warnings raised on the way
#[derive(Debug, Clone)]
pub struct AssembledResource {
    pub configuration: ResourceConfiguration,
    pub issues: Vec<LintIssue>,
}

/// Security policy for a resource
///
/// A `CrudSecurity` marker on the declaring type applies when its `className`
/// is absent or names the controller; otherwise the settings default applies.
fn resolve_security(
    declaring: &TypeDecl,
    markers: &[super::types::Marker],
    controller_name: &str,
    settings: &Settings,
) -> Result<Option<SecurityPolicy>, ConfigurationError> {
    for marker in markers.iter().filter(|m| m.name == SECURITY_MARKER) {
        let values = marker.values(Member::Type(declaring).location());
        let applies = match values.text("className") {
            None => true,
            Some(class_name) => qualify(class_name, &declaring.id) == controller_name,
        };
        if applies {
            let policy = SecurityPolicy::new(
                values.text("pattern").unwrap_or(DEFAULT_ROLE_PATTERN),
                values.flag("inclusive", true)?,
            );
            return Ok(Some(settings.policy(policy)));
        }
    }
    Ok(settings.security.clone().map(|p| settings.policy(p)))
}

/// Assemble the configuration of one declared resource
///
/// Metadata, existing routes, relations and security are resolved in that
/// order. Any [`ConfigurationError`] aborts this resource only; relation
/// problems are downgraded to warnings in [`AssembledResource::issues`].
pub fn assemble(
    introspector: &dyn ResourceIntrospector,
    declaration: &ResourceDeclaration<'_>,
    settings: &Settings,
) -> Result<AssembledResource, ConfigurationError> {
    let declaring = declaration.declaring;
    let metadata = resolve_metadata(introspector, declaring, &declaration.values, settings)?;
    let existing_routes = ExistingRoutes::scrape(introspector, declaring)?;

    let scan = if metadata.with_relations {
        match introspector.type_named(&metadata.resource_type_id) {
            Some(entity) => build_relations(introspector, entity, settings)?,
            None => Default::default(),
        }
    } else {
        Default::default()
    };

    let security_policy = resolve_security(
        declaring,
        introspector.markers_on(Member::Type(declaring)),
        &metadata.controller_name,
        settings,
    )?;

    let configuration = ResourceConfiguration {
        controller_name: metadata.controller_name,
        resource_type_id: metadata.resource_type_id,
        id_type_id: metadata.id.type_id,
        id_accessor_name: metadata.id.accessor,
        route_base_path: metadata.route_base_path,
        request_shape: metadata.shapes.request,
        single_response_shape: metadata.shapes.single,
        list_response_shape: metadata.shapes.list,
        using_dto: metadata.using_dto,
        response_wrapper_type: metadata.response_wrapper_type,
        collaborators: metadata.collaborators,
        existing_routes,
        relations: scan.relations,
        security_policy,
        page_size: settings.page_size,
    };

    tracing::debug!(
        controller = %configuration.controller_name,
        entity = %configuration.resource_type_id,
        base = %configuration.route_base_path,
        relations = configuration.relations.len(),
        existing_routes = configuration.existing_routes.len(),
        "resource configured"
    );

    Ok(AssembledResource {
        configuration,
        issues: scan.issues,
    })
}
