use crate::security::SecurityExpression;
use http::{Method, StatusCode};
use serde::{Serialize, Serializer};
use smallvec::SmallVec;

/// Verbs an operation answers to; relation-set answers to three
pub type Methods = SmallVec<[Method; 3]>;

fn serialize_methods<S: Serializer>(methods: &Methods, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(methods.iter().map(Method::as_str))
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

fn serialize_security<S: Serializer>(
    security: &Option<SecurityExpression>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match security {
        Some(expression) => serializer.serialize_some(&expression.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Kind of synthesized operation, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Create,
    Read,
    UpdatePartial,
    Replace,
    Delete,
    List,
    Search,
    RelationGet,
    RelationSet,
    RelationDelete,
    RelationGetAll,
    RelationAdd,
    RelationAddById,
    RelationRemove,
    RelationRemoveById,
}

impl OperationKind {
    pub fn is_relation(&self) -> bool {
        !matches!(
            self,
            OperationKind::Create
                | OperationKind::Read
                | OperationKind::UpdatePartial
                | OperationKind::Replace
                | OperationKind::Delete
                | OperationKind::List
                | OperationKind::Search
        )
    }
}

/// Where a parameter is bound from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterSource {
    Path,
    Query,
    Body,
}

/// One operation parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub type_id: String,
    pub source: ParameterSource,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Parameter {
    fn new(name: &str, type_id: &str, source: ParameterSource) -> Self {
        Self {
            name: name.to_string(),
            type_id: type_id.to_string(),
            source,
            required: true,
            default_value: None,
        }
    }

    pub fn path(name: &str, type_id: &str) -> Self {
        Self::new(name, type_id, ParameterSource::Path)
    }

    pub fn query(name: &str, type_id: &str) -> Self {
        Self::new(name, type_id, ParameterSource::Query)
    }

    pub fn body(name: &str, type_id: &str) -> Self {
        Self::new(name, type_id, ParameterSource::Body)
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.required = false;
        self.default_value = Some(value.into());
        self
    }
}

/// Content kind for the wrapper's `set content` overloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Item,
    Sequence,
    Page,
}

/// Shape of a successful response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum ResponseShape {
    Item(String),
    Sequence(String),
    Page(String),
    Empty,
}

impl ResponseShape {
    /// Element type, `None` for empty responses
    pub fn type_id(&self) -> Option<&str> {
        match self {
            ResponseShape::Item(t) | ResponseShape::Sequence(t) | ResponseShape::Page(t) => Some(t),
            ResponseShape::Empty => None,
        }
    }

    pub fn content_kind(&self) -> Option<ContentKind> {
        match self {
            ResponseShape::Item(_) => Some(ContentKind::Item),
            ResponseShape::Sequence(_) => Some(ContentKind::Sequence),
            ResponseShape::Page(_) => Some(ContentKind::Page),
            ResponseShape::Empty => None,
        }
    }

    /// Bare declared type: `T`, `Vec<T>`, `Page<T>` or `()`
    pub fn declared_type(&self) -> String {
        match self {
            ResponseShape::Item(t) => t.clone(),
            ResponseShape::Sequence(t) => format!("Vec<{t}>"),
            ResponseShape::Page(t) => format!("Page<{t}>"),
            ResponseShape::Empty => "()".to_string(),
        }
    }
}

/// What a successful call returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseContract {
    pub shape: ResponseShape,
    /// True when the body is enclosed in the configured wrapper type
    pub wrapped: bool,
    /// Declared return type, wrapper included
    pub declared_type: String,
    #[serde(serialize_with = "serialize_status")]
    pub status_on_success: StatusCode,
}

/// Abstract statement of a synthesized body
///
/// Variables are named; emission adapters decide how each step is spelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum BodyStep {
    /// `into = accessor.read(id)`, failing with EntityNotFound when absent
    ReadOwner { id: String, into: String },
    /// `into = mapper.map(source, shape)`
    MapTo {
        source: String,
        shape: String,
        into: String,
    },
    /// `into = source` when no mapping is needed
    Assign { source: String, into: String },
    /// Write `id` into `target` before persisting it
    AssignId { target: String, id: String },
    /// `into = accessor.create(source)`
    Create { source: String, into: String },
    /// `into = accessor.update(source)`
    Update { source: String, into: String },
    /// `into = merger.merge(original, changes)`
    Merge {
        original: String,
        changes: String,
        into: String,
    },
    /// `accessor.delete_by_id(id)`
    DeleteById { id: String },
    /// `into = accessor.list()`
    ListAll { into: String },
    /// `into = filter_builder.build(filter, shape)`
    BuildFilter {
        filter: String,
        shape: String,
        into: String,
    },
    /// `into = accessor.search(filter, page, size)`
    SearchPage {
        filter: String,
        page: String,
        size: String,
        into: String,
    },
    /// Map every element of `source`; pages keep their total count
    MapEach {
        source: String,
        shape: String,
        into: String,
    },
    /// `into = target.accessor()`
    ReadAccessor {
        target: String,
        accessor: String,
        into: String,
    },
    /// `target.accessor(value)`; `value = None` clears the relation
    InvokeAccessor {
        target: String,
        accessor: String,
        value: Option<String>,
    },
    /// `into = reference_resolver.reference(related_type, id)` without loading it
    ResolveReference {
        related_type: String,
        id: String,
        into: String,
    },
    /// `into = source.accessor()`
    ExtractId {
        source: String,
        accessor: String,
        into: String,
    },
    /// `into = self.operation(arguments…)`
    Delegate {
        operation: String,
        arguments: Vec<String>,
        into: Option<String>,
    },
    /// `into = Wrapper::new(); into.set_content(source)`
    WrapContent {
        source: String,
        content: ContentKind,
        into: String,
    },
    /// `into = Wrapper::new(); into.no_content()`
    WrapNoContent { into: String },
    /// Return `source` with the contract's success status
    Return { source: String },
    /// Return an empty body with the contract's success status
    ReturnEmpty,
}

/// One synthesized operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationSpec {
    pub kind: OperationKind,
    #[serde(serialize_with = "serialize_methods")]
    pub methods: Methods,
    pub path: String,
    pub operation_name: String,
    /// Relation this operation manages, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    pub parameters: Vec<Parameter>,
    #[serde(serialize_with = "serialize_security")]
    pub security: Option<SecurityExpression>,
    pub body: Vec<BodyStep>,
    pub response: ResponseContract,
}

impl OperationSpec {
    /// First verb; every operation has at least one
    pub fn primary_method(&self) -> &Method {
        self.methods.first().unwrap_or(&Method::GET)
    }

    /// `GET /orders/{id}` or `POST|PUT|PATCH /orders/{id}/customer`
    pub fn route_label(&self) -> String {
        let verbs: Vec<&str> = self.methods.iter().map(Method::as_str).collect();
        format!("{} {}", verbs.join("|"), self.path)
    }
}

/// One injected collaborator field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldField {
    pub name: String,
    pub type_id: String,
}

/// Fields plus the one constructor wiring them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scaffolding {
    pub fields: Vec<ScaffoldField>,
    /// Constructor parameters, one per field, in field order
    pub constructor: Vec<String>,
}

/// Ordered result of a synthesis pass for one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationSet {
    pub controller_name: String,
    pub resource_type_id: String,
    pub operations: Vec<OperationSpec>,
    pub scaffolding: Scaffolding,
}

impl OperationSet {
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn by_name(&self, name: &str) -> Option<&OperationSpec> {
        self.operations.iter().find(|op| op.operation_name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.operations
            .iter()
            .map(|op| op.operation_name.as_str())
            .collect()
    }
}
