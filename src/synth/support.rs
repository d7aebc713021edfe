use super::types::{BodyStep, Methods, OperationKind, OperationSpec, Parameter, ResponseContract};
use crate::resource::{RelationDescriptor, ResourceConfiguration};
use crate::security::{AccessKind, SecurityExpression};
use http::Method;
use smallvec::smallvec;

/// `POST`, `PUT` and `PATCH`, the verbs of every relation write
pub fn write_methods() -> Methods {
    smallvec![Method::POST, Method::PUT, Method::PATCH]
}

pub fn single_method(method: Method) -> Methods {
    smallvec![method]
}

/// True when any of `methods` is already hand-written at `path`
pub fn already_routed(config: &ResourceConfiguration, methods: &Methods, path: &str) -> bool {
    config.existing_routes.contains_any(methods, path)
}

pub fn security(config: &ResourceConfiguration, access: AccessKind) -> Option<SecurityExpression> {
    config
        .security_policy
        .as_ref()
        .map(|policy| policy.expression(&config.resource_type_id, access))
}

/// Relation security; the base role uses the same access kind
pub fn relation_security(
    config: &ResourceConfiguration,
    relation: &RelationDescriptor,
    access: AccessKind,
) -> Option<SecurityExpression> {
    config.security_policy.as_ref().map(|policy| {
        policy.relation_expression(
            &config.resource_type_id,
            &relation.related_type_id,
            access,
            access,
        )
    })
}

pub fn id_parameter(config: &ResourceConfiguration) -> Parameter {
    Parameter::path("id", &config.id_type_id)
}

pub fn relation_id_parameter(relation: &RelationDescriptor) -> Parameter {
    Parameter::path("relation_id", &relation.related_id_type_id)
}

/// Map `source` to `shape` when `needed`; returns the variable holding the result
pub fn mapped(body: &mut Vec<BodyStep>, needed: bool, source: &str, shape: &str, into: &str) -> String {
    if needed {
        body.push(BodyStep::MapTo {
            source: source.to_string(),
            shape: shape.to_string(),
            into: into.to_string(),
        });
        into.to_string()
    } else {
        source.to_string()
    }
}

/// Map every element of `source` when `needed`
pub fn mapped_each(
    body: &mut Vec<BodyStep>,
    needed: bool,
    source: &str,
    shape: &str,
    into: &str,
) -> String {
    if needed {
        body.push(BodyStep::MapEach {
            source: source.to_string(),
            shape: shape.to_string(),
            into: into.to_string(),
        });
        into.to_string()
    } else {
        source.to_string()
    }
}

pub fn read_owner(body: &mut Vec<BodyStep>, into: &str) {
    body.push(BodyStep::ReadOwner {
        id: "id".to_string(),
        into: into.to_string(),
    });
}

/// Field bag for [`OperationSpec`]; keeps synthesizers to one call
pub struct Draft {
    pub kind: OperationKind,
    pub methods: Methods,
    pub path: String,
    pub operation_name: String,
    pub relation: Option<String>,
    pub parameters: Vec<Parameter>,
    pub security: Option<SecurityExpression>,
}

impl Draft {
    pub fn finish(self, body: Vec<BodyStep>, response: ResponseContract) -> OperationSpec {
        OperationSpec {
            kind: self.kind,
            methods: self.methods,
            path: self.path,
            operation_name: self.operation_name,
            relation: self.relation,
            parameters: self.parameters,
            security: self.security,
            body,
            response,
        }
    }
}
