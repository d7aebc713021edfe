//! Relation operations
//!
//! SINGLE relations get `get`, `set` and `delete`; MULTIPLE relations get
//! `get-all` plus payload and id-addressed variants of `add` and `remove`.
//! Every write reads the owner first and persists it afterwards.

use super::support::{
    already_routed, id_parameter, mapped, mapped_each, read_owner, relation_id_parameter,
    relation_security, single_method, write_methods, Draft,
};
use super::types::{BodyStep, OperationKind, OperationSpec, Parameter, ResponseShape};
use super::wrap::{contract_for, respond_no_content, respond_with};
use crate::naming::{singularize, to_snake_case};
use crate::resource::{RelationDescriptor, ResourceConfiguration};
use crate::security::{AccessKind, SecurityExpression};
use http::Method;

/// `get_products`
fn plural_name(prefix: &str, relation: &RelationDescriptor) -> String {
    format!("{prefix}_{}", to_snake_case(&relation.relation_name))
}

/// `add_product`
fn singular_name(prefix: &str, relation: &RelationDescriptor) -> String {
    format!(
        "{prefix}_{}",
        to_snake_case(&singularize(&relation.relation_name))
    )
}

fn draft(
    kind: OperationKind,
    methods: super::types::Methods,
    path: String,
    operation_name: String,
    relation: &RelationDescriptor,
    parameters: Vec<Parameter>,
    security: Option<SecurityExpression>,
) -> Draft {
    Draft {
        kind,
        methods,
        path,
        operation_name,
        relation: Some(relation.relation_name.clone()),
        parameters,
        security,
    }
}

fn persist_owner(body: &mut Vec<BodyStep>) {
    body.push(BodyStep::Update {
        source: "entity".to_string(),
        into: "entity".to_string(),
    });
}

fn invoke(body: &mut Vec<BodyStep>, accessor: &str, value: Option<&str>) {
    body.push(BodyStep::InvokeAccessor {
        target: "entity".to_string(),
        accessor: accessor.to_string(),
        value: value.map(str::to_string),
    });
}

/// `GET {base}/{id}/{relation}` for a SINGLE relation
pub fn get(config: &ResourceConfiguration, relation: &RelationDescriptor) -> Option<OperationSpec> {
    let methods = single_method(Method::GET);
    let path = config.relation_path(relation);
    if already_routed(config, &methods, &path) {
        return None;
    }

    let mut body = Vec::new();
    read_owner(&mut body, "entity");
    body.push(BodyStep::ReadAccessor {
        target: "entity".to_string(),
        accessor: relation.accessors.get.clone(),
        into: "related".to_string(),
    });
    let result = mapped(
        &mut body,
        relation.using_dto(),
        "related",
        &relation.related_response_shape,
        "result",
    );
    let response = respond_with(
        config,
        ResponseShape::Item(relation.related_response_shape.clone()),
        &result,
        &mut body,
    );

    Some(
        draft(
            OperationKind::RelationGet,
            methods,
            path,
            plural_name("get", relation),
            relation,
            vec![id_parameter(config)],
            relation_security(config, relation, AccessKind::Read),
        )
        .finish(body, response),
    )
}

/// `POST|PUT|PATCH {base}/{id}/{relation}`, answers with the relation's get
pub fn set(config: &ResourceConfiguration, relation: &RelationDescriptor) -> Option<OperationSpec> {
    let methods = write_methods();
    let path = config.relation_path(relation);
    if already_routed(config, &methods, &path) {
        return None;
    }

    let mut body = Vec::new();
    read_owner(&mut body, "entity");
    let related = mapped(
        &mut body,
        relation.using_dto(),
        "dto",
        &relation.related_type_id,
        "related",
    );
    invoke(&mut body, &relation.accessors.set, Some(&related));
    persist_owner(&mut body);
    body.push(BodyStep::Delegate {
        operation: plural_name("get", relation),
        arguments: vec!["id".to_string()],
        into: Some("response".to_string()),
    });
    body.push(BodyStep::Return {
        source: "response".to_string(),
    });
    let response = contract_for(
        config,
        ResponseShape::Item(relation.related_response_shape.clone()),
    );

    Some(
        draft(
            OperationKind::RelationSet,
            methods,
            path,
            plural_name("set", relation),
            relation,
            vec![
                id_parameter(config),
                Parameter::body("dto", &relation.related_response_shape),
            ],
            relation_security(config, relation, AccessKind::Update),
        )
        .finish(body, response),
    )
}

/// `DELETE {base}/{id}/{relation}`: clears a SINGLE relation
pub fn delete(config: &ResourceConfiguration, relation: &RelationDescriptor) -> Option<OperationSpec> {
    let methods = single_method(Method::DELETE);
    let path = config.relation_path(relation);
    if already_routed(config, &methods, &path) {
        return None;
    }

    let mut body = Vec::new();
    read_owner(&mut body, "entity");
    invoke(&mut body, &relation.accessors.set, None);
    persist_owner(&mut body);
    let response = respond_no_content(config, &mut body);

    Some(
        draft(
            OperationKind::RelationDelete,
            methods,
            path,
            plural_name("remove", relation),
            relation,
            vec![id_parameter(config)],
            relation_security(config, relation, AccessKind::Update),
        )
        .finish(body, response),
    )
}

/// `GET {base}/{id}/{relation}` for a MULTIPLE relation
pub fn get_all(config: &ResourceConfiguration, relation: &RelationDescriptor) -> Option<OperationSpec> {
    let methods = single_method(Method::GET);
    let path = config.relation_path(relation);
    if already_routed(config, &methods, &path) {
        return None;
    }

    let mut body = Vec::new();
    read_owner(&mut body, "entity");
    body.push(BodyStep::ReadAccessor {
        target: "entity".to_string(),
        accessor: relation.accessors.get.clone(),
        into: "related".to_string(),
    });
    let items = mapped_each(
        &mut body,
        relation.using_dto(),
        "related",
        &relation.related_response_shape,
        "items",
    );
    let response = respond_with(
        config,
        ResponseShape::Sequence(relation.related_response_shape.clone()),
        &items,
        &mut body,
    );

    Some(
        draft(
            OperationKind::RelationGetAll,
            methods,
            path,
            plural_name("get", relation),
            relation,
            vec![id_parameter(config)],
            relation_security(config, relation, AccessKind::Read),
        )
        .finish(body, response),
    )
}

/// Payload variant shared by add and remove: map, take the id, delegate
fn by_payload(
    body: &mut Vec<BodyStep>,
    relation: &RelationDescriptor,
    delegate_to: String,
) {
    let related = mapped(
        body,
        relation.using_dto(),
        "dto",
        &relation.related_type_id,
        "related",
    );
    body.push(BodyStep::ExtractId {
        source: related,
        accessor: relation.related_id_accessor_name.clone(),
        into: "relation_id".to_string(),
    });
    body.push(BodyStep::Delegate {
        operation: delegate_to,
        arguments: vec!["id".to_string(), "relation_id".to_string()],
        into: Some("response".to_string()),
    });
    body.push(BodyStep::Return {
        source: "response".to_string(),
    });
}

/// Id variant shared by add and remove: owner, lazy reference, accessor, persist
fn by_id(body: &mut Vec<BodyStep>, relation: &RelationDescriptor, accessor: &str) {
    read_owner(body, "entity");
    body.push(BodyStep::ResolveReference {
        related_type: relation.related_type_id.clone(),
        id: "relation_id".to_string(),
        into: "related".to_string(),
    });
    invoke(body, accessor, Some("related"));
    persist_owner(body);
}

/// `POST|PUT|PATCH {base}/{id}/{relation}` with a related payload
pub fn add(config: &ResourceConfiguration, relation: &RelationDescriptor) -> Option<OperationSpec> {
    let methods = write_methods();
    let path = config.relation_path(relation);
    if already_routed(config, &methods, &path) {
        return None;
    }

    let name = singular_name("add", relation);
    let mut body = Vec::new();
    by_payload(&mut body, relation, format!("{name}_by_id"));
    let response = contract_for(
        config,
        ResponseShape::Sequence(relation.related_response_shape.clone()),
    );

    Some(
        draft(
            OperationKind::RelationAdd,
            methods,
            path,
            name,
            relation,
            vec![
                id_parameter(config),
                Parameter::body("dto", &relation.related_response_shape),
            ],
            relation_security(config, relation, AccessKind::Update),
        )
        .finish(body, response),
    )
}

/// `POST|PUT|PATCH {base}/{id}/{relation}/{relationId}`, answers with get-all
pub fn add_by_id(config: &ResourceConfiguration, relation: &RelationDescriptor) -> Option<OperationSpec> {
    let methods = write_methods();
    let path = config.relation_item_path(relation);
    if already_routed(config, &methods, &path) {
        return None;
    }

    let mut body = Vec::new();
    by_id(&mut body, relation, &relation.accessors.add);
    body.push(BodyStep::Delegate {
        operation: plural_name("get", relation),
        arguments: vec!["id".to_string()],
        into: Some("response".to_string()),
    });
    body.push(BodyStep::Return {
        source: "response".to_string(),
    });
    let response = contract_for(
        config,
        ResponseShape::Sequence(relation.related_response_shape.clone()),
    );

    Some(
        draft(
            OperationKind::RelationAddById,
            methods,
            path,
            format!("{}_by_id", singular_name("add", relation)),
            relation,
            vec![id_parameter(config), relation_id_parameter(relation)],
            relation_security(config, relation, AccessKind::Update),
        )
        .finish(body, response),
    )
}

/// `DELETE {base}/{id}/{relation}` with a related payload
pub fn remove(config: &ResourceConfiguration, relation: &RelationDescriptor) -> Option<OperationSpec> {
    let methods = single_method(Method::DELETE);
    let path = config.relation_path(relation);
    if already_routed(config, &methods, &path) {
        return None;
    }

    let name = singular_name("remove", relation);
    let mut body = Vec::new();
    by_payload(&mut body, relation, format!("{name}_by_id"));
    let response = contract_for(config, ResponseShape::Empty);

    Some(
        draft(
            OperationKind::RelationRemove,
            methods,
            path,
            name,
            relation,
            vec![
                id_parameter(config),
                Parameter::body("dto", &relation.related_response_shape),
            ],
            relation_security(config, relation, AccessKind::Update),
        )
        .finish(body, response),
    )
}

/// `DELETE {base}/{id}/{relation}/{relationId}`
pub fn remove_by_id(
    config: &ResourceConfiguration,
    relation: &RelationDescriptor,
) -> Option<OperationSpec> {
    let methods = single_method(Method::DELETE);
    let path = config.relation_item_path(relation);
    if already_routed(config, &methods, &path) {
        return None;
    }

    let mut body = Vec::new();
    by_id(&mut body, relation, &relation.accessors.remove);
    let response = respond_no_content(config, &mut body);

    Some(
        draft(
            OperationKind::RelationRemoveById,
            methods,
            path,
            format!("{}_by_id", singular_name("remove", relation)),
            relation,
            vec![id_parameter(config), relation_id_parameter(relation)],
            relation_security(config, relation, AccessKind::Update),
        )
        .finish(body, response),
    )
}
