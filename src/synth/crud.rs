//! Create, read, update, replace and delete on the resource itself

use super::support::{
    already_routed, id_parameter, mapped, read_owner, security, single_method, Draft,
};
use super::types::{BodyStep, OperationKind, OperationSpec, Parameter, ResponseShape};
use super::wrap::{respond_no_content, respond_with};
use crate::resource::ResourceConfiguration;
use crate::security::AccessKind;
use http::Method;

/// `POST {base}`
pub fn create(config: &ResourceConfiguration) -> Option<OperationSpec> {
    let methods = single_method(Method::POST);
    let path = config.route_base_path.clone();
    if already_routed(config, &methods, &path) {
        return None;
    }

    let mut body = Vec::new();
    let entity = mapped(
        &mut body,
        config.maps_request(),
        "dto",
        &config.resource_type_id,
        "entity",
    );
    body.push(BodyStep::Create {
        source: entity,
        into: "saved".to_string(),
    });
    let result = mapped(
        &mut body,
        config.maps_single(),
        "saved",
        &config.single_response_shape,
        "result",
    );
    let response = respond_with(
        config,
        ResponseShape::Item(config.single_response_shape.clone()),
        &result,
        &mut body,
    );

    Some(
        Draft {
            kind: OperationKind::Create,
            methods,
            path,
            operation_name: "create".to_string(),
            relation: None,
            parameters: vec![Parameter::body("dto", &config.request_shape)],
            security: security(config, AccessKind::Create),
        }
        .finish(body, response),
    )
}

/// `GET {base}/{id}`, EntityNotFound when the id does not resolve
pub fn read(config: &ResourceConfiguration) -> Option<OperationSpec> {
    let methods = single_method(Method::GET);
    let path = config.item_path();
    if already_routed(config, &methods, &path) {
        return None;
    }

    let mut body = Vec::new();
    read_owner(&mut body, "entity");
    let result = mapped(
        &mut body,
        config.maps_single(),
        "entity",
        &config.single_response_shape,
        "result",
    );
    let response = respond_with(
        config,
        ResponseShape::Item(config.single_response_shape.clone()),
        &result,
        &mut body,
    );

    Some(
        Draft {
            kind: OperationKind::Read,
            methods,
            path,
            operation_name: "get".to_string(),
            relation: None,
            parameters: vec![id_parameter(config)],
            security: security(config, AccessKind::Read),
        }
        .finish(body, response),
    )
}

/// `PATCH {base}/{id}`: merge the changes into the stored record
pub fn update_partial(config: &ResourceConfiguration) -> Option<OperationSpec> {
    let methods = single_method(Method::PATCH);
    let path = config.item_path();
    if already_routed(config, &methods, &path) {
        return None;
    }

    let mut body = Vec::new();
    read_owner(&mut body, "original");
    let changes = mapped(
        &mut body,
        config.maps_request(),
        "dto",
        &config.resource_type_id,
        "changes",
    );
    body.push(BodyStep::Merge {
        original: "original".to_string(),
        changes,
        into: "merged".to_string(),
    });
    body.push(BodyStep::Update {
        source: "merged".to_string(),
        into: "saved".to_string(),
    });
    let result = mapped(
        &mut body,
        config.maps_single(),
        "saved",
        &config.single_response_shape,
        "result",
    );
    let response = respond_with(
        config,
        ResponseShape::Item(config.single_response_shape.clone()),
        &result,
        &mut body,
    );

    Some(
        Draft {
            kind: OperationKind::UpdatePartial,
            methods,
            path,
            operation_name: "update".to_string(),
            relation: None,
            parameters: vec![
                id_parameter(config),
                Parameter::body("dto", &config.request_shape),
            ],
            security: security(config, AccessKind::Update),
        }
        .finish(body, response),
    )
}

/// `PUT {base}/{id}`: write a new record at `id`; no prior record is required
pub fn replace(config: &ResourceConfiguration) -> Option<OperationSpec> {
    let methods = single_method(Method::PUT);
    let path = config.item_path();
    if already_routed(config, &methods, &path) {
        return None;
    }

    let mut body = Vec::new();
    let changed = if config.maps_request() {
        mapped(&mut body, true, "dto", &config.resource_type_id, "changed")
    } else {
        body.push(BodyStep::Assign {
            source: "dto".to_string(),
            into: "changed".to_string(),
        });
        "changed".to_string()
    };
    body.push(BodyStep::AssignId {
        target: changed.clone(),
        id: "id".to_string(),
    });
    body.push(BodyStep::Update {
        source: changed,
        into: "saved".to_string(),
    });
    let result = mapped(
        &mut body,
        config.maps_single(),
        "saved",
        &config.single_response_shape,
        "result",
    );
    let response = respond_with(
        config,
        ResponseShape::Item(config.single_response_shape.clone()),
        &result,
        &mut body,
    );

    Some(
        Draft {
            kind: OperationKind::Replace,
            methods,
            path,
            operation_name: "set".to_string(),
            relation: None,
            parameters: vec![
                id_parameter(config),
                Parameter::body("dto", &config.request_shape),
            ],
            security: security(config, AccessKind::Update),
        }
        .finish(body, response),
    )
}

/// `DELETE {base}/{id}`
pub fn delete(config: &ResourceConfiguration) -> Option<OperationSpec> {
    let methods = single_method(Method::DELETE);
    let path = config.item_path();
    if already_routed(config, &methods, &path) {
        return None;
    }

    let mut body = vec![BodyStep::DeleteById {
        id: "id".to_string(),
    }];
    let response = respond_no_content(config, &mut body);

    Some(
        Draft {
            kind: OperationKind::Delete,
            methods,
            path,
            operation_name: "delete".to_string(),
            relation: None,
            parameters: vec![id_parameter(config)],
            security: security(config, AccessKind::Delete),
        }
        .finish(body, response),
    )
}
