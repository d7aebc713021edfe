use super::support::{already_routed, mapped_each, security, single_method, Draft};
use super::types::{BodyStep, OperationKind, OperationSpec, Parameter, ResponseShape};
use super::wrap::respond_with;
use crate::resource::ResourceConfiguration;
use crate::security::AccessKind;
use http::Method;

/// `GET {base}`: every record, mapped one by one
pub fn list(config: &ResourceConfiguration) -> Option<OperationSpec> {
    let methods = single_method(Method::GET);
    let path = config.route_base_path.clone();
    if already_routed(config, &methods, &path) {
        return None;
    }

    let mut body = vec![BodyStep::ListAll {
        into: "entities".to_string(),
    }];
    let items = mapped_each(
        &mut body,
        config.maps_list(),
        "entities",
        &config.list_response_shape,
        "items",
    );
    let response = respond_with(
        config,
        ResponseShape::Sequence(config.list_response_shape.clone()),
        &items,
        &mut body,
    );

    Some(
        Draft {
            kind: OperationKind::List,
            methods,
            path,
            operation_name: "all".to_string(),
            relation: None,
            parameters: Vec::new(),
            security: security(config, AccessKind::Read),
        }
        .finish(body, response),
    )
}

/// `GET {base}/search?filter=&page=&size=`
///
/// The filter text goes through the search filter builder; the page keeps the
/// total element count after mapping.
pub fn search(config: &ResourceConfiguration) -> Option<OperationSpec> {
    let methods = single_method(Method::GET);
    let path = config.search_path();
    if already_routed(config, &methods, &path) {
        return None;
    }

    let mut body = vec![
        BodyStep::BuildFilter {
            filter: "filter".to_string(),
            shape: config.resource_type_id.clone(),
            into: "criteria".to_string(),
        },
        BodyStep::SearchPage {
            filter: "criteria".to_string(),
            page: "page".to_string(),
            size: "size".to_string(),
            into: "found".to_string(),
        },
    ];
    let items = mapped_each(
        &mut body,
        config.maps_list(),
        "found",
        &config.list_response_shape,
        "items",
    );
    let response = respond_with(
        config,
        ResponseShape::Page(config.list_response_shape.clone()),
        &items,
        &mut body,
    );

    Some(
        Draft {
            kind: OperationKind::Search,
            methods,
            path,
            operation_name: "search_all".to_string(),
            relation: None,
            parameters: vec![
                Parameter::query("filter", "String").optional(),
                Parameter::query("page", "u32").with_default("0"),
                Parameter::query("size", "u32").with_default(config.page_size.to_string()),
            ],
            security: security(config, AccessKind::Read),
        }
        .finish(body, response),
    )
}
