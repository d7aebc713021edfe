#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use brrtcrud::resource::{discover_resources, Cardinality, ResourceConfiguration};
use brrtcrud::settings::Settings;
use brrtcrud::synth::{
    synthesize, synthesize_catalog, BodyStep, OperationKind, ParameterSource, ResponseShape,
    SynthesisOptions, Verbosity,
};
use common::fixtures::{synthesize_first, types, ORDERS, SHOP};
use http::{Method, StatusCode};

#[test]
fn test_order_with_products_yields_twelve_operations() {
    let resource = synthesize_first(ORDERS, &Settings::default());
    let ops = &resource.operations;

    assert_eq!(
        ops.names(),
        [
            "create",
            "get",
            "update",
            "set",
            "delete",
            "all",
            "search_all",
            "get_products",
            "add_product",
            "add_product_by_id",
            "remove_product",
            "remove_product_by_id",
        ]
    );
    assert!(ops.operations.iter().all(|op| !op.response.wrapped));

    let get_all = ops.by_name("get_products").unwrap();
    assert_eq!(get_all.kind, OperationKind::RelationGetAll);
    assert_eq!(get_all.path, "/orders/{id}/products");
    assert_eq!(get_all.methods.as_slice(), &[Method::GET]);
    assert_eq!(
        get_all.response.shape,
        ResponseShape::Sequence("shop.ProductDto".into())
    );

    let add_by_id = ops.by_name("add_product_by_id").unwrap();
    assert_eq!(add_by_id.path, "/orders/{id}/products/{relationId}");
    assert_eq!(
        add_by_id.methods.as_slice(),
        &[Method::POST, Method::PUT, Method::PATCH]
    );

    let remove_by_id = ops.by_name("remove_product_by_id").unwrap();
    assert_eq!(remove_by_id.response.status_on_success, StatusCode::NO_CONTENT);
    assert_eq!(remove_by_id.response.shape, ResponseShape::Empty);
}

#[test]
fn test_no_dto_means_every_shape_is_the_resource() {
    let resource = synthesize_first(ORDERS, &Settings::default());
    let config = &resource.configuration;
    assert!(!config.using_dto);
    assert_eq!(config.single_response_shape, "shop.OrderModel");
    assert_eq!(config.list_response_shape, "shop.OrderModel");
    assert_eq!(config.request_shape, "shop.OrderModel");

    let create = resource.operations.by_name("create").unwrap();
    assert!(!create
        .body
        .iter()
        .any(|step| matches!(step, BodyStep::MapTo { .. })));
}

const SPLIT_DTOS: &str = r#"
title: Orders
types:
  - id: shop.OrderModel
    markers:
      - name: CrudResource
        values:
          value: /orders
          entity: shop.OrderModel
          dtoConfig: { list: shop.OrderListDto, request: shop.OrderRequestDto }
    fields:
      - { name: id, type: i32, markers: [{ name: Id }] }
  - id: shop.OrderListDto
  - id: shop.OrderRequestDto
"#;

fn maps_to(op: &brrtcrud::synth::OperationSpec, target: &str) -> bool {
    op.body
        .iter()
        .any(|step| matches!(step, BodyStep::MapTo { shape, .. } if shape == target))
}

fn maps_each_to(op: &brrtcrud::synth::OperationSpec, target: &str) -> bool {
    op.body
        .iter()
        .any(|step| matches!(step, BodyStep::MapEach { shape, .. } if shape == target))
}

#[test]
fn test_list_and_request_dtos_without_single_dto() {
    let resource = synthesize_first(SPLIT_DTOS, &Settings::default());
    let config = &resource.configuration;
    let ops = &resource.operations;

    assert!(config.using_dto);
    assert_eq!(config.single_response_shape, "shop.OrderModel");
    assert_eq!(config.list_response_shape, "shop.OrderListDto");
    assert_eq!(config.request_shape, "shop.OrderRequestDto");

    // inbound payloads are mapped to the entity, responses stay entities
    for name in ["create", "update", "set"] {
        let op = ops.by_name(name).unwrap();
        let payload = op.parameters.iter().find(|p| p.name == "dto").unwrap();
        assert_eq!(payload.type_id, "shop.OrderRequestDto", "{name}");
        assert!(maps_to(op, "shop.OrderModel"), "{name}");
        assert!(!maps_to(op, "shop.OrderRequestDto"), "{name}");
        assert_eq!(op.response.declared_type, "shop.OrderModel", "{name}");
    }

    let all = ops.by_name("all").unwrap();
    assert_eq!(all.response.declared_type, "Vec<shop.OrderListDto>");
    assert!(maps_each_to(all, "shop.OrderListDto"));
    assert!(matches!(all.body.last(), Some(BodyStep::Return { source }) if source == "items"));

    let search = ops.by_name("search_all").unwrap();
    assert_eq!(search.response.declared_type, "Page<shop.OrderListDto>");
    assert!(maps_each_to(search, "shop.OrderListDto"));

    let get = ops.by_name("get").unwrap();
    assert_eq!(get.response.declared_type, "shop.OrderModel");
    assert!(!maps_to(get, "shop.OrderModel"));
}

#[test]
fn test_hand_written_route_suppresses_list() {
    let resource = synthesize_first(SHOP, &Settings::default());
    let config = &resource.configuration;
    assert!(config.existing_routes.contains(&Method::GET, "/orders"));

    let names = resource.operations.names();
    assert!(!names.contains(&"all"));
    assert!(names.contains(&"search_all"));
    assert!(resource
        .operations
        .operations
        .iter()
        .all(|op| !(op.path == "/orders" && op.methods.contains(&Method::GET))));
}

#[test]
fn test_relation_order_and_cardinality() {
    let resource = synthesize_first(SHOP, &Settings::default());
    let config = &resource.configuration;

    let names: Vec<_> = config.relations.iter().map(|r| r.relation_name.as_str()).collect();
    assert_eq!(names, ["products", "customer", "thing"]);

    let products = config.relation("products").unwrap();
    assert_eq!(products.cardinality, Cardinality::Multiple);
    assert_eq!(products.related_type_id, "shop.ProductEntity");
    assert_eq!(products.related_response_shape, "shop.ProductDto");

    let customer = config.relation("customer").unwrap();
    assert_eq!(customer.cardinality, Cardinality::Single);
    assert_eq!(customer.related_id_type_id, "String");
    assert_eq!(customer.related_id_accessor_name, "getCustomerNo");
    assert_eq!(customer.related_response_shape, "shop.CustomerDao");

    assert_eq!(
        &resource.operations.names()[6..],
        [
            "get_products",
            "add_product",
            "add_product_by_id",
            "remove_product",
            "remove_product_by_id",
            "get_customer",
            "set_customer",
            "remove_customer",
            "get_thing",
            "set_thing",
            "remove_thing",
        ]
    );
}

#[test]
fn test_accessor_precedence() {
    let resource = synthesize_first(SHOP, &Settings::default());
    let thing = resource.configuration.relation("thing").unwrap();

    // explicit marker value beats the RelationAccessor method
    assert_eq!(thing.accessors.get, "fetchThing");
    // RelationAccessor method beats convention
    assert_eq!(thing.accessors.set, "replaceThing");
    assert_eq!(thing.accessors.add, "addThing");

    let get_thing = resource.operations.by_name("get_thing").unwrap();
    assert!(get_thing.body.contains(&BodyStep::ReadAccessor {
        target: "entity".into(),
        accessor: "fetchThing".into(),
        into: "related".into(),
    }));
}

#[test]
fn test_exclusive_security_marker() {
    let resource = synthesize_first(SHOP, &Settings::default());
    let ops = &resource.operations;

    let create = ops.by_name("create").unwrap();
    assert_eq!(
        create.security.as_ref().unwrap().to_string(),
        "hasRole('ROLE_CREATE_ORDER')"
    );

    let add = ops.by_name("add_product").unwrap();
    let security = add.security.as_ref().unwrap();
    assert_eq!(security.len(), 1);
    assert_eq!(security.required_roles, ["ROLE_UPDATE_PRODUCT"]);
}

#[test]
fn test_inclusive_security_from_settings() {
    let settings = Settings {
        security: Some(brrtcrud::security::SecurityPolicy::default()),
        ..Settings::default()
    };
    let resource = synthesize_first(ORDERS, &settings);
    let get_all = resource.operations.by_name("get_products").unwrap();
    assert_eq!(
        get_all.security.as_ref().unwrap().to_string(),
        "hasRole('ROLE_READ_PRODUCT') and hasRole('ROLE_READ_ORDER')"
    );

    let plain = synthesize_first(ORDERS, &Settings::default());
    assert!(plain
        .operations
        .operations
        .iter()
        .all(|op| op.security.is_none()));
}

#[test]
fn test_search_uses_catalog_page_size() {
    let settings = Settings {
        page_size: 50,
        ..Settings::default()
    };
    let resource = synthesize_first(SHOP, &settings);
    let search = resource.operations.by_name("search_all").unwrap();

    assert_eq!(search.path, "/orders/search");
    let size = search.parameters.iter().find(|p| p.name == "size").unwrap();
    assert_eq!(size.source, ParameterSource::Query);
    assert_eq!(size.default_value.as_deref(), Some("50"));
    assert_eq!(
        search.response.shape,
        ResponseShape::Page("shop.OrderModel".into())
    );
}

#[test]
fn test_wrapped_dto_resource() {
    let all = synthesize_catalog(&types(SHOP), &Settings::default(), &SynthesisOptions::default());
    let employees = all.resource("GeneratedEmployeeController").unwrap();
    let config = &employees.configuration;

    assert_eq!(config.route_base_path, "/employees");
    assert!(config.using_dto);
    assert_eq!(config.single_response_shape, "staff.EmployeeDto");
    assert_eq!(config.id_type_id, "i64");
    assert_eq!(config.response_wrapper_type.as_deref(), Some("staff.Envelope"));

    let get = employees.operations.by_name("get").unwrap();
    assert!(get.response.wrapped);
    assert_eq!(get.response.declared_type, "staff.Envelope<staff.EmployeeDto>");
    assert!(matches!(get.body.last(), Some(BodyStep::Return { source }) if source == "response"));

    let delete = employees.operations.by_name("delete").unwrap();
    assert_eq!(delete.response.declared_type, "staff.Envelope<()>");
    assert_eq!(delete.response.status_on_success, StatusCode::NO_CONTENT);
}

#[test]
fn test_catalog_continues_past_broken_resource() {
    let types = types(SHOP);
    assert_eq!(discover_resources(&types).len(), 3);

    let options = SynthesisOptions {
        verbosity: Verbosity::Quiet,
    };
    let report = synthesize_catalog(&types, &Settings::default(), &options);
    assert_eq!(report.resources.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].declaring_type, "broken.Ghosts (broken.Ghost)");
    assert_eq!(report.operation_count(), 17 + 7);
}

#[test]
fn test_programmatic_configuration() {
    let mut config = ResourceConfiguration::new("shop.Invoice", "/invoices");
    config.existing_routes.insert(&Method::DELETE, "/INVOICES/{id}");
    let ops = synthesize(&config, &SynthesisOptions::default());
    assert_eq!(ops.len(), 6);
    assert!(ops.by_name("delete").is_none());
    assert_eq!(ops.scaffolding.fields.len(), 5);
}
