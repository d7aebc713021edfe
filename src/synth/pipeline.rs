use super::types::{OperationKind, OperationSet, OperationSpec, ScaffoldField, Scaffolding};
use super::{collection, crud, relation};
use crate::error::{ConfigurationError, SynthesisError};
use crate::linter::LintIssue;
use crate::resource::{
    assemble, discover_resources, Cardinality, RelationDescriptor, ResourceConfiguration,
    ResourceDeclaration, ResourceIntrospector,
};
use crate::settings::Settings;
use serde::Serialize;

/// Contributes one resource operation or declines
pub type Synthesizer = fn(&ResourceConfiguration) -> Option<OperationSpec>;

/// Contributes one relation operation or declines
pub type RelationSynthesizer = fn(&ResourceConfiguration, &RelationDescriptor) -> Option<OperationSpec>;

/// Resource synthesizers, in pipeline order
pub const RESOURCE_SYNTHESIZERS: [(OperationKind, Synthesizer); 7] = [
    (OperationKind::Create, crud::create),
    (OperationKind::Read, crud::read),
    (OperationKind::UpdatePartial, crud::update_partial),
    (OperationKind::Replace, crud::replace),
    (OperationKind::Delete, crud::delete),
    (OperationKind::List, collection::list),
    (OperationKind::Search, collection::search),
];

pub const SINGLE_RELATION_SYNTHESIZERS: [(OperationKind, RelationSynthesizer); 3] = [
    (OperationKind::RelationGet, relation::get),
    (OperationKind::RelationSet, relation::set),
    (OperationKind::RelationDelete, relation::delete),
];

pub const MULTIPLE_RELATION_SYNTHESIZERS: [(OperationKind, RelationSynthesizer); 5] = [
    (OperationKind::RelationGetAll, relation::get_all),
    (OperationKind::RelationAdd, relation::add),
    (OperationKind::RelationAddById, relation::add_by_id),
    (OperationKind::RelationRemove, relation::remove),
    (OperationKind::RelationRemoveById, relation::remove_by_id),
];

/// How loudly a pass reports contributed and skipped operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Everything at `debug`
    Quiet,
    /// One `info` line per resource, operations at `debug`
    #[default]
    Normal,
    /// Every operation at `info`
    Verbose,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SynthesisOptions {
    pub verbosity: Verbosity,
}

impl SynthesisOptions {
    pub fn verbose(verbose: bool) -> Self {
        Self {
            verbosity: if verbose {
                Verbosity::Verbose
            } else {
                Verbosity::Normal
            },
        }
    }
}

fn log_outcome(
    options: &SynthesisOptions,
    config: &ResourceConfiguration,
    kind: OperationKind,
    relation: Option<&str>,
    contributed: Option<&OperationSpec>,
) {
    let route = contributed.map(OperationSpec::route_label);
    let outcome = if contributed.is_some() {
        "contributed"
    } else {
        "skipped, route already exists"
    };
    if options.verbosity == Verbosity::Verbose {
        tracing::info!(
            controller = %config.controller_name,
            ?kind,
            relation,
            route,
            "{outcome}"
        );
    } else {
        tracing::debug!(
            controller = %config.controller_name,
            ?kind,
            relation,
            route,
            "{outcome}"
        );
    }
}

/// One field per collaborator and a constructor wiring all of them
pub fn scaffolding(config: &ResourceConfiguration) -> Scaffolding {
    let refs = &config.collaborators;
    let fields = vec![
        ScaffoldField {
            name: "data_accessor".to_string(),
            type_id: refs.data_accessor.clone(),
        },
        ScaffoldField {
            name: "data_mapper".to_string(),
            type_id: refs.data_mapper.clone(),
        },
        ScaffoldField {
            name: "data_merger".to_string(),
            type_id: refs.data_merger.clone(),
        },
        ScaffoldField {
            name: "search_filter_builder".to_string(),
            type_id: refs.search_filter_builder.clone(),
        },
        ScaffoldField {
            name: "reference_resolver".to_string(),
            type_id: refs.reference_resolver.clone(),
        },
    ];
    let constructor = fields.iter().map(|f| f.name.clone()).collect();
    Scaffolding {
        fields,
        constructor,
    }
}

/// Run every synthesizer once, in pipeline order
///
/// Resource operations come first, then each relation in discovery order with
/// the synthesizers of its cardinality. A synthesizer that declines leaves no
/// trace in the result.
pub fn synthesize(config: &ResourceConfiguration, options: &SynthesisOptions) -> OperationSet {
    let mut operations = Vec::new();

    for (kind, synthesizer) in RESOURCE_SYNTHESIZERS {
        let contributed = synthesizer(config);
        log_outcome(options, config, kind, None, contributed.as_ref());
        operations.extend(contributed);
    }

    for descriptor in &config.relations {
        let synthesizers: &[(OperationKind, RelationSynthesizer)] = match descriptor.cardinality {
            Cardinality::Single => &SINGLE_RELATION_SYNTHESIZERS,
            Cardinality::Multiple => &MULTIPLE_RELATION_SYNTHESIZERS,
        };
        for (kind, synthesizer) in synthesizers {
            let contributed = synthesizer(config, descriptor);
            log_outcome(
                options,
                config,
                *kind,
                Some(descriptor.relation_name.as_str()),
                contributed.as_ref(),
            );
            operations.extend(contributed);
        }
    }

    OperationSet {
        controller_name: config.controller_name.clone(),
        resource_type_id: config.resource_type_id.clone(),
        operations,
        scaffolding: scaffolding(config),
    }
}

/// Lifecycle state of one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SynthesisState {
    Unresolved,
    Configured,
    Synthesizing,
    Synthesized,
}

/// A configuration and the operations synthesized from it
#[derive(Debug, Clone, Serialize)]
pub struct SynthesizedResource {
    pub configuration: ResourceConfiguration,
    pub operations: OperationSet,
}

/// Drives one resource through Unresolved → Configured → Synthesizing → Synthesized
#[derive(Debug, Clone)]
pub struct ResourceSynthesis {
    state: SynthesisState,
    configuration: Option<ResourceConfiguration>,
    operations: Option<OperationSet>,
    issues: Vec<LintIssue>,
}

impl Default for ResourceSynthesis {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceSynthesis {
    pub fn new() -> Self {
        Self {
            state: SynthesisState::Unresolved,
            configuration: None,
            operations: None,
            issues: Vec::new(),
        }
    }

    /// Start from an already assembled configuration
    pub fn configured(configuration: ResourceConfiguration) -> Self {
        Self {
            state: SynthesisState::Configured,
            configuration: Some(configuration),
            operations: None,
            issues: Vec::new(),
        }
    }

    pub fn state(&self) -> SynthesisState {
        self.state
    }

    pub fn configuration(&self) -> Option<&ResourceConfiguration> {
        self.configuration.as_ref()
    }

    pub fn operations(&self) -> Option<&OperationSet> {
        self.operations.as_ref()
    }

    /// Warnings raised while assembling
    pub fn issues(&self) -> &[LintIssue] {
        &self.issues
    }

    fn expect_state(&self, expected: SynthesisState) -> Result<(), SynthesisError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SynthesisError::OutOfOrder {
                expected,
                actual: self.state,
            })
        }
    }

    /// Unresolved → Configured; stays Unresolved on a configuration error
    pub fn configure(
        &mut self,
        introspector: &dyn ResourceIntrospector,
        declaration: &ResourceDeclaration<'_>,
        settings: &Settings,
    ) -> Result<&ResourceConfiguration, SynthesisError> {
        self.expect_state(SynthesisState::Unresolved)?;
        let assembled = assemble(introspector, declaration, settings)?;
        self.issues = assembled.issues;
        self.state = SynthesisState::Configured;
        Ok(self.configuration.insert(assembled.configuration))
    }

    /// Configured → Synthesizing → Synthesized
    pub fn synthesize(&mut self, options: &SynthesisOptions) -> Result<&OperationSet, SynthesisError> {
        self.expect_state(SynthesisState::Configured)?;
        let Some(configuration) = self.configuration.as_ref() else {
            return Err(SynthesisError::OutOfOrder {
                expected: SynthesisState::Configured,
                actual: SynthesisState::Unresolved,
            });
        };
        self.state = SynthesisState::Synthesizing;
        let operations = synthesize(configuration, options);
        self.state = SynthesisState::Synthesized;
        Ok(self.operations.insert(operations))
    }

    /// Configuration and operations once Synthesized
    pub fn into_resource(self) -> Option<SynthesizedResource> {
        match (self.state, self.configuration, self.operations) {
            (SynthesisState::Synthesized, Some(configuration), Some(operations)) => {
                Some(SynthesizedResource {
                    configuration,
                    operations,
                })
            }
            _ => None,
        }
    }
}

/// A resource that could not be configured
#[derive(Debug, Clone)]
pub struct ResourceFailure {
    /// Declaring type plus entity
    pub declaring_type: String,
    pub error: ConfigurationError,
}

/// Outcome of synthesizing every resource of a catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogReport {
    pub resources: Vec<SynthesizedResource>,
    pub failures: Vec<ResourceFailure>,
    pub issues: Vec<LintIssue>,
}

impl CatalogReport {
    pub fn operation_count(&self) -> usize {
        self.resources.iter().map(|r| r.operations.len()).sum()
    }

    pub fn resource(&self, controller_or_entity: &str) -> Option<&SynthesizedResource> {
        self.resources.iter().find(|r| {
            r.configuration.controller_name == controller_or_entity
                || r.configuration.resource_type_id == controller_or_entity
                || crate::naming::simple_name(&r.configuration.controller_name) == controller_or_entity
        })
    }
}

/// Synthesize every declared resource independently
///
/// A configuration error aborts its own resource and is recorded in
/// [`CatalogReport::failures`]; the other resources continue.
pub fn synthesize_catalog(
    introspector: &dyn ResourceIntrospector,
    settings: &Settings,
    options: &SynthesisOptions,
) -> CatalogReport {
    let mut report = CatalogReport::default();

    for declaration in discover_resources(introspector) {
        let mut synthesis = ResourceSynthesis::new();
        match synthesis.configure(introspector, &declaration, settings) {
            Ok(_) => {}
            Err(SynthesisError::Configuration(error)) => {
                tracing::warn!(resource = %declaration.label(), %error, "resource skipped");
                report.failures.push(ResourceFailure {
                    declaring_type: declaration.label(),
                    error,
                });
                continue;
            }
            Err(error) => {
                tracing::error!(resource = %declaration.label(), %error, "resource skipped");
                continue;
            }
        }

        for issue in synthesis.issues() {
            tracing::warn!(
                location = %issue.location,
                kind = %issue.kind,
                "{}",
                issue.message
            );
        }
        report.issues.extend(synthesis.issues().iter().cloned());

        if let Err(error) = synthesis.synthesize(options) {
            tracing::error!(resource = %declaration.label(), %error, "resource skipped");
            continue;
        }
        if let Some(resource) = synthesis.into_resource() {
            if options.verbosity != Verbosity::Quiet {
                tracing::info!(
                    controller = %resource.operations.controller_name,
                    operations = resource.operations.len(),
                    "resource synthesized"
                );
            }
            report.resources.push(resource);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Accessors;
    use http::Method;

    fn order_with(cardinality: Cardinality) -> ResourceConfiguration {
        let mut config = ResourceConfiguration::new("shop.OrderModel", "/orders");
        config.relations.push(RelationDescriptor {
            relation_name: "items".into(),
            cardinality,
            related_type_id: "shop.Item".into(),
            related_response_shape: "shop.Item".into(),
            related_id_type_id: "i32".into(),
            related_id_accessor_name: "getId".into(),
            accessors: Accessors::conventional("items"),
        });
        config
    }

    #[test]
    fn fixed_order_single() {
        let set = synthesize(&order_with(Cardinality::Single), &SynthesisOptions::default());
        assert_eq!(
            set.names(),
            vec![
                "create",
                "get",
                "update",
                "set",
                "delete",
                "all",
                "search_all",
                "get_items",
                "set_items",
                "remove_items"
            ]
        );
    }

    #[test]
    fn fixed_order_multiple() {
        let set = synthesize(&order_with(Cardinality::Multiple), &SynthesisOptions::default());
        assert_eq!(set.len(), 12);
        assert_eq!(
            &set.names()[7..],
            &[
                "get_items",
                "add_item",
                "add_item_by_id",
                "remove_item",
                "remove_item_by_id"
            ]
        );
    }

    #[test]
    fn scaffolding_has_five_collaborators() {
        let set = synthesize(&order_with(Cardinality::Single), &SynthesisOptions::default());
        assert_eq!(set.scaffolding.fields.len(), 5);
        assert_eq!(set.scaffolding.constructor[4], "reference_resolver");
    }

    #[test]
    fn state_machine_rejects_out_of_order() {
        let mut synthesis = ResourceSynthesis::new();
        assert_eq!(synthesis.state(), SynthesisState::Unresolved);
        let err = synthesis.synthesize(&SynthesisOptions::default()).unwrap_err();
        assert_eq!(
            err,
            SynthesisError::OutOfOrder {
                expected: SynthesisState::Configured,
                actual: SynthesisState::Unresolved
            }
        );

        let mut synthesis =
            ResourceSynthesis::configured(ResourceConfiguration::new("shop.Order", "/orders"));
        synthesis.synthesize(&SynthesisOptions::default()).unwrap();
        assert_eq!(synthesis.state(), SynthesisState::Synthesized);
        assert!(synthesis.synthesize(&SynthesisOptions::default()).is_err());
        assert_eq!(synthesis.into_resource().unwrap().operations.len(), 7);
    }

    #[test]
    fn existing_routes_only_remove_their_operation() {
        let mut config = order_with(Cardinality::Multiple);
        config
            .existing_routes
            .insert(&Method::POST, "/orders/{id}/items/{relationId}");
        let set = synthesize(&config, &SynthesisOptions::default());
        assert_eq!(set.len(), 11);
        assert!(set.by_name("add_item_by_id").is_none());
        assert!(set.by_name("add_item").is_some());
    }
}
