use super::introspect::ResourceIntrospector;
use super::types::{Member, TypeDecl};
use crate::error::ConfigurationError;
use http::Method;
use serde::Serialize;
use std::collections::BTreeSet;

/// Mapping markers scraped from hand-written methods, with the verb each implies.
/// `RequestMapping` carries its verbs in a `method` list instead.
const MAPPING_MARKERS: [(&str, Option<Method>); 6] = [
    ("GetMapping", Some(Method::GET)),
    ("PostMapping", Some(Method::POST)),
    ("PutMapping", Some(Method::PUT)),
    ("PatchMapping", Some(Method::PATCH)),
    ("DeleteMapping", Some(Method::DELETE)),
    ("RequestMapping", None),
];

/// Routes already implemented by hand
///
/// Stored as `(METHOD, lower-cased path)` pairs. An operation whose pair is
/// present is never synthesized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExistingRoutes {
    routes: BTreeSet<(String, String)>,
}

impl ExistingRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(method: &Method, path: &str) -> (String, String) {
        (method.as_str().to_ascii_uppercase(), path.to_lowercase())
    }

    pub fn insert(&mut self, method: &Method, path: &str) {
        self.routes.insert(Self::key(method, path));
    }

    pub fn contains(&self, method: &Method, path: &str) -> bool {
        self.routes.contains(&Self::key(method, path))
    }

    /// True if any of `methods` is already routed at `path`
    pub fn contains_any(&self, methods: &[Method], path: &str) -> bool {
        methods.iter().any(|m| self.contains(m, path))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes.iter().map(|(m, p)| (m.as_str(), p.as_str()))
    }

    /// Scrape mapping markers from the methods of `controller`
    ///
    /// The path comes from the marker's `value` (or `path`); paths of length
    /// one or less are ignored. `RequestMapping` defaults to `GET` when it
    /// lists no verbs.
    pub fn scrape(
        introspector: &dyn ResourceIntrospector,
        controller: &TypeDecl,
    ) -> Result<Self, ConfigurationError> {
        let mut routes = Self::new();
        for method in introspector.methods(&controller.id) {
            let member = Member::Method(controller, method);
            for marker in introspector.markers_on(member) {
                let Some((_, verb)) = MAPPING_MARKERS.iter().find(|(name, _)| *name == marker.name)
                else {
                    continue;
                };
                let values = marker.values(member.location());
                let Some(path) = values.first_of(&["value", "path"]) else {
                    continue;
                };
                if path.len() <= 1 {
                    continue;
                }
                match verb {
                    Some(verb) => routes.insert(verb, path),
                    None => {
                        let listed = values.list("method");
                        if listed.is_empty() {
                            routes.insert(&Method::GET, path);
                        }
                        for raw in listed {
                            let verb = parse_method(raw)
                                .ok_or_else(|| values.invalid("method", raw))?;
                            routes.insert(&verb, path);
                        }
                    }
                }
            }
        }
        Ok(routes)
    }
}

/// Parse a verb such as `get`, `POST` or `RequestMethod.PATCH`
fn parse_method(raw: &str) -> Option<Method> {
    let verb = raw.rsplit('.').next().unwrap_or(raw).trim().to_ascii_uppercase();
    match verb.as_str() {
        "GET" => Some(Method::GET),
        "POST" => Some(Method::POST),
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        "HEAD" => Some(Method::HEAD),
        "OPTIONS" => Some(Method::OPTIONS),
        _ => None,
    }
}
