//! # Naming & Inflection
//!
//! String transforms shared by the resolvers and synthesizers:
//!
//! - **Suffix stripping** - `OrderModel` → `Order` ([`normalize_entity_name`])
//! - **Inflection** - `products` → `product` ([`singularize`]), `Order` → `orders` ([`pluralize`])
//! - **Pattern substitution** - `ROLE_{METHOD}_{ENTITY}` → `ROLE_READ_ORDER` ([`substitute`])
//! - **Type ids** - simple names and namespaces of `shop.OrderModel` / `shop::OrderModel`
//!
//! Every function here is pure; none of them allocate more than the returned value.
//!
//! ## Suffix stripping
//!
//! [`normalize_entity_name`] is single-pass: the suffix list is checked in order
//! and stripping stops at the first match, so `FooEntityDao` becomes `FooEntity`
//! and `FooDaoModel` becomes `FooDao` with the default list. A name carrying two
//! listed suffixes keeps the inner one; callers that want `Foo` there must list
//! the combined suffix (`DaoModel`) explicitly.

/// Entity-name suffixes stripped by default, checked in this order.
pub const DEFAULT_ENTITY_SUFFIXES: [&str; 4] = ["Model", "Entity", "BO", "Dao"];

/// Suffix appended to a normalized entity name when looking up its DTO.
pub const DEFAULT_DTO_SUFFIX: &str = "Dto";

/// Strip the first matching suffix from `name`.
///
/// A suffix equal to the whole name is not stripped, so `Model` stays `Model`.
///
/// # Example
///
/// ```
/// use brrtcrud::naming::{normalize_entity_name, DEFAULT_ENTITY_SUFFIXES};
///
/// assert_eq!(normalize_entity_name("OrderModel", &DEFAULT_ENTITY_SUFFIXES), "Order");
/// assert_eq!(normalize_entity_name("FooEntityDao", &DEFAULT_ENTITY_SUFFIXES), "FooEntity");
/// ```
pub fn normalize_entity_name<S: AsRef<str>>(name: &str, suffixes: &[S]) -> String {
    for suffix in suffixes {
        let suffix = suffix.as_ref();
        if !suffix.is_empty() && name.len() > suffix.len() && name.ends_with(suffix) {
            return name[..name.len() - suffix.len()].to_string();
        }
    }
    name.to_string()
}

/// Remove `suffix` from the end of `value` if present.
pub fn remove_end<'a>(value: &'a str, suffix: &str) -> &'a str {
    value.strip_suffix(suffix).unwrap_or(value)
}

/// Upper-case the first character.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character.
pub fn decapitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Basic English singular form of a pluralized relation name.
///
/// `categories` → `category`, `addresses` → `address`, `statuses` → `status`,
/// `products` → `product`. Words ending in `ss`, `us` or `is` (`status`,
/// `analysis`) and words not ending in `s` are returned unchanged.
pub fn singularize(value: &str) -> String {
    let lower = value.to_ascii_lowercase();
    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", &value[..value.len() - 3]);
    }
    if lower.len() > 4
        && (lower.ends_with("sses")
            || lower.ends_with("uses")
            || lower.ends_with("xes")
            || lower.ends_with("ches"))
    {
        return value[..value.len() - 2].to_string();
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") || lower.len() <= 1 {
        return value.to_string();
    }
    remove_end(value, "s").to_string()
}

/// Basic English plural form, the inverse of [`singularize`] for regular nouns.
pub fn pluralize(value: &str) -> String {
    let lower = value.to_ascii_lowercase();
    if lower.ends_with('y')
        && !lower.ends_with("ay")
        && !lower.ends_with("ey")
        && !lower.ends_with("oy")
        && !lower.ends_with("uy")
    {
        return format!("{}ies", &value[..value.len() - 1]);
    }
    if lower.ends_with('s') || lower.ends_with('x') || lower.ends_with("ch") || lower.ends_with("sh")
    {
        return format!("{value}es");
    }
    format!("{value}s")
}

/// Position and width of the last namespace separator (`::` or `.`) in a type id.
fn last_separator(type_id: &str) -> Option<(usize, &'static str)> {
    let colons = type_id.rfind("::").map(|i| (i, "::"));
    let dot = type_id.rfind('.').map(|i| (i, "."));
    match (colons, dot) {
        (Some(c), Some(d)) => Some(if c.0 > d.0 { c } else { d }),
        (c, d) => c.or(d),
    }
}

/// Simple name of a type id: `shop.OrderModel` → `OrderModel`.
///
/// Generic arguments are ignored when locating the separator, so
/// `List<shop.Product>` is returned unchanged.
pub fn simple_name(type_id: &str) -> &str {
    if type_id.contains('<') {
        return type_id;
    }
    match last_separator(type_id) {
        Some((index, sep)) => &type_id[index + sep.len()..],
        None => type_id,
    }
}

/// Namespace and separator of a type id: `shop.OrderModel` → `("shop", ".")`.
pub fn namespace_of(type_id: &str) -> Option<(&str, &'static str)> {
    if type_id.contains('<') {
        return None;
    }
    last_separator(type_id).map(|(index, sep)| (&type_id[..index], sep))
}

/// Whether a name already carries a namespace separator.
pub fn is_qualified(name: &str) -> bool {
    name.contains("::") || name.contains('.')
}

/// Qualify `name` with the namespace of `sibling` unless it is already qualified.
pub fn qualify(name: &str, sibling: &str) -> String {
    if is_qualified(name) {
        return name.to_string();
    }
    match namespace_of(sibling) {
        Some((namespace, sep)) => format!("{namespace}{sep}{name}"),
        None => name.to_string(),
    }
}

/// Replace every `{TOKEN}` occurrence in `pattern`.
///
/// Unknown tokens are left untouched.
pub fn substitute(pattern: &str, tokens: &[(&str, &str)]) -> String {
    let mut result = pattern.to_string();
    for (token, value) in tokens {
        result = result.replace(&format!("{{{token}}}"), value);
    }
    result
}

/// Convert `camelCase` / `PascalCase` / `kebab-case` into `snake_case`.
pub fn to_snake_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    let mut prev_lower_or_digit = false;
    for ch in value.chars() {
        if ch == '-' || ch == ' ' || ch == '_' {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            prev_lower_or_digit = false;
        } else if ch.is_uppercase() {
            if prev_lower_or_digit && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
            prev_lower_or_digit = false;
        } else {
            out.push(ch);
            prev_lower_or_digit = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}

/// Convert `snake_case` into `PascalCase`.
pub fn to_pascal_case(value: &str) -> String {
    value
        .split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect()
}

/// Turn a free-form title into a slug: `Shop API` → `shop_api`.
pub fn slugify(value: &str) -> String {
    value
        .to_lowercase()
        .replace(|c: char| !c.is_ascii_alphanumeric(), "_")
        .trim_matches('_')
        .to_string()
}

/// Rust path for a type id: `shop.OrderModel` → `shop::OrderModel`.
pub fn to_rust_path(type_id: &str) -> String {
    type_id.replace('.', "::")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_known_suffixes() {
        assert_eq!(normalize_entity_name("OrderModel", &DEFAULT_ENTITY_SUFFIXES), "Order");
        assert_eq!(normalize_entity_name("ProductEntity", &DEFAULT_ENTITY_SUFFIXES), "Product");
        assert_eq!(normalize_entity_name("CustomerDao", &DEFAULT_ENTITY_SUFFIXES), "Customer");
        assert_eq!(normalize_entity_name("InvoiceBO", &DEFAULT_ENTITY_SUFFIXES), "Invoice");
        assert_eq!(normalize_entity_name("Employee", &DEFAULT_ENTITY_SUFFIXES), "Employee");
    }

    #[test]
    fn normalize_is_single_pass() {
        assert_eq!(normalize_entity_name("FooEntityDao", &DEFAULT_ENTITY_SUFFIXES), "FooEntity");
        assert_eq!(normalize_entity_name("FooModelEntity", &DEFAULT_ENTITY_SUFFIXES), "FooModel");
        assert_eq!(normalize_entity_name("FooDaoModel", &DEFAULT_ENTITY_SUFFIXES), "FooDao");
        assert_eq!(normalize_entity_name("Model", &DEFAULT_ENTITY_SUFFIXES), "Model");
    }

    #[test]
    fn normalize_honours_custom_suffixes() {
        assert_eq!(normalize_entity_name("OrderRecord", &["Record"]), "Order");
        assert_eq!(normalize_entity_name("OrderModel", &Vec::<String>::new()), "OrderModel");
    }

    #[test]
    fn singular_and_plural() {
        assert_eq!(singularize("products"), "product");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("staff"), "staff");
        assert_eq!(singularize("class"), "class");
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("statuses"), "status");
        assert_eq!(singularize("analysis"), "analysis");
        assert_eq!(singularize("Orders"), "Order");
        assert_eq!(pluralize("order"), "orders");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("key"), "keys");
        assert_eq!(pluralize("box"), "boxes");
    }

    #[test]
    fn type_id_helpers() {
        assert_eq!(simple_name("shop.OrderModel"), "OrderModel");
        assert_eq!(simple_name("shop::model::OrderModel"), "OrderModel");
        assert_eq!(simple_name("OrderModel"), "OrderModel");
        assert_eq!(namespace_of("shop.model.OrderModel"), Some(("shop.model", ".")));
        assert_eq!(namespace_of("shop::OrderModel"), Some(("shop", "::")));
        assert_eq!(namespace_of("OrderModel"), None);
        assert_eq!(qualify("GeneratedOrder", "shop.OrderController"), "shop.GeneratedOrder");
        assert_eq!(qualify("other.Thing", "shop.OrderController"), "other.Thing");
        assert_eq!(qualify("Thing", "Top"), "Thing");
    }

    #[test]
    fn substitute_replaces_all_tokens() {
        let out = substitute(
            "ROLE_{METHOD}_{ENTITY}_{METHOD}",
            &[("METHOD", "READ"), ("ENTITY", "Order")],
        );
        assert_eq!(out, "ROLE_READ_Order_READ");
        assert_eq!(substitute("{UNKNOWN}", &[("NAME", "x")]), "{UNKNOWN}");
    }

    #[test]
    fn case_conversions() {
        assert_eq!(to_snake_case("getProducts"), "get_products");
        assert_eq!(to_snake_case("searchAll"), "search_all");
        assert_eq!(to_snake_case("addProductById"), "add_product_by_id");
        assert_eq!(to_snake_case("order-lines"), "order_lines");
        assert_eq!(to_pascal_case("generated_order"), "GeneratedOrder");
        assert_eq!(capitalize("products"), "Products");
        assert_eq!(decapitalize("Products"), "products");
        assert_eq!(slugify("Shop API v2"), "shop_api_v2");
        assert_eq!(to_rust_path("shop.OrderModel"), "shop::OrderModel");
    }
}
