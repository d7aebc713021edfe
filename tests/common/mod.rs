#![allow(dead_code)]

pub mod temp_files {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    // Global counter and lock for thread-safe temporary file creation
    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);
    static TEMP_LOCK: Mutex<()> = Mutex::new(());

    fn unique_name(stem: &str) -> String {
        let _lock = TEMP_LOCK.lock().unwrap();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("{stem}_{}_{}_{}", std::process::id(), counter, nanos)
    }

    /// Creates a fresh temporary directory
    pub fn create_temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(unique_name("brrtcrud_test_dir"));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Writes a catalog into its own temporary directory so no stray
    /// `brrtcrud.toml` is picked up next to it
    pub fn create_temp_catalog(content: &str, ext: &str) -> PathBuf {
        let path = create_temp_dir().join(format!("catalog.{ext}"));
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn create_temp_yaml(content: &str) -> PathBuf {
        create_temp_catalog(content, "yaml")
    }

    pub fn create_temp_json(content: &str) -> PathBuf {
        create_temp_catalog(content, "json")
    }

    /// Cleanup temporary directories (best effort)
    pub fn cleanup_temp_dirs(paths: &[PathBuf]) {
        for path in paths {
            if std::fs::remove_dir_all(path).is_err() {
                eprintln!("could not remove {path:?}");
            }
        }
    }
}

pub mod fixtures {
    use brrtcrud::resource::{discover_resources, parse_catalog, DeclaredTypes};
    use brrtcrud::settings::Settings;
    use brrtcrud::synth::{ResourceSynthesis, SynthesisOptions, SynthesizedResource};

    /// `Order` with an int id, no DTO, and a `products` relation whose
    /// `ProductDto` is found by naming convention
    pub const ORDERS: &str = r#"
title: Orders
types:
  - id: shop.OrderModel
    markers:
      - { name: CrudResource, values: { value: /orders, entity: shop.OrderModel } }
    fields:
      - { name: id, type: i32, markers: [{ name: Id }] }
      - { name: products, type: "List<shop.ProductEntity>", markers: [{ name: ManyToMany }] }
    methods:
      - { name: getProducts }
      - { name: addProduct }
      - { name: removeProduct }
  - id: shop.ProductEntity
    fields:
      - { name: id, type: i32, markers: [{ name: Id }] }
  - id: shop.ProductDto
    fields:
      - { name: id, type: i32 }
"#;

    /// A shop with a hand-written list route, a security marker, every
    /// relation flavor, a wrapped employee resource and one broken resource
    pub const SHOP: &str = r#"
title: Shop Api
settings:
  page_size: 50
types:
  - id: shop.OrderController
    markers:
      - { name: CrudResource, values: { value: /orders, entity: shop.OrderModel } }
      - { name: CrudSecurity, values: { pattern: "ROLE_{METHOD}_{ENTITY}", inclusive: false } }
    methods:
      - { name: listOrders, markers: [{ name: GetMapping, values: { value: /Orders } }] }
  - id: shop.OrderModel
    fields:
      - { name: id, type: i32, markers: [{ name: Id }] }
      - { name: products, type: "List<shop.ProductEntity>", markers: [{ name: ManyToMany }] }
      - { name: customer, type: shop.CustomerDao, markers: [{ name: ManyToOne }] }
      - { name: thing, type: shop.Thing, markers: [{ name: Relation, values: { get: fetchThing } }] }
      - { name: notes, type: "List<String>" }
  - id: shop.ProductEntity
    fields:
      - { name: id, type: i32, markers: [{ name: Id }] }
  - id: shop.ProductDto
  - id: shop.CustomerDao
    fields:
      - { name: customerNo, type: String, markers: [{ name: Id }] }
  - id: shop.Thing
    fields:
      - { name: id, type: i64, markers: [{ name: Id }] }
    methods:
      - { name: readThing, markers: [{ name: RelationAccessor, values: { name: thing, type: [GET] } }] }
      - { name: replaceThing, markers: [{ name: RelationAccessor, values: { name: thing, type: [SET] } }] }
  - id: staff.EmployeeController
    markers:
      - name: CrudResource
        values:
          value: /employees/
          entity: staff.Employee
          dto: EmployeeDto
          wrapper: staff.Envelope
  - id: staff.Employee
    fields:
      - { name: perNo, type: i64, markers: [{ name: Id }] }
  - id: staff.EmployeeDto
  - id: broken.Ghosts
    markers:
      - { name: CrudResource, values: { entity: broken.Ghost } }
"#;

    pub fn types(catalog: &str) -> DeclaredTypes {
        DeclaredTypes::new(parse_catalog(catalog, true).unwrap().types)
    }

    /// Configure and synthesize the first resource of a catalog
    pub fn synthesize_first(catalog: &str, settings: &Settings) -> SynthesizedResource {
        let types = types(catalog);
        let declarations = discover_resources(&types);
        let mut synthesis = ResourceSynthesis::new();
        synthesis
            .configure(&types, &declarations[0], settings)
            .unwrap();
        synthesis.synthesize(&SynthesisOptions::default()).unwrap();
        synthesis.into_resource().unwrap()
    }
}
