use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::domain::table::Table;

/// Process-wide handle→table map. Injected into the HTTP layer instead of
/// living as a module global; entries are never evicted and die with the
/// process.
pub struct TableStore {
    tables: Mutex<HashMap<String, Arc<Table>>>,
}

impl TableStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
        }
    }

    /// Store a table and return its opaque handle.
    pub fn insert(&self, table: Table) -> String {
        let key = Uuid::new_v4().simple().to_string();
        self.tables
            .lock()
            .unwrap()
            .insert(key.clone(), Arc::new(table));
        key
    }

    pub fn get(&self, key: &str) -> Option<Arc<Table>> {
        self.tables.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.tables.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TableStore {
    fn default() -> Self {
        Self::new()
    }
}
