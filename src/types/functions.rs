use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::Record;

/// Signature of a function callable from a rule as `name(args)`.
pub type RuleFn = dyn Fn(&Record) -> bool + Send + Sync;

/// Named predicates available to call-syntax operands.
///
/// Populated once at startup and read-only afterwards. Cloning is cheap; the
/// functions themselves are shared.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<RuleFn>>,
}

impl FunctionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under `name`, replacing any previous registration.
    #[must_use]
    pub fn register(
        mut self,
        name: &str,
        f: impl Fn(&Record) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.functions.insert(name.to_owned(), Arc::new(f));
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RuleFn> {
        self.functions.get(name).map(|f| &**f)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}
