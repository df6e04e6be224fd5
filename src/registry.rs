//! Environment definitions, counters and assigned numbers.

use fxhash::FxHashMap;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberingScope {
    /// Declared with `[section]`; the runtime counter still runs continuously.
    #[default]
    Section,
    Global,
}

impl NumberingScope {
    /// Parse a `numbering-style` value. Unknown styles yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "section" => Some(NumberingScope::Section),
            "global" => Some(NumberingScope::Global),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDefinition {
    pub key: String,
    pub display_name: String,
    pub reference_prefix: String,
    pub output_name: String,
    pub numbered: bool,
    pub numbering_scope: NumberingScope,
}

#[derive(Debug, Clone)]
struct EnvironmentState {
    definition: EnvironmentDefinition,
    counter: u32,
    numbers: FxHashMap<String, String>,
}

/// Per-document registry shared by the block and reference passes.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    environments: IndexMap<String, EnvironmentState>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition. Returns the definition it replaced, if any.
    pub fn insert(&mut self, definition: EnvironmentDefinition) -> Option<EnvironmentDefinition> {
        let state = EnvironmentState {
            definition,
            counter: 0,
            numbers: FxHashMap::default(),
        };
        self.environments
            .insert(state.definition.key.clone(), state)
            .map(|previous| previous.definition)
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    /// Definitions in declaration order.
    pub fn definitions(&self) -> impl Iterator<Item = &EnvironmentDefinition> {
        self.environments.values().map(|state| &state.definition)
    }

    pub fn get(&self, key: &str) -> Option<&EnvironmentDefinition> {
        self.environments.get(key).map(|state| &state.definition)
    }

    /// The environment an identifier belongs to (`<key>-...`).
    ///
    /// Keys are tried in declaration order; the first match wins.
    pub fn match_id(&self, id: &str) -> Option<&EnvironmentDefinition> {
        if id.is_empty() {
            return None;
        }
        self.environments
            .values()
            .map(|state| &state.definition)
            .find(|def| {
                id.strip_prefix(def.key.as_str())
                    .is_some_and(|rest| rest.starts_with('-'))
            })
    }

    /// Advance the counter for `key`, record the number for `id` and return it.
    pub fn assign_number(&mut self, key: &str, id: &str) -> Option<String> {
        let state = self.environments.get_mut(key)?;
        state.counter += 1;
        let number = state.counter.to_string();
        state.numbers.insert(id.to_string(), number.clone());
        Some(number)
    }

    /// The number recorded for `id` under `key`, if it was rendered already.
    pub fn number_for(&self, key: &str, id: &str) -> Option<&str> {
        self.environments
            .get(key)?
            .numbers
            .get(id)
            .map(String::as_str)
    }

    /// Current counter value for `key` (0 before any instance).
    pub fn counter(&self, key: &str) -> Option<u32> {
        self.environments.get(key).map(|state| state.counter)
    }
}
