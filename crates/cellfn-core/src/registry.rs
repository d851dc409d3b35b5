//! Per-sheet registry of definitions and their compiled forms.

use rhai::AST;
use std::collections::HashMap;

use crate::definition::Definition;

/// Executable form of a definition's generated signature. Compiled by the
/// host application; this core stores it uninterpreted and hands it back
/// on request.
#[derive(Clone)]
pub struct CompiledFunction {
    name: String,
    ast: AST,
}

impl CompiledFunction {
    pub fn new(name: impl Into<String>, ast: AST) -> CompiledFunction {
        CompiledFunction {
            name: name.into(),
            ast,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ast(&self) -> &AST {
        &self.ast
    }
}

/// Definitions and compiled functions for one sheet, keyed by name.
/// Registering a second entry under the same name replaces the first and
/// hands the displaced entry back to the caller.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    definitions: HashMap<String, Definition>,
    compiled: HashMap<String, CompiledFunction>,
}

impl FunctionRegistry {
    pub fn new() -> FunctionRegistry {
        FunctionRegistry::default()
    }

    pub fn add_definition(&mut self, definition: Definition) -> Option<Definition> {
        self.definitions
            .insert(definition.name().to_string(), definition)
    }

    pub fn add_compiled(&mut self, function: CompiledFunction) -> Option<CompiledFunction> {
        self.compiled.insert(function.name().to_string(), function)
    }

    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    pub fn compiled(&self, name: &str) -> Option<&CompiledFunction> {
        self.compiled.get(name)
    }

    /// Live view of the registered definitions, not a snapshot.
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.values()
    }

    pub fn compiled_functions(&self) -> impl Iterator<Item = &CompiledFunction> {
        self.compiled.values()
    }

    /// Drop everything; used when the host re-derives a sheet's functions
    /// from scratch.
    pub fn clear(&mut self) {
        self.definitions.clear();
        self.compiled.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty() && self.compiled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellfn_engine::engine::new_grid;

    fn named(name: &str) -> Definition {
        let mut def = Definition::new(new_grid());
        def.set_name(name);
        def
    }

    #[test]
    fn test_duplicate_name_replaces_and_returns_old() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.add_definition(named("f")).is_none());
        let displaced = registry.add_definition(named("f"));
        assert!(displaced.is_some());
        assert_eq!(registry.definitions().count(), 1);
    }

    #[test]
    fn test_clear_empties_both_collections() {
        let mut registry = FunctionRegistry::new();
        registry.add_definition(named("f"));
        registry.add_compiled(CompiledFunction::new("f", rhai::AST::empty()));
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_by_name() {
        let mut registry = FunctionRegistry::new();
        registry.add_definition(named("addTax"));
        assert!(registry.definition("addTax").is_some());
        assert!(registry.definition("missing").is_none());
    }

    #[test]
    fn test_compiled_lookup_returns_stored_ast() {
        let engine = rhai::Engine::new();
        let ast = engine.compile("40 + 2").unwrap();

        let mut registry = FunctionRegistry::new();
        registry.add_compiled(CompiledFunction::new("answer", ast));

        let stored = registry.compiled("answer").unwrap();
        assert_eq!(stored.name(), "answer");
        let result: i64 = engine.eval_ast(stored.ast()).unwrap();
        assert_eq!(result, 42);
        assert!(registry.compiled("missing").is_none());
    }
}
