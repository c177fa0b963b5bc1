//! The lexically scoped type environment.
//!
//! A [`TypeEnv`] is a stack of scopes, each mapping names to variable,
//! function, class, and trait types. Lookup walks from the innermost scope
//! outward. Only function bodies push scopes; inner blocks share their
//! enclosing function's scope.

use std::collections::HashMap;

use crate::ast::Type;

/// Information about a variable binding.
#[derive(Debug, Clone)]
pub struct VariableInfo {
    /// The variable's type.
    pub ty: Type,
    /// Whether the binding was declared `const`.
    pub is_const: bool,
}

/// Information about a registered class.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    /// Field names and types in declaration order.
    pub fields: Vec<(String, Type)>,
    /// Method names and their function types in declaration order.
    pub methods: Vec<(String, Type)>,
    /// Names of the traits the class declares.
    pub traits: Vec<String>,
}

impl ClassInfo {
    /// Returns the type of the named field, if declared.
    pub fn field_type(&self, name: &str) -> Option<&Type> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, ty)| ty)
    }

    /// Returns the function type of the named method, if declared.
    pub fn method_type(&self, name: &str) -> Option<&Type> {
        self.methods
            .iter()
            .find(|(method, _)| method == name)
            .map(|(_, ty)| ty)
    }
}

/// Information about a registered trait.
#[derive(Debug, Clone)]
pub struct TraitInfo {
    /// Method signature names and function types in declaration order.
    pub methods: Vec<(String, Type)>,
}

/// One scope level: name-to-type maps for each namespace.
#[derive(Debug, Default)]
struct Scope {
    variables: HashMap<String, VariableInfo>,
    functions: HashMap<String, Type>,
    classes: HashMap<String, ClassInfo>,
    traits: HashMap<String, TraitInfo>,
}

/// A stack of scopes with outward lookup.
#[derive(Debug)]
pub struct TypeEnv {
    scopes: Vec<Scope>,
}

impl TypeEnv {
    /// Creates an environment with a single outermost scope.
    pub fn new() -> Self {
        TypeEnv {
            scopes: vec![Scope::default()],
        }
    }

    /// Pushes a fresh scope. Called when entering a function body.
    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Pops the innermost scope. Called when leaving a function body.
    ///
    /// The outermost scope is never popped.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    fn innermost(&mut self) -> &mut Scope {
        // new() guarantees at least one scope.
        self.scopes.last_mut().expect("at least one scope")
    }

    /// Defines a variable in the innermost scope, shadowing any outer
    /// binding of the same name.
    pub fn define_variable(&mut self, name: &str, info: VariableInfo) {
        self.innermost().variables.insert(name.to_string(), info);
    }

    /// Looks up a variable, walking from the innermost scope outward.
    pub fn lookup_variable(&self, name: &str) -> Option<&VariableInfo> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.variables.get(name))
    }

    /// Defines a function in the innermost scope.
    pub fn define_function(&mut self, name: &str, ty: Type) {
        self.innermost().functions.insert(name.to_string(), ty);
    }

    /// Looks up a function, walking from the innermost scope outward.
    pub fn lookup_function(&self, name: &str) -> Option<&Type> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.functions.get(name))
    }

    /// Defines a class in the innermost scope.
    pub fn define_class(&mut self, name: &str, info: ClassInfo) {
        self.innermost().classes.insert(name.to_string(), info);
    }

    /// Looks up a class, walking from the innermost scope outward.
    pub fn lookup_class(&self, name: &str) -> Option<&ClassInfo> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.classes.get(name))
    }

    /// Defines a trait in the innermost scope.
    pub fn define_trait(&mut self, name: &str, info: TraitInfo) {
        self.innermost().traits.insert(name.to_string(), info);
    }

    /// Looks up a trait, walking from the innermost scope outward.
    pub fn lookup_trait(&self, name: &str) -> Option<&TraitInfo> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.traits.get(name))
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}
