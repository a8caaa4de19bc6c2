//! The type registry: class graph, interfaces, and registered functions
//!
//! ## Design Principles
//!
//! 1. **Explicit, not global**: the registry is an ordinary value constructed
//!    by the caller and shared (usually via `Rc`) with every predicate and
//!    collection that classifies values. There is no hidden static state.
//! 2. **Resolution is checked at registration**: a class may only name a
//!    parent or interface that is already registered, so the subtype graph is
//!    acyclic and fully resolvable by construction.
//! 3. **Methods are native slots**: a class may carry named Rust callables
//!    invoked on instances. This backs the capability-invocation helper on
//!    restricted sets, which is only sound when a restriction pins a single
//!    class.

use crate::error::{Error, Result};
use crate::value::{Instance, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// A native method slot: called with the receiver instance and arguments
pub type NativeMethod = Rc<dyn Fn(&Instance, &[Value]) -> Result<Value>>;

/// Definition of a user class: name, optional parent, implemented interfaces,
/// and native method slots
#[derive(Clone)]
pub struct ClassDef {
    name: String,
    parent: Option<String>,
    interfaces: Vec<String>,
    methods: BTreeMap<String, NativeMethod>,
}

impl ClassDef {
    /// Start a class definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            interfaces: Vec::new(),
            methods: BTreeMap::new(),
        }
    }

    /// Declare the parent class
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Declare an implemented interface
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Attach a native method
    pub fn method(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&Instance, &[Value]) -> Result<Value> + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Rc::new(f));
        self
    }

    /// The class name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassDef")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("interfaces", &self.interfaces)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Class graph and function-name registry backing classification and
/// subtype-aware admission
#[derive(Default)]
pub struct TypeRegistry {
    classes: BTreeMap<String, ClassDef>,
    // interface name -> interfaces it extends
    interfaces: BTreeMap<String, Vec<String>>,
    functions: BTreeSet<String>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interface, optionally extending already-registered interfaces
    ///
    /// # Errors
    /// [`Error::UndefinedClass`] if an extended interface is not registered.
    pub fn register_interface(
        &mut self,
        name: impl Into<String>,
        extends: &[&str],
    ) -> Result<()> {
        for parent in extends {
            if !self.interfaces.contains_key(*parent) {
                return Err(Error::UndefinedClass((*parent).to_string()));
            }
        }
        self.interfaces
            .insert(name.into(), extends.iter().map(|s| s.to_string()).collect());
        Ok(())
    }

    /// Register a class
    ///
    /// # Errors
    /// [`Error::UndefinedClass`] if the parent class or an implemented
    /// interface is not registered.
    pub fn register_class(&mut self, def: ClassDef) -> Result<()> {
        if let Some(parent) = &def.parent {
            if !self.classes.contains_key(parent) {
                return Err(Error::UndefinedClass(parent.clone()));
            }
        }
        for interface in &def.interfaces {
            if !self.interfaces.contains_key(interface) {
                return Err(Error::UndefinedClass(interface.clone()));
            }
        }
        self.classes.insert(def.name.clone(), def);
        Ok(())
    }

    /// Register a function name (strings with this content classify as
    /// `NamedFunction`)
    pub fn register_function(&mut self, name: impl Into<String>) {
        self.functions.insert(name.into());
    }

    /// True if the name is a registered function
    pub fn is_function(&self, name: &str) -> bool {
        self.functions.contains(name)
    }

    /// True if the name resolves to a registered class or interface
    pub fn resolves(&self, name: &str) -> bool {
        self.classes.contains_key(name) || self.interfaces.contains_key(name)
    }

    /// True if `child` is the same as, a subclass of, or an implementor of
    /// `ancestor` (transitively, through parents and interface extension)
    pub fn is_subtype(&self, child: &str, ancestor: &str) -> bool {
        if child == ancestor {
            return self.resolves(child);
        }
        if self.classes.contains_key(child) {
            return self.class_ancestry(child).contains(ancestor);
        }
        if self.interfaces.contains_key(child) {
            return self.interface_ancestry(child).contains(ancestor);
        }
        false
    }

    /// Invoke a native method on an instance, walking the parent chain for
    /// the nearest definition
    ///
    /// # Errors
    /// - [`Error::UndefinedClass`] if the instance's class is not registered.
    /// - [`Error::NotFound`] if no class in the chain defines the method.
    pub fn invoke(&self, instance: &Instance, method: &str, args: &[Value]) -> Result<Value> {
        if !self.classes.contains_key(instance.class()) {
            return Err(Error::UndefinedClass(instance.class().to_string()));
        }
        let mut current = Some(instance.class().to_string());
        while let Some(class_name) = current {
            let def = match self.classes.get(&class_name) {
                Some(def) => def,
                None => break,
            };
            if let Some(slot) = def.methods.get(method) {
                return (slot.as_ref())(instance, args);
            }
            current = def.parent.clone();
        }
        Err(Error::NotFound(format!(
            "method `{}` on class `{}`",
            method,
            instance.class()
        )))
    }

    /// All ancestors of a class: parent chain plus every interface reachable
    /// from any class in the chain
    fn class_ancestry(&self, class: &str) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        let mut current = self.classes.get(class);
        while let Some(def) = current {
            if def.name != class {
                out.insert(def.name.clone());
            }
            for interface in &def.interfaces {
                out.insert(interface.clone());
                out.extend(self.interface_ancestry(interface));
            }
            current = def.parent.as_deref().and_then(|p| self.classes.get(p));
        }
        out
    }

    /// All interfaces transitively extended by an interface
    fn interface_ancestry(&self, interface: &str) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        let mut stack = vec![interface.to_string()];
        while let Some(name) = stack.pop() {
            if let Some(parents) = self.interfaces.get(&name) {
                for parent in parents {
                    if out.insert(parent.clone()) {
                        stack.push(parent.clone());
                    }
                }
            }
        }
        out
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("classes", &self.classes.keys().collect::<Vec<_>>())
            .field("interfaces", &self.interfaces.keys().collect::<Vec<_>>())
            .field("functions", &self.functions)
            .finish()
    }
}
