//! Host objects and class handles.

use std::fmt;

use quill_ir::Symbol;

use crate::errors::EvalResult;
use crate::value::HostValue;

/// An object owned by the host and exposed to scripts.
///
/// Properties are looked up by name on every access. Methods are not part of
/// this trait: they are registered on the [`HostRegistry`](super::HostRegistry)
/// under the object's `type_name`.
pub trait HostObject: Send + Sync + fmt::Debug {
    /// Type name used for method lookup and error messages.
    fn type_name(&self) -> &str;

    /// Current value of a property, or `None` if the object has no such
    /// property.
    fn property(&self, name: &str) -> Option<HostValue>;

    /// Write a property. `Ok(false)` means the property is read-only or
    /// does not exist.
    fn set_property(&self, name: &str, value: HostValue) -> EvalResult<bool> {
        let _ = (name, value);
        Ok(false)
    }
}

/// Handle to a host class, the receiver of static member access.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HostType {
    name: Symbol,
}

impl HostType {
    pub fn new(name: &str) -> Self {
        HostType {
            name: Symbol::intern(name),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn symbol(&self) -> &Symbol {
        &self.name
    }
}

impl fmt::Debug for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostType({})", self.name)
    }
}
