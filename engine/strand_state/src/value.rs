//! Runtime values produced by kernels.
//!
//! # Arc Enforcement
//!
//! Heap payloads go through factory methods on `Value`; the `Heap<T>`
//! constructor is crate-private, so external code cannot allocate heap
//! values directly.
//!
//! # Equality
//!
//! Scalars, strings, and lists compare structurally. Records compare by
//! identity: a `Value::Record` is a *reference* to a shared object, and two
//! references are equal exactly when they name the same object. This is what
//! lets tests assert that every slot of a built array holds the same
//! captured record.

use std::fmt;

use crate::captured::{Captured, CapturedRecord};
use crate::heap::Heap;
use crate::record::RecordValue;

/// Runtime value in the Strand engine.
#[derive(Clone)]
pub enum Value {
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Void (unit) value.
    Void,
    /// String value.
    Str(Heap<String>),
    /// List of values.
    List(Heap<Vec<Value>>),
    /// Reference to a shared record object.
    Record(CapturedRecord),
}

impl Value {
    /// Create a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Create a list value.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    /// Create a record value referencing a fresh shared object.
    pub fn record(record: RecordValue) -> Self {
        Value::Record(Captured::new(record))
    }

    /// Name of this value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Void => "void",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Void, Value::Void) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            // Reference identity, not field contents.
            (Value::Record(a), Value::Record(b)) => a.same_object(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Void => write!(f, "void"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Record(record) => write!(f, "{}", record.read()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "Str({s:?})"),
            other => write!(f, "{other}"),
        }
    }
}
