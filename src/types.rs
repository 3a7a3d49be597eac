//! Core types - property values, property maps, transition timing.
//!
//! Renderers describe a host object as a `(kind, property-map)` pair.
//! Property values are a closed tagged union ([`Value`]) so the diff policy
//! can match on entry kind instead of probing marker fields. Property maps
//! ([`Props`]) preserve insertion order and carry three entry kinds: plain
//! values, subscription cells, and child render thunks under numeric keys.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use bitflags::bitflags;

use crate::engine::context::SubscriptionCell;
use crate::error::{Result, RuntimeError};
use crate::render::builder::RenderEntry;

// =============================================================================
// Callback Types
// =============================================================================

/// Cleanup function returned by effects and event bindings.
///
/// Runs exactly once: unmount cleanups on the host teardown signal, binding
/// cleanups when an event slot is rebound.
pub type Cleanup = Box<dyn FnOnce()>;

/// Completion callback captured by a transition calculator.
pub type Completion = Box<dyn FnOnce()>;

/// Event callback bound to a host object event.
///
/// Rc<dyn Fn> so the same callback can be held by the event slot and the
/// live backend binding at once.
pub type EventCallback = Rc<dyn Fn(&Value)>;

/// Write-through callback held by a subscription cell listener.
pub type WriteCallback = Box<dyn Fn(&Value)>;

/// Effect body. A returned cleanup is collected into the unmount accumulator.
pub type EffectFn = Rc<dyn Fn() -> Option<Cleanup>>;

/// Transition calculator: builds backend timing parameters for a target
/// value and may register a completion callback.
pub type TransitionCalc = Rc<dyn Fn(&Value, &mut dyn FnMut(Completion)) -> Timing>;

/// Renderer function: props in, `(kind, property-map)` out.
pub type Renderer = Rc<dyn Fn(&Props) -> Result<RenderOutput>>;

// =============================================================================
// Hook Options
// =============================================================================

bitflags! {
    /// Enabled-hooks option set for a builder.
    ///
    /// `state`, `effect` and the render trigger are always available; the
    /// flags below gate the remaining hooks. `ENABLE_ALL` bypasses the
    /// per-hook checks, `HYDRATION` permits hydration-mode factories.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HookOptions: u8 {
        const EVENT        = 1 << 0;
        const TRANSITION   = 1 << 1;
        const ANIMATION    = 1 << 2;
        const SUBSCRIPTION = 1 << 3;
        const ENABLE_ALL   = 1 << 4;
        const HYDRATION    = 1 << 5;
    }
}

// =============================================================================
// Value
// =============================================================================

/// Primitive kind of a [`Value`], used at the type-change boundary: a
/// property whose kind changes between renders is assigned directly and
/// never routed through a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Str,
    Opaque,
}

/// A host property value.
///
/// `Opaque` is the structured pass-through: a value the diff policy does not
/// inspect and always assigns directly. Opaque values compare by pointer
/// identity.
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Opaque(Rc<dyn Any>),
}

impl Value {
    /// Wrap an arbitrary structured value for opaque pass-through.
    pub fn opaque<T: Any>(value: T) -> Self {
        Value::Opaque(Rc::new(value))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Opaque(_) => ValueKind::Opaque,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Downcast an opaque value to its concrete type.
    pub fn downcast_opaque<T: Any>(&self) -> Option<Rc<T>> {
        match self {
            Value::Opaque(rc) => rc.clone().downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Opaque(_) => write!(f, "Opaque(..)"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

// =============================================================================
// Transition Timing
// =============================================================================

/// Easing curve for a timed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

/// Backend-facing timing parameters built by a transition calculator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Timing {
    pub duration: Duration,
    pub delay: Duration,
    pub easing: Easing,
}

impl Timing {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            easing: Easing::Linear,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

// =============================================================================
// Property Maps
// =============================================================================

/// Key of a property-map entry.
///
/// String keys name compared host properties. Numeric keys hold child render
/// thunks, invoked by the diff policy and never compared as properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropKey {
    Name(String),
    Index(u32),
}

/// One property-map entry.
#[derive(Clone)]
pub enum PropEntry {
    /// A plain value, applied through the diff policy.
    Value(Value),
    /// A subscription cell: bound as a write-through listener, bypassing
    /// renders on later updates.
    Subscription(SubscriptionCell),
    /// A nested component render entry, invoked as a zero-argument thunk.
    Child(RenderEntry),
}

/// Insertion-ordered property map.
#[derive(Clone, Default)]
pub struct Props {
    entries: Vec<(PropKey, PropEntry)>,
    next_child: u32,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a named property, replacing any previous entry under the name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.insert(PropKey::Name(name.into()), PropEntry::Value(value.into()));
    }

    /// Bind a subscription cell to a named property.
    pub fn bind(&mut self, name: impl Into<String>, cell: SubscriptionCell) {
        self.insert(PropKey::Name(name.into()), PropEntry::Subscription(cell));
    }

    /// Append a child render entry under the next numeric key.
    pub fn child(&mut self, entry: RenderEntry) {
        let index = self.next_child;
        self.next_child += 1;
        self.entries
            .push((PropKey::Index(index), PropEntry::Child(entry)));
    }

    fn insert(&mut self, key: PropKey, entry: PropEntry) {
        if let Some(position) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries[position].1 = entry;
        } else {
            self.entries.push((key, entry));
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropEntry> {
        self.entries.iter().find_map(|(key, entry)| match key {
            PropKey::Name(n) if n == name => Some(entry),
            _ => None,
        })
    }

    /// The plain value under a name, if the entry is a plain value.
    pub fn value(&self, name: &str) -> Option<&Value> {
        match self.get(name) {
            Some(PropEntry::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (PropKey, PropEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Render Output
// =============================================================================

/// What a renderer returns: a kind identifier plus the property map to
/// reconcile against the host object.
pub struct RenderOutput {
    pub kind: String,
    pub props: Props,
}

impl RenderOutput {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            props: Props::new(),
        }
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.set(name, value);
        self
    }

    pub fn bind(mut self, name: impl Into<String>, cell: SubscriptionCell) -> Self {
        self.props.bind(name, cell);
        self
    }

    pub fn child(mut self, entry: RenderEntry) -> Self {
        self.props.child(entry);
        self
    }
}

/// Shape check applied to every renderer return value.
pub(crate) fn check_output_shape(output: &RenderOutput, hydrating: bool) -> Result<()> {
    if output.kind.is_empty() && !hydrating {
        return Err(RuntimeError::Usage(crate::error::UsageError::RendererShape(
            "empty kind identifier".to_string(),
        )));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kinds() {
        assert_eq!(Value::from(true).kind(), ValueKind::Bool);
        assert_eq!(Value::from(3).kind(), ValueKind::Int);
        assert_eq!(Value::from(1.5).kind(), ValueKind::Float);
        assert_eq!(Value::from("x").kind(), ValueKind::Str);
        assert_eq!(Value::opaque(vec![1u8]).kind(), ValueKind::Opaque);
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::from(2), Value::from(2i64));
        assert_ne!(Value::from(2), Value::from(3));
        // Cross-kind values are never equal, even when numerically close.
        assert_ne!(Value::from(2), Value::from(2.0));
    }

    #[test]
    fn test_opaque_compares_by_identity() {
        let a = Value::opaque(String::from("payload"));
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Value::opaque(String::from("payload")));
    }

    #[test]
    fn test_opaque_downcast() {
        let value = Value::opaque(42u32);
        assert_eq!(value.downcast_opaque::<u32>().as_deref(), Some(&42));
        assert!(value.downcast_opaque::<String>().is_none());
    }

    #[test]
    fn test_props_preserve_insertion_order() {
        let mut props = Props::new();
        props.set("Size", 1);
        props.set("Position", 2);
        let keys: Vec<_> = props.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            keys,
            vec![
                PropKey::Name("Size".to_string()),
                PropKey::Name("Position".to_string()),
            ]
        );
    }

    #[test]
    fn test_props_replace_existing_name() {
        let mut props = Props::new();
        props.set("Size", 1);
        props.set("Size", 2);
        assert_eq!(props.len(), 1);
        assert_eq!(props.value("Size"), Some(&Value::from(2)));
    }

    #[test]
    fn test_timing_builder() {
        let timing = Timing::new(Duration::from_millis(200))
            .with_delay(Duration::from_millis(50))
            .with_easing(Easing::EaseOut);
        assert_eq!(timing.duration, Duration::from_millis(200));
        assert_eq!(timing.delay, Duration::from_millis(50));
        assert_eq!(timing.easing, Easing::EaseOut);
    }

    #[test]
    fn test_output_shape_check() {
        let output = RenderOutput::new("");
        assert!(check_output_shape(&output, false).is_err());
        assert!(check_output_shape(&output, true).is_ok());
        assert!(check_output_shape(&RenderOutput::new("Frame"), false).is_ok());
    }
}
