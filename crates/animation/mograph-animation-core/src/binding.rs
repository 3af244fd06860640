//! Sinks and sink resolvers.
//!
//! A sink is the opaque handle the owner of a property (a canvas element,
//! an exporter) hands to the registry. The registry calls
//! [`ValueSink::deliver`] with every interpolated value for that track and
//! never captures any other application state.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::AnimationError;
use crate::value::{Animatable, AnimatableValue, ValueKind};
use crate::Result;

/// Receives interpolated values for one track.
pub trait ValueSink {
    fn deliver(&mut self, track_id: &str, value: AnimatableValue) -> Result<()>;
}

/// Owned, sendable sink as stored by the registry.
pub type BoxedSink = Box<dyn ValueSink + Send>;

/// Resolves track ids to sinks when tracks are restored from a snapshot.
/// The canvas layer implements this and passes it to
/// [`AnimationController::from_snapshot`](crate::controller::AnimationController::from_snapshot).
pub trait SinkResolver {
    fn resolve(&mut self, track_id: &str, kind: ValueKind) -> Option<BoxedSink>;
}

impl<F> SinkResolver for F
where
    F: FnMut(&str, ValueKind) -> Option<BoxedSink>,
{
    fn resolve(&mut self, track_id: &str, kind: ValueKind) -> Option<BoxedSink> {
        self(track_id, kind)
    }
}

fn mismatch(track_id: &str, expected: ValueKind, value: &AnimatableValue) -> AnimationError {
    AnimationError::TypeMismatch {
        track_id: track_id.to_string(),
        expected,
        actual: value.kind(),
    }
}

/// Sink that downcasts to `V` and calls a setter.
pub struct TypedSink<V, F> {
    setter: F,
    _marker: PhantomData<fn(V)>,
}

impl<V, F> TypedSink<V, F>
where
    V: Animatable,
    F: FnMut(V),
{
    pub fn new(setter: F) -> Self {
        Self {
            setter,
            _marker: PhantomData,
        }
    }
}

impl<V, F> ValueSink for TypedSink<V, F>
where
    V: Animatable,
    F: FnMut(V),
{
    fn deliver(&mut self, track_id: &str, value: AnimatableValue) -> Result<()> {
        let err = mismatch(track_id, V::KIND, &value);
        let typed = V::from_value(value).ok_or(err)?;
        (self.setter)(typed);
        Ok(())
    }
}

/// Convenience constructor for [`TypedSink`].
pub fn typed_sink<V, F>(setter: F) -> TypedSink<V, F>
where
    V: Animatable,
    F: FnMut(V),
{
    TypedSink::new(setter)
}

/// Shared cell holding the most recently delivered value.
///
/// Clone one handle into the registry and keep the other to read back
/// applied values (the export pipeline does this after each `seek`).
#[derive(Debug)]
pub struct ValueCell<V> {
    inner: Arc<Mutex<Option<V>>>,
}

impl<V> Clone for ValueCell<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for ValueCell<V> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }
}

impl<V: Animatable> ValueCell<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<V>> {
        // A setter never panics while holding the lock, so poisoning carries no torn state.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Latest delivered value, if any.
    pub fn get(&self) -> Option<V> {
        self.lock().clone()
    }

    /// Take the latest value, leaving the cell empty.
    pub fn take(&self) -> Option<V> {
        self.lock().take()
    }

    pub fn boxed(&self) -> BoxedSink {
        Box::new(self.clone())
    }
}

impl<V: Animatable> ValueSink for ValueCell<V> {
    fn deliver(&mut self, track_id: &str, value: AnimatableValue) -> Result<()> {
        let err = mismatch(track_id, V::KIND, &value);
        let typed = V::from_value(value).ok_or(err)?;
        *self.lock() = Some(typed);
        Ok(())
    }
}

/// Sink that drops every value. Holds tracks restored without a bound owner.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedSink;

impl ValueSink for DetachedSink {
    fn deliver(&mut self, _track_id: &str, _value: AnimatableValue) -> Result<()> {
        Ok(())
    }
}
