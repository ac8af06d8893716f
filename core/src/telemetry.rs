//! Span decoration for the façade operations.
//!
//! The `spans` feature is the single switch: with it enabled every
//! `SpacesManager` operation is wrapped in a `tracing` span via
//! `#[instrument]`, and [`record_span_field!`] fills in attributes that are
//! only known after the call. Without it both compile away.

/// Record `value` on the current operation span under `field`.
///
/// The field must be declared (usually as `tracing::field::Empty`) in the
/// operation's `#[instrument]` attribute.
macro_rules! record_span_field {
    ($field:literal, $value:expr) => {{
        #[cfg(feature = "spans")]
        tracing::Span::current().record($field, $value);
        #[cfg(not(feature = "spans"))]
        let _ = &$value;
    }};
}

pub(crate) use record_span_field;
