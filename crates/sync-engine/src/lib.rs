//! csvsync engine
//!
//! Keeps named sources on a remote control endpoint in sync with the first
//! data row of a CSV file:
//! - [`color`]: color token decoding into the remote's packed layout
//! - [`Classifier`]: typed interpretation of raw values by column name
//! - [`FileWatch`] and [`watch::content_changed`]: the two change gates
//! - [`record`]: CSV snapshot reading
//! - [`extract`]: desired state from a snapshot and a field mapping
//! - [`Reconciler`]: create-or-update against [`obs_client::ops::SourceOps`]
//! - [`Runner`]: the polling loop
//! - [`columns`]: column grouping and mapping suggestions
#![warn(missing_docs)]

use std::collections::BTreeMap;

mod classify;
pub mod color;
pub mod columns;
mod error;
pub mod extract;
mod reconcile;
pub mod record;
mod runner;
pub mod watch;

pub use classify::{Classifier, FieldKind, TypedValue};
pub use error::{Error, Result};
pub use extract::{extract, extract_file};
pub use reconcile::{
    DEFAULT_SCENE, Reconciler, SourceKind, SyncOutcome, connect_options,
};
pub use record::RawRecord;
pub use runner::{Runner, sync_once};
pub use watch::FileWatch;

/// Remote source name to typed value.
pub type DesiredState = BTreeMap<String, TypedValue>;
