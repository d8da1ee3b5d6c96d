//! Umat Location Resolution
//!
//! Addresses in the admin console are a four-level chain:
//! province → city (kabupaten/kota) → district (kecamatan) → locality
//! (kelurahan/desa). Records store only the locality id.
//!
//! This crate covers both directions:
//!
//! - **Forward**: [`LocationResolver::fetch_options`] lists the children of a
//!   selected parent, and [`LocationSelection::apply_selection`] keeps a
//!   selection consistent by clearing every level below the one that changed.
//! - **Reverse**: [`LocationResolver::resolve_full_path_from_leaf`] rebuilds
//!   the full chain from a stored locality id so an edit form can
//!   pre-populate its dropdowns.
//!
//! [`LocationSelector`] ties the two together for one form, including
//! discarding option lists that arrive after their parent has changed.
//!
//! All I/O goes through the [`LocationSource`] trait. [`HttpLocationSource`]
//! talks to the REST API and [`CachedLocationSource`] memoises any source.
//!
//! # Example
//!
//! ```rust
//! use umat_location::{LocationLevel, LocationSelection};
//!
//! let selection = LocationSelection::full("35", "35", "3501", "350101");
//! let changed = selection.apply_selection(LocationLevel::City, Some("3502".into()));
//!
//! assert_eq!(changed.city.as_ref().map(|c| c.as_str()), Some("3502"));
//! assert!(changed.district.is_none());
//! assert!(changed.locality.is_none());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod error;
pub mod http;
pub mod level;
pub mod node;
pub mod resolver;
pub mod response;
pub mod selection;
pub mod selector;
pub mod source;

// Re-exports for convenience
pub use cache::{CacheStats, CachedLocationSource};
pub use error::{LocationResolutionError, SourceError, SourceResult};
pub use http::HttpLocationSource;
pub use level::LocationLevel;
pub use node::{sort_by_name, LocationId, LocationNode};
pub use resolver::{LocationResolver, PathResolution};
pub use response::{unwrap_item_response, unwrap_list_response};
pub use selection::{validate_chain, LocationSelection};
pub use selector::{FetchOutcome, HydrateOutcome, LevelPhase, LevelState, LocationSelector};
pub use source::{LocationSource, SharedSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
