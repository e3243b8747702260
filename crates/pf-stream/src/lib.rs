//! pf-stream: material streams for procflow.
//!
//! Provides:
//! - `Stream` with builder-style construction
//! - Unit-aware flow access over any chemical subset, with a memoized
//!   unit resolver
//! - Linking: selective sharing of thermal condition, flows and phase
//!   between streams, plus `unlink`, `copy` and `copy_like`
//! - Derived extensive and intensive properties, also addressable by name
//! - One-way cast to multi-phase storage and a VLE handle
//! - Bubble/dew points, mixing and splitting
//! - Text reports
//!
//! # Example
//!
//! ```
//! use pf_stream::{Facets, Stream};
//! use pf_thermo::Thermo;
//!
//! let thermo = Thermo::from_catalog(&["Water", "Ethanol"]).unwrap();
//! let feed = Stream::builder()
//!     .id("feed")
//!     .thermo(thermo.clone())
//!     .chemical("Water", 10.0)
//!     .chemical("Ethanol", 5.0)
//!     .build()
//!     .unwrap();
//! assert_eq!(feed.f_mol(), 15.0);
//!
//! let mut product = Stream::builder().id("product").thermo(thermo).build().unwrap();
//! product.link(&feed, Facets { thermal: false, flow: true, phase: false }).unwrap();
//! feed.set_f_mol(30.0).unwrap();
//! assert_eq!(product.mol(), vec![20.0, 10.0]);
//! ```

pub mod builder;
pub mod cast;
pub mod display;
pub mod equilibrium;
pub mod error;
pub mod link;
pub mod mixing;
pub mod named;
pub mod properties;
pub mod resolver;
pub mod stream;

pub use builder::StreamBuilder;
pub use display::DisplayUnits;
pub use error::{StreamError, StreamResult};
pub use link::Facets;
pub use named::{PROPERTY_UNITS, SETTABLE_PROPERTIES, canonical_units};
pub use resolver::resolve;
pub use stream::{Stream, StreamKind};
