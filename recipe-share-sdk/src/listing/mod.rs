//! Recipe listing page
//!
//! Control flows from the address seed into the filter store, through the
//! debounced controller into the result accumulator, and out as snapshots.
//! The option loader runs alongside and only touches the store.

pub mod accumulator;
pub mod controller;
pub mod debounce;
pub mod driver;
pub mod options;
pub mod query;
pub mod seed;
pub mod store;

pub use accumulator::{MergeMode, ResultAccumulator};
pub use controller::{
    FetchRequest, IssuedFetch, ListingController, ListingEffect, ListingEvent, ListingPhase,
};
pub use debounce::Debouncer;
pub use driver::{ListingCommand, ListingHandle, ListingPage, ListingSnapshot};
pub use options::{FilterOptionLoader, FilterOptions, OptionList};
pub use query::{ListingQuery, LISTING_PAGE_SIZE};
pub use seed::{parse_seed, seed_from_location, UrlSeed};
pub use store::{FilterSnapshot, FilterStore};
