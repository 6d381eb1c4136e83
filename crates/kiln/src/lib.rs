//! # Kiln
//!
//! Browse listing data from the command line with the same filter, search,
//! sort and pagination rules a listing page applies to its query string.
//!
//! A listing is described by a [`ListingProfile`]: which record collection it
//! shows, how its page size is set, and which parameters map onto which
//! filters. Running a listing turns [`SearchParams`] into a
//! [`kiln_query::ListQuery`], runs it over the records and renders the page.
//!
//! ```no_run
//! use kiln::{listing, OutputMode, Profiles, SearchParams};
//!
//! let profiles = Profiles::builtin()?;
//! let forum = profiles.get("forum")?;
//! let params = SearchParams::parse("category=How+To&sort=Most+Upvotes");
//! let page = listing::run(forum, &params, None, OutputMode::Text)?;
//! println!("{}", page);
//! # Ok::<(), kiln::ListingError>(())
//! ```
//!
//! ## Modules
//!
//! - [`profile`]: listing profiles and parameter translation
//! - [`params`]: query-string decoding
//! - [`records`]: the built-in record types
//! - [`datasets`]: loading record collections
//! - [`listing`]: running a listing end to end
//! - [`output`]: text, JSON, YAML and CSV output
//! - [`cli`]: the `kiln` command line

pub mod cli;
pub mod datasets;
pub mod listing;
pub mod output;
pub mod params;
pub mod profile;
pub mod records;

pub use datasets::{DataError, RecordKind};
pub use listing::{ListingError, ListingView};
pub use output::{OutputMode, SerializeError};
pub use params::{ParamError, SearchParams};
pub use profile::{ListingProfile, ProfileError, Profiles};
