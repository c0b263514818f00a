//! Model layer - catalog data and browser state
//!
//! - `catalog` - entities fetched from the catalog API
//! - `filter` - the cascading filter state and item query parameters
//! - `dropdown` - selector contents
//! - `detail` - what the viewer shows for a selected item
//! - `letter` - alphabet lookup results
//! - `ui` / `modal` - presentation state

pub mod catalog;
pub mod detail;
pub mod dropdown;
pub mod filter;
pub mod letter;
pub mod modal;
pub mod ui;

pub use catalog::{Family, Genus, GenusByLetter, Item, Species};
pub use detail::{DetailView, ScaleBar};
pub use dropdown::{Dropdown, OptionValue};
pub use filter::{FilterState, GenusSelection, ItemQuery, QueryScope, TypeFilter};
pub use letter::{LetterBrowser, LetterRow, SpeciesExpansion};
pub use ui::{Focus, PanelVisibility, Selector};
