//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod browser;
pub mod filter_bar;
pub mod gallery;
pub mod help_dialog;
pub mod layout;
pub mod letter_browser;
pub mod letter_picker;
pub mod max_results_dialog;
pub mod quit_dialog;
pub mod select_dialog;
pub mod thumbnail;
pub mod viewer;

pub use browser::{draw_browser_screen, BrowserComponent, BrowserRenderContext};
pub use gallery::GalleryComponent;
pub use help_dialog::HelpDialog;
pub use layout::{calculate_browser_layout, centered_popup};
pub use letter_browser::LetterBrowserComponent;
pub use letter_picker::LetterPicker;
pub use max_results_dialog::MaxResultsDialog;
pub use quit_dialog::QuitDialog;
pub use select_dialog::SelectDialog;
pub use viewer::ViewerComponent;
