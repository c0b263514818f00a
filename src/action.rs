//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::filter::TypeFilter;
use crate::model::{OptionValue, Selector};
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick: poll catalog responses
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,
    /// Reload the family list and reset the selection
    Reload,

    // ─────────────────────────────────────────────────────────────────────────
    // Focus & Gallery Navigation
    // ─────────────────────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    /// Show the highlighted thumbnail in the viewer
    SelectThumbnail,
    NextPage,
    PrevPage,
    RefreshGallery,

    // ─────────────────────────────────────────────────────────────────────────
    // Viewer
    // ─────────────────────────────────────────────────────────────────────────
    NextFocalPlane,
    PrevFocalPlane,

    // ─────────────────────────────────────────────────────────────────────────
    // Filters
    // ─────────────────────────────────────────────────────────────────────────
    /// Open the option list of a selector
    OpenSelector(Selector),
    /// An option was picked in a selector
    SelectOption(Selector, OptionValue),
    /// Flip one of the include toggles
    ToggleFilter(TypeFilter),
    OpenMaxResults,
    /// Apply the max-results field
    SetMaxResults(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Letter Lookup
    // ─────────────────────────────────────────────────────────────────────────
    OpenLetterPicker,
    SelectLetter(char),
    LetterUp,
    LetterDown,
    /// Expand a genus row, or jump to the gallery from an ALL/species row
    LetterActivate,
    CloseLetterBrowser,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenHelp,
    CloseModal,
    ModalUp,
    ModalDown,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::Reload => write!(f, "Reload"),
            Action::FocusNext => write!(f, "FocusNext"),
            Action::FocusPrev => write!(f, "FocusPrev"),
            Action::MoveLeft => write!(f, "MoveLeft"),
            Action::MoveRight => write!(f, "MoveRight"),
            Action::MoveUp => write!(f, "MoveUp"),
            Action::MoveDown => write!(f, "MoveDown"),
            Action::SelectThumbnail => write!(f, "SelectThumbnail"),
            Action::NextPage => write!(f, "NextPage"),
            Action::PrevPage => write!(f, "PrevPage"),
            Action::RefreshGallery => write!(f, "RefreshGallery"),
            Action::NextFocalPlane => write!(f, "NextFocalPlane"),
            Action::PrevFocalPlane => write!(f, "PrevFocalPlane"),
            Action::OpenSelector(selector) => write!(f, "OpenSelector({})", selector.name()),
            Action::SelectOption(selector, value) => {
                write!(f, "SelectOption({}, {})", selector.name(), value)
            }
            Action::ToggleFilter(which) => write!(f, "ToggleFilter({:?})", which),
            Action::OpenMaxResults => write!(f, "OpenMaxResults"),
            Action::SetMaxResults(input) => write!(f, "SetMaxResults({})", input),
            Action::OpenLetterPicker => write!(f, "OpenLetterPicker"),
            Action::SelectLetter(c) => write!(f, "SelectLetter('{}')", c),
            Action::LetterUp => write!(f, "LetterUp"),
            Action::LetterDown => write!(f, "LetterDown"),
            Action::LetterActivate => write!(f, "LetterActivate"),
            Action::CloseLetterBrowser => write!(f, "CloseLetterBrowser"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ModalUp => write!(f, "ModalUp"),
            Action::ModalDown => write!(f, "ModalDown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_display_includes_payload() {
        let action = Action::SelectOption(Selector::Genus, OptionValue::All);
        assert_eq!(action.to_string(), "SelectOption(Genus, ALL)");

        let id = Uuid::from_u128(5);
        let action = Action::SelectOption(Selector::Family, OptionValue::Id(id));
        assert_eq!(action.to_string(), format!("SelectOption(Family, {})", id));
        assert_eq!(Action::SelectLetter('P').to_string(), "SelectLetter('P')");
    }
}
