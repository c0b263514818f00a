//! Modal stack for overlays drawn on top of the browser

use super::ui::Selector;

/// Represents a modal overlay that can be displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Option list of one of the three selectors
    Select(Selector),
    /// Alphabet letter picker
    LetterPicker,
    /// Max-results text field
    MaxResults { input: String },
    /// Key bindings overview
    Help,
}

/// A stack of modal overlays
///
/// Only the top modal receives input events.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.stack.last_mut()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::Help);
        stack.push(Modal::Select(Selector::Genus));
        assert_eq!(stack.pop(), Some(Modal::Select(Selector::Genus)));
        assert_eq!(stack.pop(), Some(Modal::Help));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_max_results_input_is_editable_in_place() {
        let mut stack = ModalStack::new();
        stack.push(Modal::MaxResults {
            input: String::new(),
        });

        if let Some(Modal::MaxResults { input }) = stack.top_mut() {
            input.push_str("25");
        }

        assert_eq!(
            stack.top(),
            Some(&Modal::MaxResults {
                input: "25".to_string()
            })
        );
    }
}
