//! Dropdown model for the family / genus / species selectors
//!
//! Every dropdown starts with a non-selectable "please choose" placeholder.
//! Repopulation always clears prior entries first.

use std::fmt;
use uuid::Uuid;

/// Value carried by a dropdown option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionValue {
    Placeholder,
    /// The "every genus" sentinel
    All,
    Id(Uuid),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Placeholder => write!(f, "placeholder"),
            OptionValue::All => write!(f, "ALL"),
            OptionValue::Id(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropdownOption {
    pub value: OptionValue,
    pub label: String,
}

/// One selection control
#[derive(Debug, Clone)]
pub struct Dropdown {
    pub title: &'static str,
    options: Vec<DropdownOption>,
    selected: usize,
    /// A population request is in flight
    pub loading: bool,
}

impl Dropdown {
    pub fn new(title: &'static str) -> Self {
        let mut dropdown = Self {
            title,
            options: Vec::new(),
            selected: 0,
            loading: false,
        };
        dropdown.clear();
        dropdown
    }

    /// Drop every entry and show only the placeholder
    pub fn clear(&mut self) {
        self.options = vec![DropdownOption {
            value: OptionValue::Placeholder,
            label: format!("-- choose {} --", self.title.to_lowercase()),
        }];
        self.selected = 0;
        self.loading = false;
    }

    /// Replace the entries: placeholder, optional `ALL`, then `entries` in order
    pub fn populate<I>(&mut self, entries: I, with_all: bool)
    where
        I: IntoIterator<Item = (Uuid, String)>,
    {
        self.clear();
        if with_all {
            self.options.push(DropdownOption {
                value: OptionValue::All,
                label: "ALL".to_string(),
            });
        }
        self.options
            .extend(entries.into_iter().map(|(id, label)| DropdownOption {
                value: OptionValue::Id(id),
                label,
            }));
    }

    pub fn options(&self) -> &[DropdownOption] {
        &self.options
    }

    #[cfg(test)]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_value(&self) -> OptionValue {
        self.options
            .get(self.selected)
            .map(|o| o.value)
            .unwrap_or(OptionValue::Placeholder)
    }

    pub fn selected_label(&self) -> &str {
        self.options
            .get(self.selected)
            .map(|o| o.label.as_str())
            .unwrap_or("")
    }

    /// Select the option carrying `value`; returns false if absent
    pub fn select_value(&mut self, value: OptionValue) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn contains(&self, value: OptionValue) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    /// Number of real entries (placeholder and `ALL` excluded)
    #[cfg(test)]
    pub fn entry_count(&self) -> usize {
        self.options
            .iter()
            .filter(|o| matches!(o.value, OptionValue::Id(_)))
            .count()
    }
}
