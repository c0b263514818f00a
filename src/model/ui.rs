//! UI state - presentation state separate from catalog data

/// The three cascading selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Family,
    Genus,
    Species,
}

impl Selector {
    pub fn name(&self) -> &'static str {
        match self {
            Selector::Family => "Family",
            Selector::Genus => "Genus",
            Selector::Species => "Species",
        }
    }
}

/// Which panel receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Selector(Selector),
    Gallery,
    Viewer,
}

impl Focus {
    /// Tab order of the browser screen
    pub fn all() -> [Focus; 5] {
        [
            Focus::Selector(Selector::Family),
            Focus::Selector(Selector::Genus),
            Focus::Selector(Selector::Species),
            Focus::Gallery,
            Focus::Viewer,
        ]
    }

    pub fn next(self) -> Focus {
        let all = Focus::all();
        let idx = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn previous(self) -> Focus {
        let all = Focus::all();
        let idx = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

/// Gallery/viewer vs. letter browser visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelVisibility {
    pub gallery: bool,
    pub viewer: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            gallery: true,
            viewer: true,
        }
    }
}
