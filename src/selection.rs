use thiserror::Error;

/// Why a view refused to run. Each variant is a user-facing warning, never a crash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Please select at least {min} attribute(s).")]
    NoAttributes { min: usize },
    #[error("Select at most {max} attributes ({got} chosen).")]
    TooManyAttributes { max: usize, got: usize },
    #[error("\"All\" cannot be combined with specific choices.")]
    AllWithExplicit,
    #[error("Please select at least one league.")]
    NoLeagues,
    #[error("Minimum and maximum age should be different (both {age}).")]
    DegenerateAgeRange { age: u32 },
}

/// One entry picked in a multi-select widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Item(T),
}

/// Either every available option or an explicit, duplicate-free set of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Specific(Vec<T>),
}

impl<T: Clone + PartialEq> Selection<T> {
    pub fn specific(items: impl IntoIterator<Item = T>) -> Self {
        let mut out: Vec<T> = Vec::new();
        for item in items {
            if !out.contains(&item) {
                out.push(item);
            }
        }
        Selection::Specific(out)
    }

    /// Builds a selection from raw widget choices. "All" must stand alone.
    pub fn from_choices(
        choices: impl IntoIterator<Item = Choice<T>>,
    ) -> Result<Self, SelectionError> {
        let mut saw_all = false;
        let mut items = Vec::new();
        for choice in choices {
            match choice {
                Choice::All => saw_all = true,
                Choice::Item(item) => items.push(item),
            }
        }
        match (saw_all, items.is_empty()) {
            (true, true) => Ok(Selection::All),
            (true, false) => Err(SelectionError::AllWithExplicit),
            (false, _) => Ok(Selection::specific(items)),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn contains(&self, item: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Specific(items) => items.contains(item),
        }
    }

    /// Concrete members against the currently valid options.
    pub fn resolve(&self, options: &[T]) -> Vec<T> {
        match self {
            Selection::All => options.to_vec(),
            Selection::Specific(items) => items.clone(),
        }
    }

    /// Flips one explicit item, leaving "All" mode first if needed.
    pub fn toggle(&mut self, item: T) {
        match self {
            Selection::All => *self = Selection::Specific(vec![item]),
            Selection::Specific(items) => {
                if let Some(pos) = items.iter().position(|i| *i == item) {
                    items.remove(pos);
                } else {
                    items.push(item);
                }
            }
        }
    }

    /// Drops members that are no longer offered. `None` when every member went stale;
    /// a deliberately empty selection stays empty.
    pub fn revalidate(&self, options: &[T]) -> Option<Self> {
        match self {
            Selection::All => Some(Selection::All),
            Selection::Specific(items) if items.is_empty() => Some(Selection::Specific(Vec::new())),
            Selection::Specific(items) => {
                let kept: Vec<T> = items
                    .iter()
                    .filter(|item| options.contains(item))
                    .cloned()
                    .collect();
                if kept.is_empty() {
                    None
                } else {
                    Some(Selection::Specific(kept))
                }
            }
        }
    }
}

/// Remembers the previous choice across recomputations and re-checks it on every recall.
#[derive(Debug, Clone)]
pub struct LastSelection<T> {
    last: Option<Selection<T>>,
}

impl<T> Default for LastSelection<T> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<T: Clone + PartialEq> LastSelection<T> {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn remember(&mut self, selection: Selection<T>) {
        self.last = Some(selection);
    }

    pub fn forget(&mut self) {
        self.last = None;
    }

    /// Stale memory falls back to `default` (itself revalidated), then to "All".
    pub fn recall(&self, options: &[T], default: &Selection<T>) -> Selection<T> {
        self.last
            .as_ref()
            .and_then(|sel| sel.revalidate(options))
            .or_else(|| default.revalidate(options))
            .unwrap_or(Selection::All)
    }
}
