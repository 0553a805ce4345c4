use serde::Serialize;

/// Tri-state of a "select all" checkbox over some scope of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    Unchecked,
    /// Some, but not all, eligible rows in scope are selected.
    Indeterminate,
    Checked,
}

impl SelectionState {
    /// Derive the state from counts of eligible and selected rows in scope.
    pub fn from_counts(selected: usize, eligible: usize) -> Self {
        if eligible == 0 || selected == 0 {
            SelectionState::Unchecked
        } else if selected >= eligible {
            SelectionState::Checked
        } else {
            SelectionState::Indeterminate
        }
    }

    pub fn is_indeterminate(self) -> bool {
        self == SelectionState::Indeterminate
    }

    pub fn is_checked(self) -> bool {
        self == SelectionState::Checked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_counts() {
        assert_eq!(SelectionState::from_counts(0, 0), SelectionState::Unchecked);
        assert_eq!(SelectionState::from_counts(0, 5), SelectionState::Unchecked);
        assert_eq!(SelectionState::from_counts(2, 5), SelectionState::Indeterminate);
        assert_eq!(SelectionState::from_counts(5, 5), SelectionState::Checked);
    }
}
