use super::model::Issue;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowState {
    pub checked: bool,
    pub selectable: bool,
}

/// Checkbox state over a fixed issue list. Only open rows can be selected.
#[derive(Debug, Clone)]
pub struct SelectionController {
    issues: Vec<Issue>,
    open_indices: Vec<usize>,
    selected: BTreeSet<usize>,
}

impl SelectionController {
    pub fn new(issues: Vec<Issue>) -> Self {
        let open_indices = issues
            .iter()
            .enumerate()
            .filter(|(_, issue)| issue.is_open())
            .map(|(i, _)| i)
            .collect();
        Self {
            issues,
            open_indices,
            selected: BTreeSet::new(),
        }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn is_selectable(&self, index: usize) -> bool {
        self.issues.get(index).is_some_and(Issue::is_open)
    }

    /// Flips an open row. Returns false, leaving the selection as is, for
    /// resolved or out-of-range rows.
    pub fn toggle(&mut self, index: usize) -> bool {
        if !self.is_selectable(index) {
            return false;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
        true
    }

    pub fn set_select_all(&mut self, checked: bool) {
        self.selected = if checked {
            self.open_indices.iter().copied().collect()
        } else {
            BTreeSet::new()
        };
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn open_count(&self) -> usize {
        self.open_indices.len()
    }

    pub fn is_select_all_checked(&self) -> bool {
        !self.open_indices.is_empty() && self.selected.len() == self.open_indices.len()
    }

    pub fn is_indeterminate(&self) -> bool {
        let n = self.selected.len();
        n > 0 && n < self.open_indices.len()
    }

    pub fn total_selected_value(&self) -> f64 {
        self.selected.iter().map(|&i| self.issues[i].value).sum()
    }

    pub fn row_state(&self, index: usize) -> RowState {
        RowState {
            checked: self.is_selected(index),
            selectable: self.is_selectable(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::model::IssueStatus;

    fn issue(id: &str, status: IssueStatus, value: f64) -> Issue {
        Issue {
            id: id.into(),
            name: format!("{id} name"),
            message: format!("{id} message"),
            status,
            num_events: 1.0,
            num_users: 1.0,
            value,
        }
    }

    /// Three open rows (0, 2, 4) and two resolved rows (1, 3).
    fn controller() -> SelectionController {
        SelectionController::new(vec![
            issue("a", IssueStatus::Open, 1.0),
            issue("b", IssueStatus::Resolved, 100.0),
            issue("c", IssueStatus::Open, 2.5),
            issue("d", IssueStatus::Resolved, 100.0),
            issue("e", IssueStatus::Open, 4.0),
        ])
    }

    #[test]
    fn starts_empty() {
        let c = controller();
        assert_eq!(c.selected_count(), 0);
        assert_eq!(c.open_count(), 3);
        assert!(!c.is_select_all_checked());
        assert!(!c.is_indeterminate());
        assert_eq!(c.total_selected_value(), 0.0);
    }

    #[test]
    fn select_all_picks_only_open_rows() {
        let mut c = controller();
        c.set_select_all(true);
        assert_eq!(c.selected_indices().collect::<Vec<_>>(), vec![0, 2, 4]);
        assert_eq!(c.total_selected_value(), 7.5);
        assert!(c.is_select_all_checked());
        assert!(!c.is_indeterminate());
    }

    #[test]
    fn deselect_all_clears() {
        let mut c = controller();
        c.set_select_all(true);
        c.set_select_all(false);
        assert_eq!(c.selected_count(), 0);
        assert!(!c.is_select_all_checked());
        assert!(!c.is_indeterminate());
    }

    #[test]
    fn toggling_one_off_after_select_all_is_indeterminate() {
        let mut c = controller();
        c.set_select_all(true);
        assert!(c.toggle(2));
        assert!(c.is_indeterminate());
        assert!(!c.is_select_all_checked());
        assert_eq!(c.total_selected_value(), 5.0);
    }

    #[test]
    fn toggling_every_open_row_checks_select_all() {
        let mut c = controller();
        for i in [0, 2, 4] {
            c.toggle(i);
        }
        assert!(c.is_select_all_checked());
        assert!(!c.is_indeterminate());
    }

    #[test]
    fn toggle_twice_restores() {
        let mut c = controller();
        c.toggle(0);
        c.toggle(0);
        assert_eq!(c.selected_count(), 0);
    }

    #[test]
    fn resolved_rows_cannot_be_selected() {
        let mut c = controller();
        assert!(!c.toggle(1));
        assert!(!c.is_selected(1));
        assert_eq!(
            c.row_state(1),
            RowState {
                checked: false,
                selectable: false
            }
        );
    }

    #[test]
    fn out_of_range_toggle_is_ignored() {
        let mut c = controller();
        assert!(!c.toggle(99));
        assert_eq!(c.selected_count(), 0);
    }

    #[test]
    fn row_state_tracks_selection() {
        let mut c = controller();
        c.toggle(4);
        assert_eq!(
            c.row_state(4),
            RowState {
                checked: true,
                selectable: true
            }
        );
    }

    #[test]
    fn no_open_rows_never_reports_select_all() {
        let mut c = SelectionController::new(vec![issue("r", IssueStatus::Resolved, 1.0)]);
        c.set_select_all(true);
        assert_eq!(c.selected_count(), 0);
        assert!(!c.is_select_all_checked());
        assert!(!c.is_indeterminate());
    }
}
