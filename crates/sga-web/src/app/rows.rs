use std::rc::Rc;

use sga_shared::{
  ProcessRow,
  RecordPatch
};
use yew::Reducible;

/// The process table's view-model. A
/// successful mutation patches one row
/// in place instead of reloading the
/// page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowsState {
  pub rows: Vec<ProcessRow>
}

pub enum RowsAction {
  Patch {
    pk:    u64,
    patch: RecordPatch
  }
}

impl RowsState {
  pub fn new(rows: Vec<ProcessRow>) -> Self {
    Self { rows }
  }

  pub fn find(
    &self,
    pk: u64
  ) -> Option<&ProcessRow> {
    self.rows.iter().find(|row| row.pk == pk)
  }
}

impl Reducible for RowsState {
  type Action = RowsAction;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    match action {
      | RowsAction::Patch { pk, patch } => {
        if self.find(pk).is_none() {
          tracing::warn!(pk, "patch for a row that is not on the page");
          return self;
        }
        let mut next = (*self).clone();
        for row in next
          .rows
          .iter_mut()
          .filter(|row| row.pk == pk)
        {
          row.apply(&patch);
        }
        Rc::new(next)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use sga_shared::{
    ProcessSnapshot,
    ProcessStatus
  };

  use super::*;

  fn row(pk: u64) -> ProcessRow {
    ProcessRow {
      pk,
      code: format!("PRC-2026-{pk:04}"),
      title: "Amostras de solo".to_string(),
      status: ProcessStatus::NotAssigned,
      tracking_code: None,
      comment_count: 0,
      assignee: None
    }
  }

  #[test]
  fn patch_touches_only_the_target_row() {
    let state = Rc::new(RowsState::new(vec![
      row(1),
      row(2),
    ]));
    let next = state.reduce(RowsAction::Patch {
      pk:    2,
      patch: RecordPatch::Snapshot(
        ProcessSnapshot {
          status:        Some(
            ProcessStatus::Assigned
          ),
          tracking_code: None,
          assignee:      Some(
            "ana".to_string()
          )
        }
      )
    });

    assert_eq!(
      next.rows[0].status,
      ProcessStatus::NotAssigned
    );
    assert_eq!(
      next.rows[1].status,
      ProcessStatus::Assigned
    );
    assert_eq!(
      next.rows[1].assignee.as_deref(),
      Some("ana")
    );
  }

  #[test]
  fn comment_patch_bumps_the_counter() {
    let state =
      Rc::new(RowsState::new(vec![row(5)]));
    let next = state.reduce(RowsAction::Patch {
      pk:    5,
      patch: RecordPatch::CommentAdded {
        forwarded: true
      }
    });
    assert_eq!(next.rows[0].comment_count, 1);
  }

  #[test]
  fn unknown_row_leaves_state_untouched() {
    let state =
      Rc::new(RowsState::new(vec![row(5)]));
    let next = state.clone().reduce(
      RowsAction::Patch {
        pk:    9,
        patch: RecordPatch::Timeline
      }
    );
    assert!(Rc::ptr_eq(&state, &next));
  }
}
