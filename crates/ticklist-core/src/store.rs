use std::collections::HashSet;
use std::fmt;

use tracing::{
  debug,
  info,
  warn
};

use crate::clock::{
  Clock,
  SystemClock
};
use crate::config::StorageConfig;
use crate::filter::Filter;
use crate::storage::{
  KeyValueStorage,
  decode_tasks,
  encode_tasks
};
use crate::task::{
  IdGenerator,
  Task,
  TaskId
};

/// What changed in a [`TodoStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
  Loaded {
    count: usize
  },
  Added(TaskId),
  Toggled {
    id:        TaskId,
    completed: bool
  },
  Edited(TaskId),
  Removed(TaskId),
  ClearedCompleted {
    removed: usize
  },
  FilterChanged(Filter)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
  Updated,
  /// The new text matched the old one.
  Unchanged,
  /// The new text was blank, so the
  /// task was deleted.
  Removed,
  NotFound
}

/// Handle returned by
/// [`TodoStore::subscribe`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct Subscription(u64);

type Listener = Box<dyn Fn(&StoreEvent)>;

/// Owns the task list and the active
/// filter, and mirrors the list into a
/// [`KeyValueStorage`] after every
/// change.
///
/// Storage failures never reach the
/// caller: a failed load starts from an
/// empty list and a failed write is
/// logged while the in-memory list stays
/// authoritative.
///
/// Listeners run synchronously after a
/// mutation has been applied and
/// persisted. They must not call back
/// into the store.
pub struct TodoStore<S> {
  storage:       S,
  storage_key:   String,
  tasks:         Vec<Task>,
  filter:        Filter,
  ids:           IdGenerator,
  clock:         Box<dyn Clock>,
  listeners:     Vec<(u64, Listener)>,
  next_listener: u64
}

impl<S> fmt::Debug for TodoStore<S> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.debug_struct("TodoStore")
      .field(
        "storage_key",
        &self.storage_key
      )
      .field("tasks", &self.tasks)
      .field("filter", &self.filter)
      .field(
        "listeners",
        &self.listeners.len()
      )
      .finish_non_exhaustive()
  }
}

impl<S: KeyValueStorage> TodoStore<S> {
  pub fn new(
    storage: S,
    config: &StorageConfig
  ) -> Self {
    Self::with_clock(
      storage,
      config,
      SystemClock
    )
  }

  pub fn with_clock(
    storage: S,
    config: &StorageConfig,
    clock: impl Clock + 'static
  ) -> Self {
    Self {
      storage,
      storage_key: config.key.clone(),
      tasks: Vec::new(),
      filter: Filter::All,
      ids: IdGenerator::new(),
      clock: Box::new(clock),
      listeners: Vec::new(),
      next_listener: 0
    }
  }

  /// Replaces the in-memory list with
  /// the persisted one, or with an empty
  /// list when nothing usable is stored.
  #[tracing::instrument(skip(self), fields(key = %self.storage_key))]
  pub fn initialize(&mut self) {
    self.tasks = self.load_persisted();
    self.filter = Filter::All;
    for task in &self.tasks {
      self.ids.reserve(&task.id);
    }

    let count = self.tasks.len();
    info!(count, "loaded task list");
    self.notify(&StoreEvent::Loaded {
      count
    });
  }

  #[tracing::instrument(skip(self, raw_text))]
  pub fn add(
    &mut self,
    raw_text: &str
  ) -> Option<TaskId> {
    let text = raw_text.trim();
    if text.is_empty() {
      debug!("ignoring blank task text");
      return None;
    }

    let now = self.clock.now_millis();
    let id = self.ids.next_id(now);
    self.tasks.insert(
      0,
      Task::new(
        id.clone(),
        text.to_string(),
        now
      )
    );
    debug!(id = %id, "added task");

    self.persist();
    self.notify(&StoreEvent::Added(
      id.clone()
    ));
    Some(id)
  }

  /// Flips completion and returns the
  /// new value.
  #[tracing::instrument(skip(self), fields(id = %id))]
  pub fn toggle(
    &mut self,
    id: &TaskId
  ) -> Option<bool> {
    let completed = self
      .tasks
      .iter_mut()
      .find(|task| &task.id == id)
      .map(|task| {
        task.completed = !task.completed;
        task.completed
      });

    self.persist();
    match completed {
      | Some(completed) => {
        debug!(completed, "toggled task");
        self.notify(
          &StoreEvent::Toggled {
            id: id.clone(),
            completed
          }
        );
      }
      | None => {
        debug!("toggle target not found");
      }
    }
    completed
  }

  #[tracing::instrument(skip(self), fields(id = %id))]
  pub fn remove(
    &mut self,
    id: &TaskId
  ) -> Option<Task> {
    let removed = self.take(id);
    self.persist();
    if removed.is_some() {
      debug!("removed task");
      self.notify(&StoreEvent::Removed(
        id.clone()
      ));
    } else {
      debug!("remove target not found");
    }
    removed
  }

  /// Updates the text in place. Blank
  /// text deletes the task instead.
  #[tracing::instrument(skip(self, raw_text), fields(id = %id))]
  pub fn edit(
    &mut self,
    id: &TaskId,
    raw_text: &str
  ) -> EditOutcome {
    let text = raw_text.trim();
    if text.is_empty() {
      return match self.remove(id) {
        | Some(_) => EditOutcome::Removed,
        | None => EditOutcome::NotFound
      };
    }

    let outcome = match self
      .tasks
      .iter_mut()
      .find(|task| &task.id == id)
    {
      | Some(task) if task.text == text => {
        EditOutcome::Unchanged
      }
      | Some(task) => {
        task.text = text.to_string();
        EditOutcome::Updated
      }
      | None => EditOutcome::NotFound
    };

    self.persist();
    debug!(?outcome, "edited task");
    if outcome == EditOutcome::Updated {
      self.notify(&StoreEvent::Edited(
        id.clone()
      ));
    }
    outcome
  }

  /// Drops every completed task and
  /// returns how many went away.
  #[tracing::instrument(skip(self))]
  pub fn clear_completed(
    &mut self
  ) -> usize {
    let before = self.tasks.len();
    self.tasks.retain(Task::is_active);
    let removed = before - self.tasks.len();

    self.persist();
    info!(
      before,
      after = self.tasks.len(),
      "cleared completed tasks"
    );
    if removed > 0 {
      self.notify(
        &StoreEvent::ClearedCompleted {
          removed
        }
      );
    }
    removed
  }

  /// Switches the view. Never touches
  /// storage.
  pub fn set_filter(
    &mut self,
    filter: Filter
  ) {
    if self.filter == filter {
      return;
    }
    debug!(filter = %filter, "filter changed");
    self.filter = filter;
    self.notify(
      &StoreEvent::FilterChanged(filter)
    );
  }

  pub fn filter(&self) -> Filter {
    self.filter
  }

  /// Tasks matching the active filter,
  /// in list order.
  pub fn filtered_view(
    &self
  ) -> Vec<&Task> {
    self
      .tasks
      .iter()
      .filter(|task| {
        self.filter.matches(task)
      })
      .collect()
  }

  pub fn items_left_count(
    &self
  ) -> usize {
    self
      .tasks
      .iter()
      .filter(|task| task.is_active())
      .count()
  }

  pub fn tasks(&self) -> &[Task] {
    &self.tasks
  }

  pub fn get(
    &self,
    id: &TaskId
  ) -> Option<&Task> {
    self
      .tasks
      .iter()
      .find(|task| &task.id == id)
  }

  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }

  pub fn storage(&self) -> &S {
    &self.storage
  }

  pub fn into_storage(self) -> S {
    self.storage
  }

  pub fn subscribe(
    &mut self,
    listener: impl Fn(&StoreEvent)
    + 'static
  ) -> Subscription {
    let id = self.next_listener;
    self.next_listener += 1;
    self
      .listeners
      .push((id, Box::new(listener)));
    Subscription(id)
  }

  pub fn unsubscribe(
    &mut self,
    subscription: Subscription
  ) -> bool {
    let before = self.listeners.len();
    self.listeners.retain(|(id, _)| {
      *id != subscription.0
    });
    self.listeners.len() != before
  }

  fn take(
    &mut self,
    id: &TaskId
  ) -> Option<Task> {
    let idx = self
      .tasks
      .iter()
      .position(|task| &task.id == id)?;
    Some(self.tasks.remove(idx))
  }

  fn load_persisted(&self) -> Vec<Task> {
    let raw = match self
      .storage
      .get(&self.storage_key)
    {
      | Ok(Some(raw)) => raw,
      | Ok(None) => {
        debug!(
          "no persisted task list; \
           starting empty"
        );
        return Vec::new();
      }
      | Err(error) => {
        warn!(error = %format!("{error:#}"), "failed reading persisted task list; starting empty");
        return Vec::new();
      }
    };

    match decode_tasks(&raw) {
      | Ok(tasks) => sanitize_loaded(tasks),
      | Err(error) => {
        warn!(error = %format!("{error:#}"), "discarding malformed persisted task list");
        Vec::new()
      }
    }
  }

  fn persist(&mut self) {
    let encoded =
      match encode_tasks(&self.tasks) {
        | Ok(encoded) => encoded,
        | Err(error) => {
          warn!(error = %format!("{error:#}"), "failed encoding task list; keeping in-memory state");
          return;
        }
      };

    if let Err(error) = self
      .storage
      .set(&self.storage_key, &encoded)
    {
      warn!(error = %format!("{error:#}"), "failed persisting task list; keeping in-memory state");
    }
  }

  fn notify(&self, event: &StoreEvent) {
    for (_, listener) in &self.listeners {
      listener(event);
    }
  }
}

/// Trims loaded text and drops records
/// that are blank or repeat an id.
fn sanitize_loaded(
  tasks: Vec<Task>
) -> Vec<Task> {
  let mut seen = HashSet::new();
  tasks
    .into_iter()
    .filter_map(|mut task| {
      let trimmed = task.text.trim();
      if trimmed.is_empty() {
        warn!(id = %task.id, "dropping persisted task with blank text");
        return None;
      }
      if !seen.insert(task.id.clone()) {
        warn!(id = %task.id, "dropping persisted task with duplicate id");
        return None;
      }
      if trimmed.len() != task.text.len()
      {
        task.text = trimmed.to_string();
      }
      Some(task)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;
  use std::rc::Rc;

  use super::*;
  use crate::storage::MemoryStorage;

  fn store() -> TodoStore<MemoryStorage> {
    let mut store = TodoStore::with_clock(
      MemoryStorage::new(),
      &StorageConfig::default(),
      || 1_700_000_000_000_i64
    );
    store.initialize();
    store
  }

  #[test]
  fn same_tick_additions_keep_insertion_order()
  {
    let mut store = store();
    let a = store.add("A").unwrap();
    let b = store.add("B").unwrap();
    let c = store.add("C").unwrap();
    assert_ne!(a, b);
    assert_ne!(b, c);

    let order: Vec<&TaskId> = store
      .tasks()
      .iter()
      .map(|task| &task.id)
      .collect();
    assert_eq!(order, vec![&c, &b, &a]);
    assert!(
      store.tasks().iter().all(|task| {
        task.created_at
          == 1_700_000_000_000
      })
    );
  }

  #[test]
  fn edit_with_same_text_is_unchanged() {
    let mut store = store();
    let id = store.add("Same").unwrap();
    assert_eq!(
      store.edit(&id, "  Same "),
      EditOutcome::Unchanged
    );
    assert_eq!(
      store.edit(
        &TaskId::from("missing"),
        "x"
      ),
      EditOutcome::NotFound
    );
    assert_eq!(
      store.edit(
        &TaskId::from("missing"),
        " "
      ),
      EditOutcome::NotFound
    );
  }

  #[test]
  fn toggle_does_not_reorder() {
    let mut store = store();
    let a = store.add("A").unwrap();
    store.add("B").unwrap();
    store.toggle(&a);
    store.edit(&a, "A2");
    assert_eq!(store.tasks()[1].id, a);
    assert_eq!(store.tasks()[1].text, "A2");
  }

  #[test]
  fn no_op_calls_do_not_notify() {
    let mut store = store();
    let events =
      Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    store.subscribe(move |event| {
      sink.borrow_mut().push(event.clone());
    });

    store.add("   ");
    store.toggle(&TaskId::from("nope"));
    store.remove(&TaskId::from("nope"));
    store.clear_completed();
    store.set_filter(Filter::All);

    assert!(events.borrow().is_empty());
  }

  #[test]
  fn sanitize_trims_and_dedupes() {
    let tasks = vec![
      Task::new(
        TaskId::from("a"),
        "  padded ".to_string(),
        1
      ),
      Task::new(
        TaskId::from("b"),
        "   ".to_string(),
        2
      ),
      Task::new(
        TaskId::from("a"),
        "dup".to_string(),
        3
      ),
    ];
    let kept = sanitize_loaded(tasks);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].text, "padded");
    assert_eq!(kept[0].created_at, 1);
  }
}
