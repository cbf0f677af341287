use std::cell::RefCell;
use std::rc::Rc;

use ticklist_core::{
  AppConfig,
  Filter,
  KeyValueStorage,
  Task,
  TaskId,
  TodoStore
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  function_component,
  html,
  use_effect_with,
  use_force_update,
  use_memo,
  use_mut_ref
};

use crate::components::{
  FilterBar,
  ListFooter,
  NewTaskInput,
  TodoList
};
use crate::storage::BrowserStorage;

const APP_CONFIG_TOML: &str =
  include_str!("../assets/ticklist.toml");

type SharedStore =
  Rc<RefCell<TodoStore<BrowserStorage>>>;

fn load_app_config() -> AppConfig {
  match AppConfig::from_toml_str(
    APP_CONFIG_TOML
  ) {
    | Ok(config) => {
      tracing::info!(
        storage_key = %config.storage.key,
        "loaded app config"
      );
      config
    }
    | Err(error) => {
      tracing::error!(error = %format!("{error:#}"), "failed to parse app config; using defaults");
      AppConfig::default()
    }
  }
}

/// Whether the new-task field should be
/// cleared and refocused.
fn submit_new_task<S: KeyValueStorage>(
  store: &mut TodoStore<S>,
  text: &str
) -> bool {
  store.add(text).is_some()
}

#[function_component(App)]
pub fn app() -> Html {
  let config =
    use_memo((), |_| load_app_config());
  let store: SharedStore = {
    let storage_config =
      config.storage.clone();
    use_mut_ref(move || {
      let mut store = TodoStore::new(
        BrowserStorage,
        &storage_config
      );
      store.initialize();
      store
    })
  };
  let rerender = use_force_update();

  {
    let store = store.clone();
    use_effect_with((), move |_| {
      let subscription =
        store.borrow_mut().subscribe(
          move |event| {
            tracing::debug!(
              ?event,
              "store changed"
            );
            // Deferred so the render
            // never overlaps the
            // store's mutable borrow.
            let rerender =
              rerender.clone();
            yew::platform::spawn_local(
              async move {
                rerender.force_update();
              }
            );
          }
        );
      move || {
        store
          .borrow_mut()
          .unsubscribe(subscription);
      }
    });
  }

  let on_submit = {
    let store = store.clone();
    Callback::from(
      move |text: String| -> bool {
        submit_new_task(
          &mut *store.borrow_mut(),
          &text
        )
      }
    )
  };

  let on_toggle = {
    let store = store.clone();
    Callback::from(move |id: TaskId| {
      store.borrow_mut().toggle(&id);
    })
  };

  let on_delete = {
    let store = store.clone();
    Callback::from(move |id: TaskId| {
      store.borrow_mut().remove(&id);
    })
  };

  let on_edit = {
    let store = store.clone();
    Callback::from(
      move |(id, text): (
        TaskId,
        String
      )| {
        store
          .borrow_mut()
          .edit(&id, &text);
      }
    )
  };

  let on_set_filter = {
    let store = store.clone();
    Callback::from(
      move |filter: Filter| {
        store
          .borrow_mut()
          .set_filter(filter);
      }
    )
  };

  let on_clear_completed = {
    let store = store.clone();
    Callback::from(
      move |_: MouseEvent| {
        store
          .borrow_mut()
          .clear_completed();
      }
    )
  };

  let (visible, items_left, active_filter) = {
    let store = store.borrow();
    (
      store
        .filtered_view()
        .into_iter()
        .cloned()
        .collect::<Vec<Task>>(),
      store.items_left_count(),
      store.filter()
    )
  };

  html! {
      <div class="app" aria-labelledby="app-title">
          <header class="header">
              <div class="title">
                  <div class="logo" aria-hidden="true">{ "✔" }</div>
                  <h1 id="app-title">{ config.ui.title.clone() }</h1>
              </div>
          </header>

          <NewTaskInput
              placeholder={config.ui.input_placeholder.clone()}
              on_submit={on_submit}
          />

          <section class="toolbar" aria-label="Filters and actions">
              <FilterBar active={active_filter} on_set_filter={on_set_filter} />
              <div>
                  <button
                      class="btn"
                      onclick={on_clear_completed}
                      aria-label="Clear completed tasks"
                  >
                      { "Clear completed" }
                  </button>
              </div>
          </section>

          <TodoList
              items={visible}
              on_toggle={on_toggle}
              on_delete={on_delete}
              on_edit={on_edit}
          />

          <ListFooter items_left={items_left} />
      </div>
  }
}
