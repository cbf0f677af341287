use gloo::timers::callback::Timeout;
use ticklist_core::{
  Task,
  TaskId
};
use web_sys::{
  HtmlElement,
  HtmlInputElement
};
use yew::{
  Callback,
  Event,
  FocusEvent,
  Html,
  InputEvent,
  KeyboardEvent,
  MouseEvent,
  Properties,
  TargetCast,
  classes,
  function_component,
  html,
  use_effect_with,
  use_node_ref,
  use_state
};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
enum EditKey {
  Save,
  Cancel,
  Ignore
}

fn edit_key(key: &str) -> EditKey {
  match key {
    | "Enter" => EditKey::Save,
    | "Escape" => EditKey::Cancel,
    | _ => EditKey::Ignore
  }
}

fn opens_editor(key: &str) -> bool {
  matches!(key, "Enter" | "F2")
}

#[derive(Properties, PartialEq)]
pub struct TodoItemProps {
  pub task:      Task,
  pub on_toggle: Callback<TaskId>,
  pub on_delete: Callback<TaskId>,
  pub on_edit:
    Callback<(TaskId, String)>
}

/// One row. Edit mode and the draft
/// text are local to the row; the store
/// only sees the committed text.
#[function_component(TodoItem)]
pub fn todo_item(
  props: &TodoItemProps
) -> Html {
  let editing = use_state(|| false);
  let draft = {
    let text = props.task.text.clone();
    use_state(move || text)
  };
  let input_ref = use_node_ref();
  let text_ref = use_node_ref();

  let id = props.task.id.clone();
  let text_id =
    format!("task-text-{id}");
  let hint_id =
    format!("edit-hint-{id}");
  let controls_id =
    format!("edit-controls-{id}");

  {
    let draft = draft.clone();
    use_effect_with(
      props.task.text.clone(),
      move |text| {
        draft.set(text.clone());
        || ()
      }
    );
  }

  {
    let input_ref = input_ref.clone();
    use_effect_with(
      *editing,
      move |editing| {
        if *editing
          && let Some(input) = input_ref
            .cast::<HtmlInputElement>()
        {
          let _ = input.focus();
          let end = input
            .value()
            .encode_utf16()
            .count()
            as u32;
          let _ = input
            .set_selection_range(
              end, end
            );
        }
        || ()
      }
    );
  }

  let commit = {
    let editing = editing.clone();
    let draft = draft.clone();
    let text_ref = text_ref.clone();
    let on_edit = props.on_edit.clone();
    let id = id.clone();
    let original =
      props.task.text.clone();
    Callback::from(move |save: bool| {
      if !*editing {
        return;
      }
      editing.set(false);
      if save {
        on_edit.emit((
          id.clone(),
          (*draft).clone()
        ));
      } else {
        draft.set(original.clone());
      }

      let text_ref = text_ref.clone();
      Timeout::new(0, move || {
        if let Some(element) = text_ref
          .cast::<HtmlElement>()
        {
          let _ = element.focus();
        }
      })
      .forget();
    })
  };

  let start_editing = {
    let editing = editing.clone();
    Callback::from(move |_: ()| {
      editing.set(true);
    })
  };

  let on_toggle = {
    let on_toggle =
      props.on_toggle.clone();
    let id = id.clone();
    Callback::from(move |_: Event| {
      on_toggle.emit(id.clone());
    })
  };

  let on_delete = {
    let on_delete =
      props.on_delete.clone();
    let id = id.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_delete.emit(id.clone());
      }
    )
  };

  let body = if *editing {
    let on_input = {
      let draft = draft.clone();
      Callback::from(
        move |e: InputEvent| {
          draft.set(
            e.target_unchecked_into::<
              HtmlInputElement
            >()
            .value()
          );
        }
      )
    };
    let on_blur = {
      let commit = commit.clone();
      Callback::from(
        move |_: FocusEvent| {
          commit.emit(true);
        }
      )
    };
    let on_keydown = {
      let commit = commit.clone();
      Callback::from(
        move |e: KeyboardEvent| {
          match edit_key(&e.key()) {
            | EditKey::Save => {
              e.prevent_default();
              commit.emit(true);
            }
            | EditKey::Cancel => {
              e.prevent_default();
              commit.emit(false);
            }
            | EditKey::Ignore => {}
          }
        }
      )
    };

    html! {
        <>
            <input
                ref={input_ref}
                class="edit"
                value={(*draft).clone()}
                aria-label="Edit task"
                aria-describedby={controls_id.clone()}
                oninput={on_input}
                onblur={on_blur}
                onkeydown={on_keydown}
            />
            <span id={controls_id} class="sr-only">
                { "Press Enter to save, Escape to cancel. Leaving the field saves." }
            </span>
        </>
    }
  } else {
    let on_dblclick = {
      let start_editing =
        start_editing.clone();
      Callback::from(
        move |_: MouseEvent| {
          start_editing.emit(());
        }
      )
    };
    let on_keydown = {
      let start_editing =
        start_editing.clone();
      Callback::from(
        move |e: KeyboardEvent| {
          if opens_editor(&e.key()) {
            e.prevent_default();
            start_editing.emit(());
          }
        }
      )
    };

    html! {
        <>
            <div
                ref={text_ref}
                id={text_id.clone()}
                class="text"
                tabindex="0"
                ondblclick={on_dblclick}
                onkeydown={on_keydown}
                aria-describedby={hint_id.clone()}
                title="Double-click or press Enter/F2 to edit"
            >
                { &props.task.text }
            </div>
            <span id={hint_id} class="sr-only">{ "Press Enter or F2 to edit this task." }</span>
        </>
    }
  };

  html! {
      <div
          class={classes!("todo", props.task.completed.then_some("completed"))}
          data-id={id.to_string()}
          role="listitem"
      >
          <input
              type="checkbox"
              class="check"
              checked={props.task.completed}
              onchange={on_toggle}
              aria-labelledby={text_id}
          />
          { body }
          <div class="actions">
              <button
                  class="icon-btn danger"
                  onclick={on_delete}
                  aria-label={format!("Delete task: {}", props.task.text)}
              >
                  { "🗑️" }
              </button>
          </div>
      </div>
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn enter_saves_and_escape_cancels() {
    assert_eq!(
      edit_key("Enter"),
      EditKey::Save
    );
    assert_eq!(
      edit_key("Escape"),
      EditKey::Cancel
    );
    assert_eq!(
      edit_key("a"),
      EditKey::Ignore
    );
    assert_eq!(
      edit_key("F2"),
      EditKey::Ignore
    );
  }

  #[test]
  fn enter_and_f2_open_the_editor() {
    assert!(opens_editor("Enter"));
    assert!(opens_editor("F2"));
    assert!(!opens_editor("Escape"));
    assert!(!opens_editor(" "));
  }
}
