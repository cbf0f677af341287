use web_sys::HtmlInputElement;
use yew::{
  Callback,
  Html,
  InputEvent,
  KeyboardEvent,
  MouseEvent,
  Properties,
  TargetCast,
  function_component,
  html,
  use_node_ref,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct NewTaskInputProps {
  pub placeholder: String,
  /// Returns whether a task was
  /// created; the field is cleared and
  /// refocused only then.
  pub on_submit:   Callback<String, bool>
}

#[function_component(NewTaskInput)]
pub fn new_task_input(
  props: &NewTaskInputProps
) -> Html {
  let value = use_state(String::new);
  let input_ref = use_node_ref();

  let submit = {
    let value = value.clone();
    let input_ref = input_ref.clone();
    let on_submit =
      props.on_submit.clone();
    Callback::from(move |_: ()| {
      if !on_submit.emit((*value).clone())
      {
        return;
      }
      value.set(String::new());
      if let Some(input) = input_ref
        .cast::<HtmlInputElement>()
      {
        let _ = input.focus();
      }
    })
  };

  let on_input = {
    let value = value.clone();
    Callback::from(
      move |e: InputEvent| {
        value.set(
          e.target_unchecked_into::<
            HtmlInputElement
          >()
          .value()
        );
      }
    )
  };

  let on_keydown = {
    let submit = submit.clone();
    Callback::from(
      move |e: KeyboardEvent| {
        if e.key() == "Enter" {
          e.prevent_default();
          submit.emit(());
        }
      }
    )
  };

  html! {
      <section class="input-row" aria-label="Add new task">
          <label for="new-todo" class="sr-only">{ "Add a task" }</label>
          <input
              id="new-todo"
              ref={input_ref}
              type="text"
              placeholder={props.placeholder.clone()}
              value={(*value).clone()}
              oninput={on_input}
              onkeydown={on_keydown}
              aria-describedby="add-instructions"
          />
          <button
              class="btn primary"
              onclick={Callback::from(move |_: MouseEvent| submit.emit(()))}
              aria-label="Add task"
          >
              { "Add" }
          </button>
          <span id="add-instructions" class="sr-only">{ "Press Enter to add the task" }</span>
      </section>
  }
}
