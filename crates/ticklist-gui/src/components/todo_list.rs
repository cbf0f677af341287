use ticklist_core::{
  Task,
  TaskId
};
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::TodoItem;

#[derive(Properties, PartialEq)]
pub struct TodoListProps {
  pub items:     Vec<Task>,
  pub on_toggle: Callback<TaskId>,
  pub on_delete: Callback<TaskId>,
  pub on_edit:
    Callback<(TaskId, String)>
}

#[function_component(TodoList)]
pub fn todo_list(
  props: &TodoListProps
) -> Html {
  if props.items.is_empty() {
    return html! {
        <div class="empty">{ "No tasks" }</div>
    };
  }

  html! {
      <div class="list" role="list">
          {
              for props.items.iter().cloned().map(|task| html! {
                  <TodoItem
                      key={task.id.to_string()}
                      task={task.clone()}
                      on_toggle={props.on_toggle.clone()}
                      on_delete={props.on_delete.clone()}
                      on_edit={props.on_edit.clone()}
                  />
              })
          }
      </div>
  }
}
