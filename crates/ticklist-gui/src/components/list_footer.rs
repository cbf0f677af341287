use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ListFooterProps {
  pub items_left: usize
}

#[function_component(ListFooter)]
pub fn list_footer(
  props: &ListFooterProps
) -> Html {
  html! {
      <footer class="footer">
          <div class="muted">{ items_left_label(props.items_left) }</div>
          <div class="muted">{ "Double-click a task to edit" }</div>
      </footer>
  }
}

fn items_left_label(
  count: usize
) -> String {
  if count == 1 {
    "1 item left".to_string()
  } else {
    format!("{count} items left")
  }
}
