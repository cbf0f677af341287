use ticklist_core::Filter;
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
  pub active:        Filter,
  pub on_set_filter: Callback<Filter>
}

#[function_component(FilterBar)]
pub fn filter_bar(
  props: &FilterBarProps
) -> Html {
  html! {
      <div class="filters" role="tablist" aria-label="Filter tasks">
          {
              for Filter::all().into_iter().map(|filter| {
                  let on_set_filter = props.on_set_filter.clone();
                  let is_active = props.active == filter;
                  html! {
                      <button
                          class={classes!("filter-btn", is_active.then_some("active"))}
                          aria-pressed={is_active.to_string()}
                          onclick={Callback::from(move |_| on_set_filter.emit(filter))}
                      >
                          { filter.label() }
                      </button>
                  }
              })
          }
      </div>
  }
}
