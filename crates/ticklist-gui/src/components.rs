mod filter_bar;
mod list_footer;
mod new_task_input;
mod todo_item;
mod todo_list;

pub use filter_bar::FilterBar;
pub use list_footer::ListFooter;
pub use new_task_input::NewTaskInput;
pub use todo_item::TodoItem;
pub use todo_list::TodoList;
