pub mod clock;
pub mod config;
pub mod filter;
pub mod storage;
pub mod store;
pub mod task;

pub use config::AppConfig;
pub use filter::Filter;
pub use storage::KeyValueStorage;
pub use store::{
  EditOutcome,
  StoreEvent,
  Subscription,
  TodoStore
};
pub use task::{
  Task,
  TaskId
};
