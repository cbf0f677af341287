use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

use crate::task::Task;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
)]
pub enum Filter {
  #[default]
  All,
  Active,
  Completed
}

impl Filter {
  pub const fn all() -> [Self; 3] {
    [
      Self::All,
      Self::Active,
      Self::Completed
    ]
  }

  pub const fn as_key(
    self
  ) -> &'static str {
    match self {
      | Self::All => "all",
      | Self::Active => "active",
      | Self::Completed => "completed"
    }
  }

  pub const fn label(
    self
  ) -> &'static str {
    match self {
      | Self::All => "All",
      | Self::Active => "Active",
      | Self::Completed => "Completed"
    }
  }

  pub fn matches(
    self,
    task: &Task
  ) -> bool {
    match self {
      | Self::All => true,
      | Self::Active => !task.completed,
      | Self::Completed => {
        task.completed
      }
    }
  }
}

impl fmt::Display for Filter {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

impl FromStr for Filter {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    let key =
      s.trim().to_ascii_lowercase();
    Self::all()
      .into_iter()
      .find(|filter| {
        filter.as_key() == key
      })
      .ok_or_else(|| {
        anyhow!(
          "unknown filter: {s:?} \
           (expected all, active or \
           completed)"
        )
      })
  }
}

#[cfg(test)]
mod tests {
  use super::Filter;
  use crate::task::{
    Task,
    TaskId
  };

  #[test]
  fn parses_keys_case_insensitively() {
    assert_eq!(
      "all".parse::<Filter>().unwrap(),
      Filter::All
    );
    assert_eq!(
      " Active ".parse::<Filter>().unwrap(),
      Filter::Active
    );
    assert_eq!(
      "COMPLETED"
        .parse::<Filter>()
        .unwrap(),
      Filter::Completed
    );
    assert!(
      "done".parse::<Filter>().is_err()
    );
  }

  #[test]
  fn keys_round_trip_through_display() {
    for filter in Filter::all() {
      assert_eq!(
        filter
          .to_string()
          .parse::<Filter>()
          .unwrap(),
        filter
      );
    }
  }

  #[test]
  fn matches_by_completion() {
    let mut task = Task::new(
      TaskId::from("t"),
      "t".to_string(),
      0
    );
    assert!(Filter::All.matches(&task));
    assert!(
      Filter::Active.matches(&task)
    );
    assert!(
      !Filter::Completed.matches(&task)
    );

    task.completed = true;
    assert!(Filter::All.matches(&task));
    assert!(
      !Filter::Active.matches(&task)
    );
    assert!(
      Filter::Completed.matches(&task)
    );
  }

  #[test]
  fn defaults_to_all() {
    assert_eq!(
      Filter::default(),
      Filter::All
    );
  }
}
