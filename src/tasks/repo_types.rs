use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Enum stored as its display name in a TEXT column.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(format!(
                        "unknown {} '{}', expected one of: {}",
                        stringify!($name).to_lowercase(),
                        other,
                        [$($text),+].join(", ")
                    )),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(Priority {
    Low => "Low",
    Medium => "Medium",
    High => "High",
});

text_enum!(Category {
    Work => "Work",
    Personal => "Personal",
    Health => "Health",
    Study => "Study",
});

text_enum!(Status {
    Pending => "pending",
    Completed => "completed",
});

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Personal
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Pending
    }
}

/// A task owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: String, // caller-supplied, not interpreted
    pub priority: Priority,
    pub category: Category,
    pub status: Status,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }
}

/// Row as read from the `tasks` table.
#[derive(Debug, FromRow)]
pub struct TaskRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: String,
    pub category: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = String;

    fn try_from(r: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            title: r.title,
            description: r.description,
            due_date: r.due_date,
            priority: r.priority.parse()?,
            category: r.category.parse()?,
            status: r.status.parse()?,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}
