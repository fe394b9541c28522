use serde::{Deserialize, Serialize};

/// Eisenhower bucket a task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quadrant {
    /// Important and urgent
    Q1,
    /// Important, not urgent
    Q2,
    /// Urgent, not important
    Q3,
    /// Neither
    Q4,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4];

    /// Parse from a tag like "q2" (case-insensitive) or a bare digit "2"
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "q1" | "1" => Some(Self::Q1),
            "q2" | "2" => Some(Self::Q2),
            "q3" | "3" => Some(Self::Q3),
            "q4" | "4" => Some(Self::Q4),
            _ => None,
        }
    }

    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Q1 => "q1",
            Self::Q2 => "q2",
            Self::Q3 => "q3",
            Self::Q4 => "q4",
        }
    }

    /// Position in `Quadrant::ALL`, used to index per-quadrant arrays
    pub fn index(&self) -> usize {
        match self {
            Self::Q1 => 0,
            Self::Q2 => 1,
            Self::Q3 => 2,
            Self::Q4 => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Color id understood by calendar providers
    pub fn color_tag(&self) -> &'static str {
        match self {
            Self::Q1 => "11",
            Self::Q2 => "6",
            Self::Q3 => "9",
            Self::Q4 => "10",
        }
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_tag())
    }
}

/// Urgency tier of a deadline countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTier {
    /// One day or less
    Urgent,
    /// Up to three days
    Warning,
    /// Up to a week
    Notice,
    Safe,
}

impl ColorTier {
    pub fn for_days_left(days_left: i64) -> Self {
        if days_left <= 1 {
            Self::Urgent
        } else if days_left <= 3 {
            Self::Warning
        } else if days_left <= 7 {
            Self::Notice
        } else {
            Self::Safe
        }
    }
}

/// Sort order for the flat list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Earliest deadline first, tasks without one last
    Deadline,
    /// Newest first
    CreatedDesc,
    Text,
    /// Most progressed first
    ProgressDesc,
}

impl SortKey {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "deadline" => Some(Self::Deadline),
            "created" => Some(Self::CreatedDesc),
            "text" => Some(Self::Text),
            "progress" => Some(Self::ProgressDesc),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Deadline => "deadline",
            Self::CreatedDesc => "created",
            Self::Text => "text",
            Self::ProgressDesc => "progress",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Deadline => Self::CreatedDesc,
            Self::CreatedDesc => Self::Text,
            Self::Text => Self::ProgressDesc,
            Self::ProgressDesc => Self::Deadline,
        }
    }
}

/// Completion filter for the flat list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "all" => Some(Self::All),
            "pending" => Some(Self::Pending),
            "completed" | "done" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::All => Self::Pending,
            Self::Pending => Self::Completed,
            Self::Completed => Self::All,
        }
    }
}

/// Lifecycle state of the focus timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// How `remove` treats a task in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Mark `deleted = true`, keep the row
    #[default]
    Soft,
    /// Remove the row
    Hard,
}

/// Which screen the terminal UI shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Board,
    List,
    Calendar,
    Stats,
}

impl ViewMode {
    pub fn next(&self) -> Self {
        match self {
            Self::Board => Self::List,
            Self::List => Self::Calendar,
            Self::Calendar => Self::Stats,
            Self::Stats => Self::Board,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Board => "Board",
            Self::List => "List",
            Self::Calendar => "Calendar",
            Self::Stats => "Stats",
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    EditingTask,
    EditingDeadline,
    EditingLabel,
    MovingTask,
    Timer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrant_from_tag() {
        assert_eq!(Quadrant::from_tag("q1"), Some(Quadrant::Q1));
        assert_eq!(Quadrant::from_tag("Q3"), Some(Quadrant::Q3));
        assert_eq!(Quadrant::from_tag("4"), Some(Quadrant::Q4));
        assert_eq!(Quadrant::from_tag("q5"), None);
    }

    #[test]
    fn test_quadrant_index_round_trip() {
        for q in Quadrant::ALL {
            assert_eq!(Quadrant::from_index(q.index()), Some(q));
        }
        assert_eq!(Quadrant::from_index(4), None);
    }

    #[test]
    fn test_quadrant_serde_tag() {
        let json = serde_json::to_string(&Quadrant::Q2).unwrap();
        assert_eq!(json, "\"q2\"");
        let back: Quadrant = serde_json::from_str("\"q4\"").unwrap();
        assert_eq!(back, Quadrant::Q4);
        assert!(serde_json::from_str::<Quadrant>("\"q9\"").is_err());
    }

    #[test]
    fn test_color_tier_thresholds() {
        assert_eq!(ColorTier::for_days_left(1), ColorTier::Urgent);
        assert_eq!(ColorTier::for_days_left(2), ColorTier::Warning);
        assert_eq!(ColorTier::for_days_left(3), ColorTier::Warning);
        assert_eq!(ColorTier::for_days_left(4), ColorTier::Notice);
        assert_eq!(ColorTier::for_days_left(7), ColorTier::Notice);
        assert_eq!(ColorTier::for_days_left(8), ColorTier::Safe);
    }

    #[test]
    fn test_sort_key_cycle() {
        let mut key = SortKey::Deadline;
        for _ in 0..4 {
            key = key.next();
        }
        assert_eq!(key, SortKey::Deadline);
        assert_eq!(SortKey::from_tag("progress"), Some(SortKey::ProgressDesc));
    }
}
