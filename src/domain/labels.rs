use super::enums::Quadrant;
use serde::{Deserialize, Serialize};

/// User-editable display names of the four quadrants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadrantLabels {
    pub q1: String,
    pub q2: String,
    pub q3: String,
    pub q4: String,
}

impl Default for QuadrantLabels {
    fn default() -> Self {
        Self {
            q1: "Urgent & Important".to_string(),
            q2: "Important, Not Urgent".to_string(),
            q3: "Urgent, Not Important".to_string(),
            q4: "Neither".to_string(),
        }
    }
}

impl QuadrantLabels {
    pub fn get(&self, quadrant: Quadrant) -> &str {
        match quadrant {
            Quadrant::Q1 => &self.q1,
            Quadrant::Q2 => &self.q2,
            Quadrant::Q3 => &self.q3,
            Quadrant::Q4 => &self.q4,
        }
    }

    /// Rename a quadrant; blank names are ignored
    pub fn set(&mut self, quadrant: Quadrant, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() {
            return false;
        }
        let slot = match quadrant {
            Quadrant::Q1 => &mut self.q1,
            Quadrant::Q2 => &mut self.q2,
            Quadrant::Q3 => &mut self.q3,
            Quadrant::Q4 => &mut self.q4,
        };
        *slot = label.to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_ignores_blank() {
        let mut labels = QuadrantLabels::default();
        assert!(!labels.set(Quadrant::Q2, "   "));
        assert_eq!(labels.get(Quadrant::Q2), "Important, Not Urgent");

        assert!(labels.set(Quadrant::Q2, " Plan "));
        assert_eq!(labels.get(Quadrant::Q2), "Plan");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let labels: QuadrantLabels = serde_json::from_str(r#"{"q1":"Now"}"#).unwrap();
        assert_eq!(labels.get(Quadrant::Q1), "Now");
        assert_eq!(labels.get(Quadrant::Q4), "Neither");
    }
}
