use crate::report::stats::{format_minutes, FocusStats};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Render focus statistics as a markdown report
pub fn render_report(stats: &FocusStats) -> String {
    let mut report = String::new();

    report.push_str(&format!(
        "# Focus Report - {} ({})\n\n",
        stats.range.name(),
        stats.start
    ));

    report.push_str("## Summary\n\n");
    report.push_str(&format!(
        "- **Total Focus:** {}\n",
        format_minutes(stats.total_minutes)
    ));
    let focused_tasks = stats
        .quadrants
        .iter()
        .flat_map(|q| &q.tasks)
        .filter(|t| t.minutes > 0.0)
        .count();
    report.push_str(&format!("- **Tasks With Focus Time:** {}\n\n", focused_tasks));

    report.push_str("## By Day\n\n");
    report.push_str("| Day | Date | Minutes |\n|---|---|---|\n");
    for day in &stats.days {
        report.push_str(&format!(
            "| {} | {} | {:.1} |\n",
            day.label,
            day.date,
            day.total_minutes()
        ));
    }
    report.push('\n');

    report.push_str("## By Quadrant\n\n");
    for quadrant in &stats.quadrants {
        report.push_str(&format!("### {} ({})\n\n", quadrant.label, quadrant.quadrant));
        if quadrant.tasks.is_empty() {
            report.push_str("_No tasks_\n\n");
            continue;
        }
        for task in &quadrant.tasks {
            report.push_str(&format!("- {}: {:.1} min\n", task.text, task.minutes));
        }
        report.push('\n');
    }

    report
}

/// Write a rendered report, by default to `<data dir>/report-<start>.md`
pub fn write_report(
    stats: &FocusStats,
    data_dir: &Path,
    output_path: Option<PathBuf>,
) -> Result<PathBuf> {
    let output = output_path.unwrap_or_else(|| data_dir.join(format!("report-{}.md", stats.start)));
    let report = render_report(stats);
    crate::persistence::atomic_write(&output, &report)
        .with_context(|| format!("Failed to write report: {}", output.display()))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewTask, Quadrant, QuadrantLabels, Task, TaskFields, TimeRecord};
    use crate::report::stats::{calculate_focus_stats, StatsRange};
    use chrono::{TimeZone, Utc};

    fn sample_stats() -> FocusStats {
        let start = Utc.with_ymd_and_hms(2025, 3, 12, 9, 0, 0).unwrap().timestamp_millis();
        let mut task: Task = NewTask {
            quadrant: Quadrant::Q2,
            text: "Read paper".to_string(),
            created_at: start,
            fields: TaskFields::default(),
        }
        .into_task(uuid::Uuid::new_v4(), "me");
        task.time_records = vec![TimeRecord::closed(start, start + 45 * 60_000)];

        calculate_focus_stats(
            &[task],
            &QuadrantLabels::default(),
            StatsRange::Today,
            start + 3_600_000,
            &Utc,
        )
    }

    #[test]
    fn test_render_report_sections() {
        let report = render_report(&sample_stats());
        assert!(report.starts_with("# Focus Report - Today (2025-03-12)"));
        assert!(report.contains("- **Total Focus:** 45min"));
        assert!(report.contains("- **Tasks With Focus Time:** 1"));
        assert!(report.contains("| Today | 2025-03-12 | 45.0 |"));
        assert!(report.contains("### Important, Not Urgent (q2)"));
        assert!(report.contains("- Read paper: 45.0 min"));
        assert!(report.contains("### Neither (q4)\n\n_No tasks_"));
    }

    #[test]
    fn test_write_report_default_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_report(&sample_stats(), temp_dir.path(), None).unwrap();
        assert_eq!(path, temp_dir.path().join("report-2025-03-12.md"));
        assert!(std::fs::read_to_string(path).unwrap().contains("Read paper"));
    }
}
