/*
Pretty printing of a batch of integration tasks: one table row per task and a short
table of totals, both in the tabled modern-rounded style.
*/
use crate::Utils::integration_task::{TaskOutcome, TaskReport};
use log::info;
use std::collections::HashMap;
use std::time::Duration;
use tabled::settings::Style;
use tabled::{Table, Tabled, builder::Builder};

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct TaskRow {
    #[tabled(rename = "task")]
    pub name: String,
    pub expression: String,
    pub method: String,
    pub result: String,
    pub confidence: String,
    pub evaluations: String,
    #[tabled(rename = "depth")]
    pub deepest_level: String,
}

impl TaskRow {
    pub fn from_report(report: &TaskReport) -> TaskRow {
        let dash = || "-".to_string();
        let (method, result, confidence, evaluations, deepest_level) = match &report.outcome {
            Ok(TaskOutcome::Definite(result)) => (
                result.method.to_string(),
                format!("{:.10}", result.value),
                result.confidence.to_string(),
                result.evaluations.to_string(),
                result.deepest_level.to_string(),
            ),
            Ok(TaskOutcome::Indefinite(antiderivative)) => (
                antiderivative.strategy().to_string(),
                antiderivative.to_string(),
                dash(),
                dash(),
                dash(),
            ),
            Err(e) => (dash(), format!("error: {}", e), dash(), dash(), dash()),
        };
        TaskRow {
            name: report.name.clone(),
            expression: report.expression.clone(),
            method,
            result,
            confidence,
            evaluations,
            deepest_level,
        }
    }
}

pub fn task_rows(reports: &[TaskReport]) -> Vec<TaskRow> {
    reports.iter().map(TaskRow::from_report).collect()
}

pub fn results_table(reports: &[TaskReport]) -> String {
    let mut table = Table::new(task_rows(reports));
    table.with(Style::modern_rounded());
    table.to_string()
}

/// totals of a run: task counts, integrand evaluations and wall time
pub fn totals_table(reports: &[TaskReport], elapsed: Duration) -> String {
    let failed = reports.iter().filter(|r| r.outcome.is_err()).count();
    let evaluations: usize = reports
        .iter()
        .filter_map(|r| match &r.outcome {
            Ok(TaskOutcome::Definite(result)) => Some(result.evaluations),
            _ => None,
        })
        .sum();
    let mut stats = HashMap::new();
    stats.insert("tasks".to_string(), reports.len().to_string());
    stats.insert("failed".to_string(), failed.to_string());
    stats.insert("integrand evaluations".to_string(), evaluations.to_string());
    stats.insert(
        "time elapsed, ms".to_string(),
        elapsed.as_millis().to_string(),
    );
    let mut rows: Vec<(String, String)> = stats.into_iter().collect();
    rows.sort();
    let mut builder = Builder::default();
    for (key, value) in rows {
        builder.push_record([key, value]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

pub fn print_statistics(reports: &[TaskReport], elapsed: Duration) {
    info!("\n \n CALC STATISTICS \n \n {}", totals_table(reports, elapsed));
    println!("{}", results_table(reports));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Utils::integration_task::{parse_task_text, run_tasks};

    fn reports() -> Vec<TaskReport> {
        let text = "integral1\n  expression: \"3*x^2 + 2*x\"\n  lower: 0\n  upper: 1\n\
                    integral2\n  expression: x^2\n\
                    integral3\n  expression: \"1/x\"\n  lower: -1\n  upper: 1\n  method: simpson";
        let file = parse_task_text(text).unwrap();
        run_tasks(&file.tasks, false)
    }

    #[test]
    fn test_task_rows() {
        let rows = task_rows(&reports());
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].name, "integral1");
        assert_eq!(rows[0].method, "symbolic");
        assert_eq!(rows[0].result, "2.0000000000");
        assert_eq!(rows[0].confidence, "Converged");

        assert_eq!(rows[1].method, "rule-table");
        assert_eq!(rows[1].result, "x^3 / 3 + C");
        assert_eq!(rows[1].evaluations, "-");

        assert!(rows[2].result.starts_with("error: "), "{}", rows[2].result);
        assert_eq!(rows[2].method, "-");
    }

    #[test]
    fn test_tables_render() {
        let reports = reports();
        let table = results_table(&reports);
        for header in ["task", "expression", "method", "result", "confidence", "depth"] {
            assert!(table.contains(header), "{}", header);
        }
        assert!(table.contains("integral3"));
        assert!(table.contains('╭'));

        let totals = totals_table(&reports, Duration::from_millis(12));
        assert!(totals.contains("failed"));
        assert!(totals.contains("12"));
    }
}
