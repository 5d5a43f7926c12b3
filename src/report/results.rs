// Text and CSV renderings for each engine result

use super::csv_output::{estimate_field, optional_field, CsvTable};
use super::Report;
use crate::engine::{
    AnovaResult, AssociationResult, BusinessMetrics, CancellationMetrics, ComparisonResult,
    ConfidenceInterval, EffectSize, Estimate, FeatureImportance, GroupSummary, NormalityCheck,
    TestResult,
};
use crate::profile::ColumnProfile;
use serde::Serialize;

fn verdict_line(test: &TestResult) -> String {
    let marker = match test.p_value {
        Estimate::Undefined(_) => "⚠️ ",
        Estimate::Value(_) if test.significant => "✅",
        Estimate::Value(_) => "❌",
    };
    format!("{} {}\n", marker, test.interpretation)
}

fn effect_line(effect: &EffectSize) -> String {
    match effect.magnitude {
        Some(magnitude) => format!(
            "  {} = {:.4} ({})\n",
            effect.measure, effect.estimate, magnitude
        ),
        None => format!("  {} = {}\n", effect.measure, effect.estimate),
    }
}

fn magnitude_field(effect: &EffectSize) -> String {
    optional_field(effect.magnitude.map(|m| m.as_str()))
}

impl Report for AssociationResult {
    const KIND: &'static str = "association";

    fn to_report_string(&self) -> String {
        let mut report = format!(
            "📊 {}: {} x {}\n\n",
            self.test.method, self.var1, self.var2
        );
        report.push_str(&format!(
            "  chi2 = {:.4} (df = {}, n = {})\n",
            self.test.statistic, self.degrees_of_freedom, self.n
        ));
        report.push_str(&format!("  p-value = {:.4}\n", self.test.p_value));
        report.push_str(&effect_line(&self.test.effect));

        let (rows, cols) = self.table.shape();
        if rows > 0 && cols > 0 {
            report.push_str(&format!(
                "\n  Contingency table ({} x {}):\n  {:>20}",
                self.var1, self.var2, ""
            ));
            for label in &self.table.col_labels {
                report.push_str(&format!(" {:>12}", label));
            }
            report.push('\n');
            for (label, counts) in self.table.row_labels.iter().zip(&self.table.counts) {
                report.push_str(&format!("  {:>20}", label));
                for count in counts {
                    report.push_str(&format!(" {:>12}", count));
                }
                report.push('\n');
            }
        }

        report.push('\n');
        report.push_str(&verdict_line(&self.test));
        report
    }

    fn csv_table(&self) -> CsvTable {
        let mut table = CsvTable::new(vec![
            "var1",
            "var2",
            "chi2",
            "p_value",
            "degrees_of_freedom",
            "n",
            "cramers_v",
            "magnitude",
            "significant",
        ]);
        table.add_row(vec![
            self.var1.clone(),
            self.var2.clone(),
            estimate_field(&self.test.statistic),
            estimate_field(&self.test.p_value),
            self.degrees_of_freedom.to_string(),
            self.n.to_string(),
            estimate_field(&self.test.effect.estimate),
            magnitude_field(&self.test.effect),
            self.test.significant.to_string(),
        ]);
        table
    }
}

fn normality_text(check: &NormalityCheck) -> String {
    match check {
        NormalityCheck::Tested { w, p_value } => format!(
            "Shapiro-Wilk W={:.4}, p={:.4} ({})",
            w,
            p_value,
            if check.passes() { "normal" } else { "not normal" }
        ),
        NormalityCheck::Skipped => "not tested, large sample assumed normal".to_string(),
        NormalityCheck::TooFewObservations => "not tested, fewer than 3 observations".to_string(),
    }
}

fn group_line(group: &GroupSummary, check: &NormalityCheck) -> String {
    format!(
        "  {}: n={}, mean={:.4}, std={:.4}\n    normality: {}\n",
        group.label,
        group.n,
        group.mean,
        group.std,
        normality_text(check)
    )
}

impl Report for ComparisonResult {
    const KIND: &'static str = "comparison";

    fn to_report_string(&self) -> String {
        let mut report = format!(
            "📊 Group comparison: {} vs {}\n\n",
            self.first.label, self.second.label
        );
        report.push_str(&group_line(&self.first, &self.first_normality));
        report.push_str(&group_line(&self.second, &self.second_normality));
        report.push_str(&format!(
            "  Levene (median) p-value = {:.4}\n\n",
            self.levene_p_value
        ));
        report.push_str(&format!("  Test: {}\n", self.test.method));
        report.push_str(&format!("  statistic = {:.4}\n", self.test.statistic));
        report.push_str(&format!("  p-value = {:.4}\n", self.test.p_value));
        report.push_str(&effect_line(&self.test.effect));
        report.push('\n');
        report.push_str(&verdict_line(&self.test));
        report
    }

    fn csv_table(&self) -> CsvTable {
        let mut table = CsvTable::new(vec![
            "first",
            "second",
            "first_n",
            "second_n",
            "first_mean",
            "second_mean",
            "method",
            "statistic",
            "p_value",
            "levene_p_value",
            "cohens_d",
            "magnitude",
            "significant",
        ]);
        table.add_row(vec![
            self.first.label.clone(),
            self.second.label.clone(),
            self.first.n.to_string(),
            self.second.n.to_string(),
            estimate_field(&self.first.mean),
            estimate_field(&self.second.mean),
            self.test.method.to_string(),
            estimate_field(&self.test.statistic),
            estimate_field(&self.test.p_value),
            estimate_field(&self.levene_p_value),
            estimate_field(&self.test.effect.estimate),
            magnitude_field(&self.test.effect),
            self.test.significant.to_string(),
        ]);
        table
    }
}

impl Report for AnovaResult {
    const KIND: &'static str = "anova";

    fn to_report_string(&self) -> String {
        let mut report = format!("📊 {} across {} groups\n\n", self.test.method, self.n_groups);
        for group in &self.groups {
            report.push_str(&format!(
                "  {:<24} n={:<8} mean={:<12.4} std={:<12.4} median={:.4}\n",
                group.label, group.n, group.mean, group.std, group.median
            ));
        }
        report.push_str(&format!(
            "\n  F = {:.4} (df = {}, {})\n",
            self.test.statistic, self.df_between, self.df_within
        ));
        report.push_str(&format!("  p-value = {:.4}\n", self.test.p_value));
        report.push_str(&effect_line(&self.test.effect));
        report.push('\n');
        report.push_str(&verdict_line(&self.test));
        report
    }

    fn csv_table(&self) -> CsvTable {
        let mut table = CsvTable::new(vec!["group", "n", "mean", "std", "median"]);
        for group in &self.groups {
            table.add_row(vec![
                group.label.clone(),
                group.n.to_string(),
                group.mean.to_string(),
                estimate_field(&group.std),
                group.median.to_string(),
            ]);
        }
        table
    }
}

impl Report for CancellationMetrics {
    const KIND: &'static str = "cancellation_metrics";

    fn to_report_string(&self) -> String {
        let mut report = format!(
            "📊 Cancellation rate by {} ({:.0}% CI)\n\n",
            self.group_vars.join(" x "),
            self.confidence * 100.0
        );
        for row in &self.rows {
            report.push_str(&format!(
                "  {:<32} {:>6}/{:<8} rate={:.4} [{:.4}, {:.4}]\n",
                row.group.join(" / "),
                row.cancellations,
                row.total,
                row.cancellation_rate,
                row.ci.lower,
                row.ci.upper
            ));
        }
        if self.rows.is_empty() {
            report.push_str("  (no complete rows)\n");
        }
        report
    }

    fn csv_table(&self) -> CsvTable {
        let mut table = CsvTable::new(vec![
            "group",
            "cancellations",
            "cancellation_rate",
            "total_bookings",
            "not_canceled",
            "confirmation_rate",
            "ci_lower",
            "ci_upper",
        ]);
        for row in &self.rows {
            table.add_row(vec![
                row.group.join(" / "),
                row.cancellations.to_string(),
                row.cancellation_rate.to_string(),
                row.total.to_string(),
                row.not_canceled.to_string(),
                row.confirmation_rate.to_string(),
                row.ci.lower.to_string(),
                row.ci.upper.to_string(),
            ]);
        }
        table
    }
}

/// Importance ranking for one target
#[derive(Debug, Clone, Serialize)]
pub struct ImportanceReport {
    pub target: String,
    pub features: Vec<FeatureImportance>,
}

impl Report for ImportanceReport {
    const KIND: &'static str = "feature_importance";

    fn to_report_string(&self) -> String {
        let mut report = format!("📊 Feature importance for {}\n\n", self.target);
        for (rank, feature) in self.features.iter().enumerate() {
            let level = feature
                .level
                .map(|l| l.to_string())
                .unwrap_or_else(|| "-".to_string());
            report.push_str(&format!(
                "  {:>2}. {:<32} {:.4}  {:<10} ({})\n",
                rank + 1,
                feature.feature,
                feature.score,
                level,
                feature.method
            ));
        }
        report
    }

    fn csv_table(&self) -> CsvTable {
        let mut table = CsvTable::new(vec!["feature", "importance_score", "method", "level"]);
        for feature in &self.features {
            table.add_row(vec![
                feature.feature.clone(),
                estimate_field(&feature.score),
                feature.method.to_string(),
                optional_field(feature.level),
            ]);
        }
        table
    }
}

impl Report for BusinessMetrics {
    const KIND: &'static str = "business_metrics";

    fn to_report_string(&self) -> String {
        let mut report = String::from("📊 Business metrics\n\n");
        for (name, value) in self.to_map() {
            report.push_str(&format!("  {:<40} {:.4}\n", name, value));
        }
        report
    }

    fn csv_table(&self) -> CsvTable {
        let mut table = CsvTable::new(vec!["metric", "value"]);
        for (name, value) in self.to_map() {
            table.add_row(vec![name, estimate_field(&value)]);
        }
        table
    }
}

/// Data quality profile of a loaded dataset
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub n_rows: usize,
    pub columns: Vec<ColumnProfile>,
}

impl Report for ProfileReport {
    const KIND: &'static str = "profile";

    fn to_report_string(&self) -> String {
        let mut report = format!(
            "📋 Data quality: {} rows, {} columns\n\n",
            self.n_rows,
            self.columns.len()
        );
        for col in &self.columns {
            report.push_str(&format!(
                "  {:<32} {:<12} missing={:>6} ({:>5.1}%) unique={:>6}",
                col.column,
                col.kind.to_string(),
                col.n_missing,
                col.pct_missing,
                col.n_unique
            ));
            if let (Some(mean), Some(median)) = (col.mean, col.median) {
                report.push_str(&format!(" mean={:.2} median={:.2}", mean, median));
            }
            report.push('\n');
        }
        report
    }

    fn csv_table(&self) -> CsvTable {
        let mut table = CsvTable::new(vec![
            "column",
            "kind",
            "n_missing",
            "pct_missing",
            "n_unique",
            "pct_unique",
            "mean",
            "median",
            "std",
            "min",
            "max",
        ]);
        for col in &self.columns {
            table.add_row(vec![
                col.column.clone(),
                col.kind.to_string(),
                col.n_missing.to_string(),
                col.pct_missing.to_string(),
                col.n_unique.to_string(),
                col.pct_unique.to_string(),
                optional_field(col.mean),
                optional_field(col.median),
                optional_field(col.std),
                optional_field(col.min),
                optional_field(col.max),
            ]);
        }
        table
    }
}

/// Confidence interval for an observed proportion
#[derive(Debug, Clone, Serialize)]
pub struct CiReport {
    pub successes: u64,
    pub total: u64,
    pub confidence: f64,
    pub proportion: Estimate,
    pub interval: ConfidenceInterval,
}

impl Report for CiReport {
    const KIND: &'static str = "proportion_ci";

    fn to_report_string(&self) -> String {
        format!(
            "{}/{} = {:.4}, {:.0}% CI [{:.4}, {:.4}]\n",
            self.successes,
            self.total,
            self.proportion,
            self.confidence * 100.0,
            self.interval.lower,
            self.interval.upper
        )
    }

    fn csv_table(&self) -> CsvTable {
        let mut table = CsvTable::new(vec![
            "successes",
            "total",
            "proportion",
            "confidence",
            "lower",
            "upper",
        ]);
        table.add_row(vec![
            self.successes.to_string(),
            self.total.to_string(),
            estimate_field(&self.proportion),
            self.confidence.to_string(),
            self.interval.lower.to_string(),
            self.interval.upper.to_string(),
        ]);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{anova_samples, association_from_table, ContingencyTable};

    fn association() -> AssociationResult {
        let table = ContingencyTable::from_counts(
            vec!["No Deposit".into(), "Non Refund".into()],
            vec!["0".into(), "1".into()],
            vec![vec![40, 10], vec![10, 40]],
        )
        .unwrap();
        association_from_table("deposit_type", "is_canceled", table).unwrap()
    }

    #[test]
    fn test_association_text_report() {
        let report = association().to_report_string();
        assert!(report.contains("deposit_type x is_canceled"));
        assert!(report.contains("chi2 = 33.6400"));
        assert!(report.contains("Cramér's V = 0.5800 (large effect)"));
        assert!(report.contains("✅ Significant association"));
    }

    #[test]
    fn test_association_csv_single_row() {
        let csv = association().csv_table().to_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("var1,var2,chi2,p_value"));
        assert!(lines[1].starts_with("deposit_type,is_canceled,33.64"));
        assert!(lines[1].ends_with(",large,true"));
    }

    #[test]
    fn test_anova_group_columns_align() {
        let result = anova_samples(&[
            ("No Deposit".to_string(), vec![10.0, 11.0, 12.0]),
            ("Non Refund".to_string(), vec![100.0, 150.0, 220.0]),
        ])
        .unwrap();
        let report = result.to_report_string();
        let columns: Vec<usize> = report
            .lines()
            .filter_map(|line| line.find("median="))
            .collect();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0], columns[1]);
    }

    #[test]
    fn test_ci_report() {
        let report = CiReport {
            successes: 50,
            total: 100,
            confidence: 0.95,
            proportion: Estimate::Value(0.5),
            interval: ConfidenceInterval {
                lower: 0.402,
                upper: 0.598,
            },
        };
        assert_eq!(
            report.to_report_string(),
            "50/100 = 0.5000, 95% CI [0.4020, 0.5980]\n"
        );
    }
}
