//! Human-readable comparison report

use super::types::{CompareResult, CompareResultType};

/// Options controlling report rendering
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Also print subtrees whose effective verdict is EQUAL
    pub show_equal: bool,
}

/// Node counts by own verdict across the whole tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub missing: usize,
    pub different: usize,
    pub redundant: usize,
}

impl ReportSummary {
    pub fn of(result: &CompareResult<'_>) -> Self {
        let mut summary = ReportSummary::default();
        summary.visit(result);
        summary
    }

    fn visit(&mut self, result: &CompareResult<'_>) {
        let own = result.own_result_type();
        if own.contains(CompareResultType::MISSING) {
            self.missing += 1;
        }
        if own.contains(CompareResultType::DIFFERENT) {
            self.different += 1;
        }
        if own.contains(CompareResultType::REDUNDANT) {
            self.redundant += 1;
        }
        for inner in result.inner_results() {
            self.visit(inner);
        }
    }
}

fn render_node(out: &mut String, result: &CompareResult<'_>, depth: usize, options: &ReportOptions) {
    let verdict = result.compare_result_type();
    if verdict.is_equal() && !options.show_equal {
        return;
    }

    let own = result.own_result_type();
    let label = if own == verdict || own.is_equal() {
        verdict.to_string()
    } else {
        format!("{} (own {})", verdict, own)
    };
    out.push_str(&format!(
        "{}{} {}: {}\n",
        "  ".repeat(depth),
        result.db_object_type(),
        result.object_full_name(),
        label
    ));

    for inner in result.inner_results() {
        render_node(out, inner, depth + 1, options);
    }
}

/// Render the result tree as indented text followed by a summary line
pub fn format_report(result: &CompareResult<'_>, options: &ReportOptions) -> String {
    let mut out = String::new();
    out.push_str("=== Schema Comparison Report ===\n");

    if result.has_differences() || options.show_equal {
        render_node(&mut out, result, 0, options);
    } else {
        out.push_str("OK (identical)\n");
    }

    let summary = ReportSummary::of(result);
    out.push_str(&format!(
        "Summary: {} missing, {} different, {} redundant\n",
        summary.missing, summary.different, summary.redundant
    ));
    out
}

/// Print the comparison report to stdout
pub fn print_report(result: &CompareResult<'_>, options: &ReportOptions) {
    print!("{}", format_report(result, options));
}
