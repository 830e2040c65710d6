//! Converts every grade of the source module and collects the results.

use crate::{
    error::GroupError,
    grade::{GradeGroup, EXPECTED_TOTAL, GRADES},
    input::{
        kanji::{self, KanjiRecord},
        source,
    },
    output::dart,
};
use eyre::WrapErr;
use std::{fmt, fs, path::Path};

/// The outcome of converting a single grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeReport {
    pub group: GradeGroup,
    pub extracted: usize,
}

impl GradeReport {
    pub fn matches_expected(&self) -> bool {
        self.extracted == self.group.expected
    }
}

/// The reports of all grades, in the order they were converted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub reports: Vec<GradeReport>,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.reports.iter().map(|r| r.extracted).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.total() == EXPECTED_TOTAL
    }
}

impl FromIterator<GradeReport> for Summary {
    fn from_iter<I: IntoIterator<Item = GradeReport>>(iter: I) -> Self {
        Self {
            reports: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RULE: &str = "=======================================";

        writeln!(f, "EXTRACTION SUMMARY")?;
        writeln!(f, "{RULE}")?;
        for report in &self.reports {
            let status = if report.matches_expected() {
                "ok"
            } else {
                "mismatch"
            };
            writeln!(
                f,
                "{:<10} {:<15} {:>4} / {:>4} kanji",
                format!("[{status}]"),
                report.group.grade.tag(),
                report.extracted,
                report.group.expected
            )?;
        }
        writeln!(f, "{RULE}")?;
        writeln!(f, "Total kanji extracted: {}", self.total())?;
        let breakdown = self
            .reports
            .iter()
            .map(|r| r.group.expected.to_string())
            .collect::<Vec<_>>()
            .join("+");
        writeln!(f, "Expected total: {EXPECTED_TOTAL} ({breakdown})")?;
        let status = if self.is_complete() {
            "COMPLETE"
        } else {
            "INCOMPLETE"
        };
        write!(f, "Status: {status}")
    }
}

/// Extracts and decodes the records of one grade from the cleaned source.
pub fn convert_grade(source: &str, group: &GradeGroup) -> Result<Vec<KanjiRecord>, GroupError> {
    let span = source::extract(source, group.name)?;
    kanji::decode(group.name, span)
}

/// Converts all grades of the module at `input` into Dart files in `output_dir`.
///
/// Problems with a single grade are logged and leave that grade empty.
/// Only reading the input or writing an output fails the run.
pub fn run(input: &Path, output_dir: &Path) -> eyre::Result<Summary> {
    tracing::info!("reading {}", input.display());
    let raw = fs::read_to_string(input)
        .wrap_err_with(|| format!("Failed to read the kanji module at '{}'", input.display()))?;
    let source = source::clean(&raw);

    fs::create_dir_all(output_dir).wrap_err_with(|| {
        format!(
            "Failed to create the output directory '{}'",
            output_dir.display()
        )
    })?;

    GRADES
        .iter()
        .map(|group| write_grade(&source, group, output_dir))
        .collect()
}

fn write_grade(source: &str, group: &GradeGroup, output_dir: &Path) -> eyre::Result<GradeReport> {
    tracing::info!(group = group.name, "extracting");
    let records = match convert_grade(source, group) {
        Ok(records) => {
            tracing::info!(group = group.name, count = records.len(), "extracted");
            records
        }
        Err(err) => {
            tracing::error!(group = group.name, "{err}");
            Vec::new()
        }
    };

    let path = output_dir.join(group.file_name());
    fs::write(&path, dart::render(&records, group.grade))
        .wrap_err_with(|| format!("Failed to write '{}'", path.display()))?;
    tracing::info!("saved {} kanji to {}", records.len(), group.file_name());

    let report = GradeReport {
        group: *group,
        extracted: records.len(),
    };
    if !report.matches_expected() {
        tracing::warn!(
            group = group.name,
            expected = group.expected,
            count = report.extracted,
            "unexpected number of kanji"
        );
    }
    Ok(report)
}
