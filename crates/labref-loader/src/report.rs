//! Fixed-width text reports.
//!
//! Every renderer returns the finished table as a `String`; printing is left
//! to the caller.

use labref_types::ReferenceDocument;

use crate::results::LabResults;

const MISSING: &str = "-";

fn header_with_rule(header: String) -> Vec<String> {
    let rule = "-".repeat(header.chars().count());
    vec![header, rule]
}

/// Every range of a document, one row per range.
///
/// Starts with the document title (`_info.name`, falling back to
/// `test_type`) and its description when present.
pub fn render_reference_report(document: &ReferenceDocument, test_type: &str) -> String {
    let mut lines = vec![document.title(test_type).to_string()];
    if let Some(description) = document.description() {
        lines.push(description.to_string());
    }

    lines.extend(header_with_rule(format!(
        "{:<12} | {:<7} | {:<11} | {:<6} | {:<6} | {:<8}",
        "Test Name", "Sex", "Age Range", "Min", "Max", "Unit"
    )));

    for (test_name, definition) in document.iter() {
        for (key, entries) in &definition.ranges {
            for entry in entries {
                let age_range = format!("{}-{}", entry.age_min, entry.age_max);
                lines.push(format!(
                    "{:<12} | {:<7} | {:<11} | {:<6} | {:<6} | {:<8}",
                    test_name,
                    key.as_str(),
                    age_range,
                    entry.min,
                    entry.max,
                    entry.unit
                ));
            }
        }
    }

    lines.join("\n")
}

/// Test types with their `_info` name and description, sorted by test type.
///
/// Entries without a document (it failed to load) or without `_info` show
/// the test type as name and `-` as description.
pub fn render_test_types_report<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a ReferenceDocument>)>,
{
    let mut rows: Vec<(&str, &str, &str)> = entries
        .into_iter()
        .map(|(test_type, document)| {
            let name = document.map_or(test_type, |doc| doc.title(test_type));
            let description = document
                .and_then(ReferenceDocument::description)
                .unwrap_or(MISSING);
            (test_type, name, description)
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));

    let mut lines = header_with_rule(format!(
        "{:<16} | {:<30} | {:<50}",
        "test_type", "Name", "Description"
    ));
    lines.extend(
        rows.into_iter()
            .map(|(test_type, name, description)| {
                format!("{test_type:<16} | {name:<30} | {description:<50}")
            }),
    );

    lines.join("\n")
}

/// Russian names, keys and units of a document's tests, in document order.
pub fn render_test_names_report(document: &ReferenceDocument) -> String {
    let mut lines = header_with_rule(format!(
        "{:<20} | {:<15} | {:<10}",
        "Название (RU)", "Ключ", "Ед. изм."
    ));

    for (test_name, definition) in document.iter() {
        let name_ru = definition.name_ru.as_deref().unwrap_or(MISSING);
        let unit = definition.unit().filter(|u| !u.is_empty()).unwrap_or(MISSING);
        lines.push(format!("{name_ru:<20} | {test_name:<15} | {unit:<10}"));
    }

    lines.join("\n")
}

/// A result set: one block per result and a closing summary line.
pub fn render_results_report(results: &LabResults) -> String {
    let mut lines = vec![format!("=== {} ===", results.title())];

    let mut patient = Vec::new();
    if let Some(sex) = results.sex() {
        patient.push(format!("пол: {sex}"));
    }
    patient.push(format!("возраст: {}", results.age()));
    lines.push(format!("Пациент: {}", patient.join(", ")));
    lines.push(String::new());

    if results.is_empty() {
        lines.push("Нет результатов для отображения".to_string());
        return lines.join("\n");
    }

    for result in results.iter() {
        let range = &result.range;
        lines.push(format!(
            "{} {}: {} {} ({})",
            result.status.marker(),
            result.display_name(),
            result.value,
            range.unit,
            result.status
        ));
        lines.push(format!("   Норма: {}-{} {}", range.min, range.max, range.unit));
        lines.push(format!(
            "   Возрастной диапазон: {}-{} лет",
            range.age_min, range.age_max
        ));
        lines.push(String::new());
    }

    let summary = results.summary();
    lines.push(format!(
        "Сводка: {} в норме, {} понижено, {} повышено",
        summary.normal, summary.below, summary.above
    ));

    lines.join("\n")
}
