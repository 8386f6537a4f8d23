//! Advisory lint for catalog consistency.
//!
//! The resolver tolerates incomplete data at query time, so these checks are
//! the only place dangling references surface. Used by `catalog-lint` and
//! guard-rail tests to ensure compatibility rules only reference known
//! subcategories and names and that the graph stays in sync with the
//! topology option lists.

use crate::catalog::identity::{CategoryId, TechnologyName};
use crate::catalog::index::TechnologyIndex;
use crate::catalog::model::CompatibilityRule;
use std::collections::BTreeSet;

/// Cross-check the compatibility graph against the category topology.
///
/// Returns a list of findings rather than short-circuiting so callers can
/// surface every catalog issue at once. None of these findings block
/// resolution; they explain why individual queries may come back empty.
pub fn lint_catalog(index: &TechnologyIndex) -> Vec<String> {
    let mut findings = Vec::new();
    let languages_axis = CategoryId(CategoryId::LANGUAGES.to_string());

    check_topology_lists(index, &mut findings);

    for (category, records) in &index.catalog().technologies {
        for tech in records {
            let label = format!("'{}' ({})", tech.name.0, category.0);

            if index.topology().parent_of(category).is_some()
                && !listed_in_topology(index, category, &tech.name)
            {
                findings.push(format!(
                    "{label} is not listed in the '{}' option list",
                    category.0
                ));
            }

            if let Some(languages) = &tech.languages {
                check_languages(index, &languages_axis, &label, languages, &mut findings);
            }

            match &tech.compatible_with {
                CompatibilityRule::Unspecified => {}
                CompatibilityRule::Names(names) => {
                    for name in names {
                        if !known_anywhere(index, name) {
                            findings.push(format!(
                                "{label} references unknown technology '{}' in a flat list",
                                name.0
                            ));
                        }
                    }
                }
                CompatibilityRule::ByCategory(map) => {
                    for (target, names) in map {
                        if !category_known(index, target) {
                            findings.push(format!(
                                "{label} references unknown subcategory '{}'",
                                target.0
                            ));
                            continue;
                        }
                        for name in names {
                            if !known_under(index, target, name) {
                                findings.push(format!(
                                    "{label} references unknown technology '{}' under '{}'",
                                    name.0, target.0
                                ));
                            }
                        }
                    }
                }
            }
        }
    }

    findings
}

fn check_topology_lists(index: &TechnologyIndex, findings: &mut Vec<String>) {
    for subcategory in index.topology().subcategories() {
        let Some(options) = index.topology().options_for(subcategory) else {
            continue;
        };
        let mut seen = BTreeSet::new();
        for option in options {
            if !seen.insert(option) {
                findings.push(format!(
                    "option '{}' is listed twice under '{}'",
                    option.0, subcategory.0
                ));
            }
        }
    }
}

fn check_languages(
    index: &TechnologyIndex,
    languages_axis: &CategoryId,
    label: &str,
    languages: &[TechnologyName],
    findings: &mut Vec<String>,
) {
    // Only checkable when the catalog actually defines the language axis.
    let Some(options) = index.topology().options_for(languages_axis) else {
        return;
    };
    for language in languages {
        if !options.contains(language) {
            findings.push(format!(
                "{label} claims unknown language '{}'",
                language.0
            ));
        }
    }
}

fn category_known(index: &TechnologyIndex, category: &CategoryId) -> bool {
    index.topology().parent_of(category).is_some()
        || index.catalog().technologies.contains_key(category)
}

fn listed_in_topology(
    index: &TechnologyIndex,
    category: &CategoryId,
    name: &TechnologyName,
) -> bool {
    index
        .topology()
        .options_for(category)
        .is_some_and(|options| options.contains(name))
}

fn known_under(index: &TechnologyIndex, category: &CategoryId, name: &TechnologyName) -> bool {
    listed_in_topology(index, category, name)
        || index.technology(category, name).is_some()
}

fn known_anywhere(index: &TechnologyIndex, name: &TechnologyName) -> bool {
    let listed = index
        .topology()
        .subcategories()
        .any(|subcategory| listed_in_topology(index, subcategory, name));
    listed
        || index
            .catalog()
            .technologies
            .values()
            .any(|records| records.iter().any(|tech| &tech.name == name))
}
