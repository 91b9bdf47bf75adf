use std::collections::HashMap;

use crate::model::{Analysis, Category, FunctionRecord};

/// Boundary the scan pipeline hands extracted functions to.
pub trait Classifier: Send + Sync {
    fn classify(&self, function: &FunctionRecord) -> Analysis;
    fn name(&self) -> &'static str;
}

/// Registry for classifiers; callers select by name.
#[derive(Default)]
pub struct ClassifierRegistry {
    classifiers: HashMap<String, Box<dyn Classifier>>,
}

impl ClassifierRegistry {
    pub fn new() -> Self {
        Self { classifiers: HashMap::new() }
    }

    pub fn register<C: Classifier + 'static>(&mut self, classifier: C) -> &mut Self {
        self.classifiers.insert(classifier.name().to_string(), Box::new(classifier));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Classifier> {
        self.classifiers.get(name).map(|c| &**c)
    }

    /// Return a sorted list of registered classifier names for error messages/help.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.classifiers.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Marks every function as skipped. Useful to dry-run a scan.
pub struct SkipClassifier;

impl Classifier for SkipClassifier {
    fn classify(&self, _function: &FunctionRecord) -> Analysis {
        Analysis::Skipped
    }

    fn name(&self) -> &'static str {
        "skip"
    }
}

const CPI_MARKERS: &[&str] = &["invoke_signed", "invoke(", "CpiContext::"];
const DERIVATION_MARKERS: &[&str] = &["find_program_address", "create_program_address"];

/// Offline classifier matching well-known call sites in the function body.
///
/// CPI markers take precedence over derivation markers. An attribute carrying
/// `seeds` (Anchor account constraints) also counts as a derivation.
pub struct PatternClassifier;

impl Classifier for PatternClassifier {
    fn classify(&self, function: &FunctionRecord) -> Analysis {
        if let Some(marker) = CPI_MARKERS.iter().find(|m| function.content.contains(*m)) {
            return Analysis::Analyzed {
                category: Category::Cpi,
                description: format!(
                    "`{}` performs a cross-program invocation via `{}`",
                    function.name,
                    marker.trim_end_matches('(')
                ),
            };
        }
        if let Some(marker) = DERIVATION_MARKERS.iter().find(|m| function.content.contains(*m)) {
            return Analysis::Analyzed {
                category: Category::AccountDerivation,
                description: format!(
                    "`{}` derives a program address via `{marker}`",
                    function.name
                ),
            };
        }
        if function.attributes.iter().any(|a| a.contains("seeds")) {
            return Analysis::Analyzed {
                category: Category::AccountDerivation,
                description: format!("`{}` declares PDA seeds in its attributes", function.name),
            };
        }
        Analysis::Skipped
    }

    fn name(&self) -> &'static str {
        "patterns"
    }
}

/// Name of the classifier used when none is configured.
pub const DEFAULT_CLASSIFIER: &str = "patterns";

/// Convenience builder for a registry populated with the built-in classifiers.
pub fn default_classifier_registry() -> ClassifierRegistry {
    let mut registry = ClassifierRegistry::new();
    registry.register(PatternClassifier).register(SkipClassifier);
    registry
}
