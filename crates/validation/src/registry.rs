/// Registry of all validation rules
use crate::rules::{
    ConflictingSelectionsRuleImpl, DuplicateArgumentRuleImpl, DuplicateDocumentNamesRuleImpl,
    DuplicateInputObjectKeyRuleImpl, DuplicateVariablesRuleImpl, FragmentCyclesRuleImpl,
    FragmentOnScalarRuleImpl, FragmentUnknownTypeRuleImpl, IncompatibleFragmentSpreadRuleImpl,
    MissingRequiredArgumentRuleImpl, NoKeyAliasRuleImpl, NonRequiredVariableRuleImpl,
    OutputTypeAsInputRuleImpl, RepeatedDirectiveRuleImpl, ScalarWithSelectionRuleImpl,
    SubscriptionSingleRootRuleImpl, UndefinedVariablesRuleImpl, UnknownArgumentRuleImpl,
    UnknownDirectiveRuleImpl, UnknownFieldRuleImpl, UnknownFragmentRuleImpl,
    UnusedVariablesRuleImpl, VariableTypeIncompatibleRuleImpl, WrongScalarLiteralRuleImpl,
    WrongStructuredLiteralRuleImpl,
};
use crate::ValidationRule;
use std::sync::{Arc, LazyLock};

/// Lazily initialized rules.
/// Rules are created once and reused across all runs.
static RULES: LazyLock<Vec<Arc<dyn ValidationRule>>> = LazyLock::new(|| {
    vec![
        // documents
        Arc::new(SubscriptionSingleRootRuleImpl),
        Arc::new(DuplicateDocumentNamesRuleImpl),
        Arc::new(FragmentUnknownTypeRuleImpl),
        Arc::new(FragmentOnScalarRuleImpl),
        Arc::new(FragmentCyclesRuleImpl),
        Arc::new(UnknownFragmentRuleImpl),
        Arc::new(IncompatibleFragmentSpreadRuleImpl),
        // selections
        Arc::new(UnknownFieldRuleImpl),
        Arc::new(ScalarWithSelectionRuleImpl),
        Arc::new(ConflictingSelectionsRuleImpl),
        Arc::new(NoKeyAliasRuleImpl),
        // variables
        Arc::new(OutputTypeAsInputRuleImpl),
        Arc::new(DuplicateVariablesRuleImpl),
        Arc::new(UndefinedVariablesRuleImpl),
        Arc::new(UnusedVariablesRuleImpl),
        Arc::new(VariableTypeIncompatibleRuleImpl),
        Arc::new(NonRequiredVariableRuleImpl),
        // directives
        Arc::new(UnknownDirectiveRuleImpl),
        Arc::new(RepeatedDirectiveRuleImpl),
        // arguments
        Arc::new(DuplicateArgumentRuleImpl),
        Arc::new(UnknownArgumentRuleImpl),
        Arc::new(MissingRequiredArgumentRuleImpl),
        Arc::new(DuplicateInputObjectKeyRuleImpl),
        Arc::new(WrongScalarLiteralRuleImpl),
        Arc::new(WrongStructuredLiteralRuleImpl),
    ]
});

#[must_use]
pub fn all_rules() -> &'static [Arc<dyn ValidationRule>] {
    &RULES
}

#[must_use]
pub fn rule_by_name(name: &str) -> Option<Arc<dyn ValidationRule>> {
    all_rules().iter().find(|rule| rule.name() == name).cloned()
}

#[must_use]
pub fn all_rule_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = all_rules().iter().map(|rule| rule.name()).collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_names_are_unique() {
        let names = all_rule_names();
        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names, deduped);
        assert_eq!(names.len(), 25);
    }

    #[test]
    fn test_rule_by_name() {
        assert!(rule_by_name("fragment_cycles").is_some());
        assert!(rule_by_name("no_such_rule").is_none());
    }

    #[test]
    fn test_every_rule_is_described() {
        for rule in all_rules() {
            assert!(!rule.description().is_empty(), "{} has no description", rule.name());
        }
    }
}
