//! Rule implementations
//!
//! Each rule lives in its own file. Rules that share the same raw data
//! (variable usages, argument values) get it from the helper modules below.

mod values;
mod variable_usage;

mod conflicting_selections;
mod duplicate_argument;
mod duplicate_document_names;
mod duplicate_input_object_key;
mod duplicate_variables;
mod fragment_cycles;
mod fragment_on_scalar;
mod fragment_unknown_type;
mod incompatible_fragment_spread;
mod missing_required_argument;
mod no_key_alias;
mod non_required_variable;
mod output_type_as_input;
mod repeated_directive;
mod scalar_with_selection;
mod subscription_single_root;
mod undefined_variables;
mod unknown_argument;
mod unknown_directive;
mod unknown_field;
mod unknown_fragment;
mod unused_variables;
mod variable_type_incompatible;
mod wrong_scalar_literal;
mod wrong_structured_literal;

pub use conflicting_selections::ConflictingSelectionsRuleImpl;
pub use duplicate_argument::DuplicateArgumentRuleImpl;
pub use duplicate_document_names::DuplicateDocumentNamesRuleImpl;
pub use duplicate_input_object_key::DuplicateInputObjectKeyRuleImpl;
pub use duplicate_variables::DuplicateVariablesRuleImpl;
pub use fragment_cycles::FragmentCyclesRuleImpl;
pub use fragment_on_scalar::FragmentOnScalarRuleImpl;
pub use fragment_unknown_type::FragmentUnknownTypeRuleImpl;
pub use incompatible_fragment_spread::IncompatibleFragmentSpreadRuleImpl;
pub use missing_required_argument::MissingRequiredArgumentRuleImpl;
pub use no_key_alias::NoKeyAliasRuleImpl;
pub use non_required_variable::NonRequiredVariableRuleImpl;
pub use output_type_as_input::OutputTypeAsInputRuleImpl;
pub use repeated_directive::RepeatedDirectiveRuleImpl;
pub use scalar_with_selection::ScalarWithSelectionRuleImpl;
pub use subscription_single_root::SubscriptionSingleRootRuleImpl;
pub use undefined_variables::UndefinedVariablesRuleImpl;
pub use unknown_argument::UnknownArgumentRuleImpl;
pub use unknown_directive::UnknownDirectiveRuleImpl;
pub use unknown_field::UnknownFieldRuleImpl;
pub use unknown_fragment::UnknownFragmentRuleImpl;
pub use unused_variables::UnusedVariablesRuleImpl;
pub use variable_type_incompatible::VariableTypeIncompatibleRuleImpl;
pub use wrong_scalar_literal::WrongScalarLiteralRuleImpl;
pub use wrong_structured_literal::WrongStructuredLiteralRuleImpl;
