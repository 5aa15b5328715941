use super::variable_usage::variable_arguments;
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `variable_type_incompatible` rule
pub struct VariableTypeIncompatibleRuleImpl;

impl ValidationRule for VariableTypeIncompatibleRuleImpl {
    fn name(&self) -> &'static str {
        "variable_type_incompatible"
    }

    fn description(&self) -> &'static str {
        "Variables passed to an argument must have the argument's type"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        Ok(variable_arguments(ctx)?
            .into_iter()
            .filter(|usage| {
                // nullability of the outermost level is non_required_variable's concern
                usage.variable_type != usage.argument_type
                    || !usage
                        .variable_modifiers
                        .nullable()
                        .is_compatible_with(&usage.argument_modifiers.nullable())
            })
            .map(|usage| {
                Diagnostic::validation(
                    self.name(),
                    format!(
                        "variable ${} of type {} cannot be passed to argument {} of {}, which expects {}",
                        usage.variable,
                        usage.variable_modifiers.wrap(&usage.variable_type),
                        usage.argument,
                        usage.field,
                        usage.argument_modifiers.wrap(&usage.argument_type),
                    ),
                )
                .with_location(usage.location)
            })
            .collect())
    }
}
