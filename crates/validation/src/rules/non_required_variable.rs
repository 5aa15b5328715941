use super::variable_usage::variable_arguments;
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `non_required_variable` rule
pub struct NonRequiredVariableRuleImpl;

impl ValidationRule for NonRequiredVariableRuleImpl {
    fn name(&self) -> &'static str {
        "non_required_variable"
    }

    fn description(&self) -> &'static str {
        "Required arguments cannot be fed by variables that may be null"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        Ok(variable_arguments(ctx)?
            .into_iter()
            .filter(|usage| {
                usage.argument_modifiers.is_non_null()
                    && !usage.variable_modifiers.is_non_null()
                    && !usage.variable_has_default
                    && !usage.argument_has_default
            })
            .map(|usage| {
                Diagnostic::validation(
                    self.name(),
                    format!(
                        "variable ${} of type {} may be null but argument {} of {} requires {}",
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
