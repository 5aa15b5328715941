use super::values::literal_diagnostics;
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `wrong_structured_literal` rule
pub struct WrongStructuredLiteralRuleImpl;

impl ValidationRule for WrongStructuredLiteralRuleImpl {
    fn name(&self) -> &'static str {
        "wrong_structured_literal"
    }

    fn description(&self) -> &'static str {
        "Input object literals must provide every required field, and only known fields of the right type"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        literal_diagnostics(ctx, self.name(), true)
    }
}
