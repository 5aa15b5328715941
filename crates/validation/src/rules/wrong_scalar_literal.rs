use super::values::literal_diagnostics;
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::Diagnostic;

/// Trait implementation for `wrong_scalar_literal` rule
pub struct WrongScalarLiteralRuleImpl;

impl ValidationRule for WrongScalarLiteralRuleImpl {
    fn name(&self) -> &'static str {
        "wrong_scalar_literal"
    }

    fn description(&self) -> &'static str {
        "Literals passed to scalar and enum arguments must match the argument's type"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        literal_diagnostics(ctx, self.name(), false)
    }
}
