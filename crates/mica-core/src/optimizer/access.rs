//! Hoisted access generation.
//!
//! Materializes each candidate's length and slot exactly once, before the
//! loop body, and records the generated value names for the rest of the
//! loop's code generation to substitute.

use super::LoopCache;
use crate::ast::expression::Expression;
use crate::ast::fingerprint::fingerprint;
use crate::ast::types::DataLocation;
use crate::codegen::YulGenerator;
use crate::errors::{CodegenError, Result};

/// Emits length/slot computations for `candidates` in discovery order and
/// publishes them into `cache`.
pub fn generate_cached_accesses(
    candidates: &[&Expression],
    generator: &mut YulGenerator,
    cache: &mut LoopCache,
) -> Result<()> {
    for base in candidates {
        let array = base.ty.as_array().ok_or_else(|| {
            CodegenError::internal(format!(
                "loop cache candidate `{}` is not an array",
                fingerprint(base)
            ))
        })?;

        // Evaluate the base itself once, before the loop body, so any
        // sub-evaluation needed to reach the array happens here rather
        // than once per iteration.
        let value = generator.evaluate_expression(base)?;

        let (position, length_expr) = match array.location {
            DataLocation::Storage => {
                let slot = value.slot()?;
                let length_expr = if array.dynamically_sized {
                    format!("sload({slot})")
                } else {
                    array
                        .length
                        .ok_or_else(|| {
                            CodegenError::internal("statically sized array without a length")
                        })?
                        .to_string()
                };
                (slot, length_expr)
            }
            DataLocation::Memory => {
                let mpos = value.mpos()?;
                (mpos.clone(), format!("mload({mpos})"))
            }
            DataLocation::Calldata => {
                return Err(CodegenError::internal(
                    "calldata arrays are never loop cache candidates",
                ))
            }
        };

        let length_var = generator.fresh_var();
        generator.emit_line(&format!("let {length_var} := {length_expr}"));

        let fp = fingerprint(base);
        cache.record_slot(fp.clone(), position);
        cache.record_length(fp, length_var);
    }
    Ok(())
}
