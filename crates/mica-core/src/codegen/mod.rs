//! Yul code generation for type-checked Mica functions.
//!
//! The generator lowers statements and expressions to Yul text, one
//! function at a time. Loops drive the storage array caching optimization:
//! safety check, candidate collection, hoisted access generation, then
//! ordinary body generation with cached values substituted for index and
//! length accesses on tracked bases.

mod expressions;

use crate::ast::statement::{Block, ForStatement, IfStatement, Statement, WhileStatement};
use crate::ast::types::{DataLocation, Type};
use crate::ast::{Contract, Function};
use crate::config::CodegenOptions;
use crate::errors::{CodegenError, Result};
use crate::optimizer::access::generate_cached_accesses;
use crate::optimizer::collector::CandidateCollector;
use crate::optimizer::safety::SafetyChecker;
use crate::optimizer::{Loop, LoopCache};
use indexmap::IndexMap;
use tracing::debug;

/// A materialized expression value.
///
/// Value types are referred to by their single name; reference types carry
/// suffixed parts (`_slot` for storage, `_mpos` for memory) that the
/// generator guarantees were declared when the value was produced.
#[derive(Debug, Clone)]
pub struct IrValue {
    base: String,
    ty: Type,
}

impl IrValue {
    pub(crate) fn new(base: String, ty: Type) -> Self {
        IrValue { base, ty }
    }

    pub fn name(&self) -> &str {
        &self.base
    }

    pub fn slot(&self) -> Result<String> {
        if self.ty.data_stored_in(DataLocation::Storage) {
            Ok(format!("{}_slot", self.base))
        } else {
            Err(CodegenError::internal(format!(
                "value `{}` has no slot part",
                self.base
            )))
        }
    }

    pub fn mpos(&self) -> Result<String> {
        if self.ty.data_stored_in(DataLocation::Memory) {
            Ok(format!("{}_mpos", self.base))
        } else {
            Err(CodegenError::internal(format!(
                "value `{}` has no memory position part",
                self.base
            )))
        }
    }
}

pub struct YulGenerator {
    options: CodegenOptions,
    output: String,
    indent_level: usize,
    var_counter: usize,
    /// State variable name to storage slot, in declaration order.
    state_slots: IndexMap<String, u64>,
    /// One cache per loop currently being generated, innermost last.
    loop_caches: Vec<LoopCache>,
}

impl YulGenerator {
    pub fn new(options: CodegenOptions) -> Self {
        YulGenerator {
            options,
            output: String::new(),
            indent_level: 0,
            var_counter: 0,
            state_slots: IndexMap::new(),
            loop_caches: Vec::new(),
        }
    }

    pub fn register_state_variable(&mut self, name: impl Into<String>, slot: u64) {
        self.state_slots.insert(name.into(), slot);
    }

    /// Lowers a whole contract: registers the storage layout, then emits
    /// every function.
    pub fn generate_contract(&mut self, contract: &Contract) -> Result<String> {
        for variable in &contract.state_variables {
            self.register_state_variable(variable.name.node.clone(), variable.slot);
        }
        self.output.clear();
        self.emit_line(&format!("object \"{}\" {{", contract.name.node));
        self.indent_level += 1;
        self.emit_line("code {");
        self.indent_level += 1;
        for function in &contract.functions {
            self.var_counter = 0;
            self.emit_function(function)?;
        }
        self.indent_level -= 1;
        self.emit_line("}");
        self.indent_level -= 1;
        self.emit_line("}");
        Ok(std::mem::take(&mut self.output))
    }

    /// Lowers a single function body to Yul.
    pub fn generate_function(&mut self, function: &Function) -> Result<String> {
        self.output.clear();
        self.var_counter = 0;
        self.emit_function(function)?;
        Ok(std::mem::take(&mut self.output))
    }

    fn emit_function(&mut self, function: &Function) -> Result<()> {
        self.emit_line(&format!("function {}() {{", function.name.node));
        self.indent_level += 1;
        for statement in &function.body.statements {
            self.emit_statement(statement)?;
        }
        self.indent_level -= 1;
        self.emit_line("}");
        Ok(())
    }

    pub(crate) fn fresh_var(&mut self) -> String {
        self.var_counter += 1;
        format!("_{}", self.var_counter)
    }

    pub(crate) fn emit_line(&mut self, line: &str) {
        for _ in 0..self.indent_level {
            self.output.push_str("    ");
        }
        self.output.push_str(line);
        self.output.push('\n');
    }

    pub(crate) fn state_slot(&self, name: &str) -> Option<u64> {
        self.state_slots.get(name).copied()
    }

    /// Innermost-first lookup of a cached (length, slot) pair for `base`.
    ///
    /// A registry hit with missing value names means the access generator
    /// never ran for this cache and aborts generation.
    pub(crate) fn cache_hit(
        &self,
        base: &crate::ast::expression::Expression,
    ) -> Result<Option<(String, String)>> {
        let fp = crate::ast::fingerprint::fingerprint(base);
        for cache in self.loop_caches.iter().rev() {
            if cache.is_cached(&fp) {
                let length = cache.length_var(base)?.to_string();
                let slot = cache.slot_var(base)?.to_string();
                return Ok(Some((length, slot)));
            }
        }
        Ok(None)
    }

    fn emit_statement(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Block(block) => self.emit_block(block),
            Statement::VariableDeclaration(decl) => self.emit_variable_declaration(decl),
            Statement::Expression(expr) => {
                self.evaluate_expression(expr)?;
                Ok(())
            }
            Statement::If(if_stmt) => self.emit_if(if_stmt),
            Statement::For(for_stmt) => self.emit_for(for_stmt),
            Statement::While(while_stmt) => self.emit_while(while_stmt),
            Statement::InlineAssembly(assembly) => {
                for line in assembly.code.lines() {
                    self.emit_line(line.trim());
                }
                Ok(())
            }
            Statement::Return(value, _) => {
                if let Some(value) = value {
                    self.evaluate_expression(value)?;
                }
                self.emit_line("leave");
                Ok(())
            }
            Statement::Break(_) => {
                self.emit_line("break");
                Ok(())
            }
            Statement::Continue(_) => {
                self.emit_line("continue");
                Ok(())
            }
        }
    }

    fn emit_block(&mut self, block: &Block) -> Result<()> {
        self.emit_line("{");
        self.indent_level += 1;
        for statement in &block.statements {
            self.emit_statement(statement)?;
        }
        self.indent_level -= 1;
        self.emit_line("}");
        Ok(())
    }

    fn emit_variable_declaration(
        &mut self,
        decl: &crate::ast::statement::VariableDeclaration,
    ) -> Result<()> {
        let name = &decl.name.node;
        match &decl.ty {
            Type::Array(array) => {
                let init = decl.initializer.as_ref().ok_or_else(|| {
                    CodegenError::unsupported(
                        decl.span,
                        "array declaration without an initializer",
                    )
                })?;
                let value = self.evaluate_expression(init)?;
                match array.location {
                    DataLocation::Storage => {
                        let slot = value.slot()?;
                        self.emit_line(&format!("let {name}_slot := {slot}"));
                    }
                    DataLocation::Memory => {
                        let mpos = value.mpos()?;
                        self.emit_line(&format!("let {name}_mpos := {mpos}"));
                    }
                    DataLocation::Calldata => {
                        return Err(CodegenError::unsupported(
                            decl.span,
                            "calldata array declarations",
                        ))
                    }
                }
                Ok(())
            }
            _ => {
                match &decl.initializer {
                    Some(init) => {
                        let value = self.evaluate_expression(init)?;
                        self.emit_line(&format!("let {name} := {}", value.name()));
                    }
                    None => self.emit_line(&format!("let {name} := 0")),
                }
                Ok(())
            }
        }
    }

    fn emit_if(&mut self, if_stmt: &IfStatement) -> Result<()> {
        let condition = self.evaluate_expression(&if_stmt.condition)?;
        match &if_stmt.else_block {
            None => {
                self.emit_line(&format!("if {} {{", condition.name()));
                self.indent_level += 1;
                for statement in &if_stmt.then_block.statements {
                    self.emit_statement(statement)?;
                }
                self.indent_level -= 1;
                self.emit_line("}");
            }
            Some(else_block) => {
                self.emit_line(&format!("switch {}", condition.name()));
                self.emit_line("case 0 {");
                self.indent_level += 1;
                for statement in &else_block.statements {
                    self.emit_statement(statement)?;
                }
                self.indent_level -= 1;
                self.emit_line("}");
                self.emit_line("default {");
                self.indent_level += 1;
                for statement in &if_stmt.then_block.statements {
                    self.emit_statement(statement)?;
                }
                self.indent_level -= 1;
                self.emit_line("}");
            }
        }
        Ok(())
    }

    fn emit_for(&mut self, for_stmt: &ForStatement) -> Result<()> {
        let optimized = self.begin_loop_optimization(&Loop::For(for_stmt))?;

        self.emit_line("{");
        self.indent_level += 1;
        if let Some(init) = &for_stmt.init {
            self.emit_statement(init)?;
        }
        self.emit_line("for { } 1 { } {");
        self.indent_level += 1;
        if let Some(condition) = &for_stmt.condition {
            let value = self.evaluate_expression(condition)?;
            self.emit_line(&format!("if iszero({}) {{ break }}", value.name()));
        }
        for statement in &for_stmt.body.statements {
            self.emit_statement(statement)?;
        }
        if let Some(post) = &for_stmt.post {
            self.evaluate_expression(post)?;
        }
        self.indent_level -= 1;
        self.emit_line("}");
        self.indent_level -= 1;
        self.emit_line("}");

        if optimized {
            self.loop_caches.pop();
        }
        Ok(())
    }

    fn emit_while(&mut self, while_stmt: &WhileStatement) -> Result<()> {
        let optimized = self.begin_loop_optimization(&Loop::While(while_stmt))?;

        self.emit_line("for { } 1 { } {");
        self.indent_level += 1;
        let value = self.evaluate_expression(&while_stmt.condition)?;
        self.emit_line(&format!("if iszero({}) {{ break }}", value.name()));
        for statement in &while_stmt.body.statements {
            self.emit_statement(statement)?;
        }
        self.indent_level -= 1;
        self.emit_line("}");

        if optimized {
            self.loop_caches.pop();
        }
        Ok(())
    }

    /// Runs the three-phase caching protocol for one loop. On success the
    /// hoisted computations have been emitted at the current position and
    /// a fresh cache sits on top of the stack; the caller pops it when the
    /// loop's generation ends.
    fn begin_loop_optimization(&mut self, loop_: &Loop<'_>) -> Result<bool> {
        if !self.options.optimization_level.array_loop_caching() {
            return Ok(false);
        }
        if !SafetyChecker::check(loop_) {
            debug!(loop_span = %loop_.span(), "loop is not eligible for storage array caching");
            return Ok(false);
        }
        let (mut cache, candidates) = CandidateCollector::collect(loop_);
        if candidates.is_empty() {
            debug!(loop_span = %loop_.span(), "no cacheable storage array accesses");
            return Ok(false);
        }
        debug!(
            loop_span = %loop_.span(),
            count = candidates.len(),
            "hoisting storage array length and slot computations"
        );
        generate_cached_accesses(&candidates, self, &mut cache)?;
        self.loop_caches.push(cache);
        Ok(true)
    }
}
