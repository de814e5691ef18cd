//! Parenthesized printing of syntax trees
//!
//! `(+ 1 (group 2))` style output, one visitor for both families.

use std::rc::Rc;

use crate::error::NullChildError;
use crate::expr::{self, Expr, ExprVisitor};
use crate::stmt::{self, Stmt, StmtVisitor};

/// Prints a tree in prefix form
///
/// Stops at the first absent exclusive child and reports it.
#[derive(Debug, Default)]
pub struct AstPrinter {
    out: String,
    error: Option<NullChildError>,
}

impl AstPrinter {
    pub fn print_expr(expr: &dyn Expr) -> Result<String, NullChildError> {
        let mut printer = Self::default();
        expr.accept(&mut printer);
        printer.finish()
    }

    pub fn print_stmt(stmt: &dyn Stmt) -> Result<String, NullChildError> {
        let mut printer = Self::default();
        stmt.accept(&mut printer);
        printer.finish()
    }

    fn finish(self) -> Result<String, NullChildError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn open(&mut self, name: &str) {
        self.out.push('(');
        self.out.push_str(name);
    }

    fn close(&mut self) {
        self.out.push(')');
    }

    fn word(&mut self, word: &str) {
        self.out.push(' ');
        self.out.push_str(word);
    }

    fn expr(&mut self, child: Result<&dyn Expr, NullChildError>) {
        if self.error.is_some() {
            return;
        }
        match child {
            Ok(expr) => {
                self.out.push(' ');
                expr.accept(self);
            }
            Err(err) => self.error = Some(err),
        }
    }

    fn stmt(&mut self, child: Result<&dyn Stmt, NullChildError>) {
        if self.error.is_some() {
            return;
        }
        match child {
            Ok(stmt) => {
                self.out.push(' ');
                stmt.accept(self);
            }
            Err(err) => self.error = Some(err),
        }
    }

    fn shared_expr(&mut self, child: Option<&Rc<dyn Expr>>) {
        if let Some(expr) = child {
            self.expr(Ok(&**expr));
        }
    }

    fn binary(&mut self, op: &str, left: Result<&dyn Expr, NullChildError>, right: Result<&dyn Expr, NullChildError>) {
        self.open(op);
        self.expr(left);
        self.expr(right);
        self.close();
    }
}

impl ExprVisitor for AstPrinter {
    fn visit_assign_expr(&mut self, expr: &expr::Assign) {
        self.open("=");
        self.word(&expr.name().lexeme);
        self.expr(expr.value());
        self.close();
    }

    fn visit_binary_expr(&mut self, expr: &expr::Binary) {
        self.binary(&expr.op().lexeme, expr.left(), expr.right());
    }

    fn visit_call_expr(&mut self, expr: &expr::Call) {
        self.open("call");
        self.expr(expr.callee());
        for argument in expr.arguments() {
            self.expr(Ok(&**argument));
        }
        self.close();
    }

    fn visit_get_expr(&mut self, expr: &expr::Get) {
        self.open(".");
        self.expr(expr.object());
        self.word(&expr.name().lexeme);
        self.close();
    }

    fn visit_grouping_expr(&mut self, expr: &expr::Grouping) {
        self.open("group");
        self.expr(expr.expression());
        self.close();
    }

    fn visit_literal_expr(&mut self, expr: &expr::Literal) {
        self.out.push_str(&expr.value().to_string());
    }

    fn visit_logical_expr(&mut self, expr: &expr::Logical) {
        self.binary(&expr.op().lexeme, expr.left(), expr.right());
    }

    fn visit_set_expr(&mut self, expr: &expr::Set) {
        self.open("=");
        self.expr(expr.object());
        self.word(&expr.name().lexeme);
        self.expr(expr.value());
        self.close();
    }

    fn visit_super_expr(&mut self, expr: &expr::Super) {
        self.open("super");
        self.word(&expr.method().lexeme);
        self.close();
    }

    fn visit_ternary_expr(&mut self, expr: &expr::Ternary) {
        self.open("?:");
        self.expr(expr.first());
        self.expr(expr.second());
        self.expr(expr.third());
        self.close();
    }

    fn visit_this_expr(&mut self, _expr: &expr::This) {
        self.out.push_str("this");
    }

    fn visit_unary_expr(&mut self, expr: &expr::Unary) {
        self.open(&expr.op().lexeme);
        self.expr(expr.right());
        self.close();
    }

    fn visit_variable_expr(&mut self, expr: &expr::Variable) {
        self.out.push_str(&expr.name().lexeme);
    }
}

impl StmtVisitor for AstPrinter {
    fn visit_block_stmt(&mut self, stmt: &stmt::Block) {
        self.open("block");
        for statement in stmt.statements() {
            self.stmt(Ok(&**statement));
        }
        self.close();
    }

    fn visit_break_stmt(&mut self, _stmt: &stmt::Break) {
        self.out.push_str("(break)");
    }

    fn visit_class_stmt(&mut self, stmt: &stmt::Class) {
        self.open("class");
        self.word(&stmt.name().lexeme);
        if let Some(superclass) = stmt.superclass() {
            self.word("<");
            self.word(&superclass.name().lexeme);
        }
        for method in stmt.methods() {
            self.stmt(Ok(&**method));
        }
        self.close();
    }

    fn visit_expression_stmt(&mut self, stmt: &stmt::Expression) {
        self.open(";");
        self.expr(stmt.expression());
        self.close();
    }

    fn visit_function_stmt(&mut self, stmt: &stmt::Function) {
        self.open("fun");
        self.word(&stmt.name().lexeme);
        let params: Vec<&str> = stmt.params().iter().map(|p| p.lexeme.as_str()).collect();
        self.word(&format!("({})", params.join(" ")));
        for statement in stmt.body() {
            self.stmt(Ok(&**statement));
        }
        self.close();
    }

    fn visit_if_stmt(&mut self, stmt: &stmt::If) {
        self.open("if");
        self.expr(stmt.condition());
        self.stmt(stmt.then_branch());
        if let Some(else_branch) = stmt.else_branch() {
            self.stmt(Ok(&**else_branch));
        }
        self.close();
    }

    fn visit_print_stmt(&mut self, stmt: &stmt::Print) {
        self.open("print");
        self.expr(stmt.expression());
        self.close();
    }

    fn visit_return_stmt(&mut self, stmt: &stmt::Return) {
        self.open("return");
        self.shared_expr(stmt.value());
        self.close();
    }

    fn visit_var_stmt(&mut self, stmt: &stmt::Var) {
        self.open("var");
        self.word(&stmt.name().lexeme);
        if stmt.initialiser().is_some() {
            self.word("=");
        }
        self.shared_expr(stmt.initialiser());
        self.close();
    }

    fn visit_while_stmt(&mut self, stmt: &stmt::While) {
        self.open("while");
        self.expr(stmt.condition());
        self.stmt(stmt.body());
        self.close();
    }
}
