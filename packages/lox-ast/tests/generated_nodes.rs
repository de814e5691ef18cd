//! Contracts of the generated node types

use std::rc::Rc;

use lox_ast::expr::{Binary, Call, Expr, ExprVisitor, Grouping, Literal, Unary, Variable};
use lox_ast::stmt::{Block, Class, Function, If, Print, Return, Stmt, Var, While};
use lox_ast::{expr, AstPrinter, NullChildError, Token, TokenKind, Value};

fn token(kind: TokenKind, lexeme: &str) -> Token {
    Token::new(kind, lexeme, 1)
}

fn number(n: f64) -> Box<dyn Expr> {
    Box::new(Literal::new(Value::Number(n)))
}

#[test]
fn test_absent_exclusive_child_fails_every_access() {
    let binary = Binary::new(None, token(TokenKind::Plus, "+"), Some(number(2.0)));

    for _ in 0..2 {
        assert_eq!(binary.left().unwrap_err(), NullChildError::new("Binary", "left"));
    }
    assert!(binary.right().is_ok());
    assert_eq!(binary.op().lexeme, "+");
}

#[test]
fn test_absent_statement_children() {
    let while_stmt = While::new(None, None);
    assert_eq!(while_stmt.condition().unwrap_err(), NullChildError::new("While", "condition"));
    assert_eq!(while_stmt.body().unwrap_err(), NullChildError::new("While", "body"));
}

#[test]
fn test_exclusive_child_moves_into_node() {
    let operand: Box<dyn Expr> = Box::new(Grouping::new(Some(number(45.67))));
    let expected = format!("{:?}", operand);

    // `operand` is moved; the node is now its only owner.
    let unary = Unary::new(token(TokenKind::Minus, "-"), Some(operand));

    let right = unary.right().unwrap();
    assert_eq!(format!("{:?}", right), expected);
    assert_eq!(AstPrinter::print_expr(right).unwrap(), "(group 45.67)");
}

#[test]
fn test_shared_children_may_be_absent() {
    let ret = Return::new(token(TokenKind::Return, "return"), None);
    assert!(ret.value().is_none());

    let var = Var::new(token(TokenKind::Identifier, "a"), None);
    assert!(var.initialiser().is_none());

    let class = Class::new(token(TokenKind::Identifier, "Point"), None, Vec::new());
    assert!(class.superclass().is_none());
    assert!(class.methods().is_empty());
}

#[test]
fn test_shared_child_has_several_holders() {
    let branch: Rc<dyn Stmt> = Rc::new(Print::new(Some(number(1.0))));

    let first = If::new(
        Some(Box::new(Variable::new(token(TokenKind::Identifier, "a")))),
        Some(Box::new(Print::new(Some(number(0.0))))),
        Some(Rc::clone(&branch)),
    );
    let second = If::new(
        Some(Box::new(Variable::new(token(TokenKind::Identifier, "b")))),
        Some(Box::new(Print::new(Some(number(0.0))))),
        Some(Rc::clone(&branch)),
    );

    assert_eq!(Rc::strong_count(&branch), 3);
    assert!(Rc::ptr_eq(first.else_branch().unwrap(), second.else_branch().unwrap()));
    assert_eq!(AstPrinter::print_stmt(&first).unwrap(), "(if a (print 0) (print 1))");
}

#[derive(Default)]
struct NodeCounter {
    visited: Vec<&'static str>,
}

impl ExprVisitor for NodeCounter {
    fn visit_assign_expr(&mut self, _expr: &expr::Assign) {
        self.visited.push("assign");
    }
    fn visit_binary_expr(&mut self, expr: &expr::Binary) {
        self.visited.push("binary");
        if let (Ok(left), Ok(right)) = (expr.left(), expr.right()) {
            left.accept(self);
            right.accept(self);
        }
    }
    fn visit_call_expr(&mut self, expr: &expr::Call) {
        self.visited.push("call");
        for argument in expr.arguments() {
            argument.accept(self);
        }
    }
    fn visit_get_expr(&mut self, _expr: &expr::Get) {
        self.visited.push("get");
    }
    fn visit_grouping_expr(&mut self, _expr: &expr::Grouping) {
        self.visited.push("grouping");
    }
    fn visit_literal_expr(&mut self, _expr: &expr::Literal) {
        self.visited.push("literal");
    }
    fn visit_logical_expr(&mut self, _expr: &expr::Logical) {
        self.visited.push("logical");
    }
    fn visit_set_expr(&mut self, _expr: &expr::Set) {
        self.visited.push("set");
    }
    fn visit_super_expr(&mut self, _expr: &expr::Super) {
        self.visited.push("super");
    }
    fn visit_ternary_expr(&mut self, _expr: &expr::Ternary) {
        self.visited.push("ternary");
    }
    fn visit_this_expr(&mut self, _expr: &expr::This) {
        self.visited.push("this");
    }
    fn visit_unary_expr(&mut self, _expr: &expr::Unary) {
        self.visited.push("unary");
    }
    fn visit_variable_expr(&mut self, _expr: &expr::Variable) {
        self.visited.push("variable");
    }
}

#[test]
fn test_visitor_dispatch_through_base_trait() {
    let nodes: Vec<Box<dyn Expr>> = vec![
        Box::new(Binary::new(Some(number(1.0)), token(TokenKind::Plus, "+"), Some(number(2.0)))),
        Box::new(Call::new(
            Some(Box::new(Variable::new(token(TokenKind::Identifier, "f")))),
            token(TokenKind::RightParen, ")"),
            vec![number(3.0)],
        )),
    ];

    let mut counter = NodeCounter::default();
    for node in &nodes {
        node.accept(&mut counter);
    }
    assert_eq!(counter.visited, vec!["binary", "literal", "literal", "call", "literal"]);
}

#[test]
fn test_print_statements() {
    let scale: Rc<dyn Expr> = Rc::new(Variable::new(token(TokenKind::Identifier, "scale")));
    let body: Vec<Box<dyn Stmt>> = vec![Box::new(Return::new(token(TokenKind::Return, "return"), Some(scale)))];
    let method = Rc::new(Function::new(
        token(TokenKind::Identifier, "area"),
        vec![token(TokenKind::Identifier, "scale")],
        body,
    ));
    let class = Class::new(
        token(TokenKind::Identifier, "Square"),
        Some(Rc::new(Variable::new(token(TokenKind::Identifier, "Shape")))),
        vec![method],
    );
    let nil: Rc<dyn Expr> = Rc::new(Literal::new(Value::Nil));
    let statements: Vec<Box<dyn Stmt>> = vec![
        Box::new(Var::new(token(TokenKind::Identifier, "x"), Some(nil))),
        Box::new(class),
    ];
    let block = Block::new(statements);

    assert_eq!(
        AstPrinter::print_stmt(&block).unwrap(),
        "(block (var x = nil) (class Square < Shape (fun area (scale) (return scale))))"
    );
}
