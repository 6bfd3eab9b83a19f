//! Syntax tree produced by the parser.
//!
//! Every node struct serializes with a `type` field naming its node kind;
//! the category enums are untagged so the tag is never emitted twice.

use crate::syntax::tokens::Token;
use serde::Serialize;

/// Root of a parse session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Program")]
pub struct Program {
    pub body: Vec<Node>,
}

/// Anything the statement loop can produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Stmt(Stmt),
    Decl(Decl),
    Expr(Expr),
}

impl Node {
    pub fn type_name(&self) -> &str {
        match self {
            Node::Stmt(s) => s.type_name(),
            Node::Decl(d) => d.type_name(),
            Node::Expr(e) => e.type_name(),
        }
    }

    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Node::Expr(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_stmt(&self) -> Option<&Stmt> {
        match self {
            Node::Stmt(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_decl(&self) -> Option<&Decl> {
        match self {
            Node::Decl(d) => Some(d),
            _ => None,
        }
    }
}

impl From<Expr> for Node {
    fn from(expr: Expr) -> Self {
        Node::Expr(expr)
    }
}

impl From<Stmt> for Node {
    fn from(stmt: Stmt) -> Self {
        Node::Stmt(stmt)
    }
}

impl From<Decl> for Node {
    fn from(decl: Decl) -> Self {
        Node::Decl(decl)
    }
}

// ── Statements ──

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Stmt {
    If(IfStmt),
    While(WhileStmt),
}

impl Stmt {
    pub fn type_name(&self) -> &'static str {
        match self {
            Stmt::If(_) => "IfStatement",
            Stmt::While(_) => "WhileStatement",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename = "BlockStatement")]
pub struct Block {
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "IfStatement")]
pub struct IfStmt {
    pub condition: Expr,
    pub consequent: Block,
    /// `else if` chains nest another `IfStmt` here
    pub alternate: Option<Alternate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Alternate {
    ElseIf(Box<IfStmt>),
    Else(ElseStmt),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ElseStatement")]
pub struct ElseStmt {
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "WhileStatement")]
pub struct WhileStmt {
    pub condition: Expr,
    pub consequent: Block,
}

// ── Declarations ──

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Decl {
    Class(ClassDecl),
    Namespace(NamespaceDecl),
    Using(UsingDirective),
}

impl Decl {
    pub fn type_name(&self) -> &'static str {
        match self {
            Decl::Class(_) => "ClassDeclaration",
            Decl::Namespace(_) => "NamespaceDeclaration",
            Decl::Using(_) => "UsingExpression",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ClassDeclaration", rename_all = "camelCase")]
pub struct ClassDecl {
    pub modifiers: Vec<String>,
    pub name: String,
    /// Generic parameter names, no nested structure
    pub generics: Vec<String>,
    pub base_types: Vec<TypeExpr>,
    pub body: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "NamespaceDeclaration")]
pub struct NamespaceDecl {
    pub name: AccessExpr,
    pub body: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "UsingExpression")]
pub struct UsingDirective {
    pub alias: Option<String>,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub target: AccessExpr,
}

/// Entry of a class or namespace body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Member {
    Member(ClassMember),
    Class(ClassDecl),
    Namespace(NamespaceDecl),
    Using(UsingDirective),
}

impl Member {
    pub fn as_class_member(&self) -> Option<&ClassMember> {
        match self {
            Member::Member(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Field,
    Method,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ClassMember", rename_all = "camelCase")]
pub struct ClassMember {
    pub modifiers: Vec<String>,
    pub return_type: TypeExpr,
    pub name: String,
    pub kind: MemberKind,
    pub parameters: Vec<Expr>,
    /// `None` for fields and body-less (abstract) methods
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "TypeExpression")]
pub struct TypeExpr {
    /// Name is a reserved keyword such as `int`
    pub simple: bool,
    pub name: String,
    pub generics: Vec<TypeExpr>,
}

impl TypeExpr {
    pub fn simple(name: impl Into<String>) -> Self {
        Self { simple: true, name: name.into(), generics: Vec::new() }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { simple: false, name: name.into(), generics: Vec::new() }
    }
}

// ── Expressions ──

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Expr {
    Literal(Literal),
    Access(AccessExpr),
    Assignment(AssignmentExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    TemplateLiteral(TemplateLiteral),
    Extension(ExtensionNode),
}

impl Expr {
    pub fn type_name(&self) -> &str {
        match self {
            Expr::Literal(l) => l.kind.name(),
            Expr::Access(_) => "AccessExpression",
            Expr::Assignment(_) => "AssignmentExpression",
            Expr::Binary(_) => "BinaryExpression",
            Expr::Unary(_) => "UnaryExpression",
            Expr::TemplateLiteral(_) => "TemplateLiteralExpression",
            Expr::Extension(e) => &e.kind,
        }
    }

    pub fn binary(operator: impl Into<String>, left: Expr, right: Expr) -> Self {
        Expr::Binary(BinaryExpr {
            operator: operator.into(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LiteralKind {
    Number,
    String,
    Char,
}

impl LiteralKind {
    pub fn name(&self) -> &'static str {
        match self {
            LiteralKind::Number => "NUMBER",
            LiteralKind::String => "STRING",
            LiteralKind::Char => "CHAR",
        }
    }
}

/// Number, string or char literal; `value` is the raw source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    #[serde(rename = "type")]
    pub kind: LiteralKind,
    pub value: String,
}

/// Base identifier followed by member, index and call postfixes, applied
/// left to right.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "AccessExpression")]
pub struct AccessExpr {
    pub target: Token,
    pub body: Vec<AccessOp>,
}

impl AccessExpr {
    /// Dotted path when the chain holds member accesses only
    /// (`System.Collections.Generic`).
    pub fn dotted_path(&self) -> Option<String> {
        let mut path = self.target.text.clone();
        for op in &self.body {
            match op {
                AccessOp::Dot { property } => {
                    path.push('.');
                    path.push_str(&property.text);
                }
                _ => return None,
            }
        }
        Some(path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum AccessOp {
    #[serde(rename = "DotAccess")]
    Dot { property: Token },
    #[serde(rename = "BracketAccess")]
    Bracket { expression: Box<Expr> },
    #[serde(rename = "CallExpression")]
    Call { arguments: Vec<Expr> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "AssignmentExpression")]
pub struct AssignmentExpr {
    pub operator: String,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "BinaryExpression")]
pub struct BinaryExpr {
    pub operator: String,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "UnaryExpression")]
pub struct UnaryExpr {
    pub operator: String,
    pub argument: Box<Expr>,
    pub prefix: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "TemplateLiteralExpression")]
pub struct TemplateLiteral {
    /// Full literal text including `$"` and the closing quote
    pub template: String,
    /// Raw `{...}` holes, braces included, uninterpreted
    pub replacees: Vec<String>,
}

/// Node built by a plugin expression extension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionNode {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: serde_json::Value,
    pub children: Vec<Node>,
}

impl ExtensionNode {
    pub fn new(kind: impl Into<String>, value: serde_json::Value) -> Self {
        Self { kind: kind.into(), value, children: Vec::new() }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }
}
