//! Statement AST nodes and declarations for IC

use super::expressions::Expression;
use icc_common::{NodeId, SourceSpan, Type, LIBRARY_CLASS};
use serde::{Deserialize, Serialize};

/// Name of the method-scope entry that records the declared return type
pub const RETURN_SYMBOL: &str = "$ret";

/// A statement with the id of its node and the span the parser recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub node_id: NodeId,
    pub kind: StatementKind,
    #[serde(default)]
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// `target = value;` where `target` is a location expression
    Assignment {
        target: Expression,
        value: Expression,
    },

    /// Call evaluated for its effect
    Call(Expression),

    Return(Option<Expression>),

    If {
        condition: Expression,
        then_stmt: Box<Statement>,
        else_stmt: Option<Box<Statement>>,
    },

    While {
        condition: Expression,
        body: Box<Statement>,
    },

    Break,
    Continue,

    /// Braced statement list
    Block(Vec<Statement>),

    LocalVariable {
        name: String,
        var_type: Type,
        init: Option<Expression>,
    },
}

impl Statement {
    pub fn new(node_id: NodeId, kind: StatementKind, span: SourceSpan) -> Self {
        Self { node_id, kind, span }
    }

    /// Control never falls through this statement to the next one in its block
    pub fn transfers_control(&self) -> bool {
        matches!(
            self.kind,
            StatementKind::Return(_) | StatementKind::Break | StatementKind::Continue
        )
    }

    /// Short node kind name, used for source annotations and logging
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            StatementKind::Assignment { .. } => "Assignment",
            StatementKind::Call(_) => "CallStatement",
            StatementKind::Return(_) => "Return",
            StatementKind::If { .. } => "If",
            StatementKind::While { .. } => "While",
            StatementKind::Break => "Break",
            StatementKind::Continue => "Continue",
            StatementKind::Block(_) => "StatementsBlock",
            StatementKind::LocalVariable { .. } => "LocalVariable",
        }
    }
}

/// Root of a typed IC program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub classes: Vec<ClassDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    #[serde(default)]
    pub span: SourceSpan,
}

impl ClassDecl {
    pub fn new(name: &str, superclass: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            superclass: superclass.map(str::to_string),
            fields: Vec::new(),
            methods: Vec::new(),
            span: SourceSpan::default(),
        }
    }

    pub fn with_field(mut self, name: &str, field_type: Type) -> Self {
        self.fields.push(FieldDecl {
            name: name.to_string(),
            field_type,
        });
        self
    }

    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    /// The placeholder class declaring the runtime library signatures
    pub fn is_library(&self) -> bool {
        self.name == LIBRARY_CLASS
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub field_type: Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    Virtual,
    Static,
    /// Signature of a runtime library routine, without a body
    Library,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formal {
    pub name: String,
    pub formal_type: Type,
}

impl Formal {
    pub fn new(name: &str, formal_type: Type) -> Self {
        Self {
            name: name.to_string(),
            formal_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Formal,
    Local,
    /// The `$ret` entry
    ReturnValue,
}

/// One entry of a method's own symbol table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeSymbol {
    pub name: String,
    pub symbol_type: Type,
    pub kind: SymbolKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub kind: MethodKind,
    #[serde(default)]
    pub formals: Vec<Formal>,
    pub return_type: Type,
    #[serde(default)]
    pub body: Vec<Statement>,
    /// Symbols declared directly in the method scope (formals, top-level
    /// locals and the return entry)
    #[serde(default)]
    pub scope: Vec<ScopeSymbol>,
    #[serde(default)]
    pub span: SourceSpan,
}

impl MethodDecl {
    /// Create a method and derive its scope the way the symbol table builder does
    pub fn new(
        name: &str,
        kind: MethodKind,
        formals: Vec<Formal>,
        return_type: Type,
        body: Vec<Statement>,
    ) -> Self {
        let mut scope: Vec<ScopeSymbol> = formals
            .iter()
            .map(|f| ScopeSymbol {
                name: f.name.clone(),
                symbol_type: f.formal_type.clone(),
                kind: SymbolKind::Formal,
            })
            .collect();
        scope.push(ScopeSymbol {
            name: RETURN_SYMBOL.to_string(),
            symbol_type: return_type.clone(),
            kind: SymbolKind::ReturnValue,
        });
        for stmt in &body {
            if let StatementKind::LocalVariable { name, var_type, .. } = &stmt.kind {
                scope.push(ScopeSymbol {
                    name: name.clone(),
                    symbol_type: var_type.clone(),
                    kind: SymbolKind::Local,
                });
            }
        }

        Self {
            name: name.to_string(),
            kind,
            formals,
            return_type,
            body,
            scope,
            span: SourceSpan::default(),
        }
    }

    pub fn is_main(&self) -> bool {
        self.name == "main" && self.kind == MethodKind::Static
    }

    pub fn returns_void(&self) -> bool {
        self.return_type.is_void()
    }

    pub fn formal_names(&self) -> Vec<String> {
        self.formals.iter().map(|f| f.name.clone()).collect()
    }
}
