//! Flat, append-only table of every name in the translation unit.

use crate::codegen::Label;
use crate::error::{InternalError, SourceError};
use crate::types::Type;

use std::collections::HashMap;

pub type Identifier = String;

/// Name of the runtime helper emitted in the assembly preamble.
pub const PRINTINT: &str = "printint";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(usize);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: Identifier,
    pub sym_type: Type,
    pub kind: SymbolKind,
    /// Where every `return` of a function jumps to.
    pub end_label: Option<Label>,
}

impl Symbol {
    pub fn is_function(&self) -> bool {
        self.kind == SymbolKind::Function
    }
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_name: HashMap<Identifier, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table that already knows about the `printint` runtime helper.
    pub fn with_runtime() -> Self {
        let id = SymbolId(0);
        let mut table = Self::new();
        table.by_name.insert(PRINTINT.into(), id);
        table.symbols.push(Symbol {
            id,
            name: PRINTINT.into(),
            sym_type: Type::Void,
            kind: SymbolKind::Function,
            end_label: None,
        });
        table
    }

    pub fn add(
        &mut self,
        name: Identifier,
        sym_type: Type,
        kind: SymbolKind,
        end_label: Option<Label>,
    ) -> Result<SymbolId, SourceError> {
        if self.by_name.contains_key(&name) {
            return Err(SourceError::Redeclaration(name));
        }
        let id = SymbolId(self.symbols.len());
        self.by_name.insert(name.clone(), id);
        self.symbols.push(Symbol {
            id,
            name,
            sym_type,
            kind,
            end_label,
        });
        Ok(id)
    }

    /// Lookup for names coming straight from source text.
    pub fn find(&self, name: &str) -> Option<&Symbol> {
        self.by_name.get(name).map(|id| &self.symbols[id.0])
    }

    pub fn get_by_id(&self, id: SymbolId) -> Result<&Symbol, InternalError> {
        self.symbols
            .get(id.0)
            .ok_or(InternalError::UnknownSymbolId(id.0))
    }

    pub fn get_by_name(&self, name: &str) -> Result<&Symbol, InternalError> {
        self.find(name)
            .ok_or_else(|| InternalError::UnknownSymbolName(name.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
