//! Plugin registry: installs extra token rules into every new lexer and
//! expression extensions into every new parser.
//!
//! The lexer and parser only expose extension points (rule list, expression
//! extension list, named routines); nothing in them knows about plugins.

use crate::syntax::lexer::{Lexer, TokenRule};
use crate::syntax::parser::Parser;
use crate::syntax::tokens::{TokenAliases, TokenKind};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("invalid token pattern for {kind}: {source}")]
    InvalidPattern {
        kind: TokenKind,
        #[source]
        source: regex::Error,
    },
}

/// Compile a token rule, reporting a bad pattern as a [`PluginError`].
pub fn rule(kind: TokenKind, pattern: &str, discard: bool) -> Result<TokenRule, PluginError> {
    TokenRule::new(kind.clone(), pattern, discard)
        .map_err(|source| PluginError::InvalidPattern { kind, source })
}

/// One named capability of a plugin.
///
/// Hooks run once per new lexer / parser. Implementations are shared by
/// every session and must not keep per-session state.
pub trait Extension: Send + Sync {
    /// Register alias names for custom token kinds.
    fn aliases(&self, _aliases: &mut TokenAliases) {}

    /// Add token rules to a freshly created lexer.
    fn lex(&self, _lexer: &mut Lexer<'_>) -> Result<(), PluginError> {
        Ok(())
    }

    /// Define routines and push expression extensions on a fresh parser.
    fn parse(&self, _parser: &mut Parser, _aliases: &TokenAliases) {}
}

/// What a plugin factory returns: a name plus ordered, named extensions.
#[derive(Clone)]
pub struct PluginDescriptor {
    name: String,
    extensions: Vec<(String, Arc<dyn Extension>)>,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), extensions: Vec::new() }
    }

    pub fn extension(mut self, name: impl Into<String>, extension: impl Extension + 'static) -> Self {
        self.extensions.push((name.into(), Arc::new(extension)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extension_names(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(|(name, _)| name.as_str())
    }
}

impl std::fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name)
            .field("extensions", &self.extension_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Append-only list of installed plugins, applied in installation order.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<PluginDescriptor>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self, plugin: PluginDescriptor) {
        debug!(plugin = plugin.name(), extensions = plugin.extensions.len(), "plugin installed");
        self.plugins.push(plugin);
    }

    pub fn plugins(&self) -> &[PluginDescriptor] {
        &self.plugins
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    fn extensions(&self) -> impl Iterator<Item = (&str, &str, &Arc<dyn Extension>)> {
        self.plugins.iter().flat_map(|p| {
            p.extensions.iter().map(move |(name, ext)| (p.name.as_str(), name.as_str(), ext))
        })
    }

    /// Built-in aliases plus every alias the installed extensions declare.
    pub fn aliases(&self) -> TokenAliases {
        let mut aliases = TokenAliases::builtin();
        for (_, _, ext) in self.extensions() {
            ext.aliases(&mut aliases);
        }
        aliases
    }

    pub fn apply_to_lexer(&self, lexer: &mut Lexer<'_>) -> Result<(), PluginError> {
        for (plugin, name, ext) in self.extensions() {
            ext.lex(lexer)?;
            debug!(plugin, extension = name, rules = lexer.rules().len(), "lex hook applied");
        }
        Ok(())
    }

    pub fn apply_to_parser(&self, parser: &mut Parser, aliases: &TokenAliases) {
        for (plugin, name, ext) in self.extensions() {
            ext.parse(parser, aliases);
            debug!(plugin, extension = name, "parse hook applied");
        }
    }
}
