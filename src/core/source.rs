// Museum - core/source.rs
//
// Exhibit sources: named containers of exhibit functions.
//
// A source plays the part of a compiled code container. It has a
// fully-qualified name (used for exclusion and visited-set checks), a list
// of members (functions, some of them carrying exhibit metadata) and
// optionally nested sources that discovery walks breadth-first.

use crate::core::model::{Container, Metadata, Unit, UnitFn, UnitId, UnitResult};
use crate::util::error::SourceError;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Members
// =============================================================================

/// A function declared by a source. Only members with an attribute are exhibits.
pub struct Member<C: Container> {
    symbol: String,
    attribute: Option<Metadata>,
    func: Arc<UnitFn<C>>,
}

impl<C: Container> Member<C> {
    /// A member tagged as an exhibit.
    pub fn exhibit<F>(symbol: impl Into<String>, metadata: Metadata, func: F) -> Self
    where
        F: Fn(&mut C) -> UnitResult<C> + Send + Sync + 'static,
    {
        Self::from_shared(symbol, Some(metadata), Arc::new(func))
    }

    /// A member without exhibit metadata. Discovery ignores it.
    pub fn plain<F>(symbol: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut C) -> UnitResult<C> + Send + Sync + 'static,
    {
        Self::from_shared(symbol, None, Arc::new(func))
    }

    pub fn from_shared(
        symbol: impl Into<String>,
        attribute: Option<Metadata>,
        func: Arc<UnitFn<C>>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            attribute,
            func,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn attribute(&self) -> Option<&Metadata> {
        self.attribute.as_ref()
    }

    /// Bind this member to the container that declared it.
    pub fn to_unit(&self, container: &str) -> Unit<C> {
        Unit::new(UnitId::new(container, &self.symbol), Arc::clone(&self.func))
    }
}

impl<C: Container> Clone for Member<C> {
    fn clone(&self) -> Self {
        Self {
            symbol: self.symbol.clone(),
            attribute: self.attribute.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<C: Container> fmt::Debug for Member<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("symbol", &self.symbol)
            .field("attribute", &self.attribute)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Source trait
// =============================================================================

/// A loaded container of exhibit functions.
pub trait ExhibitSource<C: Container>: Send + Sync {
    /// Fully-qualified container name, e.g. `"museum::design"`.
    fn name(&self) -> &str;

    /// Every function this container declares.
    fn members(&self) -> Result<Vec<Member<C>>, SourceError>;

    /// Containers declared inside this one.
    fn nested(&self) -> Result<Vec<Arc<dyn ExhibitSource<C>>>, SourceError> {
        Ok(Vec::new())
    }
}

// =============================================================================
// Static source
// =============================================================================

/// Source built in code at start-up.
///
/// ```ignore
/// let views = StaticSource::new("app::views")
///     .exhibit("dark_titlebar", Metadata::new("Dark Titlebar"), dark_titlebar);
/// ```
pub struct StaticSource<C: Container> {
    name: String,
    members: Vec<Member<C>>,
    nested: Vec<Arc<dyn ExhibitSource<C>>>,
}

impl<C: Container> StaticSource<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            nested: Vec::new(),
        }
    }

    pub fn exhibit<F>(self, symbol: impl Into<String>, metadata: Metadata, func: F) -> Self
    where
        F: Fn(&mut C) -> UnitResult<C> + Send + Sync + 'static,
    {
        self.member(Member::exhibit(symbol, metadata, func))
    }

    pub fn member(mut self, member: Member<C>) -> Self {
        self.members.push(member);
        self
    }

    pub fn nest(mut self, source: Arc<dyn ExhibitSource<C>>) -> Self {
        self.nested.push(source);
        self
    }
}

impl<C: Container> ExhibitSource<C> for StaticSource<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn members(&self) -> Result<Vec<Member<C>>, SourceError> {
        Ok(self.members.clone())
    }

    fn nested(&self) -> Result<Vec<Arc<dyn ExhibitSource<C>>>, SourceError> {
        Ok(self.nested.clone())
    }
}
