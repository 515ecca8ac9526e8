//! The crawler: resolves an arbitrary data object to an extraction strategy
//! and executes it.
//!
//! Resolution is deterministic and ordered. The type catalog is consulted
//! first; a declaring-context or originating-callable override, when one
//! matches, takes precedence over the catalog result. Resolution never
//! fails: anything unrecognized runs the default strategy.
//!
//! A crawler is created per extraction call and consumed by [`Crawler::crawl`].
//! Resolution is a pure function of the registry and the call site, so
//! repeated crawls of the same object with the same options are identical.

use crate::extract::{
    CrawlOptions, CrawlOutput, ExtractionInput, ExtractionStrategy, default_strategy,
};
use crate::object::DataObject;
use crate::registry::{FormatKey, FormatRegistry};

/// The declaring context of the call that produced a data object, typically
/// the class or object whose method returned it.
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Textual representation of the declaring context. The legacy override
    /// scan matches registry string keys against this.
    pub description: String,
    /// Structured format hint declared by the instrumentation site. When it
    /// names a registered key, it wins outright; prefer it over relying on
    /// the substring fallback.
    pub format_hint: Option<FormatKey>,
}

impl CallContext {
    /// Create a context from its textual representation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            format_hint: None,
        }
    }

    /// Declare the format explicitly.
    pub fn with_format_hint(mut self, hint: FormatKey) -> Self {
        self.format_hint = Some(hint);
        self
    }
}

/// The callable that produced a data object, identified by its declaring
/// module. Used only when the object's own type gives no signal.
#[derive(Debug, Clone)]
pub struct CallOrigin {
    /// Fully-qualified path of the declaring module.
    pub module_path: String,
    /// Name of the callable.
    pub name: String,
}

impl CallOrigin {
    /// Create an origin from a module path and callable name.
    pub fn new(module_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            name: name.into(),
        }
    }
}

/// Everything the instrumentation layer captured about the call site.
#[derive(Debug, Clone, Default)]
pub struct CallSite {
    /// Declaring context, when known.
    pub context: Option<CallContext>,
    /// Originating callable, when known.
    pub origin: Option<CallOrigin>,
    /// Keyword options captured at the call site; forwarded to the strategy
    /// only when a context or module override matches.
    pub captured: CrawlOptions,
}

impl CallSite {
    /// An empty call site.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the declaring context.
    pub fn with_context(mut self, context: CallContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Set the originating callable.
    pub fn with_origin(mut self, origin: CallOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Set the captured call-site options.
    pub fn with_captured(mut self, captured: CrawlOptions) -> Self {
        self.captured = captured;
        self
    }
}

/// Outcome of one resolution pass.
struct Resolution {
    format: Option<FormatKey>,
    strategy: ExtractionStrategy,
    forward_captured: bool,
}

/// One extraction session: a data object, its call site, and the registry
/// to resolve against.
pub struct Crawler<'r> {
    registry: &'r FormatRegistry,
    object: DataObject,
    context: Option<CallContext>,
    origin: Option<CallOrigin>,
    captured: CrawlOptions,
}

impl<'r> Crawler<'r> {
    /// Create a session for a data object with no call-site information.
    pub fn new(registry: &'r FormatRegistry, object: DataObject) -> Self {
        Self {
            registry,
            object,
            context: None,
            origin: None,
            captured: CrawlOptions::new(),
        }
    }

    /// Create a session with full call-site information.
    pub fn at_site(registry: &'r FormatRegistry, object: DataObject, site: CallSite) -> Self {
        Self {
            registry,
            object,
            context: site.context,
            origin: site.origin,
            captured: site.captured,
        }
    }

    /// Set the declaring context.
    pub fn with_context(mut self, context: CallContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Set the originating callable.
    pub fn with_origin(mut self, origin: CallOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Set the captured call-site options.
    pub fn with_captured(mut self, captured: CrawlOptions) -> Self {
        self.captured = captured;
        self
    }

    /// The data object this session holds.
    pub fn data(&self) -> &DataObject {
        &self.object
    }

    /// The format this session resolves to, if any.
    pub fn format(&self) -> Option<FormatKey> {
        self.resolve().format
    }

    /// Run the full resolution algorithm: type identification, strategy
    /// lookup, then context/module override.
    fn resolve(&self) -> Resolution {
        let mut format = self.registry.identify(&self.object);
        let mut strategy = format
            .as_ref()
            .and_then(|key| self.registry.strategy_for(key))
            .unwrap_or(default_strategy as ExtractionStrategy);
        let mut forward_captured = false;

        if let Some(context) = &self.context {
            if let Some(hint) = &context.format_hint {
                if let Some(declared) = self.registry.strategy_for(hint) {
                    return Resolution {
                        format: Some(hint.clone()),
                        strategy: declared,
                        forward_captured: true,
                    };
                }
            }
            // Legacy fallback: the first registered string key occurring in
            // the context's textual representation wins.
            for (fragment, key) in self.registry.string_keys() {
                if context.description.contains(fragment) {
                    strategy = self.registry.strategy_for(key).unwrap_or(strategy);
                    format = Some(key.clone());
                    forward_captured = true;
                    break;
                }
            }
        } else if let Some(origin) = &self.origin {
            for marker in self.registry.modules() {
                if marker == &origin.module_path
                    || marker.contains(origin.module_path.as_str())
                    || origin.module_path.contains(marker.as_str())
                {
                    let key = FormatKey::Module(marker.clone());
                    strategy = self.registry.strategy_for(&key).unwrap_or(strategy);
                    format = Some(key);
                    forward_captured = true;
                    break;
                }
            }
        }

        Resolution {
            format,
            strategy,
            forward_captured,
        }
    }

    /// Resolve and execute the extraction, consuming the session.
    ///
    /// When an override matched, captured call-site options are merged under
    /// `options` (invocation entries win); otherwise only `options` reach
    /// the strategy.
    pub fn crawl(self, options: CrawlOptions) -> CrawlOutput {
        let resolution = self.resolve();
        let merged = if resolution.forward_captured {
            self.captured.merged_with(&options)
        } else {
            options
        };
        (resolution.strategy)(ExtractionInput {
            object: self.object,
            format: resolution.format,
            options: merged,
        })
    }
}
