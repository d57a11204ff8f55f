use std::fmt;

/// Identifies the component a log call originates from.
///
/// A context renders as the `[name]` or `[name @ origin]` part of the line
/// prefix. The optional origin distinguishes instances of the same component,
/// such as individual connections of one server.
///
/// # Examples
///
/// ```
/// use termlog::Context;
///
/// let general = Context::new("http");
/// assert_eq!(general.name(), "http");
/// assert_eq!(general.origin(), None);
///
/// let specific = Context::with_origin("http", "conn-4");
/// assert_eq!(specific.origin(), Some("conn-4"));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Context<'a> {
    name: &'a str,
    origin: Option<&'a str>,
}

impl<'a> Context<'a> {
    /// Creates a context from a component name.
    #[must_use]
    pub const fn new(name: &'a str) -> Self {
        Self { name, origin: None }
    }

    /// Creates a context carrying an instance origin next to the name.
    #[must_use]
    pub const fn with_origin(name: &'a str, origin: &'a str) -> Self {
        Self {
            name,
            origin: Some(origin),
        }
    }

    /// The component name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// The instance origin, if one was given.
    #[must_use]
    pub const fn origin(&self) -> Option<&'a str> {
        self.origin
    }
}

impl fmt::Display for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            Some(origin) => write!(f, "{} @ {}", self.name, origin),
            None => f.write_str(self.name),
        }
    }
}
