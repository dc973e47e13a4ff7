//! Maps the host app's navigation signal to a functional area.
//!
//! The classifier is a pure, total function over route names: ordered
//! substring rules, first match wins, anything unrecognized lands in
//! `General`. Callers re-invoke it on every navigation change; there is no
//! cached state here.

/// The functional area of the host app the user is currently in. Used to
/// select relevant quick actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Context {
    #[default]
    General,
    Projects,
    Customers,
    Payments,
    Reports,
    Bookings,
    Brokers,
    Properties,
    Masters,
    Utilities,
    Dispatches,
    Feedback,
}

impl Context {
    /// Returns a short display label for the modal header.
    pub fn display_label(&self) -> &'static str {
        match self {
            Context::General => "General",
            Context::Projects => "Projects",
            Context::Customers => "Customers",
            Context::Payments => "Payments",
            Context::Reports => "Reports",
            Context::Bookings => "Bookings",
            Context::Brokers => "Brokers",
            Context::Properties => "Properties",
            Context::Masters => "Masters",
            Context::Utilities => "Utilities",
            Context::Dispatches => "Dispatches",
            Context::Feedback => "Feedback",
        }
    }

    /// Returns the tag sent to the backend with each request.
    pub fn wire_tag(&self) -> &'static str {
        match self {
            Context::General => "general",
            Context::Projects => "projects",
            Context::Customers => "customers",
            Context::Payments => "payments",
            Context::Reports => "reports",
            Context::Bookings => "bookings",
            Context::Brokers => "brokers",
            Context::Properties => "properties",
            Context::Masters => "masters",
            Context::Utilities => "utilities",
            Context::Dispatches => "dispatches",
            Context::Feedback => "feedback",
        }
    }
}

struct Rule {
    context: Context,
    /// Case-insensitive substrings; any hit matches the rule.
    any_of: &'static [&'static str],
    /// Substrings that veto the rule even when a positive hit exists.
    none_of: &'static [&'static str],
}

/// Ordered top to bottom; the first matching rule wins. "size" routes are
/// master-data screens, so they are vetoed out of the Projects rule and
/// caught by the Masters rule below it.
const RULES: &[Rule] = &[
    Rule {
        context: Context::Projects,
        any_of: &["project"],
        none_of: &["size"],
    },
    Rule {
        context: Context::Customers,
        any_of: &["customer"],
        none_of: &[],
    },
    Rule {
        context: Context::Payments,
        any_of: &["payment", "receipt"],
        none_of: &[],
    },
    Rule {
        context: Context::Bookings,
        any_of: &["booking"],
        none_of: &[],
    },
    Rule {
        context: Context::Brokers,
        any_of: &["broker"],
        none_of: &[],
    },
    Rule {
        context: Context::Properties,
        any_of: &["property", "properties", "inventory"],
        none_of: &[],
    },
    Rule {
        context: Context::Reports,
        any_of: &["report"],
        none_of: &[],
    },
    Rule {
        context: Context::Masters,
        any_of: &["master", "size"],
        none_of: &[],
    },
    Rule {
        context: Context::Utilities,
        any_of: &["utilit", "tool"],
        none_of: &[],
    },
    Rule {
        context: Context::Dispatches,
        any_of: &["dispatch"],
        none_of: &[],
    },
    Rule {
        context: Context::Feedback,
        any_of: &["feedback", "complaint"],
        none_of: &[],
    },
    Rule {
        context: Context::General,
        any_of: &["home", "dashboard"],
        none_of: &[],
    },
];

/// Classifies a route name into a [`Context`]. `None` and unrecognized
/// routes yield `General`.
pub fn classify(route_name: Option<&str>) -> Context {
    let Some(route) = route_name else {
        return Context::General;
    };

    let route = route.to_lowercase();
    for rule in RULES {
        let hit = rule.any_of.iter().any(|needle| route.contains(needle));
        let vetoed = rule.none_of.iter().any(|needle| route.contains(needle));
        if hit && !vetoed {
            return rule.context;
        }
    }

    Context::General
}
