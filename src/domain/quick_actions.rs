//! Static lookup table from context to suggested quick actions.

use super::context::Context;

/// A pre-canned suggested message surfaced as a tappable chip. Tapping it
/// sends `action_text` as if the user had typed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub label: &'static str,
    pub action_text: &'static str,
}

const fn action(label: &'static str, action_text: &'static str) -> QuickAction {
    QuickAction { label, action_text }
}

/// Returns the quick actions for a context. The match is exhaustive over the
/// closed enum, so every context resolves to a populated, fixed-order list;
/// `General` doubles as the semantic fallback.
pub fn actions_for(context: Context) -> &'static [QuickAction] {
    match context {
        Context::General => const {
            &[
                action("What can you do?", "What can you help me with?"),
                action("Today's summary", "Give me a summary of today's activity"),
                action("Pending approvals", "Show my pending approvals"),
                action("Search", "Help me find a record"),
            ]
        },
        Context::Projects => const {
            &[
                action("Project status", "What is the current status of my projects?"),
                action("Unit availability", "Show unit availability across projects"),
                action("Add project", "How do I add a new project?"),
                action("Stage summary", "Summarize projects by construction stage"),
                action("Overdue milestones", "Which projects have overdue milestones?"),
            ]
        },
        Context::Customers => const {
            &[
                action("Find customer", "Help me find a customer record"),
                action("New customer", "How do I register a new customer?"),
                action("Outstanding dues", "Which customers have outstanding dues?"),
                action("Contact details", "Show contact details for a customer"),
            ]
        },
        Context::Payments => const {
            &[
                action("Record payment", "How do I record a new payment?"),
                action("Pending receipts", "Show pending payment receipts"),
                action("Today's collections", "What are today's collections?"),
                action("Refund process", "How do I process a refund?"),
                action("Payment modes", "Break down recent payments by mode"),
            ]
        },
        Context::Reports => const {
            &[
                action("Collection report", "Generate a collection report"),
                action("Sales report", "Generate a sales report"),
                action("Export CSV", "How do I export this report as CSV?"),
                action("Compare months", "Compare this month's figures with last month"),
            ]
        },
        Context::Bookings => const {
            &[
                action("New booking", "How do I create a new booking?"),
                action("Booking status", "What is the status of a booking?"),
                action("Cancellations", "Show recent booking cancellations"),
                action("Payment schedule", "Show the payment schedule for a booking"),
            ]
        },
        Context::Brokers => const {
            &[
                action("Broker commissions", "Show pending broker commissions"),
                action("Add broker", "How do I register a new broker?"),
                action("Top brokers", "Who are the top brokers this quarter?"),
                action("Broker ledger", "Show a broker's ledger"),
            ]
        },
        Context::Properties => const {
            &[
                action("Available units", "Which units are currently available?"),
                action("Price list", "Show the current price list"),
                action("Hold a unit", "How do I put a unit on hold?"),
                action("Unit history", "Show the transaction history of a unit"),
            ]
        },
        Context::Masters => const {
            &[
                action("Project sizes", "Show the configured project sizes"),
                action("Add size", "How do I add a new size entry?"),
                action("Edit master data", "How do I edit master data safely?"),
                action("Master list", "List all master data categories"),
            ]
        },
        Context::Utilities => const {
            &[
                action("Bulk import", "How do I bulk-import records?"),
                action("Data backup", "How do I back up my data?"),
                action("User management", "How do I manage user accounts?"),
                action("Audit log", "Show recent changes from the audit log"),
            ]
        },
        Context::Dispatches => const {
            &[
                action("New dispatch", "How do I create a dispatch entry?"),
                action("Pending dispatches", "Show pending dispatches"),
                action("Dispatch status", "What is the status of a dispatch?"),
                action("Delivery proof", "How do I attach proof of delivery?"),
            ]
        },
        Context::Feedback => const {
            &[
                action("Open complaints", "Show open customer complaints"),
                action("Log feedback", "How do I log customer feedback?"),
                action("Resolution time", "What is our average resolution time?"),
                action("Escalations", "Show escalated feedback items"),
            ]
        },
    }
}
