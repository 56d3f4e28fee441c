//! Ticket and transaction data read from the source tracker.

/// Content marker RT emits for transactions that carry no user-visible
/// text (status flips, owner changes, and the like). Such transactions are
/// never replayed as comments.
pub const NO_CONTENT_SENTINEL: &str = "This transaction appears to have no content";

/// A ticket on the source tracker, with its full transaction history
/// materialized in chronological order.
#[derive(Debug, Clone)]
pub struct Ticket {
    /// Ticket id, unique within the source tracker.
    pub id: u64,

    /// Ticket subject.
    pub subject: String,

    /// Custom field name/value pairs, in tracker order.
    pub custom_fields: Vec<(String, String)>,

    /// Transaction history, oldest first. The first transaction is the
    /// ticket description.
    pub transactions: Vec<Transaction>,
}

/// One chronological entry in a ticket's history.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Who created the transaction.
    pub creator: String,

    /// Creation timestamp, as reported by the tracker.
    pub created: String,

    /// Textual content, possibly the no-content sentinel.
    pub content: String,
}

impl Transaction {
    /// Whether this transaction carries user-visible text.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.content.trim() != NO_CONTENT_SENTINEL
    }
}
