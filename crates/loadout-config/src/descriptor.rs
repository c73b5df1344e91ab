//! Service descriptor parsing.
//!
//! A descriptor is plain text with one directive per line:
//!
//! ```text
//! # comment
//! com.example.MyEnricher
//! !org.example.DefaultEnricher
//! com.example.AnotherEnricher,50
//! ```
//!
//! A leading `!` removes the type from the set accumulated so far. A trailing
//! `,<integer>` gives an explicit order; without one (or when the text after
//! the comma is not an integer) the order is drawn from an [`OrderAssigner`].

use std::hash::{Hash, Hasher};

/// First value handed out by a fresh [`OrderAssigner`].
pub const DEFAULT_ORDER_START: i32 = 100;

/// Hands out orders for entries that do not specify one.
///
/// One assigner belongs to one top-level resolution call and is passed
/// explicitly to every parse within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAssigner {
    next: i32,
}

impl Default for OrderAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderAssigner {
    pub fn new() -> Self {
        Self {
            next: DEFAULT_ORDER_START,
        }
    }

    /// Return the current counter value, then advance it by one.
    pub fn next_order(&mut self) -> i32 {
        let order = self.next;
        self.next = self.next.saturating_add(1);
        order
    }

    /// The value the next call to [`OrderAssigner::next_order`] returns.
    pub fn peek(&self) -> i32 {
        self.next
    }
}

/// One parsed descriptor directive.
///
/// Two entries are equal when their type names are equal, whatever their
/// order or removal flag: that is what lets a later entry override or remove
/// an earlier one.
#[derive(Debug, Clone)]
pub struct DescriptorEntry {
    pub type_name: String,
    pub remove: bool,
    pub order: i32,
}

impl PartialEq for DescriptorEntry {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
    }
}

impl Eq for DescriptorEntry {}

impl Hash for DescriptorEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
    }
}

impl DescriptorEntry {
    /// Parse one directive line.
    ///
    /// Returns `None` for blank and comment lines, and for lines whose type
    /// name is empty. Only lines that yield an entry without an explicit
    /// order draw from `orders`.
    pub fn parse(line: &str, orders: &mut OrderAssigner) -> Option<Self> {
        if is_ignorable(line) {
            return None;
        }

        let mut fields = line.split(',');
        let head = fields.next().unwrap_or_default().trim();
        let (remove, type_name) = match head.strip_prefix('!') {
            Some(rest) => (true, rest.trim()),
            None => (false, head),
        };
        if type_name.is_empty() {
            tracing::warn!(line, "descriptor line has no type name, skipping");
            return None;
        }

        let order = match fields.next().map(str::trim) {
            Some(text) => text.parse::<i32>().unwrap_or_else(|_| {
                let assigned = orders.next_order();
                tracing::warn!(
                    type_name,
                    order = text,
                    assigned,
                    "order is not an integer, using an assigned order"
                );
                assigned
            }),
            None => orders.next_order(),
        };

        Some(Self {
            type_name: type_name.to_owned(),
            remove,
            order,
        })
    }
}

/// A parsed entry with the 1-based line it came from.
#[derive(Debug, Clone)]
pub struct ParsedLine {
    pub line: usize,
    pub entry: DescriptorEntry,
}

/// Parse every directive in a descriptor, in line order.
pub fn parse_descriptor(content: &str, orders: &mut OrderAssigner) -> Vec<ParsedLine> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            DescriptorEntry::parse(line, orders).map(|entry| ParsedLine {
                line: idx + 1,
                entry,
            })
        })
        .collect()
}

/// Blank lines and `#` comments (optionally indented) carry no directive.
pub fn is_ignorable(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}
