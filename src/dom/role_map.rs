//! Maps HTML element names to the roles the Markdown renderer cares about.

use html5ever::LocalName;

/// Structural role of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// `h1`..`h6`, with the level.
    Heading(u8),
    /// `p`
    Paragraph,
    /// Anything else.
    Other,
}

/// Map an HTML element name to its role.
pub fn element_to_role(local_name: &LocalName) -> Role {
    match local_name.as_ref() {
        "h1" => Role::Heading(1),
        "h2" => Role::Heading(2),
        "h3" => Role::Heading(3),
        "h4" => Role::Heading(4),
        "h5" => Role::Heading(5),
        "h6" => Role::Heading(6),
        "p" => Role::Paragraph,
        _ => Role::Other,
    }
}
