//! Port declaration head disambiguation.
//!
//! A port head such as `reg [7:0][3:0] data` mixes an optional net type, a
//! bit range, an optional array dimension, and the identifier, all using the
//! same bracket syntax. [`PortHeader::parse`] splits the head on `[` and
//! classifies the pieces by position.

/// The pieces of a port declaration head after the direction keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortHeader {
    /// Net type keyword(s) before the first bracket, e.g. `wire` or `reg signed`.
    pub net_type: Option<String>,
    /// The first bracketed specifier, brackets included.
    pub range: Option<String>,
    /// The second bracketed specifier, brackets included.
    pub array: Option<String>,
    /// The declared identifier, absent when the head ends before it.
    pub ident: Option<String>,
}

impl PortHeader {
    /// Parses the remainder of a port head.
    ///
    /// With two bracketed segments the identifier is normally the text after
    /// the second (`[7:0][3:0] lanes`). An unpacked array written after the
    /// name (`[7:0] mem [0:3]`) is also accepted: the text between the
    /// segments is then taken as the identifier instead of leaving it empty.
    ///
    /// Returns `None` when the head has more than two bracketed segments or a
    /// segment is missing its closing `]`.
    pub fn parse(remainder: &str) -> Option<Self> {
        let remainder = remainder.trim();
        let parts: Vec<&str> = remainder.split('[').collect();

        if parts.len() == 1 {
            let words: Vec<&str> = remainder.split_whitespace().collect();
            return Some(match words.split_last() {
                Some((ident, net)) => Self {
                    net_type: (!net.is_empty()).then(|| net.join(" ")),
                    ident: Some((*ident).to_string()),
                    ..Self::default()
                },
                None => Self::default(),
            });
        }
        if parts.len() > 3 {
            return None;
        }

        let (range, after_range) = parts[1].split_once(']')?;
        let mut header = Self {
            net_type: non_empty(parts[0]),
            range: Some(format!("[{}]", range.trim())),
            ..Self::default()
        };

        if parts.len() == 2 {
            header.ident = non_empty(after_range);
        } else {
            let (array, after_array) = parts[2].split_once(']')?;
            header.array = Some(format!("[{}]", array.trim()));
            // `[7:0] mem [0:3]`: the identifier sits between the two segments.
            header.ident = non_empty(after_range).or_else(|| non_empty(after_array));
        }
        Some(header)
    }

    /// Synthesizes the type string: net type and range separated by a space,
    /// array dimension appended directly.
    pub fn data_type(&self) -> String {
        let mut ty = [self.net_type.as_deref(), self.range.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(array) = &self.array {
            ty.push_str(array);
        }
        ty
    }
}

/// Synthesizes a parameter type from an optional qualifier and range.
pub fn parameter_type(qualifier: Option<&str>, range: Option<&str>) -> String {
    [qualifier, range]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapses whitespace runs to single spaces; `None` if nothing remains.
fn non_empty(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    (!words.is_empty()).then(|| words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(head: &str) -> PortHeader {
        PortHeader::parse(head).unwrap()
    }

    #[test]
    fn bare_identifier() {
        let h = parse(" a ");
        assert_eq!(h.ident.as_deref(), Some("a"));
        assert_eq!(h.net_type, None);
        assert_eq!(h.data_type(), "");
    }

    #[test]
    fn typed_identifier() {
        let h = parse(" wire clk");
        assert_eq!(h.ident.as_deref(), Some("clk"));
        assert_eq!(h.data_type(), "wire");
    }

    #[test]
    fn multi_word_type_keeps_all_but_last() {
        let h = parse("reg signed acc");
        assert_eq!(h.data_type(), "reg signed");
        assert_eq!(h.ident.as_deref(), Some("acc"));
    }

    #[test]
    fn net_type_whitespace_collapsed() {
        let h = parse("  reg  signed [31:0]   acc");
        assert_eq!(h.data_type(), "reg signed [31:0]");
        assert_eq!(h.ident.as_deref(), Some("acc"));
    }

    #[test]
    fn range_only() {
        let h = parse(" [7:0] b");
        assert_eq!(h.data_type(), "[7:0]");
        assert_eq!(h.ident.as_deref(), Some("b"));
    }

    #[test]
    fn type_and_range() {
        let h = parse(" reg [3:0] c ");
        assert_eq!(h.net_type.as_deref(), Some("reg"));
        assert_eq!(h.range.as_deref(), Some("[3:0]"));
        assert_eq!(h.data_type(), "reg [3:0]");
    }

    #[test]
    fn range_and_array() {
        let h = parse(" [7:0][3:0] d");
        assert_eq!(h.data_type(), "[7:0][3:0]");
        assert_eq!(h.ident.as_deref(), Some("d"));
    }

    #[test]
    fn type_range_and_array() {
        let h = parse("logic [31:0] [15:0] word");
        assert_eq!(h.data_type(), "logic [31:0][15:0]");
        assert_eq!(h.ident.as_deref(), Some("word"));
    }

    #[test]
    fn unpacked_dimension_after_identifier() {
        let h = parse("[7:0] mem [0:3]");
        assert_eq!(h.ident.as_deref(), Some("mem"));
        assert_eq!(h.data_type(), "[7:0][0:3]");
    }

    #[test]
    fn macro_width() {
        let h = parse("wire [`WIDTH-1:0] bus");
        assert_eq!(h.data_type(), "wire [`WIDTH-1:0]");
    }

    #[test]
    fn head_without_identifier() {
        let h = parse(" [7:0]");
        assert_eq!(h.ident, None);
        assert_eq!(h.data_type(), "[7:0]");
        assert_eq!(parse("   "), PortHeader::default());
    }

    #[test]
    fn three_segments_rejected() {
        assert!(PortHeader::parse("[1:0][2:0][3:0] x").is_none());
    }

    #[test]
    fn unclosed_segment_rejected() {
        assert!(PortHeader::parse("[WIDTH x").is_none());
        assert!(PortHeader::parse("[1:0][2:0 x").is_none());
    }

    #[test]
    fn parameter_types() {
        assert_eq!(parameter_type(None, None), "");
        assert_eq!(parameter_type(Some("integer"), None), "integer");
        assert_eq!(parameter_type(None, Some("[7:0]")), "[7:0]");
        assert_eq!(parameter_type(Some("signed"), Some("[7:0]")), "signed [7:0]");
    }
}
