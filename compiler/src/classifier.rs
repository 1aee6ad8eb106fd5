/// Syntactic category of a canonical line, decided by its first word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Blank,
    MessageStructural,
    Import,
    Package,
    Comment,
    Unrecognized,
}

/// A classified line. Message-structural lines are split further by their
/// first word so the schema builder can dispatch on them directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    /// `message <Name>`; the name is cut at any `{` glued to it.
    MessageStart(Option<&'a str>),
    OpenBrace,
    CloseBrace,
    /// A line starting with a property keyword.
    Field,
    /// `import ...`; carries the import target as written.
    Import(Option<&'a str>),
    /// `package <name>`
    Package(Option<&'a str>),
    /// Comment content, without the leading `//`.
    Comment(&'a str),
    /// The first word of a line nothing else matched.
    Unrecognized(&'a str),
}

impl LineKind<'_> {
    pub fn category(&self) -> Category {
        match self {
            LineKind::Blank => Category::Blank,
            LineKind::MessageStart(_)
            | LineKind::OpenBrace
            | LineKind::CloseBrace
            | LineKind::Field => Category::MessageStructural,
            LineKind::Import(_) => Category::Import,
            LineKind::Package(_) => Category::Package,
            LineKind::Comment(_) => Category::Comment,
            LineKind::Unrecognized(_) => Category::Unrecognized,
        }
    }
}

/// Classify one canonical line. Stateless: the open/closed message state
/// lives in the schema builder.
pub fn classify(line: &str) -> LineKind<'_> {
    let mut words = line.split_whitespace();
    let first = match words.next() {
        Some(first) => first,
        None => return LineKind::Blank,
    };

    match first {
        "message" => LineKind::MessageStart(message_name(line)),
        "required" | "optional" | "repeated" => LineKind::Field,
        "{" => LineKind::OpenBrace,
        "}" => LineKind::CloseBrace,
        "import" => LineKind::Import(words.next()),
        "package" => LineKind::Package(words.next()),
        _ if first.starts_with("//") => {
            let start = line.len() - line.trim_start().len() + 2;
            LineKind::Comment(&line[start..])
        }
        _ => LineKind::Unrecognized(first),
    }
}

/// Second word of a `message` line, with `{` treated as a separator.
fn message_name(line: &str) -> Option<&str> {
    line.split(|c: char| c.is_whitespace() || c == '{')
        .filter(|word| !word.is_empty())
        .nth(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_package() {
        let kind = classify("package pkg");
        assert_eq!(kind, LineKind::Package(Some("pkg")));
        assert_eq!(kind.category(), Category::Package);
        assert_eq!(classify("package"), LineKind::Package(None));
    }

    #[test]
    fn test_classify_message_structural() {
        assert_eq!(classify("message Test1"), LineKind::MessageStart(Some("Test1")));
        assert_eq!(classify("message Test1{"), LineKind::MessageStart(Some("Test1")));
        assert_eq!(classify("message {"), LineKind::MessageStart(None));
        assert_eq!(classify("{"), LineKind::OpenBrace);
        assert_eq!(classify("}"), LineKind::CloseBrace);
        for line in ["required string a = 1", "optional bool b = 2", "repeated int32 c = 3"] {
            assert_eq!(classify(line), LineKind::Field);
            assert_eq!(classify(line).category(), Category::MessageStructural);
        }
    }

    #[test]
    fn test_classify_comment() {
        assert_eq!(classify("//the name"), LineKind::Comment("the name"));
        assert_eq!(classify("  // spaced {}"), LineKind::Comment(" spaced {}"));
        assert_eq!(classify("//"), LineKind::Comment(""));
        assert_eq!(classify("//x").category(), Category::Comment);
    }

    #[test]
    fn test_classify_others() {
        assert_eq!(classify(""), LineKind::Blank);
        assert_eq!(classify(" \t "), LineKind::Blank);
        assert_eq!(classify("import \"a.proto\""), LineKind::Import(Some("\"a.proto\"")));
        assert_eq!(classify("import").category(), Category::Import);
        assert_eq!(classify("option java_package = \"x\""), LineKind::Unrecognized("option"));
        assert_eq!(classify("};"), LineKind::Unrecognized("};"));
        assert_eq!(classify("enum Color").category(), Category::Unrecognized);
    }
}
