use tracing::trace;

/// One canonical statement, brace or comment line, with the 1-based line of
/// the source text it started on.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text:   String,
    pub number: usize,
}

struct Normalizer {
    lines:      Vec<Line>,
    current:    String,
    pending:    String,
    start:      usize,
    number:     usize,
    terminated: bool,
}

impl Normalizer {
    fn new() -> Self {
        Normalizer {
            lines:      Vec::new(),
            current:    String::new(),
            pending:    String::new(),
            start:      1,
            number:     1,
            terminated: false,
        }
    }

    fn flush_word(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        if self.current.is_empty() {
            self.start = self.number;
        } else {
            self.current.push(' ');
        }
        self.current.push_str(&self.pending);
        self.pending.clear();
    }

    fn end_line(&mut self) {
        self.flush_word();
        self.terminated = false;
        if self.current.is_empty() {
            return;
        }
        trace!(line = self.start, text = %self.current, "canonical line");
        self.lines.push(Line {
            text:   std::mem::take(&mut self.current),
            number: self.start,
        });
    }

    fn emit_alone(&mut self, text: &str) {
        self.end_line();
        self.lines.push(Line {
            text:   text.to_owned(),
            number: self.number,
        });
    }

    fn push_comment(&mut self, comment: String) {
        self.flush_word();
        if self.current.is_empty() {
            self.start = self.number;
        } else {
            self.current.push(' ');
        }
        self.current.push_str(&comment);
    }
}

/// Rewrite free-form schema text into canonical lines: one statement, brace
/// or comment per line, words separated by a single space, `;` dropped.
///
/// A `//` comment runs to the end of its source line and stays on the line
/// of the statement it trails.
pub fn normalize_lines(text: &str) -> Vec<Line> {
    let mut n = Normalizer::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\n' => {
                n.end_line();
                n.number += 1;
            }
            ' ' | '\t' | '\r' => n.flush_word(),
            '{' => n.emit_alone("{"),
            '}' => n.emit_alone("}"),
            ';' => {
                n.flush_word();
                n.terminated = true;
            }
            '/' if chars.peek() == Some(&'/') => {
                let mut comment = String::from("/");
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    comment.push(next);
                    chars.next();
                }
                // a trailing carriage return belongs to the line ending
                if comment.ends_with('\r') {
                    comment.pop();
                }
                n.push_comment(comment);
            }
            _ => {
                if n.terminated {
                    n.end_line();
                }
                n.pending.push(ch);
            }
        }
    }
    n.end_line();
    n.lines
}

/// String form of [normalize_lines](fn.normalize_lines.html): the canonical
/// lines joined with `\n`.
pub fn normalize(text: &str) -> String {
    normalize_lines(text)
        .into_iter()
        .map(|line| line.text)
        .collect::<Vec<_>>()
        .join("\n")
}
